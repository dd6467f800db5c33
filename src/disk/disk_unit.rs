use std::{
    fs::{File, OpenOptions},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    path::Path,
    sync::Mutex,
};

use log::info;
use rand::Rng;

use crate::disk::{
    block_device::BlockDevice,
    error::{DiskError, Result},
    header::{DiskHeader, HEADER_SIZE},
    types::{VirtualDiskBlock, DEFAULT_BLOCK_SIZE, DEFAULT_CAPACITY},
};
use crate::utils::is_power_of_two;

/// 低级格式化写入的坏扇区标记字节
pub const BAD_SECTOR_MARKER: u8 = 0xFF;

/// 坏扇区出现概率：每个字节独立，1/149
const BAD_SECTOR_RATE: u32 = 149;

/// 磁盘句柄的生命周期状态
/// 只有 Active 状态持有文件句柄，关闭后句柄被释放。
#[derive(Debug)]
enum DiskState {
    Active(File),
    ShutDown,
}

/// 模拟的磁盘单元
///
/// 一个磁盘单元对应宿主文件系统中的一个镜像文件，按固定大小的块寻址。
/// 块 0 保留存放磁盘头（容量 + 块大小），块 1..capacity-1 存放调用者数据。
///
/// 生命周期：`create` 格式化一个新镜像并关闭（off 状态，不返回句柄），
/// `mount` 打开已有镜像并读回磁盘头（active 状态），`shutdown` 关闭句柄，
/// 之后的读写一律返回 `NotActive`。
///
/// 活动期间磁盘单元独占镜像文件；同一镜像的多个并发句柄不受支持，
/// 属于调用方违反前置条件。
#[derive(Debug)]
pub struct DiskUnit {
    name: String,     // 镜像文件名
    capacity: u32,    // 总块数
    block_size: u32,  // 每块字节数
    state: Mutex<DiskState>,
}

impl DiskUnit {
    /// 用默认参数（1024 块，每块 256 字节）创建一个新磁盘镜像
    pub fn create(name: &str) -> Result<()> {
        Self::create_with(name, DEFAULT_CAPACITY, DEFAULT_BLOCK_SIZE)
    }

    /// 创建一个新磁盘镜像：分配 capacity * block_size 字节，
    /// 把磁盘头写入块 0，然后关闭文件（off 状态，不保留句柄）。
    ///
    /// capacity 和 block_size 必须是正的 2 的幂，且块 0 必须装得下磁盘头。
    pub fn create_with(name: &str, capacity: u32, block_size: u32) -> Result<()> {
        if Path::new(name).exists() {
            return Err(DiskError::AlreadyExists(name.to_string()));
        }
        if !is_power_of_two(capacity as i64)
            || !is_power_of_two(block_size as i64)
            || (block_size as usize) < HEADER_SIZE
        {
            return Err(DiskError::InvalidParameter {
                capacity,
                block_size,
            });
        }

        // 创建失败时删掉写了一半的镜像，不留残缺文件
        if let Err(e) = Self::format_image(name, capacity, block_size) {
            let _ = std::fs::remove_file(name);
            return Err(e);
        }

        info!(
            "created disk unit {}: {} blocks x {} bytes",
            name, capacity, block_size
        );
        Ok(())
    }

    fn format_image(name: &str, capacity: u32, block_size: u32) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(name)?;

        file.set_len(capacity as u64 * block_size as u64)?;

        // 把磁盘参数（块数、每块字节数）写进块 0
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&DiskHeader::new(capacity, block_size).encode()?)?;
        file.sync_all()?;
        Ok(())
    }

    /// 挂载一个已存在的磁盘镜像：打开文件，读回磁盘头并校验，
    /// 返回处于 active 状态、可以读写的句柄。
    pub fn mount(name: &str) -> Result<DiskUnit> {
        if !Path::new(name).exists() {
            return Err(DiskError::NotFound(name.to_string()));
        }

        let mut file = OpenOptions::new().read(true).write(true).open(name)?;

        let mut raw = [0u8; HEADER_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut raw).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                DiskError::CorruptHeader("image shorter than the header".to_string())
            } else {
                DiskError::Io(e)
            }
        })?;
        let header = DiskHeader::decode(&raw)?;

        // 镜像长度必须和磁盘头描述的几何参数一致
        let len = file.metadata()?.len();
        if len != header.disk_size() {
            return Err(DiskError::CorruptHeader(format!(
                "image length {} does not match geometry {}",
                len,
                header.disk_size()
            )));
        }

        info!(
            "mounted disk unit {}: {} blocks x {} bytes",
            name, header.capacity, header.block_size
        );
        Ok(Self {
            name: name.to_string(),
            capacity: header.capacity as u32,
            block_size: header.block_size as u32,
            state: Mutex::new(DiskState::Active(file)),
        })
    }

    /// 把块 block_num 的内容整块读进 buf，覆盖 buf 的全部字节
    pub fn read(&self, block_num: u32, buf: &mut VirtualDiskBlock) -> Result<()> {
        let offset = self.block_offset(block_num)?;
        self.check_buffer(buf)?;

        let mut state = self.state.lock().unwrap();
        let file = Self::active_file(&mut state)?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf.as_bytes_mut())?;
        Ok(())
    }

    /// 把 buf 的全部字节整块写入块 block_num
    /// 块 0 保留给磁盘头，写入会被拒绝。
    pub fn write(&self, block_num: u32, buf: &VirtualDiskBlock) -> Result<()> {
        if block_num == 0 {
            return Err(DiskError::ReservedBlock);
        }
        let offset = self.block_offset(block_num)?;
        self.check_buffer(buf)?;

        let mut state = self.state.lock().unwrap();
        let file = Self::active_file(&mut state)?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf.as_bytes())?;
        Ok(())
    }

    /// 关闭磁盘单元：落盘并释放文件句柄
    /// 重复调用是无害的空操作；关闭后读写返回 `NotActive`。
    pub fn shutdown(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, DiskState::ShutDown) {
            DiskState::Active(file) => {
                file.sync_all()?;
                info!("disk unit {} shut down", self.name);
                Ok(())
            }
            DiskState::ShutDown => Ok(()),
        }
    }

    /// 低级格式化：从镜像起始处（偏移 0）覆写全部 capacity * block_size 字节，
    /// 每个字节独立地以 1/149 的概率写入坏扇区标记 0xFF，否则写入 0x00，
    /// 用来给上层做介质退化的故障注入测试。
    ///
    /// 破坏性操作：磁盘头也会被覆写，格式化后的镜像无法再挂载，
    /// 只能删除后用 `create` 重新创建。
    pub fn low_level_format(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let file = Self::active_file(&mut state)?;

        // 显式回到镜像起始处，不依赖之前的文件位置
        file.seek(SeekFrom::Start(0))?;

        let mut rng = rand::thread_rng();
        let mut chunk = vec![0u8; self.block_size as usize];
        for _ in 0..self.capacity {
            for byte in chunk.iter_mut() {
                *byte = if rng.gen_range(0..BAD_SECTOR_RATE) == 0 {
                    BAD_SECTOR_MARKER
                } else {
                    0x00
                };
            }
            file.write_all(&chunk)?;
        }

        info!("low-level formatted disk unit {}", self.name);
        Ok(())
    }

    /// 磁盘总块数
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// 每块字节数
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// 镜像文件名
    pub fn name(&self) -> &str {
        &self.name
    }

    // 块号必须落在 [0, capacity) 内，返回对应的字节偏移
    fn block_offset(&self, block_num: u32) -> Result<u64> {
        if block_num >= self.capacity {
            return Err(DiskError::InvalidBlockNumber(block_num));
        }
        Ok(block_num as u64 * self.block_size as u64)
    }

    // 缓冲区长度必须等于磁盘块大小
    fn check_buffer(&self, buf: &VirtualDiskBlock) -> Result<()> {
        if buf.capacity() != self.block_size as usize {
            return Err(DiskError::InvalidBlockBuffer {
                expected: self.block_size,
                actual: buf.capacity(),
            });
        }
        Ok(())
    }

    fn active_file(state: &mut DiskState) -> Result<&mut File> {
        match state {
            DiskState::Active(file) => Ok(file),
            DiskState::ShutDown => Err(DiskError::NotActive),
        }
    }
}

impl BlockDevice for DiskUnit {
    fn read_block(&self, block_num: u32, buf: &mut VirtualDiskBlock) -> Result<()> {
        self.read(block_num, buf)
    }

    fn write_block(&self, block_num: u32, buf: &VirtualDiskBlock) -> Result<()> {
        self.write(block_num, buf)
    }
}
