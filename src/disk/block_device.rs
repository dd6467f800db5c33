use crate::disk::error::Result;
use crate::disk::types::VirtualDiskBlock;

/// 上层文件系统消费的块设备抽象
/// 缓冲区长度必须等于设备的块大小，由实现方检查。
pub trait BlockDevice: Send + Sync {
    fn read_block(&self, block_num: u32, buf: &mut VirtualDiskBlock) -> Result<()>;
    fn write_block(&self, block_num: u32, buf: &VirtualDiskBlock) -> Result<()>;
}
