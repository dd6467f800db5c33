//! 在单个宿主文件之上模拟一个按块寻址的存储设备，
//! 作为上层文件系统的地基：固定大小块的读写、create/mount/shutdown
//! 生命周期，以及用于故障注入的低级格式化。

pub mod disk;
pub mod utils;

pub use disk::{
    BlockDevice, DiskError, DiskHeader, DiskUnit, Result, VirtualDiskBlock, BAD_SECTOR_MARKER,
    DEFAULT_BLOCK_SIZE, DEFAULT_CAPACITY, HEADER_SIZE,
};
pub use utils::is_power_of_two;
