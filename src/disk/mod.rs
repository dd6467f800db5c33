pub mod block_device;
pub mod disk_unit;
pub mod error;
pub mod header;
pub mod types;

pub use block_device::BlockDevice;
pub use disk_unit::{DiskUnit, BAD_SECTOR_MARKER};
pub use error::{DiskError, Result};
pub use header::{DiskHeader, HEADER_SIZE};
pub use types::{VirtualDiskBlock, DEFAULT_BLOCK_SIZE, DEFAULT_CAPACITY};
