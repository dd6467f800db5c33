use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::disk::error::{DiskError, Result};
use crate::utils::is_power_of_two;

/// 磁盘头在块 0 中占用的字节数：两个 4 字节整数
pub const HEADER_SIZE: usize = 8;

/// 磁盘头（持久化在块 0 的起始处）
///
/// 磁盘格式固定为大端有符号整数：
/// - 偏移 0..3：capacity（总块数）
/// - 偏移 4..7：block_size（每块字节数）
/// 块 0 的其余部分为未使用的填充。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskHeader {
    pub capacity: i32,   // 磁盘总块数
    pub block_size: i32, // 每块大小（字节）
}

// 大端 + 定长整数编码，保证和磁盘格式逐字节一致
fn codec() -> impl Options {
    bincode::options().with_big_endian().with_fixint_encoding()
}

impl DiskHeader {
    pub fn new(capacity: u32, block_size: u32) -> Self {
        Self {
            capacity: capacity as i32,
            block_size: block_size as i32,
        }
    }

    /// 编码为块 0 起始处的 8 个字节
    pub fn encode(&self) -> Result<Vec<u8>> {
        codec()
            .serialize(self)
            .map_err(|e| DiskError::CorruptHeader(e.to_string()))
    }

    /// 从块 0 起始处的 8 个字节解码，并校验磁盘参数不变量
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(DiskError::CorruptHeader(format!(
                "header needs {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }
        let header: DiskHeader = codec()
            .deserialize(&bytes[..HEADER_SIZE])
            .map_err(|e| DiskError::CorruptHeader(e.to_string()))?;
        header.validate()?;
        Ok(header)
    }

    // 容量和块大小都必须是正的 2 的幂
    fn validate(&self) -> Result<()> {
        if !is_power_of_two(self.capacity as i64) || !is_power_of_two(self.block_size as i64) {
            return Err(DiskError::CorruptHeader(format!(
                "capacity = {} block size = {}",
                self.capacity, self.block_size
            )));
        }
        Ok(())
    }

    /// 磁盘镜像的总字节数
    pub fn disk_size(&self) -> u64 {
        self.capacity as u64 * self.block_size as u64
    }
}
