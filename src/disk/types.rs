use crate::disk::error::{DiskError, Result};

/// 默认的磁盘块数：1024 块
pub const DEFAULT_CAPACITY: u32 = 1024;

/// 默认的每个逻辑块大小：256 字节
/// 磁盘以“块”为最小读写单位。
pub const DEFAULT_BLOCK_SIZE: u32 = 256;

/// 表示一个逻辑块的内容（长度在创建时固定）
/// 调用者创建一次，之后在多次读写中复用。
/// 长度必须与目标磁盘的块大小一致，这个匹配在每次读写时检查。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDiskBlock {
    data: Vec<u8>, // 块内容，长度固定
}

impl VirtualDiskBlock {
    /// 创建一个默认大小（256 字节）的块缓冲区
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BLOCK_SIZE as usize)
    }

    /// 创建一个指定大小的块缓冲区，所有字节清零
    pub fn with_capacity(block_capacity: usize) -> Self {
        Self {
            data: vec![0u8; block_capacity],
        }
    }

    /// 块缓冲区的长度（字节数）
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// 读取 index 位置的字节
    pub fn get(&self, index: usize) -> Result<u8> {
        if index >= self.data.len() {
            return Err(DiskError::IndexOutOfRange(index));
        }
        Ok(self.data[index])
    }

    /// 覆盖 index 位置的字节
    pub fn set(&mut self, index: usize, value: u8) -> Result<()> {
        if index >= self.data.len() {
            return Err(DiskError::IndexOutOfRange(index));
        }
        self.data[index] = value;
        Ok(())
    }

    /// 把整个缓冲区填充为同一个字节
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Default for VirtualDiskBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_256() {
        let block = VirtualDiskBlock::new();
        assert_eq!(block.capacity(), 256);
        assert!(block.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn get_set_round_trip() {
        let mut block = VirtualDiskBlock::with_capacity(16);
        block.set(3, 0xAB).unwrap();
        assert_eq!(block.get(3).unwrap(), 0xAB);
        assert_eq!(block.get(0).unwrap(), 0);
    }

    #[test]
    fn index_equal_to_capacity_is_rejected() {
        // 半开区间：index == capacity 必须越界
        let mut block = VirtualDiskBlock::with_capacity(16);
        assert!(matches!(block.get(16), Err(DiskError::IndexOutOfRange(16))));
        assert!(matches!(
            block.set(16, 1),
            Err(DiskError::IndexOutOfRange(16))
        ));
    }
}
