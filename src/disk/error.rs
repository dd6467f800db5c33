use std::fmt;

/// 磁盘层错误类型
#[derive(Debug)]
pub enum DiskError {
    Io(std::io::Error),   // 底层 I/O 错误
    CorruptHeader(String), // 磁盘头损坏或不完整
    AlreadyExists(String), // 磁盘镜像已存在，带名字
    NotFound(String),      // 磁盘镜像不存在，带名字
    InvalidParameter {
        // 容量或块大小非法（非正数或非 2 的幂）
        capacity: u32,
        block_size: u32,
    },
    InvalidBlockNumber(u32), // 块号超出有效范围
    InvalidBlockBuffer {
        // 块缓冲区长度与磁盘块大小不一致
        expected: u32,
        actual: usize,
    },
    ReservedBlock,           // 块 0 保留给磁盘头，禁止写入
    IndexOutOfRange(usize),  // 块缓冲区内部下标越界
    NotActive,               // 磁盘已关闭，读写非法
                             // 可以继续扩展其他错误类型
}

impl From<std::io::Error> for DiskError {
    fn from(e: std::io::Error) -> Self {
        DiskError::Io(e)
    }
}

// 实现 Display trait，用于打印错误信息
impl fmt::Display for DiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Disk I/O error: {}", e),
            Self::CorruptHeader(desc) => write!(f, "Corrupt disk header: {}", desc),
            Self::AlreadyExists(name) => write!(f, "Disk name is already used: {}", name),
            Self::NotFound(name) => write!(f, "No disk has name: {}", name),
            Self::InvalidParameter {
                capacity,
                block_size,
            } => write!(
                f,
                "Invalid values: capacity = {} block size = {}",
                capacity, block_size
            ),
            Self::InvalidBlockNumber(n) => write!(f, "Invalid block number: {}", n),
            Self::InvalidBlockBuffer { expected, actual } => write!(
                f,
                "Invalid block buffer capacity: expected {}, got {}",
                expected, actual
            ),
            Self::ReservedBlock => write!(
                f,
                "The first block is reserved for system use and can't be overwritten"
            ),
            Self::IndexOutOfRange(index) => write!(f, "Invalid index: {}", index),
            Self::NotActive => write!(f, "Disk unit has been shut down"),
        }
    }
}

// 支持链式错误，方便追踪底层原因
impl std::error::Error for DiskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// 磁盘层统一结果类型
pub type Result<T> = std::result::Result<T, DiskError>;
