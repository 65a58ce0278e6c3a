//! 错误类型定义

use thiserror::Error;

/// 核心操作的统一错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// 单词数量不在 {12, 15, 18, 21, 24} 中
    #[error("invalid word count: {0} (expected 12, 15, 18, 21 or 24)")]
    InvalidWordCount(usize),

    /// 熵长度不是 16/20/24/28/32 字节
    #[error("invalid entropy length: {0} bytes (expected 16, 20, 24, 28 or 32)")]
    InvalidEntropyLength(usize),

    /// 助记词中含有不在 BIP39 词表中的单词 (position 从 1 开始)
    #[error("invalid mnemonic: word #{position} '{word}' is not in the BIP39 wordlist")]
    UnknownWord { position: usize, word: String },

    /// 校验和不匹配
    #[error("invalid mnemonic: checksum mismatch")]
    InvalidChecksum,

    #[error("weak cipher parameters: {0}")]
    WeakParameters(String),

    #[error("cipher parameters too large: {0}")]
    ParametersTooLarge(String),

    /// Argon2 后端失败
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// 主私钥为零或 >= 曲线阶 n
    #[error("invalid seed: master key out of range")]
    InvalidSeed,

    /// 子密钥派生落在无效区间, 调用方应换下一个索引
    #[error("child key derivation failed at index {index:#010x}")]
    DerivationFailure { index: u32 },

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// 系统 CSPRNG 不可用, 不回退到更弱的随机源
    #[error("secure random source unavailable: {0}")]
    WeakRandomness(String),

    #[error("address encoding failed: {0}")]
    AddressEncoding(String),
}

impl SeedError {
    /// 是否属于"无效助记词"类错误 (数量/单词/校验和)
    pub fn is_invalid_mnemonic(&self) -> bool {
        matches!(
            self,
            SeedError::InvalidWordCount(_)
                | SeedError::InvalidEntropyLength(_)
                | SeedError::UnknownWord { .. }
                | SeedError::InvalidChecksum
        )
    }

    /// 命令行进程退出码
    ///
    /// 2 = 校验错误, 3 = 口令/参数错误, 5 = 密码学错误, 1 = 其他
    pub fn exit_code(&self) -> i32 {
        match self {
            e if e.is_invalid_mnemonic() => 2,
            SeedError::UnsupportedNetwork(_) | SeedError::InvalidPath(_) => 2,
            SeedError::WeakParameters(_) | SeedError::ParametersTooLarge(_) => 3,
            SeedError::KeyDerivation(_)
            | SeedError::InvalidSeed
            | SeedError::DerivationFailure { .. }
            | SeedError::WeakRandomness(_)
            | SeedError::AddressEncoding(_) => 5,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
