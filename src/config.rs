//! 变换参数与地址派生配置

use crate::error::{Result, SeedError};

/// 默认 Argon2id 迭代次数
pub const DEFAULT_ITERATIONS: u32 = 5;
/// 默认 Argon2id 内存成本 (KiB), 128 MiB
pub const DEFAULT_MEMORY_COST_KIB: u32 = 131_072;

pub const MIN_ITERATIONS: u32 = 1;
pub const MAX_ITERATIONS: u32 = 100;
/// 8 MiB
pub const MIN_MEMORY_COST_KIB: u32 = 8_192;
/// 2 GiB
pub const MAX_MEMORY_COST_KIB: u32 = 2_097_152;

/// 单个网络一次最多派生的地址数
pub const MAX_ADDRESS_COUNT: u32 = 100;

/// Argon2id 成本参数 (口令本身不在此结构中, 由调用方单独传入并负责清零)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherParams {
    pub iterations: u32,
    pub memory_cost_kib: u32,
}

impl Default for CipherParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            memory_cost_kib: DEFAULT_MEMORY_COST_KIB,
        }
    }
}

impl CipherParams {
    pub fn new(iterations: u32, memory_cost_kib: u32) -> Self {
        Self {
            iterations,
            memory_cost_kib,
        }
    }

    /// 检查参数是否在安全区间内
    ///
    /// 低于下限返回 `WeakParameters`, 从不静默降级。
    pub fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITERATIONS {
            return Err(SeedError::WeakParameters(format!(
                "iterations {} (minimum: {})",
                self.iterations, MIN_ITERATIONS
            )));
        }
        if self.memory_cost_kib < MIN_MEMORY_COST_KIB {
            return Err(SeedError::WeakParameters(format!(
                "memory cost {}KiB (minimum: {}KiB = 8MiB)",
                self.memory_cost_kib, MIN_MEMORY_COST_KIB
            )));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(SeedError::ParametersTooLarge(format!(
                "iterations {} (maximum: {})",
                self.iterations, MAX_ITERATIONS
            )));
        }
        if self.memory_cost_kib > MAX_MEMORY_COST_KIB {
            return Err(SeedError::ParametersTooLarge(format!(
                "memory cost {}KiB (maximum: {}KiB = 2GiB)",
                self.memory_cost_kib, MAX_MEMORY_COST_KIB
            )));
        }
        Ok(())
    }
}

/// BIP44 路径中可配置的部分 (account'/change/index) 与每个网络的地址数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationConfig {
    pub account: u32,
    pub change: u32,
    /// 起始地址索引
    pub index: u32,
    /// 连续派生的地址数量
    pub count: u32,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            account: 0,
            change: 0,
            index: 0,
            count: 1,
        }
    }
}

impl DerivationConfig {
    pub fn with_account(mut self, account: u32) -> Self {
        self.account = account;
        self
    }

    pub fn with_change(mut self, change: u32) -> Self {
        self.change = change;
        self
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// 需要派生的地址索引, 数量被限制在 [1, MAX_ADDRESS_COUNT]
    ///
    /// 非硬化索引不得进入 2^31 以上区间。
    pub fn indices(&self) -> Result<std::ops::Range<u32>> {
        let count = self.count.clamp(1, MAX_ADDRESS_COUNT);
        let end = self
            .index
            .checked_add(count)
            .filter(|&end| end <= crate::hd::HARDENED_OFFSET)
            .ok_or_else(|| {
                SeedError::InvalidPath(format!(
                    "address index {} + {} exceeds the non-hardened range",
                    self.index, count
                ))
            })?;
        if self.account >= crate::hd::HARDENED_OFFSET || self.change >= crate::hd::HARDENED_OFFSET
        {
            return Err(SeedError::InvalidPath(format!(
                "account {} / change {} out of range",
                self.account, self.change
            )));
        }
        Ok(self.index..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_params_bounds() {
        assert!(CipherParams::new(1, 8192).validate().is_ok());
        assert!(CipherParams::default().validate().is_ok());
        assert!(CipherParams::new(100, 2_097_152).validate().is_ok());

        assert!(matches!(
            CipherParams::new(0, 131072).validate(),
            Err(SeedError::WeakParameters(_))
        ));
        assert!(matches!(
            CipherParams::new(5, 4096).validate(),
            Err(SeedError::WeakParameters(_))
        ));
        assert!(matches!(
            CipherParams::new(101, 131072).validate(),
            Err(SeedError::ParametersTooLarge(_))
        ));
        assert!(matches!(
            CipherParams::new(5, 3_000_000).validate(),
            Err(SeedError::ParametersTooLarge(_))
        ));
    }

    #[test]
    fn test_derivation_defaults() {
        let config = DerivationConfig::default();
        assert_eq!((config.account, config.change, config.index), (0, 0, 0));
        assert_eq!(config.indices().unwrap(), 0..1);
    }

    #[test]
    fn test_derivation_count_is_clamped() {
        let config = DerivationConfig::default().with_index(5).with_count(1000);
        assert_eq!(config.indices().unwrap(), 5..105);

        let zero = DerivationConfig::default().with_count(0);
        assert_eq!(zero.indices().unwrap(), 0..1);
    }

    #[test]
    fn test_derivation_rejects_hardened_range() {
        let config = DerivationConfig::default().with_index(0x7FFF_FFFF).with_count(2);
        assert!(config.indices().is_err());
        let config = DerivationConfig::default().with_account(0x8000_0000);
        assert!(config.indices().is_err());
    }
}
