//! BIP32 派生路径

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SeedError};

/// 硬化派生索引偏移 (2^31)
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP44 purpose 字段
pub const BIP44_PURPOSE: u32 = 44;

/// 路径中的单个分段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildNumber {
    index: u32,
    hardened: bool,
}

impl ChildNumber {
    /// 普通 (非硬化) 分段, index < 2^31
    pub fn normal(index: u32) -> Result<Self> {
        Self::new(index, false)
    }

    /// 硬化分段, index < 2^31
    pub fn hardened(index: u32) -> Result<Self> {
        Self::new(index, true)
    }

    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(SeedError::InvalidPath(format!(
                "child index {} out of range",
                index
            )));
        }
        Ok(Self { index, hardened })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// 序列化到 CKD 输入中的 32 位值 (硬化时加 2^31)
    pub fn to_u32(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// 从主密钥开始的有序分段序列, 文本形式 `m/44'/0'/0'/0/0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    pub fn new(segments: Vec<ChildNumber>) -> Self {
        Self(segments)
    }

    /// `m/44'/coin'/account'/change/index`
    pub fn bip44(coin_type: u32, account: u32, change: u32, index: u32) -> Result<Self> {
        let mut path = Self::bip44_account(coin_type, account)?;
        path.push(ChildNumber::normal(change)?);
        path.push(ChildNumber::normal(index)?);
        Ok(path)
    }

    /// `m/44'/coin'/account'`
    pub fn bip44_account(coin_type: u32, account: u32) -> Result<Self> {
        Ok(Self(vec![
            ChildNumber::hardened(BIP44_PURPOSE)?,
            ChildNumber::hardened(coin_type)?,
            ChildNumber::hardened(account)?,
        ]))
    }

    pub fn push(&mut self, child: ChildNumber) {
        self.0.push(child);
    }

    /// 追加一个分段后的新路径
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut path = self.clone();
        path.push(child);
        path
    }

    pub fn segments(&self) -> &[ChildNumber] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for DerivationPath {
    type Err = SeedError;

    /// 接受 `'`、`h`、`H` 作为硬化标记
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(SeedError::InvalidPath(format!(
                "'{}' must start with 'm'",
                s
            )));
        }

        let mut segments = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            let index: u32 = digits.parse().map_err(|_| {
                SeedError::InvalidPath(format!("invalid path component '{}'", part))
            })?;
            segments.push(ChildNumber::new(index, hardened)?);
        }

        Ok(Self(segments))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bip44_rendering() {
        let path = DerivationPath::bip44(0, 0, 0, 0).unwrap();
        assert_eq!(path.to_string(), "m/44'/0'/0'/0/0");
        let path = DerivationPath::bip44(429, 1, 0, 7).unwrap();
        assert_eq!(path.to_string(), "m/44'/429'/1'/0/7");
    }

    #[test]
    fn test_parse_hardened_markers() {
        let a: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        let b: DerivationPath = "m/44h/60H/0'/0/0".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.segments()[1].to_u32(), 0x8000_003C);
        assert_eq!(a.segments()[4].to_u32(), 0);
    }

    #[test]
    fn test_parse_master_only() {
        let path: DerivationPath = "m".parse().unwrap();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "m");
    }

    #[test]
    fn test_parse_errors() {
        assert!("44'/0'".parse::<DerivationPath>().is_err());
        assert!("m/abc".parse::<DerivationPath>().is_err());
        assert!("m/2147483648".parse::<DerivationPath>().is_err());
        assert!("m//0".parse::<DerivationPath>().is_err());
    }
}
