//! BIP32 扩展私钥

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use hmac::{Hmac, Mac};
use log::debug;
use secp256k1::{PublicKey, Scalar, SecretKey};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::path::{ChildNumber, DerivationPath};
use crate::error::{Result, SeedError};

type HmacSha512 = Hmac<Sha512>;

/// BIP32 主密钥 HMAC 的键
const MASTER_KEY_DOMAIN: &[u8] = b"Bitcoin seed";

/// 私钥 + 链码, Drop 时清零
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedPrivateKey {
    private_key: [u8; 32],
    chain_code: [u8; 32],
    depth: u8,
}

impl ExtendedPrivateKey {
    /// 从 BIP39 种子派生主密钥
    ///
    /// I = HMAC-SHA512("Bitcoin seed", seed), IL 为私钥, IR 为链码。
    /// IL 为零或 >= n 时返回 `InvalidSeed`。
    pub fn master(seed: &[u8]) -> Result<Self> {
        let mut mac =
            HmacSha512::new_from_slice(MASTER_KEY_DOMAIN).map_err(|_| SeedError::InvalidSeed)?;
        mac.update(seed);
        let i = hmac_output(mac);

        // 借助 SecretKey 完成范围检查
        let mut secret = SecretKey::from_slice(&i[..32]).map_err(|_| SeedError::InvalidSeed)?;
        secret.non_secure_erase();

        Ok(Self::from_halves(&i, 0))
    }

    /// CKDpriv: 派生单个子密钥
    ///
    /// 硬化: data = 0x00 || k_par || ser32(i)
    /// 普通: data = serP(K_par) || ser32(i)
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self> {
        let raw_index = child.to_u32();
        let failure = || SeedError::DerivationFailure { index: raw_index };

        let mut data = Zeroizing::new([0u8; 37]);
        if child.is_hardened() {
            data[1..33].copy_from_slice(&self.private_key);
        } else {
            data[..33].copy_from_slice(&self.public_key()?.serialize());
        }
        BigEndian::write_u32(&mut data[33..], raw_index);

        let mut mac = HmacSha512::new_from_slice(&self.chain_code).map_err(|_| failure())?;
        mac.update(&data[..]);
        let mut i = hmac_output(mac);

        // IL >= n 或子私钥为零时该索引无效
        let mut il = Zeroizing::new([0u8; 32]);
        il.copy_from_slice(&i[..32]);
        let tweak = Scalar::from_be_bytes(*il).map_err(|_| failure())?;
        let mut child_key = self.secret_key()?.add_tweak(&tweak).map_err(|_| failure())?;

        i[..32].copy_from_slice(&child_key.secret_bytes());
        child_key.non_secure_erase();

        Ok(Self::from_halves(&i, self.depth.saturating_add(1)))
    }

    /// 沿路径依次派生
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut current = self.clone();
        for &segment in path.segments() {
            current = current.derive_child(segment)?;
        }
        debug!("derived key at depth {}", current.depth);
        Ok(current)
    }

    /// 压缩/非压缩序列化均可从此取得
    pub fn public_key(&self) -> Result<PublicKey> {
        let mut secret = self.secret_key()?;
        let public = PublicKey::from_secret_key_global(&secret);
        secret.non_secure_erase();
        Ok(public)
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    fn secret_key(&self) -> Result<SecretKey> {
        // 构造时已做范围检查, 这里失败只可能是内部状态损坏
        SecretKey::from_slice(&self.private_key).map_err(|_| SeedError::InvalidSeed)
    }

    fn from_halves(i: &[u8; 64], depth: u8) -> Self {
        let mut private_key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        private_key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
        Self {
            private_key,
            chain_code,
            depth,
        }
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

fn hmac_output(mac: HmacSha512) -> Zeroizing<[u8; 64]> {
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}
