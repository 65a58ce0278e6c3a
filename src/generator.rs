//! 随机助记词生成

use log::info;
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::{Result, SeedError};
use crate::mnemonic::{Mnemonic, WordCount};

/// 生成随机助记词
///
/// 熵直接取自操作系统 CSPRNG; 随机源失败时返回 `WeakRandomness`, 不做任何回退。
pub fn generate(word_count: usize) -> Result<Mnemonic> {
    let kind = WordCount::from_words(word_count)?;

    let mut entropy = Zeroizing::new(vec![0u8; kind.entropy_bytes()]);
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| SeedError::WeakRandomness(e.to_string()))?;

    info!(
        "generated {} bits of entropy for a {}-word mnemonic",
        kind.entropy_bits(),
        word_count
    );
    Mnemonic::from_entropy(&entropy)
}
