//! 助记词可逆变换 (Argon2id 密钥流 XOR)
//!
//! 密钥流只由口令和成本参数决定:
//!
//! ```text
//! salt      = SHA-256("seedcipher/v1/keystream-salt" || 0x00 || password)
//! keystream = Argon2id(password, salt, t = iterations, m = memory_cost_kib, p = 1)
//! entropy'  = entropy XOR keystream[..entropy.len()]
//! ```
//!
//! 盐不依赖熵, 因此对输出再变换一次会得到同一个密钥流, XOR 自反即可还原原助记词。
//! 新熵的校验和重新计算, 结果总是合法的 BIP39 助记词。

use argon2::{Algorithm, Argon2, Params, Version};
use log::{debug, info};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::config::CipherParams;
use crate::error::{Result, SeedError};
use crate::mnemonic::Mnemonic;

/// 盐派生的固定上下文串, 修改会破坏已有密文的可逆性
pub const SALT_CONTEXT: &[u8] = b"seedcipher/v1/keystream-salt";

/// Argon2id 并行度
pub const PARALLELISM: u32 = 1;

/// 由口令派生密钥流盐
pub fn keystream_salt(password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SALT_CONTEXT);
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Argon2id 派生 `output_len` 字节密钥流
pub fn derive_keystream(
    password: &str,
    salt: &[u8],
    iterations: u32,
    memory_cost_kib: u32,
    output_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let params = Params::new(memory_cost_kib, iterations, PARALLELISM, Some(output_len))
        .map_err(|e| SeedError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut keystream = Zeroizing::new(vec![0u8; output_len]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut keystream)
        .map_err(|e| SeedError::KeyDerivation(e.to_string()))?;

    Ok(keystream)
}

/// 变换助记词文本
///
/// 加密与解密是同一个操作。
pub fn transform(
    phrase: &str,
    password: &str,
    iterations: u32,
    memory_cost_kib: u32,
) -> Result<Mnemonic> {
    let params = CipherParams::new(iterations, memory_cost_kib);
    check_inputs(password, &params)?;
    let mnemonic = Mnemonic::parse(phrase)?;
    transform_mnemonic(&mnemonic, password, &params)
}

/// 变换已解析的助记词, 输出单词数量与输入相同
pub fn transform_mnemonic(
    mnemonic: &Mnemonic,
    password: &str,
    params: &CipherParams,
) -> Result<Mnemonic> {
    check_inputs(password, params)?;

    info!(
        "transforming {}-word mnemonic (Argon2id t={}, m={}KiB)",
        mnemonic.word_count(),
        params.iterations,
        params.memory_cost_kib
    );

    let mut entropy = mnemonic.entropy();
    let salt = Zeroizing::new(keystream_salt(password));
    let keystream = derive_keystream(
        password,
        &salt[..],
        params.iterations,
        params.memory_cost_kib,
        entropy.len(),
    )?;

    for (byte, key) in entropy.iter_mut().zip(keystream.iter()) {
        *byte ^= key;
    }
    debug!("keystream applied to {} entropy bytes", entropy.len());

    Mnemonic::from_entropy(&entropy)
}

fn check_inputs(password: &str, params: &CipherParams) -> Result<()> {
    if password.is_empty() {
        return Err(SeedError::WeakParameters("password must not be empty".into()));
    }
    params.validate()
}
