//! 测试公共模块
//!
//! 提供测试用的公共常量和参照实现

#![allow(dead_code)]

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use seedcipher::CipherParams;
use seedcipher::config::{MIN_ITERATIONS, MIN_MEMORY_COST_KIB};
use sha2::Sha512;

pub const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// (熵十六进制, 助记词, 口令 "TREZOR" 下的种子十六进制)
pub const BIP39_TEST_VECTORS: &[(&str, &str, &str)] = &[
    (
        "00000000000000000000000000000000",
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04",
    ),
    (
        "7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f",
        "legal winner thank year wave sausage worth useful legal winner thank yellow",
        "2e8905819b8723fe2c1d161860e5ee1830318dbf49a83bd451cfb8440c28bd6fa457fe1296106559a3c80937a1c1069be3a3a5bd381ee6260e8d9739fce1f607",
    ),
    (
        "80808080808080808080808080808080",
        "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
        "d71de856f81a8acc65e6fc851a38d4d7ec216fd0796d0a6827a3ad6ed5511a30fa280f12eb2e47ed2ac03b5c462a0358d18d69fe4f985ec81778c1b370b652a8",
    ),
    (
        "ffffffffffffffffffffffffffffffff",
        "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
        "ac27495480225222079d7be181583751e86f571027b0497b5b5d11218e0a8a13332572917f0f8e5a589620c6f15b11c61dee327651a14c34e18231052e48c069",
    ),
];

/// 最低成本的 Argon2id 参数, 只用于测试
pub fn fast_params() -> CipherParams {
    CipherParams::new(MIN_ITERATIONS, MIN_MEMORY_COST_KIB)
}

/// `n` 个 "abandon" 后接给定的最后一个单词
pub fn abandon_phrase(count: usize, last: &str) -> String {
    let mut words = vec!["abandon"; count - 1];
    words.push(last);
    words.join(" ")
}

/// 参照实现: 只含硬化分段时直接按 BIP32 公式计算私钥
///
/// # Arguments
/// * `seed` - BIP39 种子
/// * `path` - 已加上 2^31 的硬化索引
pub fn reference_hardened_key(seed: &[u8], path: &[u32]) -> [u8; 32] {
    let mut mac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed").unwrap();
    mac.update(seed);
    let master = mac.finalize().into_bytes();

    let mut secret = SecretKey::from_slice(&master[..32]).unwrap();
    let mut chain = master[32..].to_vec();

    for &index in path {
        assert!(index >= 0x8000_0000, "reference only handles hardened indices");
        let mut data = vec![0u8];
        data.extend_from_slice(&secret.secret_bytes());
        data.extend_from_slice(&index.to_be_bytes());

        let mut mac = Hmac::<Sha512>::new_from_slice(&chain).unwrap();
        mac.update(&data);
        let i = mac.finalize().into_bytes();

        let mut il = [0u8; 32];
        il.copy_from_slice(&i[..32]);
        let tweak = secp256k1::Scalar::from_be_bytes(il).unwrap();
        secret = secret.add_tweak(&tweak).unwrap();
        chain = i[32..].to_vec();
    }

    secret.secret_bytes()
}

/// 私钥 -> 压缩公钥
pub fn public_key_of(private_key: &[u8; 32]) -> PublicKey {
    let secp = Secp256k1::new();
    PublicKey::from_secret_key(&secp, &SecretKey::from_slice(private_key).unwrap())
}
