//! BIP39 助记词可逆变换与多网络 HD 地址派生
//!
//! 本库提供:
//! - BIP39 助记词编解码、校验和校验与种子派生
//! - 基于 Argon2id 密钥流的可逆助记词变换
//! - BIP32/BIP44 派生与 Bitcoin / Ethereum / Ergo 地址编码
//! - 随机助记词生成

pub mod api;
pub mod cipher;
pub mod config;
pub mod error;
pub mod generator;
pub mod hd;
pub mod mnemonic;
pub mod wordlist;

pub use api::{
    TransformJob, ValidationResult, derive_addresses, derive_addresses_with, generate_seed_phrase,
    get_bip39_wordlist, transform_seed_phrase, validate_bip39_word, validate_seed_phrase,
};
pub use config::{CipherParams, DerivationConfig};
pub use error::{Result, SeedError};
pub use hd::{AddressRecord, AddressSet, DerivationPath, ExtendedPrivateKey, Network, NetworkAddresses};
pub use mnemonic::{Mnemonic, WordCount};
