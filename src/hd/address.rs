//! 各网络的地址编码
//!
//! - Bitcoin: hash160 = RIPEMD160(SHA256(压缩公钥)), 输出 P2PKH / P2SH-P2WPKH / P2WPKH
//! - Ethereum: Keccak256(x || y) 取后 20 字节, EIP-55 大小写校验
//! - Ergo: P2PK, Base58(head || 压缩公钥 || Blake2b256 前 4 字节)

use std::fmt;
use std::str::FromStr;

use bech32::{ToBase32, Variant, u5};
use blake2::Blake2b;
use blake2::digest::consts::U32;
use ethers_core::types::Address as EthAddress;
use ethers_core::utils::to_checksum;
use ripemd::Ripemd160;
use secp256k1::PublicKey;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use super::path::DerivationPath;
use crate::error::{Result, SeedError};

type Blake2b256 = Blake2b<U32>;

/// Bitcoin 主网 P2PKH 版本字节
const BTC_P2PKH_VERSION: u8 = 0x00;
/// Bitcoin 主网 P2SH 版本字节
const BTC_P2SH_VERSION: u8 = 0x05;
const BTC_BECH32_HRP: &str = "bc";

/// Ergo 地址类型: P2PK
const ERGO_P2PK_TYPE: u8 = 0x01;
const ERGO_CHECKSUM_LEN: usize = 4;

/// 支持的网络 (封闭集合, 名称只在边界处解析)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Bitcoin,
    Ethereum,
    Ergo,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Bitcoin, Network::Ethereum, Network::Ergo];

    /// SLIP-44 coin type
    pub fn coin_type(self) -> u32 {
        match self {
            Network::Bitcoin => 0,
            Network::Ethereum => 60,
            Network::Ergo => 429,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::Ethereum => "ethereum",
            Network::Ergo => "ergo",
        }
    }

    /// 该网络为每个公钥输出的地址类型
    pub fn address_kinds(self) -> &'static [AddressKind] {
        match self {
            Network::Bitcoin => &[
                AddressKind::BitcoinLegacy,
                AddressKind::BitcoinNestedSegwit,
                AddressKind::BitcoinNativeSegwit,
            ],
            Network::Ethereum => &[AddressKind::Ethereum],
            Network::Ergo => &[AddressKind::ErgoP2pk(ErgoNetwork::Mainnet)],
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Network::Bitcoin),
            "ethereum" | "eth" => Ok(Network::Ethereum),
            "ergo" | "erg" => Ok(Network::Ergo),
            _ => Err(SeedError::UnsupportedNetwork(s.to_string())),
        }
    }
}

/// Ergo 网络前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErgoNetwork {
    Mainnet,
    Testnet,
}

impl ErgoNetwork {
    pub fn prefix(self) -> u8 {
        match self {
            ErgoNetwork::Mainnet => 0x00,
            ErgoNetwork::Testnet => 0x10,
        }
    }
}

/// 地址类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// P2PKH, Base58Check
    BitcoinLegacy,
    /// P2SH 包裹的 P2WPKH
    BitcoinNestedSegwit,
    /// P2WPKH, Bech32 (witness v0)
    BitcoinNativeSegwit,
    Ethereum,
    ErgoP2pk(ErgoNetwork),
}

impl AddressKind {
    pub fn label(self) -> &'static str {
        match self {
            AddressKind::BitcoinLegacy => "Legacy (P2PKH)",
            AddressKind::BitcoinNestedSegwit => "Nested SegWit (P2SH-P2WPKH)",
            AddressKind::BitcoinNativeSegwit => "Native SegWit (P2WPKH)",
            AddressKind::Ethereum => "Ethereum",
            AddressKind::ErgoP2pk(ErgoNetwork::Mainnet) => "Ergo P2PK",
            AddressKind::ErgoP2pk(ErgoNetwork::Testnet) => "Ergo P2PK (testnet)",
        }
    }

    /// 对公钥编码出地址字符串
    pub fn encode(self, public_key: &PublicKey) -> Result<String> {
        match self {
            AddressKind::BitcoinLegacy => Ok(p2pkh(public_key)),
            AddressKind::BitcoinNestedSegwit => Ok(p2sh_p2wpkh(public_key)),
            AddressKind::BitcoinNativeSegwit => p2wpkh(public_key),
            AddressKind::Ethereum => Ok(ethereum(public_key)),
            AddressKind::ErgoP2pk(network) => Ok(ergo_p2pk(public_key, network)),
        }
    }
}

/// 单条地址结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRecord {
    pub address_type: String,
    pub path: String,
    pub address: String,
}

/// 按网络分派, 为一个公钥输出该网络的全部地址记录
pub fn encode_address(
    network: Network,
    public_key: &PublicKey,
    path: &DerivationPath,
) -> Result<Vec<AddressRecord>> {
    let path = path.to_string();
    network
        .address_kinds()
        .iter()
        .map(|kind| {
            Ok(AddressRecord {
                address_type: kind.label().to_string(),
                path: path.clone(),
                address: kind.encode(public_key)?,
            })
        })
        .collect()
}

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

fn base58check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    bs58::encode(data).with_check().into_string()
}

fn p2pkh(public_key: &PublicKey) -> String {
    base58check(BTC_P2PKH_VERSION, &hash160(&public_key.serialize()))
}

fn p2sh_p2wpkh(public_key: &PublicKey) -> String {
    // redeemScript = OP_0 PUSH20 <hash160>
    let mut redeem_script = [0u8; 22];
    redeem_script[0] = 0x00;
    redeem_script[1] = 0x14;
    redeem_script[2..].copy_from_slice(&hash160(&public_key.serialize()));
    base58check(BTC_P2SH_VERSION, &hash160(&redeem_script))
}

fn p2wpkh(public_key: &PublicKey) -> Result<String> {
    let program = hash160(&public_key.serialize());
    let mut data = vec![u5::try_from_u8(0).map_err(|e| SeedError::AddressEncoding(e.to_string()))?];
    data.extend(program.to_base32());
    bech32::encode(BTC_BECH32_HRP, data, Variant::Bech32)
        .map_err(|e| SeedError::AddressEncoding(e.to_string()))
}

fn ethereum(public_key: &PublicKey) -> String {
    let uncompressed = public_key.serialize_uncompressed();
    // 跳过 0x04 前缀
    let hash = Keccak256::digest(&uncompressed[1..]);
    to_checksum(&EthAddress::from_slice(&hash[12..]), None)
}

fn ergo_p2pk(public_key: &PublicKey, network: ErgoNetwork) -> String {
    let mut data = Vec::with_capacity(1 + 33 + ERGO_CHECKSUM_LEN);
    data.push(network.prefix() + ERGO_P2PK_TYPE);
    data.extend_from_slice(&public_key.serialize());
    let checksum = Blake2b256::digest(&data);
    data.extend_from_slice(&checksum[..ERGO_CHECKSUM_LEN]);
    bs58::encode(data).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::SecretKey;

    /// 私钥 = 1 时公钥为生成元 G
    fn generator_point() -> PublicKey {
        let mut sk = [0u8; 32];
        sk[31] = 1;
        PublicKey::from_secret_key_global(&SecretKey::from_slice(&sk).unwrap())
    }

    #[test]
    fn test_network_parsing() {
        assert_eq!("Bitcoin".parse::<Network>().unwrap(), Network::Bitcoin);
        assert_eq!("eth".parse::<Network>().unwrap(), Network::Ethereum);
        assert_eq!(" ergo ".parse::<Network>().unwrap(), Network::Ergo);
        assert_eq!(
            "dogecoin".parse::<Network>().unwrap_err(),
            SeedError::UnsupportedNetwork("dogecoin".to_string())
        );
    }

    #[test]
    fn test_coin_types() {
        assert_eq!(Network::Bitcoin.coin_type(), 0);
        assert_eq!(Network::Ethereum.coin_type(), 60);
        assert_eq!(Network::Ergo.coin_type(), 429);
    }

    #[test]
    fn test_generator_point_bitcoin_addresses() {
        let g = generator_point();
        assert_eq!(
            hex::encode(hash160(&g.serialize())),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(p2pkh(&g), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(
            p2wpkh(&g).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    #[test]
    fn test_generator_point_ethereum_address() {
        assert_eq!(
            ethereum(&generator_point()),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_nested_segwit_shape() {
        let address = p2sh_p2wpkh(&generator_point());
        assert!(address.starts_with('3'));
        let decoded = bs58::decode(&address).with_check(None).into_vec().unwrap();
        assert_eq!(decoded.len(), 21);
        assert_eq!(decoded[0], BTC_P2SH_VERSION);
    }

    #[test]
    fn test_ergo_p2pk_layout() {
        let g = generator_point();
        let address = ergo_p2pk(&g, ErgoNetwork::Mainnet);
        assert!(address.starts_with('9'));

        let raw = bs58::decode(&address).into_vec().unwrap();
        assert_eq!(raw.len(), 38);
        assert_eq!(raw[0], 0x01);
        assert_eq!(&raw[1..34], &g.serialize()[..]);
        let checksum = Blake2b256::digest(&raw[..34]);
        assert_eq!(&raw[34..], &checksum[..4]);

        let testnet = bs58::decode(ergo_p2pk(&g, ErgoNetwork::Testnet))
            .into_vec()
            .unwrap();
        assert_eq!(testnet[0], 0x11);
    }

    #[test]
    fn test_encode_address_dispatch() {
        let path = DerivationPath::bip44(0, 0, 0, 0).unwrap();
        let records = encode_address(Network::Bitcoin, &generator_point(), &path).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.path == "m/44'/0'/0'/0/0"));
        assert_eq!(records[0].address_type, "Legacy (P2PKH)");

        let records = encode_address(Network::Ethereum, &generator_point(), &path).unwrap();
        assert_eq!(records.len(), 1);
    }
}
