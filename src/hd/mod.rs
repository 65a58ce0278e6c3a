//! BIP32/BIP44 分层确定性派生与多网络地址输出
//!
//! 单次请求的流程: 解析助记词 -> BIP39 种子 -> 主密钥 (只计算一次)
//! -> 逐网络派生 `m/44'/coin'/account'/change/index` -> 地址编码。
//! 请求之间不保留任何状态, 地址结果也不缓存。

pub mod address;
pub mod key;
pub mod path;

pub use address::{AddressKind, AddressRecord, ErgoNetwork, Network, encode_address};
pub use key::ExtendedPrivateKey;
pub use path::{BIP44_PURPOSE, ChildNumber, DerivationPath, HARDENED_OFFSET};

use log::{info, warn};
use serde::{Serialize, Serializer};

use crate::config::DerivationConfig;
use crate::error::{Result, SeedError};
use crate::mnemonic::Mnemonic;

/// 单个网络的派生结果; 失败只影响本网络
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkAddresses {
    pub network: String,
    pub addresses: Vec<AddressRecord>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<SeedError>,
}

impl NetworkAddresses {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 一次多网络请求的全部结果, 顺序与请求一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct AddressSet {
    pub networks: Vec<NetworkAddresses>,
}

impl AddressSet {
    pub fn get(&self, network: &str) -> Option<&NetworkAddresses> {
        self.networks.iter().find(|n| n.network == network)
    }

    pub fn errors(&self) -> impl Iterator<Item = &SeedError> {
        self.networks.iter().filter_map(|n| n.error.as_ref())
    }
}

/// 由 BIP39 种子派生主密钥
pub fn master_key(binary_seed: &[u8]) -> Result<ExtendedPrivateKey> {
    ExtendedPrivateKey::master(binary_seed)
}

/// 沿路径派生子密钥
pub fn derive_path(
    master: &ExtendedPrivateKey,
    path: &DerivationPath,
) -> Result<ExtendedPrivateKey> {
    master.derive_path(path)
}

/// 多网络地址派生
///
/// 助记词无效或主密钥越界会让整个请求失败;
/// 未知网络名或单个网络的派生失败只记录在该网络的结果中。
pub fn derive_addresses<S: AsRef<str>>(
    seed_phrase: &str,
    passphrase: Option<&str>,
    networks: &[S],
    config: &DerivationConfig,
) -> Result<AddressSet> {
    let mnemonic = Mnemonic::parse(seed_phrase)?;
    let seed = mnemonic.to_seed(passphrase.unwrap_or(""));
    let master = master_key(&seed[..])?;

    let mut set = AddressSet::default();
    for name in networks {
        let name = name.as_ref();
        let outcome = name
            .parse::<Network>()
            .and_then(|network| derive_network(&master, network, config));

        let entry = match outcome {
            Ok(addresses) => NetworkAddresses {
                network: canonical_name(name),
                addresses,
                error: None,
            },
            Err(e) => {
                warn!("network '{}' failed: {}", name, e);
                NetworkAddresses {
                    network: canonical_name(name),
                    addresses: Vec::new(),
                    error: Some(e),
                }
            }
        };
        set.networks.push(entry);
    }

    info!(
        "derived addresses for {} network(s), {} failed",
        set.networks.len(),
        set.errors().count()
    );
    Ok(set)
}

/// 单个网络: 先派生到 change 层, 再按配置的索引区间输出地址
///
/// 某个地址索引落在无效区间时跳过该索引继续, 不中断整批。
pub fn derive_network(
    master: &ExtendedPrivateKey,
    network: Network,
    config: &DerivationConfig,
) -> Result<Vec<AddressRecord>> {
    let indices = config.indices()?;
    let account_path = DerivationPath::bip44_account(network.coin_type(), config.account)?;
    let change = ChildNumber::normal(config.change)?;
    let change_path = account_path.child(change);
    let change_key = master.derive_path(&change_path)?;

    let mut records = Vec::new();
    for index in indices {
        let child = ChildNumber::normal(index)?;
        let key = match change_key.derive_child(child) {
            Ok(key) => key,
            Err(SeedError::DerivationFailure { index }) => {
                warn!("{}: skipping invalid child index {}", network, index);
                continue;
            }
            Err(e) => return Err(e),
        };
        let public_key = key.public_key()?;
        records.extend(encode_address(network, &public_key, &change_path.child(child))?);
    }

    Ok(records)
}

fn canonical_name(name: &str) -> String {
    name.parse::<Network>()
        .map(|n| n.name().to_string())
        .unwrap_or_else(|_| name.to_string())
}

fn serialize_error<S: Serializer>(
    error: &Option<SeedError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}
