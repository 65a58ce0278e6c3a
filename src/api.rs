//! 对外提供的 Rust 调用接口
//!
//! 展示层 (GUI / CLI) 只通过这里的命令使用核心功能。

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::cipher;
use crate::config::{CipherParams, DerivationConfig};
use crate::error::{Result, SeedError};
use crate::generator;
use crate::hd::{self, AddressSet};
use crate::mnemonic::Mnemonic;
use crate::wordlist;

/// `validate_seed_phrase` 的结果, 失败信息编码在 message 中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub word_count: usize,
    pub message: String,
}

/// 校验助记词, 对任何输入都不返回错误
pub fn validate_seed_phrase(phrase: &str) -> ValidationResult {
    let word_count = phrase.split_whitespace().count();
    match Mnemonic::parse(phrase) {
        Ok(_) => ValidationResult {
            valid: true,
            word_count,
            message: format!("valid {}-word BIP39 seed phrase", word_count),
        },
        Err(e) => ValidationResult {
            valid: false,
            word_count,
            message: e.to_string(),
        },
    }
}

/// 可逆变换助记词 (加密与解密同一操作)
pub fn transform_seed_phrase(
    phrase: &str,
    password: &str,
    iterations: u32,
    memory_cost: u32,
) -> Result<Zeroizing<String>> {
    let transformed = cipher::transform(phrase, password, iterations, memory_cost)?;
    Ok(transformed.phrase())
}

/// 生成随机助记词
pub fn generate_seed_phrase(word_count: usize) -> Result<Zeroizing<String>> {
    Ok(generator::generate(word_count)?.phrase())
}

/// 默认配置 (account 0, change 0, index 0, 每网络 1 个地址) 下的多网络派生
pub fn derive_addresses<S: AsRef<str>>(
    seed_phrase: &str,
    passphrase: Option<&str>,
    networks: &[S],
) -> Result<AddressSet> {
    derive_addresses_with(seed_phrase, passphrase, networks, &DerivationConfig::default())
}

pub fn derive_addresses_with<S: AsRef<str>>(
    seed_phrase: &str,
    passphrase: Option<&str>,
    networks: &[S],
    config: &DerivationConfig,
) -> Result<AddressSet> {
    hd::derive_addresses(seed_phrase, passphrase, networks, config)
}

/// 完整 BIP39 英文词表 (供前端做前缀补全)
pub fn get_bip39_wordlist() -> &'static [&'static str] {
    wordlist::words()
}

/// 单词是否在词表中, 不涉及校验和
pub fn validate_bip39_word(word: &str) -> bool {
    wordlist::contains(&word.trim().to_lowercase())
}

/// 在后台线程执行的变换任务
///
/// Argon2id 成本较高, 调用方可以轮询或限时等待; 直接 drop 即放弃任务,
/// 工作线程算完后结果被丢弃并清零, 不会返回部分密钥流。
pub struct TransformJob {
    receiver: Receiver<Result<Zeroizing<String>>>,
    started: Instant,
}

impl TransformJob {
    pub fn spawn(phrase: &str, password: &str, params: CipherParams) -> Result<Self> {
        let phrase = Zeroizing::new(phrase.to_string());
        let password = Zeroizing::new(password.to_string());
        let (sender, receiver) = mpsc::channel();

        thread::Builder::new()
            .name("seed-transform".into())
            .spawn(move || {
                let result = transform_seed_phrase(
                    &phrase,
                    &password,
                    params.iterations,
                    params.memory_cost_kib,
                );
                if sender.send(result).is_err() {
                    debug!("transform job abandoned, discarding result");
                }
            })
            .map_err(|e| SeedError::KeyDerivation(format!("failed to spawn worker: {}", e)))?;

        info!(
            "transform job started (t={}, m={}KiB)",
            params.iterations, params.memory_cost_kib
        );
        Ok(Self {
            receiver,
            started: Instant::now(),
        })
    }

    /// 非阻塞查询; 结果只会被取走一次
    pub fn poll(&self) -> Option<Result<Zeroizing<String>>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_gone())),
        }
    }

    /// 最多等待 `timeout`, 超时返回 None
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<Zeroizing<String>>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(worker_gone())),
        }
    }

    /// 阻塞直到完成
    pub fn wait(self) -> Result<Zeroizing<String>> {
        self.receiver.recv().unwrap_or_else(|_| Err(worker_gone()))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

fn worker_gone() -> SeedError {
    SeedError::KeyDerivation("transform worker terminated without a result".into())
}
