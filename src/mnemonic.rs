//! BIP39 助记词编解码
//!
//! 熵 <-> 助记词 的位级转换、SHA-256 校验和计算与校验,
//! 以及 PBKDF2-HMAC-SHA512 种子派生。

use std::fmt;

use log::debug;
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256, Sha512};
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, SeedError};
use crate::wordlist::{self, BITS_PER_WORD};

/// BIP39 种子派生的 PBKDF2 迭代次数
pub const PBKDF2_ROUNDS: u32 = 2048;

/// BIP39 种子长度 (字节)
pub const SEED_LEN: usize = 64;

/// 合法的单词数量
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// 助记词长度类型及其对应的熵大小
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    /// 12 个单词, 128 位熵, 4 位校验和
    Words12,
    /// 15 个单词, 160 位熵, 5 位校验和
    Words15,
    /// 18 个单词, 192 位熵, 6 位校验和
    Words18,
    /// 21 个单词, 224 位熵, 7 位校验和
    Words21,
    /// 24 个单词, 256 位熵, 8 位校验和
    Words24,
}

impl WordCount {
    /// 从单词数量构造
    pub fn from_words(count: usize) -> Result<Self> {
        match count {
            12 => Ok(Self::Words12),
            15 => Ok(Self::Words15),
            18 => Ok(Self::Words18),
            21 => Ok(Self::Words21),
            24 => Ok(Self::Words24),
            other => Err(SeedError::InvalidWordCount(other)),
        }
    }

    /// 从熵字节数构造
    pub fn from_entropy_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Self::Words12),
            20 => Ok(Self::Words15),
            24 => Ok(Self::Words18),
            28 => Ok(Self::Words21),
            32 => Ok(Self::Words24),
            other => Err(SeedError::InvalidEntropyLength(other)),
        }
    }

    pub const fn words(self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words15 => 15,
            Self::Words18 => 18,
            Self::Words21 => 21,
            Self::Words24 => 24,
        }
    }

    /// 熵字节数 = words / 3 * 4
    pub const fn entropy_bytes(self) -> usize {
        self.words() / 3 * 4
    }

    pub const fn entropy_bits(self) -> usize {
        self.entropy_bytes() * 8
    }

    /// 校验和位数 (ENT / 32)
    pub const fn checksum_bits(self) -> usize {
        self.entropy_bits() / 32
    }
}

/// BIP39 助记词
///
/// 内部只保存单词索引 (0-2047) 和长度类型, 构造时已保证校验和正确。
/// 只在 Drop 时清零, 不对外提供原地清空, `words` 与 `kind` 始终一致。
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<u16>,
    kind: WordCount,
}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}

impl ZeroizeOnDrop for Mnemonic {}

impl Mnemonic {
    /// 解析并完整校验助记词
    ///
    /// 检查顺序: 单词数量 -> 词表成员 -> 校验和。
    /// 输入先做 NFKD 规范化并转为小写, 单词之间允许任意空白。
    pub fn parse(phrase: &str) -> Result<Self> {
        // 预留容量, 避免扩容时在已释放内存中留下明文片段
        let mut normalized = Zeroizing::new(String::with_capacity(phrase.len() * 4));
        normalized.extend(phrase.nfkd().flat_map(char::to_lowercase));
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let kind = WordCount::from_words(tokens.len())?;

        let mut words = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            match wordlist::index_of(token) {
                Some(idx) => words.push(idx),
                None => {
                    words.zeroize();
                    return Err(SeedError::UnknownWord {
                        position: i + 1,
                        word: (*token).to_string(),
                    });
                }
            }
        }

        let mnemonic = Self { words, kind };
        // 校验失败时 mnemonic 在此被 drop 并清零
        let (_, stored) = unpack(&mnemonic.words, kind);
        if stored != mnemonic.expected_checksum(kind) {
            return Err(SeedError::InvalidChecksum);
        }

        Ok(mnemonic)
    }

    /// 从熵生成助记词 (追加校验和后按 11 位分组)
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        let kind = WordCount::from_entropy_len(entropy.len())?;

        // 熵 + 1 字节校验和 (最多使用其中 8 位)
        let mut data = Zeroizing::new(Vec::with_capacity(entropy.len() + 1));
        data.extend_from_slice(entropy);
        data.push(checksum_byte(entropy));

        let words = (0..kind.words())
            .map(|i| read_bits(&data, i * BITS_PER_WORD))
            .collect();

        Ok(Self { words, kind })
    }

    /// 恢复原始熵
    pub fn entropy(&self) -> Zeroizing<Vec<u8>> {
        let (entropy, _) = unpack(&self.words, self.kind());
        entropy
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn kind(&self) -> WordCount {
        self.kind
    }

    /// 单词索引
    pub fn indices(&self) -> &[u16] {
        &self.words
    }

    /// 以空格分隔的助记词文本
    pub fn phrase(&self) -> Zeroizing<String> {
        let mut out = Zeroizing::new(String::with_capacity(self.words.len() * 9));
        for (i, &idx) in self.words.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(wordlist::word_at(idx).unwrap_or_default());
        }
        out
    }

    /// 转换为 BIP39 种子
    ///
    /// PBKDF2-HMAC-SHA512, 盐 = "mnemonic" + NFKD(passphrase), 2048 轮。
    /// 无口令等价于空字符串。
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; SEED_LEN]> {
        let phrase = self.phrase();
        let mut normalized_phrase = Zeroizing::new(String::with_capacity(phrase.len() * 4));
        normalized_phrase.extend(phrase.nfkd());
        let mut salt = Zeroizing::new(String::with_capacity(8 + passphrase.len() * 4));
        salt.push_str("mnemonic");
        salt.extend(passphrase.nfkd());

        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        pbkdf2_hmac::<Sha512>(
            normalized_phrase.as_bytes(),
            salt.as_bytes(),
            PBKDF2_ROUNDS,
            &mut seed[..],
        );
        debug!("derived BIP39 seed from {}-word mnemonic", self.words.len());
        seed
    }

    fn expected_checksum(&self, kind: WordCount) -> u8 {
        let (entropy, _) = unpack(&self.words, kind);
        checksum_byte(&entropy) >> (8 - kind.checksum_bits())
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.words.len())
            .finish_non_exhaustive()
    }
}

impl std::str::FromStr for Mnemonic {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// 解码: 助记词文本 -> 熵
pub fn decode(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    Ok(Mnemonic::parse(phrase)?.entropy())
}

/// 编码: 熵 -> 助记词
pub fn encode(entropy: &[u8]) -> Result<Mnemonic> {
    Mnemonic::from_entropy(entropy)
}

/// SHA-256(entropy) 的第一个字节; 校验和取其高 ENT/32 位
fn checksum_byte(entropy: &[u8]) -> u8 {
    Sha256::digest(entropy)[0]
}

/// 从 `data` 的第 `offset` 位开始读取 11 位 (大端位序)
fn read_bits(data: &[u8], offset: usize) -> u16 {
    (0..BITS_PER_WORD).fold(0u16, |acc, i| {
        let bit = offset + i;
        let value = (data[bit / 8] >> (7 - bit % 8)) & 1;
        (acc << 1) | u16::from(value)
    })
}

/// 把单词索引还原为 (熵, 存储的校验和位)
fn unpack(words: &[u16], kind: WordCount) -> (Zeroizing<Vec<u8>>, u8) {
    let mut data = Zeroizing::new(vec![0u8; kind.entropy_bytes() + 1]);
    for (i, &idx) in words.iter().enumerate() {
        for b in 0..BITS_PER_WORD {
            if (idx >> (BITS_PER_WORD - 1 - b)) & 1 == 1 {
                let bit = i * BITS_PER_WORD + b;
                data[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
    }

    let checksum = data[kind.entropy_bytes()] >> (8 - kind.checksum_bits());
    let entropy = Zeroizing::new(data[..kind.entropy_bytes()].to_vec());
    (entropy, checksum)
}
