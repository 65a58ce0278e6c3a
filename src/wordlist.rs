//! BIP39 英文词表索引
//!
//! 词表本身来自 `bip39` crate 的静态表 (2048 个单词),
//! 这里只额外建立一个进程级只读的 单词 -> 索引 哈希表。

use std::collections::HashMap;
use std::sync::LazyLock;

/// 词表大小 (2^11)
pub const WORDLIST_SIZE: usize = 2048;

/// 每个单词编码的位数
pub const BITS_PER_WORD: usize = 11;

static WORDS: LazyLock<&'static [&'static str; WORDLIST_SIZE]> =
    LazyLock::new(|| bip39::Language::English.word_list());

static INDEX: LazyLock<HashMap<&'static str, u16>> = LazyLock::new(|| {
    WORDS
        .iter()
        .enumerate()
        .map(|(idx, &word)| (word, idx as u16))
        .collect()
});

/// 完整有序词表
pub fn words() -> &'static [&'static str] {
    &WORDS[..]
}

/// 单词 -> 11 位索引
pub fn index_of(word: &str) -> Option<u16> {
    INDEX.get(word).copied()
}

/// 11 位索引 -> 单词
pub fn word_at(index: u16) -> Option<&'static str> {
    WORDS.get(index as usize).copied()
}

/// 单词是否在词表中 (不涉及校验和)
pub fn contains(word: &str) -> bool {
    INDEX.contains_key(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wordlist_size_and_uniqueness() {
        assert_eq!(words().len(), WORDLIST_SIZE);
        assert_eq!(INDEX.len(), WORDLIST_SIZE);
    }

    #[test]
    fn test_known_positions() {
        assert_eq!(index_of("abandon"), Some(0));
        assert_eq!(index_of("about"), Some(3));
        assert_eq!(index_of("zoo"), Some(2047));
        assert_eq!(word_at(2047), Some("zoo"));
        assert_eq!(word_at(2048), None);
    }

    #[test]
    fn test_membership_is_exact() {
        assert!(contains("legal"));
        assert!(!contains("Legal"));
        assert!(!contains("bitcoin"));
        assert!(!contains(""));
    }
}
