//! 缓存键生成
//!
//! 对 (源语言, 目标语言, 分句文本) 计算 BLAKE3-256 摘要作为缓存键。
//! 每个字段前写入其小端 `u64` 长度，不同字段的拼接不会产生相同输入。

use std::fmt;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// 缓存键，64 位小写十六进制字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// 十六进制长度
    pub const HEX_LEN: usize = 64;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 从已存储的十六进制串恢复缓存键
    pub fn from_hex(hex: &str) -> Option<Self> {
        let valid = hex.len() == Self::HEX_LEN
            && hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(hex.to_string()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 缓存键生成器
pub struct Fingerprint;

impl Fingerprint {
    /// 生成缓存键
    pub fn generate(source_lang: &str, target_lang: &str, text: &str) -> CacheKey {
        let mut hasher = Hasher::new();
        for field in [source_lang, target_lang, text] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        CacheKey(hasher.finalize().to_hex().to_string())
    }
}
