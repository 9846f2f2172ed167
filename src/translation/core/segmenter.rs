//! 分句器
//!
//! 按分隔符（默认句号）切分输入文本。空片段被丢弃，保留的片段重新附加分隔符。
//! 最后一个分隔符之后的文本不会产生分句，例如 `"Hello"` 得到零个分句。

use crate::translation::config::constants::DEFAULT_SEGMENT_DELIMITER;

/// 分句，附带在原文中的顺序号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub text: String,
}

/// 分句器
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    delimiter: char,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_DELIMITER)
    }
}

impl Segmenter {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// 切分文本
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let mut pieces: Vec<&str> = text.split(self.delimiter).collect();
        // 最后一片位于最后一个分隔符之后，没有终止符
        pieces.pop();

        pieces
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .enumerate()
            .map(|(index, piece)| {
                let mut text = String::with_capacity(piece.len() + self.delimiter.len_utf8());
                text.push_str(piece);
                text.push(self.delimiter);
                Segment { index, text }
            })
            .collect()
    }

    /// 按原顺序直接拼接，不插入任何分隔
    pub fn join<I, S>(parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        parts.into_iter().fold(String::new(), |mut acc, part| {
            acc.push_str(part.as_ref());
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_two_sentences() {
        let segments = Segmenter::default().segment("Hello. World.");
        assert_eq!(texts(&segments), vec!["Hello.", " World."]);
        assert_eq!(segments[0].index, 0);
        assert_eq!(segments[1].index, 1);
        assert_eq!(Segmenter::join(texts(&segments)), "Hello. World.");
    }

    #[test]
    fn test_only_delimiters() {
        assert!(Segmenter::default().segment("...").is_empty());
        assert!(Segmenter::default().segment("").is_empty());
    }

    #[test]
    fn test_unterminated_text_is_dropped() {
        assert!(Segmenter::default().segment("Hello").is_empty());
        let segments = Segmenter::default().segment("Hello. World");
        assert_eq!(texts(&segments), vec!["Hello."]);
    }

    #[test]
    fn test_whitespace_pieces_are_kept() {
        let segments = Segmenter::default().segment("a. .");
        assert_eq!(texts(&segments), vec!["a.", " ."]);
    }

    #[test]
    fn test_consecutive_delimiters_keep_dense_indices() {
        let segments = Segmenter::default().segment("..a..b.");
        assert_eq!(texts(&segments), vec!["a.", "b."]);
        assert_eq!(segments[1].index, 1);
    }

    #[test]
    fn test_custom_delimiter() {
        let segments = Segmenter::new('。').segment("你好。世界。");
        assert_eq!(texts(&segments), vec!["你好。", "世界。"]);
    }
}
