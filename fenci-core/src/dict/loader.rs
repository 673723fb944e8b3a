//! 词典文件解析
//!
//! 解析 `词 词频 [词性]` 的行式词典文本。词典来源既有构建时嵌入的
//! 主词典，也有运行期热加载的用户词典，两者共用同一个解析器。

use std::io::BufRead;

use crate::error::{FenciError, FenciResult};

/// 词条
///
/// `score` 在主词典装载阶段暂存原始词频，规整化之后是对数概率
/// `ln(freq / total)`；用户词条写入时就已经换算完毕。
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    /// 规范文本（查询键）
    pub word: String,
    /// 对数概率权重
    pub score: f64,
    /// 词性标记，作为不透明字符串透传（如 n、v、ns）
    pub tag: String,
}

/// 解析出的原始词条：尚未进 Trie，词频还是文件里的原始计数
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub word: String,
    pub freq: f64,
    pub tag: String,
}

/// 词典文本解析器
pub struct DictParser;

impl DictParser {
    /// 解析一个词典字节流
    ///
    /// 每行去除首尾空白后按制表符和半角空格的连续串切分：
    /// - 不足三个字段的行视为格式噪声，静默跳过
    /// - 第三个字段之后的内容忽略
    /// - 词频必须是有限且非负的数值，否则整个流解析失败
    ///
    /// 只校验不落地：调用方拿到完整词条列表后再决定如何写入索引，
    /// 任何一行出错时索引不会沾上半个文件的内容。
    pub fn parse<R: BufRead>(reader: R) -> FenciResult<Vec<RawEntry>> {
        let mut entries = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line
                .split(['\t', ' '])
                .filter(|f| !f.is_empty())
                .collect();
            if fields.len() < 3 {
                continue;
            }

            let freq: f64 = fields[1].parse().map_err(|_| FenciError::InvalidFrequency {
                line: idx + 1,
                value: fields[1].to_string(),
            })?;
            if !freq.is_finite() || freq < 0.0 {
                return Err(FenciError::InvalidFrequency {
                    line: idx + 1,
                    value: fields[1].to_string(),
                });
            }

            entries.push(RawEntry {
                word: fields[0].to_string(),
                freq,
                tag: fields[2].to_string(),
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(text: &str) -> FenciResult<Vec<RawEntry>> {
        DictParser::parse(Cursor::new(text))
    }

    #[test]
    fn test_parse_basic() {
        let entries = parse_str("中文 10 n\n文 5 n\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word, "中文");
        assert_eq!(entries[0].freq, 10.0);
        assert_eq!(entries[0].tag, "n");
    }

    #[test]
    fn test_parse_mixed_separators() {
        // 制表符、多个空格混用，字段间的空串被过滤
        let entries = parse_str("中文\t10  n\n大学  3\t\tn\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].word, "大学");
        assert_eq!(entries[1].freq, 3.0);
    }

    #[test]
    fn test_parse_skips_short_lines() {
        let entries = parse_str("只有词\n中文 10\n\n   \n中文 10 n\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "中文");
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let entries = parse_str("中文 10 n 额外 字段\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tag, "n");
    }

    #[test]
    fn test_parse_trims_crlf() {
        let entries = parse_str("中文 10 n\r\n文 5 n\r\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].tag, "n");
    }

    #[test]
    fn test_parse_fractional_frequency() {
        let entries = parse_str("中文 0.5 n\n").unwrap();
        assert_eq!(entries[0].freq, 0.5);
    }

    #[test]
    fn test_parse_rejects_bad_frequency() {
        let err = parse_str("中文 10 n\n坏行 abc n\n").unwrap_err();
        match err {
            FenciError::InvalidFrequency { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_negative_and_nonfinite() {
        assert!(parse_str("中文 -1 n\n").is_err());
        assert!(parse_str("中文 NaN n\n").is_err());
        assert!(parse_str("中文 inf n\n").is_err());
        // 零词频合法，权重换算后是负无穷，排序时天然垫底
        assert!(parse_str("中文 0 n\n").is_ok());
    }
}
