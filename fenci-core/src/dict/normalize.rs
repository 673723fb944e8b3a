//! 字符规整化
//!
//! 词典构建与查询共用同一套字符折叠规则，保证同一个词写法不同
//! （全角/半角、大写/小写、各类空白）也能落在同一条 Trie 路径上。

/// 规整化单个字符
///
/// 折叠规则依次为：
/// 1. 任意空白字符（含全角空格 U+3000、制表符）折叠为半角空格
/// 2. 全角 ASCII 区（U+FF01..=U+FF5E）映射到对应半角字符
/// 3. ASCII 大写字母折叠为小写
///
/// 规则 2 的输出会继续被规则 3 折叠，因此 'Ａ' 一步到位变成 'a'，
/// 对任意输入都满足 `regularize(regularize(c)) == regularize(c)`。
///
/// # 示例
///
/// ```
/// use fenci_core::dict::normalize::regularize;
///
/// assert_eq!(regularize('Ａ'), 'a');
/// assert_eq!(regularize('Z'), 'z');
/// assert_eq!(regularize('\u{3000}'), ' ');
/// assert_eq!(regularize('中'), '中');
/// ```
pub fn regularize(ch: char) -> char {
    if ch.is_whitespace() {
        return ' ';
    }
    let ch = if ('\u{FF01}'..='\u{FF5E}').contains(&ch) {
        // 全角区与半角区的固定偏移 0xFEE0，结果必然落在 ASCII 可打印区
        ((ch as u32 - 0xFEE0) as u8) as char
    } else {
        ch
    };
    ch.to_ascii_lowercase()
}

/// 规整化整个词，得到各处统一使用的规范文本（查询键）
pub fn canonical(word: &str) -> String {
    word.chars().map(regularize).collect()
}
