//! 前缀树（Trie）
//!
//! 词典索引的核心结构：按规整化后的字符逐级建边，词尾节点带显式
//! 终止标记。下游分词算法拿到根节点后逐字推进，即可在一次遍历里
//! 找出句子某个起点上所有的词典词。

use std::collections::HashMap;

use crate::dict::normalize::regularize;

/// Trie 节点
///
/// 子表的键永远是规整化后的字符；空格不会成为边，词内空格只保留在
/// 规范文本里，不参与路径。
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: HashMap<char, TrieNode>,
    is_word: bool,
}

impl TrieNode {
    /// 取指定字符对应的子节点
    ///
    /// 查询字符先经过同一套规整化，因此调用方传原始文本即可。
    pub fn child(&self, ch: char) -> Option<&TrieNode> {
        self.children.get(&regularize(ch))
    }

    /// 是否有完整词条在此节点结束
    pub fn is_word(&self) -> bool {
        self.is_word
    }
}

/// 前缀树
#[derive(Debug, Clone, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一个词，返回规整化后的规范文本
    ///
    /// 规范文本是词条表统一使用的查询键。词内空白折叠出的空格保留在
    /// 规范文本中，但不会在树里建边，终止标记落在最后一个非空格字符
    /// 的节点上。
    pub fn insert(&mut self, word: &str) -> String {
        let mut canonical = String::with_capacity(word.len());
        let mut node = &mut self.root;
        for ch in word.chars() {
            let ch = regularize(ch);
            canonical.push(ch);
            if ch == ' ' {
                continue;
            }
            node = node.children.entry(ch).or_default();
        }
        node.is_word = true;
        canonical
    }

    /// 根节点，供下游算法逐字驱动遍历
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// 是否包含从根出发、在终止标记处结束的完整词
    pub fn contains(&self, word: &str) -> bool {
        let mut node = &self.root;
        for ch in word.chars() {
            if regularize(ch) == ' ' {
                continue;
            }
            match node.child(ch) {
                Some(next) => node = next,
                None => return false,
            }
        }
        node.is_word
    }

    /// 公共前缀匹配：从 `chars[start..]` 出发，依次产出每个词典词的
    /// 结束下标（开区间，相对整个 `chars` 切片）
    ///
    /// # 示例
    ///
    /// ```
    /// use fenci_core::dict::trie::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("南京");
    /// trie.insert("南京市");
    /// let chars: Vec<char> = "南京市长".chars().collect();
    /// let ends: Vec<usize> = trie.common_prefix_iter(&chars, 0).collect();
    /// assert_eq!(ends, vec![2, 3]);
    /// ```
    pub fn common_prefix_iter<'a>(&'a self, chars: &'a [char], start: usize) -> CommonPrefixIter<'a> {
        CommonPrefixIter {
            node: Some(&self.root),
            chars,
            pos: start,
        }
    }
}

/// 公共前缀匹配迭代器
///
/// 走到没有对应子节点的字符即停止；产出顺序按词长从短到长。
pub struct CommonPrefixIter<'a> {
    node: Option<&'a TrieNode>,
    chars: &'a [char],
    pos: usize,
}

impl Iterator for CommonPrefixIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let node = self.node?;
            if self.pos >= self.chars.len() {
                self.node = None;
                return None;
            }
            let next = node.child(self.chars[self.pos]);
            self.pos += 1;
            self.node = next;
            match next {
                Some(n) if n.is_word() => return Some(self.pos),
                Some(_) => continue,
                None => return None,
            }
        }
    }
}
