//! 词典索引模块
//!
//! Dictionary Index - 前缀树、词频规整化与用户词典热加载

pub mod index;
pub mod loader;
pub mod normalize;
pub mod trie;

// 导出核心类型
pub use index::{DictSnapshot, WordDict, USER_DICT_SUFFIX};
pub use loader::{DictParser, RawEntry, WordEntry};
pub use trie::{CommonPrefixIter, Trie, TrieNode};
