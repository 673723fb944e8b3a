//! Fenci Core Engine
//!
//! 离线中文分词引擎的词典索引核心
//!
//! - 前缀树 + 词条表的双结构索引，字符规整化统一全半角与大小写
//! - 词频一次性规整化为对数概率，未登录词回退到全词典最低权重
//! - 用户词典热加载：按修改时间检测变更，写时复制保证读方永不撕裂

#![warn(rust_2018_idioms)]

pub mod config;
pub mod dict;
pub mod error;

// 重导出常用类型
pub use config::DictConfig;
pub use dict::{DictSnapshot, Trie, TrieNode, WordDict, WordEntry, USER_DICT_SUFFIX};
pub use error::{FenciError, FenciResult};

/// 初始化日志系统（仅在 debug-logs 特性启用时生效）
///
/// 日志级别通过环境变量 `FENCI_LOG` 控制，默认 `info`。
#[cfg(feature = "debug-logs")]
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("FENCI_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .ok();
}

/// 日志初始化的空实现（未启用 debug-logs 特性）
#[cfg(not(feature = "debug-logs"))]
pub fn init_logging() {}
