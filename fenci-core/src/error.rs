//! Fenci 错误类型定义

use thiserror::Error;

/// Fenci 统一错误类型
#[derive(Error, Debug)]
pub enum FenciError {
    // ========== 主词典错误（初始化阶段，致命） ==========
    #[error("Main dictionary load failed: {reason}")]
    MainDictLoad { reason: String },

    // ========== 用户词典错误（运行期，可恢复） ==========
    #[error("User dictionary not found: {0}")]
    UserDictNotFound(String),

    #[error("Invalid frequency at line {line}: '{value}'")]
    InvalidFrequency { line: usize, value: String },

    #[error("Invalid frequency for word '{word}': {value}")]
    InvalidWordFrequency { word: String, value: f64 },

    // ========== 配置相关错误 ==========
    #[error("Config directory unavailable")]
    ConfigDirUnavailable,

    #[error("Config parse error in {path}: {reason}")]
    ConfigParse { path: String, reason: String },

    // ========== IO 错误 ==========
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FenciError {
    /// 是否为致命错误
    ///
    /// 致命错误意味着索引从未完成初始化，进程不应继续对外提供查询；
    /// 其余错误均可恢复，索引保持出错前的状态。
    pub fn is_fatal(&self) -> bool {
        matches!(self, FenciError::MainDictLoad { .. })
    }
}

/// 便捷 Result 类型别名
pub type FenciResult<T> = Result<T, FenciError>;
