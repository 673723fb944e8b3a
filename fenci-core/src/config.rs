//! Fenci 配置模块
//!
//! 从 `~/.config/fenci/config.toml` 加载统一配置

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dict::USER_DICT_SUFFIX;
use crate::error::{FenciError, FenciResult};

/// 词典配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictConfig {
    /// 用户词典目录；不设置时使用配置目录下的 `dict.d`
    pub user_dict_dir: Option<PathBuf>,
    /// 用户词典文件的识别后缀
    pub user_dict_suffix: String,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            user_dict_dir: None,
            user_dict_suffix: USER_DICT_SUFFIX.to_string(),
        }
    }
}

impl DictConfig {
    /// 加载配置文件，不存在时回退到默认配置
    pub fn load() -> FenciResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("⚠️ 配置文件不存在, 使用默认配置: {}", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content).map_err(|e| FenciError::ConfigParse {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!("✅ 加载配置成功: {}", config_path.display());
        Ok(config)
    }

    /// 保存配置文件
    pub fn save(&self) -> FenciResult<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| FenciError::ConfigParse {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(&config_path, content)?;

        tracing::info!("✅ 保存配置成功: {}", config_path.display());
        Ok(())
    }

    /// 解析用户词典目录（未配置时落到默认位置）
    pub fn resolve_user_dict_dir(&self) -> FenciResult<PathBuf> {
        if let Some(dir) = &self.user_dict_dir {
            return Ok(dir.clone());
        }
        let config_dir = dirs::config_dir().ok_or(FenciError::ConfigDirUnavailable)?;
        Ok(config_dir.join("fenci").join("dict.d"))
    }

    /// 配置文件路径: `~/.config/fenci/config.toml`
    fn config_path() -> FenciResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(FenciError::ConfigDirUnavailable)?;
        Ok(config_dir.join("fenci").join("config.toml"))
    }
}
