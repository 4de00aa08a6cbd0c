// ==========================================
// GSTR-1 汇总工具 - 配置管理器
// ==========================================
// 职责: 配置加载（显式路径 → 环境变量 → 用户配置目录 → 内置默认值）
// 红线: 加载后必须通过 validate() 才能交给引擎
// ==========================================

use crate::config::report_config::{ConfigError, ReportConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "GSTR1_CONFIG";

/// 用户配置目录下的子目录与文件名
const CONFIG_DIR_NAME: &str = "gstr1-consolidator";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager;

impl ConfigManager {
    /// 加载配置
    ///
    /// # 参数
    /// - explicit_path: 命令行指定的配置文件（指定但不存在视为错误）
    ///
    /// # 返回
    /// - Ok(ReportConfig): 已校验的配置
    /// - Err(ConfigError): 读取 / 解析 / 校验失败
    pub fn load(explicit_path: Option<&Path>) -> Result<ReportConfig, ConfigError> {
        let config = match Self::locate(explicit_path) {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                debug!("未找到配置文件，使用内置默认配置");
                ReportConfig::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载（未校验）
    pub fn load_from_file(path: &Path) -> Result<ReportConfig, ConfigError> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let config: ReportConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: shown.clone(),
                source,
            })?;
        info!(path = %shown, "已加载配置文件");
        Ok(config)
    }

    /// 用户配置目录下的默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    fn locate(explicit_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit_path {
            return Some(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path().filter(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "seller_home_state": "Karnataka", "slab_snap_threshold": 1.0 }}"#
        )
        .unwrap();

        let config = ConfigManager::load(Some(file.path())).unwrap();

        assert_eq!(config.seller_home_state, "Karnataka");
        assert_eq!(config.slab_snap_threshold, 1.0);
        assert_eq!(config.amazon.display_name, "Amazon");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigManager::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = ConfigManager::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_loaded_values_are_validated() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tax_slabs": [] }}"#).unwrap();

        let err = ConfigManager::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
