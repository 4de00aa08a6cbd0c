// ==========================================
// GSTR-1 汇总工具 - 配置层
// ==========================================
// 职责: 报表配置定义、加载与校验
// 存储: JSON 文件（可选），缺省使用内置默认值
// ==========================================

pub mod config_manager;
pub mod report_config;

pub use config_manager::{ConfigManager, CONFIG_ENV_VAR};
pub use report_config::{ConfigError, OperatorProfile, ReportConfig, WorkbookSettings};
