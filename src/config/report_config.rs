// ==========================================
// GSTR-1 汇总工具 - 报表配置
// ==========================================
// 职责: 平台显示名 / 默认 GSTIN / 卖家注册州 / 税档 / 工作簿设置
// 红线: 每个字段都有默认值；配置文件只需写出要覆盖的键
// ==========================================

use crate::domain::platform::Platform;
use crate::engine::tax_rate::SlabSnapper;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ==========================================
// OperatorProfile - 电商运营商信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorProfile {
    /// TCS 表中的运营商名称
    pub display_name: String,
    /// 数据中无身份列时使用的 GSTIN（None 表示必须提供身份列）
    pub default_gstin: Option<String>,
}

impl OperatorProfile {
    fn new(display_name: &str, default_gstin: Option<&str>) -> Self {
        Self {
            display_name: display_name.to_string(),
            default_gstin: default_gstin.map(str::to_string),
        }
    }
}

// ==========================================
// WorkbookSettings - 输出工作簿设置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookSettings {
    /// 工作表保护密码（None = 无密码保护）
    pub sheet_password: Option<String>,
    /// 数据区下方的签名行
    pub signature: String,
}

impl Default for WorkbookSettings {
    fn default() -> Self {
        Self {
            sheet_password: None,
            signature: "Report Generated by Automated GSTR Tool".to_string(),
        }
    }
}

// ==========================================
// ReportConfig - 报表配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub seller_home_state: String,
    pub amazon: OperatorProfile,
    pub shopify: OperatorProfile,
    pub flipkart: OperatorProfile,
    pub nature_of_supply: String,
    pub tax_slabs: Vec<f64>,
    pub slab_snap_threshold: f64,
    pub inclusive_price_factor: f64,
    pub workbook: WorkbookSettings,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            seller_home_state: "HARYANA".to_string(),
            amazon: OperatorProfile::new("Amazon", Some("06AABCB2901D1CX")),
            shopify: OperatorProfile::new("Shopify", Some("24AAAAA0000A1Z5")),
            flipkart: OperatorProfile::new("Flipkart", None),
            nature_of_supply: "Liable to collect tax u/s 52(TCS)".to_string(),
            tax_slabs: vec![0.0, 5.0, 12.0, 18.0, 28.0],
            slab_snap_threshold: 2.0,
            inclusive_price_factor: 1.18,
            workbook: WorkbookSettings::default(),
        }
    }
}

impl ReportConfig {
    /// 平台对应的运营商信息
    pub fn profile(&self, platform: Platform) -> &OperatorProfile {
        match platform {
            Platform::Amazon => &self.amazon,
            Platform::Shopify => &self.shopify,
            Platform::Flipkart => &self.flipkart,
        }
    }

    /// 按配置构建税档吸附器
    pub fn snapper(&self) -> SlabSnapper {
        SlabSnapper::new(self.tax_slabs.clone(), self.slab_snap_threshold)
    }

    /// 校验配置
    ///
    /// # 规则
    /// - tax_slabs 非空，且每个税档为非负有限值
    /// - slab_snap_threshold 为非负有限值
    /// - inclusive_price_factor > 1
    /// - seller_home_state 与平台显示名非空
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tax_slabs.is_empty() {
            return Err(ConfigError::Invalid {
                key: "tax_slabs",
                reason: "at least one slab is required".to_string(),
            });
        }
        if let Some(bad) = self.tax_slabs.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(ConfigError::Invalid {
                key: "tax_slabs",
                reason: format!("slab {} is not a non-negative number", bad),
            });
        }
        if !self.slab_snap_threshold.is_finite() || self.slab_snap_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                key: "slab_snap_threshold",
                reason: format!("{} must be a non-negative number", self.slab_snap_threshold),
            });
        }
        if !self.inclusive_price_factor.is_finite() || self.inclusive_price_factor <= 1.0 {
            return Err(ConfigError::Invalid {
                key: "inclusive_price_factor",
                reason: format!("{} must be greater than 1", self.inclusive_price_factor),
            });
        }
        if self.seller_home_state.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "seller_home_state",
                reason: "must not be empty".to_string(),
            });
        }
        for platform in Platform::ALL {
            if self.profile(platform).display_name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: "display_name",
                    reason: format!("{} display name must not be empty", platform),
                });
            }
        }
        Ok(())
    }
}
