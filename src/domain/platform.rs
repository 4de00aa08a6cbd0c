// ==========================================
// GSTR-1 汇总工具 - 平台类型定义
// ==========================================
// 职责: 电商平台（数据来源）枚举
// 红线: 封闭集合,新增平台必须同时补齐规则表与适配器
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 数据来源平台 (Source Platform)
// ==========================================
// 顺序即处理顺序与输出工作表顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Amazon,   // 平台 A: 逆向交易翻转符号
    Shopify,  // 平台 B: 逆向交易直接剔除
    Flipkart, // 平台 C: 多 GSTIN 拆分
}

impl Platform {
    /// 全部平台（按处理顺序）
    pub const ALL: [Platform; 3] = [Platform::Amazon, Platform::Shopify, Platform::Flipkart];

    /// 平台标签（工作表命名、错误消息使用）
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Amazon => "Amazon",
            Platform::Shopify => "Shopify",
            Platform::Flipkart => "Flipkart",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
