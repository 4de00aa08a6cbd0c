// ==========================================
// GSTR-1 汇总工具 - 分类记录与汇总模型
// ==========================================
// 职责: ClassifiedRecord / B2CS 桶汇总 / TCS 身份汇总 / 合并汇总
// 所有权: 适配器构造 ClassifiedRecord；聚合引擎构造汇总；报表层只读
// ==========================================

use crate::domain::jurisdiction::Jurisdiction;
use crate::domain::platform::Platform;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ClassifiedRecord - 已分类交易记录
// ==========================================
// 列名已解析、数值已转换、辖区已规范、符号已规范
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub seller_identity: String,    // 卖家/运营商 GSTIN（大写、去空白）
    pub jurisdiction: Jurisdiction, // 供应地
    pub taxable_value: f64,         // 应税价值
    pub igst: f64,                  // 综合税
    pub cgst: f64,                  // 中央税
    pub sgst: f64,                  // 州/属地税
    pub cess: f64,                  // 附加税
    pub rate_percent: f64,          // 有效税率（%）
    pub is_reversal: bool,          // 退款/取消/退货
}

// ==========================================
// BucketSummary - B2CS 行（辖区 × 税率）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub jurisdiction: Jurisdiction,
    pub rate_percent: f64,
    pub taxable_value: f64,
    pub cess: f64,
    /// 非分组属性，仅用于下游标注（合并表中为逗号分隔的多个身份）
    pub seller_identity: String,
}

// ==========================================
// IdentitySummary - TCS 行（平台 × 身份）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySummary {
    pub platform: Platform,
    pub seller_identity: String,
    pub display_name: String,
    pub net_supply_value: f64,
    pub integrated_tax: f64,
    pub central_tax: f64,
    pub state_tax: f64,
    pub cess: f64,
}

impl IdentitySummary {
    /// 空汇总（无记录的身份）
    pub fn empty(platform: Platform, seller_identity: &str, display_name: &str) -> Self {
        Self {
            platform,
            seller_identity: seller_identity.to_string(),
            display_name: display_name.to_string(),
            net_supply_value: 0.0,
            integrated_tax: 0.0,
            central_tax: 0.0,
            state_tax: 0.0,
            cess: 0.0,
        }
    }
}

// ==========================================
// SourceSummary - 单来源单身份汇总对
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub platform: Platform,
    pub identity: String,
    pub buckets: Vec<BucketSummary>,
    pub identity_summary: IdentitySummary,
}

// ==========================================
// CombinedSummary - 跨来源合并汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSummary {
    pub buckets: Vec<BucketSummary>,
    pub identities: Vec<IdentitySummary>,
    /// 参与合并的平台（去重、有序）
    pub platforms: Vec<Platform>,
}

impl CombinedSummary {
    /// 是否涉及多个平台（决定合并 TCS 表是否追加 Platform 列）
    pub fn spans_multiple_platforms(&self) -> bool {
        self.platforms.len() > 1
    }
}

// ==========================================
// ReportBundle - 单次运行的全部汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub run_id: Uuid,
    pub sources: Vec<SourceSummary>,
    pub combined: Option<CombinedSummary>,
}

impl ReportBundle {
    /// 身份汇总总数（跨来源）
    pub fn identity_count(&self) -> usize {
        self.sources.len()
    }
}
