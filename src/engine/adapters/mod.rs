// ==========================================
// GSTR-1 汇总工具 - 来源适配器
// ==========================================
// 职责: 列名解析 → 过滤 → 分类 → 符号规范 → 税率 → 按身份与 (辖区, 税率) 汇总
// 红线: 平台差异只允许出现在 PlatformRules 规则表与 classify() 中
// 红线: 适配器无副作用，只产出自身的汇总
// ==========================================

pub mod amazon;
pub mod flipkart;
pub mod shopify;

use crate::config::{OperatorProfile, ReportConfig};
use crate::domain::dataset::RawDataset;
use crate::domain::jurisdiction::Jurisdiction;
use crate::domain::platform::Platform;
use crate::domain::summary::{ClassifiedRecord, IdentitySummary, SourceSummary};
use crate::engine::aggregation::AggregationEngine;
use crate::engine::error::SourceError;
use crate::engine::jurisdiction::JurisdictionNormalizer;
use crate::engine::tax_rate::{effective_rate, round2, SlabSnapper};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::schema_mapper::{ResolvedDataset, ResolvedRow, SchemaMap, SchemaMapper};
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub use amazon::AmazonAdapter;
pub use flipkart::FlipkartAdapter;
pub use shopify::ShopifyAdapter;

// ==========================================
// PlatformRules - 平台规则表
// ==========================================

/// 逆向交易处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReversalHandling {
    Drop,          // 整行剔除
    SignNormalize, // 保留，逆向为负、正向为正
}

/// 税率来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// 税额 / 应税价值 推导
    Derived,
    /// 显式税率列优先，否则由税额列推导并吸附税档
    ExplicitOrSnapped,
}

impl RateSource {
    /// 计算单行税率（%）
    ///
    /// # 参数
    /// - explicit: 显式税率列之和（无税率列时为 None）
    /// - total_tax / taxable_value: 推导用的税额合计与应税价值（取绝对值）
    ///
    /// # 规则
    /// - Derived: 忽略显式税率，round(|税额| / |应税价值| * 100, 2)
    /// - ExplicitOrSnapped: 显式税率优先（两位小数，不吸附）；否则推导并吸附税档
    pub fn resolve(
        self,
        explicit: Option<f64>,
        total_tax: f64,
        taxable_value: f64,
        snapper: &SlabSnapper,
    ) -> f64 {
        match self {
            RateSource::Derived => effective_rate(total_tax.abs(), taxable_value.abs()),
            RateSource::ExplicitOrSnapped => match explicit {
                Some(rate) => round2(rate),
                None if taxable_value == 0.0 => 0.0,
                None => snapper.snap(total_tax.abs() / taxable_value.abs() * 100.0),
            },
        }
    }
}

/// 单一平台的声明式规则
#[derive(Debug)]
pub struct PlatformRules {
    pub platform: Platform,
    pub schema: SchemaMap,
    /// 卖家身份（GSTIN）字段
    pub identity_field: &'static str,
    /// 供应地字段
    pub place_of_supply_field: &'static str,
    /// 交易状态字段（子串匹配逆向词表）
    pub status_field: &'static str,
    pub reversal_vocabulary: &'static [&'static str],
    pub reversal_handling: ReversalHandling,
    pub rate_source: RateSource,
    /// 关联字段：列存在但单元格为空 → 非订单行，剔除
    pub required_link_field: Option<&'static str>,
    /// 精确匹配剔除：(字段, 状态集合)，列存在时生效
    pub excluded_status: Option<(&'static str, &'static [&'static str])>,
    /// 是否同时剔除应税价值合计 ≤ 0 的桶
    pub drop_non_positive_taxable: bool,
}

// ==========================================
// RowContext - 行分类上下文
// ==========================================
/// 公共骨架已确定的行属性
#[derive(Debug, Clone)]
pub struct RowContext {
    pub identity: String,
    pub jurisdiction: Jurisdiction,
    pub is_reversal: bool,
}

// ==========================================
// SourceAdapter Trait
// ==========================================
pub trait SourceAdapter: Send + Sync {
    /// 平台规则表
    fn rules(&self) -> &'static PlatformRules;

    /// 运营商信息（显示名 / 默认身份）
    fn profile(&self) -> &OperatorProfile;

    /// 税档吸附器（来自配置）
    fn snapper(&self) -> &SlabSnapper;

    /// 按规则表的税率来源计算单行税率
    fn rate(&self, explicit: Option<f64>, total_tax: f64, taxable_value: f64) -> f64 {
        self.rules()
            .rate_source
            .resolve(explicit, total_tax, taxable_value, self.snapper())
    }

    /// 数据集级能力检查（列名解析之后、逐行处理之前）
    fn check_capabilities(&self, _dataset: &ResolvedDataset) -> Result<(), SourceError> {
        Ok(())
    }

    /// 单行分类：数值转换、税率、税额拆分、符号规范
    fn classify(&self, row: &ResolvedRow<'_>, ctx: RowContext) -> ClassifiedRecord;

    /// 处理一个来源数据集，输出每个卖家身份的一组汇总
    ///
    /// # 流程
    /// 1. 列名解析 + 能力检查
    /// 2. 逐行：关联字段过滤 → 状态过滤 → 身份 → 逆向分类 → 辖区 → classify
    /// 3. 按身份分组，生成桶汇总与身份汇总
    fn process(&self, dataset: RawDataset) -> Result<Vec<SourceSummary>, SourceError> {
        let rules = self.rules();
        let profile = self.profile();
        let platform = rules.platform;
        let cleaner = DataCleaner;
        let normalizer = JurisdictionNormalizer;

        let resolved = SchemaMapper.apply(dataset, &rules.schema)?;
        self.check_capabilities(&resolved)?;

        let default_identity = cleaner.normalize_identity(profile.default_gstin.as_deref());
        let mut records = Vec::with_capacity(resolved.len());
        let mut unmapped: BTreeSet<String> = BTreeSet::new();
        let mut dropped = 0usize;

        for row in resolved.rows() {
            if let Some(field) = rules.required_link_field {
                if matches!(row.text(field), Some(text) if text.trim().is_empty()) {
                    dropped += 1;
                    continue;
                }
            }

            if let Some((field, excluded)) = rules.excluded_status {
                if let Some(text) = row.text(field) {
                    if cleaner.matches_exact(Some(text), excluded) {
                        dropped += 1;
                        continue;
                    }
                }
            }

            let identity = match cleaner
                .normalize_identity(row.text(rules.identity_field))
                .or_else(|| default_identity.clone())
            {
                Some(identity) => identity,
                None => {
                    dropped += 1;
                    continue;
                }
            };

            let is_reversal =
                cleaner.contains_any(row.text(rules.status_field), rules.reversal_vocabulary);
            if is_reversal && rules.reversal_handling == ReversalHandling::Drop {
                dropped += 1;
                continue;
            }

            let raw_state = row.text(rules.place_of_supply_field).unwrap_or("");
            let jurisdiction = normalizer.normalize(raw_state);
            if !jurisdiction.is_mapped() && unmapped.insert(jurisdiction.name().to_string()) {
                warn!(
                    platform = %platform,
                    row = row.row_number(),
                    value = %raw_state.trim(),
                    "未识别的供应地，按原值单独汇总"
                );
            }

            records.push(self.classify(
                &row,
                RowContext {
                    identity,
                    jurisdiction,
                    is_reversal,
                },
            ));
        }

        debug!(
            platform = %platform,
            rows = resolved.len(),
            kept = records.len(),
            dropped,
            "来源分类完成"
        );

        Ok(summarize(
            platform,
            profile,
            default_identity,
            records,
            rules.drop_non_positive_taxable,
        ))
    }
}

/// 按身份分组汇总；无任何记录时，有默认身份的平台输出一组空汇总
fn summarize(
    platform: Platform,
    profile: &OperatorProfile,
    default_identity: Option<String>,
    records: Vec<ClassifiedRecord>,
    drop_non_positive_taxable: bool,
) -> Vec<SourceSummary> {
    let engine = AggregationEngine::new();
    let groups = engine.group_by_identity(records);

    if groups.is_empty() {
        return default_identity
            .map(|identity| SourceSummary {
                platform,
                identity_summary: IdentitySummary::empty(
                    platform,
                    &identity,
                    &profile.display_name,
                ),
                identity,
                buckets: Vec::new(),
            })
            .into_iter()
            .collect();
    }

    groups
        .into_iter()
        .map(|(identity, group)| {
            let buckets = engine.bucket_records(&group, drop_non_positive_taxable);
            let identity_summary =
                engine.summarize_identity(platform, &identity, &profile.display_name, &group);
            debug!(
                platform = %platform,
                identity = %identity,
                records = group.len(),
                buckets = buckets.len(),
                "身份汇总完成"
            );
            SourceSummary {
                platform,
                identity,
                buckets,
                identity_summary,
            }
        })
        .collect()
}

/// 构建平台适配器
pub fn adapter_for(platform: Platform, config: &ReportConfig) -> Box<dyn SourceAdapter> {
    match platform {
        Platform::Amazon => Box::new(AmazonAdapter::new(config)),
        Platform::Shopify => Box::new(ShopifyAdapter::new(config)),
        Platform::Flipkart => Box::new(FlipkartAdapter::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_for_returns_matching_rules() {
        let config = ReportConfig::default();
        for platform in Platform::ALL {
            let adapter = adapter_for(platform, &config);
            assert_eq!(adapter.rules().platform, platform);
            assert_eq!(adapter.profile().display_name, platform.label());
        }
    }

    #[test]
    fn test_rule_table_differences() {
        let config = ReportConfig::default();
        let amazon = adapter_for(Platform::Amazon, &config);
        let shopify = adapter_for(Platform::Shopify, &config);
        let flipkart = adapter_for(Platform::Flipkart, &config);

        assert_eq!(amazon.rules().reversal_handling, ReversalHandling::SignNormalize);
        assert_eq!(shopify.rules().reversal_handling, ReversalHandling::Drop);
        assert_eq!(flipkart.rules().rate_source, RateSource::ExplicitOrSnapped);
        assert!(flipkart.rules().drop_non_positive_taxable);
        assert!(!amazon.rules().drop_non_positive_taxable);
    }

    #[test]
    fn test_derived_rate_ignores_explicit_and_sign() {
        let snapper = ReportConfig::default().snapper();

        assert_eq!(RateSource::Derived.resolve(Some(12.0), -18.0, -100.0, &snapper), 18.0);
        assert_eq!(RateSource::Derived.resolve(None, 17.75, 100.0, &snapper), 17.75);
        assert_eq!(RateSource::Derived.resolve(None, 5.0, 0.0, &snapper), 0.0);
    }

    #[test]
    fn test_explicit_or_snapped_rate() {
        let snapper = ReportConfig::default().snapper();
        let source = RateSource::ExplicitOrSnapped;

        assert_eq!(source.resolve(Some(6.0 + 6.0), 177.5, 1000.0, &snapper), 12.0);
        assert_eq!(source.resolve(None, 177.5, 1000.0, &snapper), 18.0);
        assert_eq!(source.resolve(None, -177.5, -1000.0, &snapper), 18.0);
        assert_eq!(source.resolve(None, 90.0, 1000.0, &snapper), 9.0);
        assert_eq!(source.resolve(None, 10.0, 0.0, &snapper), 0.0);
    }

    #[test]
    fn test_adapter_rate_follows_rule_table() {
        let config = ReportConfig::default();
        let amazon = adapter_for(Platform::Amazon, &config);
        let flipkart = adapter_for(Platform::Flipkart, &config);

        // 同一组数值：推导型保留 17.75，吸附型取 18
        assert_eq!(amazon.rate(None, 177.5, 1000.0), 17.75);
        assert_eq!(flipkart.rate(None, 177.5, 1000.0), 18.0);
    }
}
