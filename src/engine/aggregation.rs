// ==========================================
// GSTR-1 汇总工具 - 聚合引擎
// ==========================================
// 职责: (辖区, 税率) 桶汇总 / 身份汇总 / 跨来源合并
// 红线: 无状态引擎,所有方法都是纯函数
// 红线: 合并结果与输入顺序无关（先按规范顺序排序再累加）
// ==========================================

use crate::domain::jurisdiction::Jurisdiction;
use crate::domain::platform::Platform;
use crate::domain::summary::{
    BucketSummary, ClassifiedRecord, CombinedSummary, IdentitySummary, SourceSummary,
};
use crate::engine::tax_rate::RateKey;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
struct BucketAccumulator {
    taxable_value: f64,
    cess: f64,
    identities: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct IdentityAccumulator {
    net_supply_value: f64,
    integrated_tax: f64,
    central_tax: f64,
    state_tax: f64,
    cess: f64,
}

// ==========================================
// AggregationEngine - 聚合引擎
// ==========================================
pub struct AggregationEngine;

impl AggregationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 按卖家身份分组（身份有序）
    pub fn group_by_identity(
        &self,
        records: Vec<ClassifiedRecord>,
    ) -> BTreeMap<String, Vec<ClassifiedRecord>> {
        let mut groups: BTreeMap<String, Vec<ClassifiedRecord>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.seller_identity.clone())
                .or_default()
                .push(record);
        }
        groups
    }

    /// 生成 B2CS 桶汇总
    ///
    /// # 规则
    /// - 按 (辖区, 税率) 分组，累加应税价值与 cess
    /// - 仅保留税率 > 0 的桶
    /// - drop_non_positive_taxable = true 时，同时剔除应税价值合计 ≤ 0 的桶
    pub fn bucket_records(
        &self,
        records: &[ClassifiedRecord],
        drop_non_positive_taxable: bool,
    ) -> Vec<BucketSummary> {
        let mut buckets: BTreeMap<(Jurisdiction, RateKey), BucketAccumulator> = BTreeMap::new();

        for record in records {
            let key = (
                record.jurisdiction.clone(),
                RateKey::from_percent(record.rate_percent),
            );
            let acc = buckets.entry(key).or_default();
            acc.taxable_value += record.taxable_value;
            acc.cess += record.cess;
            acc.identities.insert(record.seller_identity.clone());
        }

        buckets
            .into_iter()
            .filter(|((_, rate), acc)| {
                rate.is_positive() && (!drop_non_positive_taxable || acc.taxable_value > 0.0)
            })
            .map(|((jurisdiction, rate), acc)| Self::finish_bucket(jurisdiction, rate, acc))
            .collect()
    }

    /// 生成身份汇总（TCS 行）
    pub fn summarize_identity(
        &self,
        platform: Platform,
        identity: &str,
        display_name: &str,
        records: &[ClassifiedRecord],
    ) -> IdentitySummary {
        let mut summary = IdentitySummary::empty(platform, identity, display_name);
        for record in records {
            summary.net_supply_value += record.taxable_value;
            summary.integrated_tax += record.igst;
            summary.central_tax += record.cgst;
            summary.state_tax += record.sgst;
            summary.cess += record.cess;
        }
        summary
    }

    /// 是否需要合并（跨全部来源的身份汇总数 > 1）
    pub fn needs_combination(&self, summaries: &[SourceSummary]) -> bool {
        summaries.len() > 1
    }

    /// 跨来源 / 跨身份合并
    ///
    /// # 规则
    /// - 合并桶：全部桶按 (辖区, 税率) 再分组，累加应税价值与 cess；身份标注为去重后的逗号列表
    /// - 合并身份：按 (平台, 身份, 平台显示名) 分组，累加净值与四项税额
    pub fn combine(&self, summaries: &[SourceSummary]) -> CombinedSummary {
        // 1. 桶：规范排序后累加
        let mut all_buckets: Vec<&BucketSummary> =
            summaries.iter().flat_map(|s| s.buckets.iter()).collect();
        all_buckets.sort_by(|a, b| compare_buckets(a, b));

        let mut buckets: BTreeMap<(Jurisdiction, RateKey), BucketAccumulator> = BTreeMap::new();
        for bucket in all_buckets {
            let key = (
                bucket.jurisdiction.clone(),
                RateKey::from_percent(bucket.rate_percent),
            );
            let acc = buckets.entry(key).or_default();
            acc.taxable_value += bucket.taxable_value;
            acc.cess += bucket.cess;
            for identity in bucket.seller_identity.split(',') {
                let identity = identity.trim();
                if !identity.is_empty() {
                    acc.identities.insert(identity.to_string());
                }
            }
        }

        let combined_buckets = buckets
            .into_iter()
            .filter(|((_, rate), _)| rate.is_positive())
            .map(|((jurisdiction, rate), acc)| Self::finish_bucket(jurisdiction, rate, acc))
            .collect();

        // 2. 身份：规范排序后累加
        let mut all_identities: Vec<&IdentitySummary> =
            summaries.iter().map(|s| &s.identity_summary).collect();
        all_identities.sort_by(|a, b| compare_identities(a, b));

        let mut identities: BTreeMap<(Platform, String, String), IdentityAccumulator> =
            BTreeMap::new();
        for summary in all_identities {
            let key = (
                summary.platform,
                summary.seller_identity.clone(),
                summary.display_name.clone(),
            );
            let acc = identities.entry(key).or_default();
            acc.net_supply_value += summary.net_supply_value;
            acc.integrated_tax += summary.integrated_tax;
            acc.central_tax += summary.central_tax;
            acc.state_tax += summary.state_tax;
            acc.cess += summary.cess;
        }

        let combined_identities = identities
            .into_iter()
            .map(|((platform, seller_identity, display_name), acc)| IdentitySummary {
                platform,
                seller_identity,
                display_name,
                net_supply_value: acc.net_supply_value,
                integrated_tax: acc.integrated_tax,
                central_tax: acc.central_tax,
                state_tax: acc.state_tax,
                cess: acc.cess,
            })
            .collect();

        let platforms: BTreeSet<Platform> = summaries.iter().map(|s| s.platform).collect();

        CombinedSummary {
            buckets: combined_buckets,
            identities: combined_identities,
            platforms: platforms.into_iter().collect(),
        }
    }

    fn finish_bucket(jurisdiction: Jurisdiction, rate: RateKey, acc: BucketAccumulator) -> BucketSummary {
        BucketSummary {
            jurisdiction,
            rate_percent: rate.percent(),
            taxable_value: acc.taxable_value,
            cess: acc.cess,
            seller_identity: acc.identities.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_buckets(a: &BucketSummary, b: &BucketSummary) -> Ordering {
    a.jurisdiction
        .cmp(&b.jurisdiction)
        .then_with(|| a.rate_percent.total_cmp(&b.rate_percent))
        .then_with(|| a.seller_identity.cmp(&b.seller_identity))
        .then_with(|| a.taxable_value.total_cmp(&b.taxable_value))
        .then_with(|| a.cess.total_cmp(&b.cess))
}

fn compare_identities(a: &IdentitySummary, b: &IdentitySummary) -> Ordering {
    a.platform
        .cmp(&b.platform)
        .then_with(|| a.seller_identity.cmp(&b.seller_identity))
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.net_supply_value.total_cmp(&b.net_supply_value))
        .then_with(|| a.integrated_tax.total_cmp(&b.integrated_tax))
        .then_with(|| a.central_tax.total_cmp(&b.central_tax))
        .then_with(|| a.state_tax.total_cmp(&b.state_tax))
        .then_with(|| a.cess.total_cmp(&b.cess))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: &str, rate: f64, taxable: f64, cess: f64) -> ClassifiedRecord {
        ClassifiedRecord {
            seller_identity: "06AABCB2901D1CX".to_string(),
            jurisdiction: Jurisdiction::parse_canonical(state).unwrap(),
            taxable_value: taxable,
            igst: taxable * rate / 100.0,
            cgst: 0.0,
            sgst: 0.0,
            cess,
            rate_percent: rate,
            is_reversal: taxable < 0.0,
        }
    }

    fn bucket(identity: &str, state: &str, rate: f64, taxable: f64, cess: f64) -> BucketSummary {
        BucketSummary {
            jurisdiction: Jurisdiction::parse_canonical(state).unwrap(),
            rate_percent: rate,
            taxable_value: taxable,
            cess,
            seller_identity: identity.to_string(),
        }
    }

    fn source(platform: Platform, identity: &str, buckets: Vec<BucketSummary>) -> SourceSummary {
        let taxable = buckets.iter().map(|b| b.taxable_value).sum();
        let mut identity_summary = IdentitySummary::empty(platform, identity, platform.label());
        identity_summary.net_supply_value = taxable;
        SourceSummary {
            platform,
            identity: identity.to_string(),
            buckets,
            identity_summary,
        }
    }

    #[test]
    fn test_bucket_records_groups_and_drops_zero_rate() {
        let engine = AggregationEngine::new();
        let records = vec![
            record("06-Haryana", 18.0, 100.0, 1.0),
            record("06-Haryana", 18.0, 50.0, 0.5),
            record("07-Delhi", 18.0, 70.0, 0.0),
            record("07-Delhi", 0.0, 30.0, 0.0),
        ];

        let buckets = engine.bucket_records(&records, false);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].jurisdiction.to_string(), "06-Haryana");
        assert_eq!(buckets[0].taxable_value, 150.0);
        assert_eq!(buckets[0].cess, 1.5);
        assert_eq!(buckets[1].jurisdiction.to_string(), "07-Delhi");
        assert_eq!(buckets[1].taxable_value, 70.0);
    }

    #[test]
    fn test_bucket_records_optionally_drops_non_positive_taxable() {
        let engine = AggregationEngine::new();
        let records = vec![
            record("06-Haryana", 18.0, 100.0, 0.0),
            record("06-Haryana", 18.0, -100.0, 0.0),
            record("07-Delhi", 12.0, 40.0, 0.0),
        ];

        assert_eq!(engine.bucket_records(&records, false).len(), 2);

        let kept = engine.bucket_records(&records, true);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].jurisdiction.to_string(), "07-Delhi");
    }

    #[test]
    fn test_summarize_identity_sums_components() {
        let engine = AggregationEngine::new();
        let records = vec![
            record("06-Haryana", 18.0, 100.0, 1.0),
            record("06-Haryana", 18.0, -40.0, 0.0),
        ];

        let summary =
            engine.summarize_identity(Platform::Amazon, "06AABCB2901D1CX", "Amazon", &records);

        assert_eq!(summary.net_supply_value, 60.0);
        assert!((summary.integrated_tax - 10.8).abs() < 1e-9);
        assert_eq!(summary.cess, 1.0);
    }

    #[test]
    fn test_combine_sums_overlapping_buckets() {
        let engine = AggregationEngine::new();
        let summaries = vec![
            source(
                Platform::Amazon,
                "06AABCB2901D1CX",
                vec![bucket("06AABCB2901D1CX", "06-Haryana", 18.0, 100.0, 2.0)],
            ),
            source(
                Platform::Shopify,
                "24AAAAA0000A1Z5",
                vec![
                    bucket("24AAAAA0000A1Z5", "06-Haryana", 18.0, 50.0, 1.0),
                    bucket("24AAAAA0000A1Z5", "07-Delhi", 5.0, 20.0, 0.0),
                ],
            ),
        ];

        assert!(engine.needs_combination(&summaries));
        let combined = engine.combine(&summaries);

        assert_eq!(combined.buckets.len(), 2);
        assert_eq!(combined.buckets[0].taxable_value, 150.0);
        assert_eq!(combined.buckets[0].cess, 3.0);
        assert_eq!(
            combined.buckets[0].seller_identity,
            "06AABCB2901D1CX, 24AAAAA0000A1Z5"
        );
        assert_eq!(combined.identities.len(), 2);
        assert!(combined.spans_multiple_platforms());
    }

    #[test]
    fn test_combine_is_order_independent() {
        let engine = AggregationEngine::new();
        let a = source(
            Platform::Flipkart,
            "29ABCDE1234F1Z5",
            vec![bucket("29ABCDE1234F1Z5", "29-Karnataka", 18.0, 0.1, 0.2)],
        );
        let b = source(
            Platform::Flipkart,
            "07ABCDE1234F1Z5",
            vec![bucket("07ABCDE1234F1Z5", "29-Karnataka", 18.0, 0.7, 0.3)],
        );
        let c = source(
            Platform::Amazon,
            "06AABCB2901D1CX",
            vec![bucket("06AABCB2901D1CX", "29-Karnataka", 18.0, 0.3, 0.0)],
        );

        let forward = engine.combine(&[a.clone(), b.clone(), c.clone()]);
        let shuffled = engine.combine(&[c, a, b]);

        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_single_summary_needs_no_combination() {
        let engine = AggregationEngine::new();
        let summaries = vec![source(Platform::Amazon, "06AABCB2901D1CX", vec![])];
        assert!(!engine.needs_combination(&summaries));
    }
}
