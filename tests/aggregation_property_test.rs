// ==========================================
// 聚合引擎 属性测试
// ==========================================
// 测试目标: 合并结果与来源顺序无关 / 合并前后金额守恒
// ==========================================

use gstr1_consolidator::domain::{
    BucketSummary, IdentitySummary, Jurisdiction, Platform, SourceSummary,
};
use gstr1_consolidator::engine::AggregationEngine;
use proptest::prelude::*;

const STATES: [&str; 5] = [
    "06-Haryana",
    "07-Delhi",
    "19-West Bengal",
    "29-Karnataka",
    "30-Goa",
];
const RATES: [f64; 4] = [5.0, 12.0, 18.0, 28.0];
const IDENTITIES: [&str; 3] = ["06AABCB2901D1CX", "24AAAAA0000A1Z5", "29ABCDE1234F1Z5"];

fn arb_platform() -> impl Strategy<Value = Platform> {
    prop::sample::select(Platform::ALL.to_vec())
}

fn arb_amount() -> impl Strategy<Value = f64> {
    (-50_000i64..200_000i64).prop_map(|cents| cents as f64 / 100.0)
}

prop_compose! {
    fn arb_bucket(identity: &'static str)(
        state in prop::sample::select(STATES.to_vec()),
        rate in prop::sample::select(RATES.to_vec()),
        taxable in arb_amount(),
        cess in 0i64..5_000i64,
    ) -> BucketSummary {
        BucketSummary {
            jurisdiction: Jurisdiction::from(state.to_string()),
            rate_percent: rate,
            taxable_value: taxable,
            cess: cess as f64 / 100.0,
            seller_identity: identity.to_string(),
        }
    }
}

prop_compose! {
    fn arb_source()(
        platform in arb_platform(),
        identity in prop::sample::select(IDENTITIES.to_vec()),
    )(
        buckets in prop::collection::vec(arb_bucket(identity), 0..6),
        net in arb_amount(),
        igst in arb_amount(),
        cgst in arb_amount(),
        platform in Just(platform),
        identity in Just(identity),
    ) -> SourceSummary {
        SourceSummary {
            platform,
            identity: identity.to_string(),
            buckets,
            identity_summary: IdentitySummary {
                platform,
                seller_identity: identity.to_string(),
                display_name: format!("{} Seller Services", platform),
                net_supply_value: net,
                integrated_tax: igst,
                central_tax: cgst,
                state_tax: cgst,
                cess: 0.0,
            },
        }
    }
}

fn arb_sources_with_shuffle() -> impl Strategy<Value = (Vec<SourceSummary>, Vec<SourceSummary>)> {
    prop::collection::vec(arb_source(), 2..6)
        .prop_flat_map(|sources| (Just(sources.clone()), Just(sources).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_combine_is_order_independent((original, shuffled) in arb_sources_with_shuffle()) {
        let engine = AggregationEngine::new();

        let a = engine.combine(&original);
        let b = engine.combine(&shuffled);

        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_combine_preserves_totals((sources, _) in arb_sources_with_shuffle()) {
        let engine = AggregationEngine::new();
        let combined = engine.combine(&sources);

        let expected_taxable: f64 = sources
            .iter()
            .flat_map(|s| s.buckets.iter())
            .map(|b| b.taxable_value)
            .sum();
        let combined_taxable: f64 = combined.buckets.iter().map(|b| b.taxable_value).sum();
        prop_assert!((expected_taxable - combined_taxable).abs() < 1e-6);

        let expected_net: f64 = sources.iter().map(|s| s.identity_summary.net_supply_value).sum();
        let combined_net: f64 = combined.identities.iter().map(|i| i.net_supply_value).sum();
        prop_assert!((expected_net - combined_net).abs() < 1e-6);
    }

    #[test]
    fn prop_combined_keys_are_unique((sources, _) in arb_sources_with_shuffle()) {
        let engine = AggregationEngine::new();
        let combined = engine.combine(&sources);

        let mut keys: Vec<(String, String)> = combined
            .buckets
            .iter()
            .map(|b| (b.jurisdiction.to_string(), format!("{:.2}", b.rate_percent)))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), total);

        for bucket in &combined.buckets {
            prop_assert!(!bucket.seller_identity.is_empty());
        }
    }
}
