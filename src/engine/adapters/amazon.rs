// ==========================================
// GSTR-1 汇总工具 - 平台 A（Amazon）适配器
// ==========================================
// 规则: 逆向交易（CANCEL / REFUND / RETURN）保留并翻转符号
// 规则: 税率 = 税额合计 / 应税价值；IGST / CGST / SGST 直接取自报表
// ==========================================

use crate::config::{OperatorProfile, ReportConfig};
use crate::domain::platform::Platform;
use crate::domain::summary::ClassifiedRecord;
use crate::engine::adapters::{
    PlatformRules, RateSource, ReversalHandling, RowContext, SourceAdapter,
};
use crate::engine::tax_rate::SlabSnapper;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::schema_mapper::{FieldSpec, ResolvedRow, SchemaMap};

/// 标准字段名
pub mod field {
    pub const SHIP_TO_STATE: &str = "ship_to_state";
    pub const TAXABLE_VALUE: &str = "taxable_value";
    pub const TOTAL_TAX: &str = "total_tax";
    pub const IGST: &str = "igst";
    pub const CGST: &str = "cgst";
    pub const SGST: &str = "sgst";
    pub const TRANSACTION_STATUS: &str = "transaction_status";
    pub const CESS: &str = "cess";
    pub const SELLER_GSTIN: &str = "seller_gstin";
}

pub static AMAZON_RULES: PlatformRules = PlatformRules {
    platform: Platform::Amazon,
    schema: SchemaMap {
        fields: &[
            FieldSpec::mandatory(field::SHIP_TO_STATE, &["ship to state", "state"]),
            FieldSpec::mandatory(field::TAXABLE_VALUE, &["tax exclusive gross", "taxable value"]),
            FieldSpec::mandatory(field::TOTAL_TAX, &["total tax amount", "total tax"]),
            FieldSpec::mandatory(field::IGST, &["igst tax"]),
            FieldSpec::mandatory(field::CGST, &["cgst tax"]),
            FieldSpec::mandatory(field::SGST, &["sgst tax"]),
            FieldSpec::optional(
                field::TRANSACTION_STATUS,
                &["transaction type", "transaction status", "order status"],
            ),
            FieldSpec::optional(field::CESS, &["compensatory cess tax", "cess"]),
            FieldSpec::optional(field::SELLER_GSTIN, &["seller gstin"]),
        ],
    },
    identity_field: field::SELLER_GSTIN,
    place_of_supply_field: field::SHIP_TO_STATE,
    status_field: field::TRANSACTION_STATUS,
    reversal_vocabulary: &["CANCEL", "REFUND", "RETURN"],
    reversal_handling: ReversalHandling::SignNormalize,
    rate_source: RateSource::Derived,
    required_link_field: None,
    excluded_status: None,
    drop_non_positive_taxable: false,
};

// ==========================================
// AmazonAdapter
// ==========================================
pub struct AmazonAdapter {
    profile: OperatorProfile,
    snapper: SlabSnapper,
}

impl AmazonAdapter {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            profile: config.amazon.clone(),
            snapper: config.snapper(),
        }
    }
}

impl SourceAdapter for AmazonAdapter {
    fn rules(&self) -> &'static PlatformRules {
        &AMAZON_RULES
    }

    fn profile(&self) -> &OperatorProfile {
        &self.profile
    }

    fn snapper(&self) -> &SlabSnapper {
        &self.snapper
    }

    fn classify(&self, row: &ResolvedRow<'_>, ctx: RowContext) -> ClassifiedRecord {
        let cleaner = DataCleaner;
        let number = |name: &str| cleaner.parse_or_zero(row.text(name));

        let taxable_value = number(field::TAXABLE_VALUE);
        let total_tax = number(field::TOTAL_TAX);
        // 逆向行按绝对值计算税率，与对应正向行落入同一桶并相互抵减
        let rate_percent = self.rate(None, total_tax, taxable_value);

        let is_reversal = ctx.is_reversal;
        let signed = |value: f64| cleaner.apply_sign(value, is_reversal);

        ClassifiedRecord {
            seller_identity: ctx.identity,
            jurisdiction: ctx.jurisdiction,
            taxable_value: signed(taxable_value),
            igst: signed(number(field::IGST)),
            cgst: signed(number(field::CGST)),
            sgst: signed(number(field::SGST)),
            cess: signed(number(field::CESS)),
            rate_percent,
            is_reversal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::RawDataset;
    use crate::engine::error::SourceError;

    const HEADERS: [&str; 9] = [
        "Ship To State",
        "Tax Exclusive Gross",
        "Total Tax Amount",
        "IGST Tax",
        "CGST Tax",
        "SGST Tax",
        "Transaction Type",
        "Compensatory Cess Tax",
        "Seller Gstin",
    ];

    fn adapter() -> AmazonAdapter {
        AmazonAdapter::new(&ReportConfig::default())
    }

    #[test]
    fn test_reversal_flips_every_component() {
        let dataset = RawDataset::from_rows(
            HEADERS,
            vec![
                vec!["Delhi", "100", "18", "18", "0", "0", "Shipment", "1", ""],
                vec!["Delhi", "100", "18", "18", "0", "0", "Refund", "1", ""],
                vec!["Delhi", "200", "36", "36", "0", "0", "Shipment", "0", ""],
            ],
        );

        let summaries = adapter().process(dataset).unwrap();
        assert_eq!(summaries.len(), 1);

        let summary = &summaries[0];
        assert_eq!(summary.identity, "06AABCB2901D1CX");
        assert_eq!(summary.buckets.len(), 1);
        assert_eq!(summary.buckets[0].jurisdiction.to_string(), "07-Delhi");
        assert_eq!(summary.buckets[0].rate_percent, 18.0);
        assert_eq!(summary.buckets[0].taxable_value, 200.0);
        assert_eq!(summary.buckets[0].cess, 0.0);
        assert_eq!(summary.identity_summary.net_supply_value, 200.0);
        assert_eq!(summary.identity_summary.integrated_tax, 36.0);
    }

    #[test]
    fn test_reversal_record_has_negative_components() {
        let dataset = RawDataset::from_rows(
            HEADERS,
            vec![vec!["Haryana", "-50", "-9", "0", "-4.5", "-4.5", "Cancel", "", ""]],
        );
        let resolved = crate::importer::schema_mapper::SchemaMapper
            .apply(dataset, &AMAZON_RULES.schema)
            .unwrap();
        let row = resolved.rows().next().unwrap();

        let record = adapter().classify(
            &row,
            RowContext {
                identity: "06AABCB2901D1CX".to_string(),
                jurisdiction: crate::engine::jurisdiction::JurisdictionNormalizer
                    .normalize("Haryana"),
                is_reversal: true,
            },
        );

        assert_eq!(record.taxable_value, -50.0);
        assert_eq!(record.cgst, -4.5);
        assert_eq!(record.sgst, -4.5);
        assert_eq!(record.rate_percent, 18.0);
    }

    #[test]
    fn test_zero_rate_buckets_are_dropped() {
        let dataset = RawDataset::from_rows(
            HEADERS,
            vec![
                vec!["Goa", "100", "0", "0", "0", "0", "Shipment", "", ""],
                vec!["Goa", "100", "5", "5", "0", "0", "Shipment", "", ""],
            ],
        );

        let summaries = adapter().process(dataset).unwrap();
        let buckets = &summaries[0].buckets;

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].rate_percent, 5.0);
        // 身份汇总仍包含零税率行
        assert_eq!(summaries[0].identity_summary.net_supply_value, 200.0);
    }

    #[test]
    fn test_identity_column_splits_summaries() {
        let dataset = RawDataset::from_rows(
            HEADERS,
            vec![
                vec!["Delhi", "100", "18", "18", "0", "0", "", "", "07aaaaa0000a1z5"],
                vec!["Delhi", "100", "18", "18", "0", "0", "", "", "29AAAAA0000A1Z5"],
                vec!["Delhi", "100", "18", "18", "0", "0", "", "", ""],
            ],
        );

        let summaries = adapter().process(dataset).unwrap();
        let identities: Vec<_> = summaries.iter().map(|s| s.identity.as_str()).collect();

        assert_eq!(
            identities,
            vec!["06AABCB2901D1CX", "07AAAAA0000A1Z5", "29AAAAA0000A1Z5"]
        );
    }

    #[test]
    fn test_empty_dataset_yields_default_identity_summary() {
        let dataset = RawDataset::from_rows(HEADERS, Vec::<Vec<&str>>::new());

        let summaries = adapter().process(dataset).unwrap();

        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].buckets.is_empty());
        assert_eq!(summaries[0].identity_summary.display_name, "Amazon");
    }

    #[test]
    fn test_missing_mandatory_columns() {
        let dataset = RawDataset::from_rows(["Ship To State", "Total Tax"], vec![vec!["Delhi", "1"]]);

        let err = adapter().process(dataset).unwrap_err();

        assert!(matches!(err, SourceError::SchemaValidation(_)));
        assert_eq!(
            err.to_string(),
            "Missing required columns: tax exclusive gross, igst tax, cgst tax, sgst tax"
        );
    }
}
