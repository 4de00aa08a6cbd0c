// ==========================================
// GSTR-1 汇总工具 - 平台 C（Flipkart）适配器
// ==========================================
// 规则: 按卖家 GSTIN 拆分；身份列缺失且无默认身份 → IdentityResolution
// 规则: 逆向事件（RETURN / CANCEL）保留并翻转符号
// 规则: 供应地取客户账单州；州内 = 发货州 == 账单州
// 规则: 显式税率列优先，否则由税额列推导并吸附到法定税档
// ==========================================

use crate::config::{OperatorProfile, ReportConfig};
use crate::domain::platform::Platform;
use crate::domain::summary::ClassifiedRecord;
use crate::engine::adapters::{
    PlatformRules, RateSource, ReversalHandling, RowContext, SourceAdapter,
};
use crate::engine::error::SourceError;
use crate::engine::jurisdiction::JurisdictionNormalizer;
use crate::engine::tax_rate::{round2, SlabSnapper, TaxSplit};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::schema_mapper::{FieldSpec, ResolvedDataset, ResolvedRow, SchemaMap};

/// 标准字段名
pub mod field {
    pub const SELLER_GSTIN: &str = "seller_gstin";
    pub const BILLING_STATE: &str = "billing_state";
    pub const SHIPPED_FROM_STATE: &str = "shipped_from_state";
    pub const TAXABLE_VALUE: &str = "taxable_value";
    pub const IGST: &str = "igst";
    pub const CGST: &str = "cgst";
    pub const SGST: &str = "sgst";
    pub const IGST_RATE: &str = "igst_rate";
    pub const CGST_RATE: &str = "cgst_rate";
    pub const SGST_RATE: &str = "sgst_rate";
    pub const EVENT_TYPE: &str = "event_type";
    pub const CESS: &str = "cess";
}

const RATE_FIELDS: [&str; 3] = [field::IGST_RATE, field::CGST_RATE, field::SGST_RATE];
const AMOUNT_FIELDS: [&str; 3] = [field::IGST, field::CGST, field::SGST];

pub static FLIPKART_RULES: PlatformRules = PlatformRules {
    platform: Platform::Flipkart,
    schema: SchemaMap {
        fields: &[
            FieldSpec::optional(field::SELLER_GSTIN, &["seller gstin"]),
            FieldSpec::mandatory(
                field::BILLING_STATE,
                &["customer's billing state", "billing state"],
            ),
            FieldSpec::optional(
                field::SHIPPED_FROM_STATE,
                &["order shipped from (state)", "shipped from state"],
            ),
            FieldSpec::mandatory(
                field::TAXABLE_VALUE,
                &["taxable value (final invoice amount -taxes)", "taxable value"],
            ),
            FieldSpec::optional(field::IGST, &["igst amount"]),
            FieldSpec::optional(field::CGST, &["cgst amount"]),
            FieldSpec::optional(
                field::SGST,
                &["sgst amount (or utgst as applicable)", "sgst amount"],
            ),
            FieldSpec::optional(field::IGST_RATE, &["igst rate"]),
            FieldSpec::optional(field::CGST_RATE, &["cgst rate"]),
            FieldSpec::optional(
                field::SGST_RATE,
                &["sgst rate (or utgst as applicable)", "sgst rate"],
            ),
            FieldSpec::optional(field::EVENT_TYPE, &["event type"]),
            FieldSpec::optional(field::CESS, &["luxury cess amount"]),
        ],
    },
    identity_field: field::SELLER_GSTIN,
    place_of_supply_field: field::BILLING_STATE,
    status_field: field::EVENT_TYPE,
    reversal_vocabulary: &["RETURN", "CANCEL"],
    reversal_handling: ReversalHandling::SignNormalize,
    rate_source: RateSource::ExplicitOrSnapped,
    required_link_field: None,
    excluded_status: None,
    drop_non_positive_taxable: true,
};

// ==========================================
// FlipkartAdapter
// ==========================================
pub struct FlipkartAdapter {
    profile: OperatorProfile,
    snapper: SlabSnapper,
}

impl FlipkartAdapter {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            profile: config.flipkart.clone(),
            snapper: config.snapper(),
        }
    }

    /// 显式税率列之和（任一税率列存在时）
    fn explicit_rate(&self, row: &ResolvedRow<'_>) -> Option<f64> {
        let cleaner = DataCleaner;
        RATE_FIELDS
            .iter()
            .any(|f| row.text(f).is_some())
            .then(|| {
                RATE_FIELDS
                    .iter()
                    .map(|f| cleaner.parse_or_zero(row.text(f)))
                    .sum()
            })
    }
}

impl SourceAdapter for FlipkartAdapter {
    fn rules(&self) -> &'static PlatformRules {
        &FLIPKART_RULES
    }

    fn profile(&self) -> &OperatorProfile {
        &self.profile
    }

    fn snapper(&self) -> &SlabSnapper {
        &self.snapper
    }

    fn check_capabilities(&self, dataset: &ResolvedDataset) -> Result<(), SourceError> {
        let rules = self.rules();

        if !dataset.has(rules.identity_field) && self.profile.default_gstin.is_none() {
            return Err(SourceError::IdentityResolution {
                field: rules.schema.friendly_name(rules.identity_field).to_string(),
            });
        }

        if !dataset.has_any(&RATE_FIELDS) && !dataset.has_any(&AMOUNT_FIELDS) {
            let names = |fields: &[&str]| {
                fields
                    .iter()
                    .map(|f| rules.schema.friendly_name(f))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            return Err(SourceError::RateResolution {
                rate_columns: names(&RATE_FIELDS),
                amount_columns: names(&AMOUNT_FIELDS),
            });
        }

        Ok(())
    }

    fn classify(&self, row: &ResolvedRow<'_>, ctx: RowContext) -> ClassifiedRecord {
        let cleaner = DataCleaner;
        let normalizer = JurisdictionNormalizer;
        let number = |name: &str| cleaner.parse_or_zero(row.text(name));

        let taxable_value = number(field::TAXABLE_VALUE);
        let amounts_present = AMOUNT_FIELDS.iter().any(|f| row.text(f).is_some());
        let (igst, cgst, sgst) = (number(field::IGST), number(field::CGST), number(field::SGST));
        let rate_percent = self.rate(self.explicit_rate(row), igst + cgst + sgst, taxable_value);

        let split = if amounts_present {
            TaxSplit { igst, cgst, sgst }
        } else {
            // 无税额列：按税率回算，再依发货州判断州内 / 州际
            let origin = cleaner
                .normalize_null(row.text(field::SHIPPED_FROM_STATE))
                .map(|state| normalizer.normalize(&state))
                .or_else(|| normalizer.from_gstin(&ctx.identity));
            let intra_state = origin.as_ref() == Some(&ctx.jurisdiction);
            TaxSplit::of(round2(taxable_value.abs() * rate_percent / 100.0), intra_state)
        };

        let is_reversal = ctx.is_reversal;
        let signed = |value: f64| cleaner.apply_sign(value, is_reversal);

        ClassifiedRecord {
            seller_identity: ctx.identity,
            jurisdiction: ctx.jurisdiction,
            taxable_value: signed(taxable_value),
            igst: signed(split.igst),
            cgst: signed(split.cgst),
            sgst: signed(split.sgst),
            cess: signed(number(field::CESS)),
            rate_percent,
            is_reversal,
        }
    }
}
