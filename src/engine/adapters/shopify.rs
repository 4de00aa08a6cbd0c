// ==========================================
// GSTR-1 汇总工具 - 平台 B（Shopify）适配器
// ==========================================
// 规则: 逆向订单（CANCELLED / REFUNDED / VOIDED / RETURNED）与异常发货状态整行剔除
// 规则: 订单金额为含税价；无应税金额列时按 order_total / 含税系数 推算
// 规则: 供应地 == 卖家注册州 → CGST / SGST 各半，否则全部计入 IGST
// ==========================================

use crate::config::{OperatorProfile, ReportConfig};
use crate::domain::jurisdiction::Jurisdiction;
use crate::domain::platform::Platform;
use crate::domain::summary::ClassifiedRecord;
use crate::engine::adapters::{
    PlatformRules, RateSource, ReversalHandling, RowContext, SourceAdapter,
};
use crate::engine::jurisdiction::JurisdictionNormalizer;
use crate::engine::tax_rate::{round2, SlabSnapper, TaxSplit};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::schema_mapper::{FieldSpec, ResolvedRow, SchemaMap};

/// 标准字段名
pub mod field {
    pub const STATE: &str = "state";
    pub const ORDER_TOTAL: &str = "order_total";
    pub const FINANCIAL_STATUS: &str = "financial_status";
    pub const PRODUCT_NAME: &str = "product_name";
    pub const TAXABLE_AMOUNT: &str = "taxable_amount";
    pub const SHIPMENT_STATUS: &str = "shipment_status";
    pub const SELLER_GSTIN: &str = "seller_gstin";
}

/// 需剔除的发货状态（精确匹配，空白同样剔除）
pub const EXCLUDED_SHIPMENT_STATUSES: &[&str] = &[
    "RTO_DELIVERED",
    "NA",
    "RTO_INITIATED",
    "CANCELLED",
    "EXCEPTION",
    "N/A",
    "",
];

pub static SHOPIFY_RULES: PlatformRules = PlatformRules {
    platform: Platform::Shopify,
    schema: SchemaMap {
        fields: &[
            FieldSpec::mandatory(field::STATE, &["address state", "shipping province", "state"]),
            FieldSpec::mandatory(field::ORDER_TOTAL, &["order total", "total"]),
            FieldSpec::optional(
                field::FINANCIAL_STATUS,
                &["order status", "status", "fulfillment status", "financial status"],
            ),
            FieldSpec::optional(field::PRODUCT_NAME, &["product name", "item name"]),
            FieldSpec::optional(field::TAXABLE_AMOUNT, &["taxable amount"]),
            FieldSpec::optional(
                field::SHIPMENT_STATUS,
                &["shipment status", "shipping status", "delivery status"],
            ),
            FieldSpec::optional(field::SELLER_GSTIN, &["seller gstin"]),
        ],
    },
    identity_field: field::SELLER_GSTIN,
    place_of_supply_field: field::STATE,
    status_field: field::FINANCIAL_STATUS,
    reversal_vocabulary: &["CANCELLED", "REFUNDED", "VOIDED", "RETURNED"],
    reversal_handling: ReversalHandling::Drop,
    rate_source: RateSource::Derived,
    required_link_field: Some(field::PRODUCT_NAME),
    excluded_status: Some((field::SHIPMENT_STATUS, EXCLUDED_SHIPMENT_STATUSES)),
    drop_non_positive_taxable: false,
};

// ==========================================
// ShopifyAdapter
// ==========================================
pub struct ShopifyAdapter {
    profile: OperatorProfile,
    home_jurisdiction: Jurisdiction,
    inclusive_price_factor: f64,
    snapper: SlabSnapper,
}

impl ShopifyAdapter {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            profile: config.shopify.clone(),
            home_jurisdiction: JurisdictionNormalizer.normalize(&config.seller_home_state),
            inclusive_price_factor: config.inclusive_price_factor,
            snapper: config.snapper(),
        }
    }
}

impl SourceAdapter for ShopifyAdapter {
    fn rules(&self) -> &'static PlatformRules {
        &SHOPIFY_RULES
    }

    fn profile(&self) -> &OperatorProfile {
        &self.profile
    }

    fn snapper(&self) -> &SlabSnapper {
        &self.snapper
    }

    fn classify(&self, row: &ResolvedRow<'_>, ctx: RowContext) -> ClassifiedRecord {
        let cleaner = DataCleaner;

        let order_total = cleaner.parse_or_zero(row.text(field::ORDER_TOTAL));
        let taxable_value = match row.text(field::TAXABLE_AMOUNT) {
            Some(text) => cleaner.parse_or_zero(Some(text)),
            None => round2(order_total / self.inclusive_price_factor),
        };
        let tax_value = round2(order_total - taxable_value);
        let rate_percent = self.rate(None, tax_value, taxable_value);

        let intra_state = ctx.jurisdiction == self.home_jurisdiction;
        let split = TaxSplit::of(tax_value, intra_state);

        ClassifiedRecord {
            seller_identity: ctx.identity,
            jurisdiction: ctx.jurisdiction,
            taxable_value,
            igst: split.igst,
            cgst: split.cgst,
            sgst: split.sgst,
            cess: 0.0,
            rate_percent,
            is_reversal: ctx.is_reversal,
        }
    }
}
