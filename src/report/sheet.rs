// ==========================================
// GSTR-1 汇总工具 - 报表工作簿模型
// ==========================================
// 职责: ReportBundle → 工作表模型（命名 / 列头 / 行数据）
// 红线: 只读汇总结果，不修改任何数值含义
// 说明: 模型与输出格式解耦，Emitter 只负责渲染
// ==========================================

use crate::config::ReportConfig;
use crate::domain::summary::{BucketSummary, IdentitySummary, ReportBundle};
use crate::engine::tax_rate::round2;
use serde::Serialize;
use std::collections::HashSet;

/// Excel 工作表名称长度上限
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// B2CS 行的类型标记
pub const TYPE_MARKER: &str = "OE";

pub const COMBINED_BUCKET_SHEET: &str = "B2CS_Combined";
pub const COMBINED_IDENTITY_SHEET: &str = "TCS_Combined";

const BUCKET_HEADERS: [&str; 5] = [
    "Type",
    "Place Of Supply",
    "Rate",
    "Taxable Value",
    "Cess Amount",
];
const BUCKET_IDENTITY_HEADER: &str = "E-Commerce GSTIN";

const IDENTITY_HEADERS: [&str; 8] = [
    "Nature of Supply",
    "GSTIN of E-Commerce Operator",
    "E-Commerce Operator Name",
    "Net value of supplies",
    "Integrated tax",
    "Central tax",
    "State/UT tax",
    "Cess",
];
const IDENTITY_PLATFORM_HEADER: &str = "Platform";

// ==========================================
// 模型
// ==========================================

/// 工作表类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SheetKind {
    Bucket,   // B2CS：辖区 × 税率
    Identity, // TCS：平台 × 身份
}

impl SheetKind {
    /// 金额列（含起止）
    pub fn money_columns(&self) -> (usize, usize) {
        match self {
            SheetKind::Bucket => (3, 4),
            SheetKind::Identity => (3, 7),
        }
    }

    /// 签名行所在列
    pub fn signature_column(&self) -> usize {
        match self {
            SheetKind::Bucket => 5,
            SheetKind::Identity => 7,
        }
    }
}

/// 单元格值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// 渲染宽度（字符数），用于列宽计算
    pub fn display_len(&self) -> usize {
        match self {
            CellValue::Text(s) => s.chars().count(),
            CellValue::Number(n) => n.to_string().len(),
        }
    }
}

/// 单张工作表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetData {
    pub name: String,
    pub kind: SheetKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    /// 各列宽度：最长单元格 + 2
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(CellValue::display_len)
                    .fold(header.chars().count(), usize::max);
                longest + 2
            })
            .collect()
    }
}

/// 输出工作簿
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportWorkbook {
    pub sheets: Vec<SheetData>,
}

impl ReportWorkbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

// ==========================================
// SheetNamer - 工作表命名
// ==========================================
/// 工作表名称分配器：非法字符替换、31 字符截断、重名追加 `_2`、`_3`…
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配唯一名称（Excel 名称比较不区分大小写）
    pub fn assign(&mut self, raw: &str) -> String {
        let base = truncate(&sanitize(raw), MAX_SHEET_NAME_LEN);
        if self.used.insert(base.to_uppercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("_{}", n);
            let head = truncate(&base, MAX_SHEET_NAME_LEN - suffix.len());
            let candidate = format!("{}{}", head, suffix);
            if self.used.insert(candidate.to_uppercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn sanitize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

// ==========================================
// 构建
// ==========================================

/// 由汇总结果构建工作簿模型
///
/// # 顺序
/// 每个来源身份依次输出 B2CS / TCS 两张表（来源已按平台、身份排序）；
/// 存在合并汇总时追加 B2CS_Combined / TCS_Combined
pub fn build_workbook(bundle: &ReportBundle, config: &ReportConfig) -> ReportWorkbook {
    let mut namer = SheetNamer::new();
    let mut sheets = Vec::with_capacity(bundle.sources.len() * 2 + 2);

    for source in &bundle.sources {
        let suffix = format!("{}_{}", source.platform.label(), source.identity);
        sheets.push(bucket_sheet(
            namer.assign(&format!("B2CS_{}", suffix)),
            &source.buckets,
            false,
        ));
        sheets.push(identity_sheet(
            namer.assign(&format!("TCS_{}", suffix)),
            std::slice::from_ref(&source.identity_summary),
            &config.nature_of_supply,
            false,
        ));
    }

    if let Some(combined) = &bundle.combined {
        sheets.push(bucket_sheet(
            namer.assign(COMBINED_BUCKET_SHEET),
            &combined.buckets,
            true,
        ));
        sheets.push(identity_sheet(
            namer.assign(COMBINED_IDENTITY_SHEET),
            &combined.identities,
            &config.nature_of_supply,
            combined.spans_multiple_platforms(),
        ));
    }

    ReportWorkbook { sheets }
}

fn bucket_sheet(name: String, buckets: &[BucketSummary], with_identity: bool) -> SheetData {
    let mut headers: Vec<String> = BUCKET_HEADERS.iter().map(|h| h.to_string()).collect();
    if with_identity {
        headers.push(BUCKET_IDENTITY_HEADER.to_string());
    }

    let rows = buckets
        .iter()
        .map(|bucket| {
            let mut row = vec![
                CellValue::text(TYPE_MARKER),
                CellValue::text(bucket.jurisdiction.to_string()),
                CellValue::Number(bucket.rate_percent),
                CellValue::Number(round2(bucket.taxable_value)),
                CellValue::Number(round2(bucket.cess)),
            ];
            if with_identity {
                row.push(CellValue::text(bucket.seller_identity.clone()));
            }
            row
        })
        .collect();

    SheetData {
        name,
        kind: SheetKind::Bucket,
        headers,
        rows,
    }
}

fn identity_sheet(
    name: String,
    identities: &[IdentitySummary],
    nature_of_supply: &str,
    with_platform: bool,
) -> SheetData {
    let mut headers: Vec<String> = IDENTITY_HEADERS.iter().map(|h| h.to_string()).collect();
    if with_platform {
        headers.push(IDENTITY_PLATFORM_HEADER.to_string());
    }

    let rows = identities
        .iter()
        .map(|summary| {
            let mut row = vec![
                CellValue::text(nature_of_supply),
                CellValue::text(summary.seller_identity.clone()),
                CellValue::text(summary.display_name.clone()),
                CellValue::Number(round2(summary.net_supply_value)),
                CellValue::Number(round2(summary.integrated_tax)),
                CellValue::Number(round2(summary.central_tax)),
                CellValue::Number(round2(summary.state_tax)),
                CellValue::Number(round2(summary.cess)),
            ];
            if with_platform {
                row.push(CellValue::text(summary.platform.label()));
            }
            row
        })
        .collect();

    SheetData {
        name,
        kind: SheetKind::Identity,
        headers,
        rows,
    }
}
