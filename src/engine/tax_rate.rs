// ==========================================
// GSTR-1 汇总工具 - 税率推导
// ==========================================
// 职责: 有效税率计算 / 就近税档吸附 / 州内州际拆分 / 税率分组键
// ==========================================

use serde::{Deserialize, Serialize};

/// 按小数位四舍五入
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// 有效税率（%）
///
/// # 规则
/// - taxable_value > 0 → round(total_tax / taxable_value * 100, 2)
/// - 否则 → 0
pub fn effective_rate(total_tax: f64, taxable_value: f64) -> f64 {
    if taxable_value > 0.0 {
        round2(total_tax / taxable_value * 100.0)
    } else {
        0.0
    }
}

// ==========================================
// SlabSnapper - 税档吸附
// ==========================================
/// 由税额反推的税率吸附到最近的法定税档
///
/// 距最近税档不超过阈值 → 取税档；否则保留一位小数的原始值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabSnapper {
    slabs: Vec<f64>,
    threshold: f64,
}

impl SlabSnapper {
    pub fn new(slabs: Vec<f64>, threshold: f64) -> Self {
        Self { slabs, threshold }
    }

    pub fn snap(&self, raw_rate: f64) -> f64 {
        let nearest = self.slabs.iter().copied().min_by(|a, b| {
            (a - raw_rate)
                .abs()
                .total_cmp(&(b - raw_rate).abs())
        });

        match nearest {
            Some(slab) if (slab - raw_rate).abs() <= self.threshold => slab,
            _ => round_to(raw_rate, 1),
        }
    }
}

// ==========================================
// TaxSplit - 州内 / 州际拆分
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxSplit {
    pub igst: f64,
    pub cgst: f64,
    pub sgst: f64,
}

impl TaxSplit {
    /// 州内：CGST / SGST 各半；州际：全部计入 IGST
    pub fn of(total_tax: f64, intra_state: bool) -> Self {
        if intra_state {
            Self {
                igst: 0.0,
                cgst: total_tax / 2.0,
                sgst: total_tax / 2.0,
            }
        } else {
            Self {
                igst: total_tax,
                cgst: 0.0,
                sgst: 0.0,
            }
        }
    }
}

// ==========================================
// RateKey - 税率分组键
// ==========================================
/// 以 0.01 个百分点为单位存储的税率，用作分组键
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RateKey(i64);

impl RateKey {
    pub fn from_percent(rate: f64) -> Self {
        RateKey((rate * 100.0).round() as i64)
    }

    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}
