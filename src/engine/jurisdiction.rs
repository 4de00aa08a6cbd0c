// ==========================================
// GSTR-1 汇总工具 - 辖区规范化器
// ==========================================
// 职责: 自由文本 / 编码州名 → 规范辖区 "NN-Name"
// 红线: 查找表为进程级只读静态配置；未映射值原样返回，不报错
// 红线: 幂等，已规范的值规范化后保持不变
// ==========================================

use crate::domain::jurisdiction::Jurisdiction;
use std::collections::HashMap;
use std::sync::OnceLock;

// ==========================================
// 静态表
// ==========================================

/// 州名 → 规范值（键为大写州名）
pub const STATE_TABLE: &[(&str, &str)] = &[
    ("JAMMU & KASHMIR", "01-Jammu & Kashmir"),
    ("JAMMU AND KASHMIR", "01-Jammu & Kashmir"),
    ("HIMACHAL PRADESH", "02-Himachal Pradesh"),
    ("PUNJAB", "03-Punjab"),
    ("CHANDIGARH", "04-Chandigarh"),
    ("UTTARAKHAND", "05-Uttarakhand"),
    ("HARYANA", "06-Haryana"),
    ("DELHI", "07-Delhi"),
    ("RAJASTHAN", "08-Rajasthan"),
    ("UTTAR PRADESH", "09-Uttar Pradesh"),
    ("BIHAR", "10-Bihar"),
    ("SIKKIM", "11-Sikkim"),
    ("ARUNACHAL PRADESH", "12-Arunachal Pradesh"),
    ("NAGALAND", "13-Nagaland"),
    ("MANIPUR", "14-Manipur"),
    ("MIZORAM", "15-Mizoram"),
    ("TRIPURA", "16-Tripura"),
    ("MEGHALAYA", "17-Meghalaya"),
    ("ASSAM", "18-Assam"),
    ("WEST BENGAL", "19-West Bengal"),
    ("JHARKHAND", "20-Jharkhand"),
    ("ODISHA", "21-Odisha"),
    ("CHHATTISGARH", "22-Chhattisgarh"),
    ("MADHYA PRADESH", "23-Madhya Pradesh"),
    ("GUJARAT", "24-Gujarat"),
    ("DAMAN & DIU", "25-Daman & Diu"),
    (
        "DADRA & NAGAR HAVELI & DAMAN & DIU",
        "26-Dadra & Nagar Haveli & Daman & Diu",
    ),
    ("MAHARASHTRA", "27-Maharashtra"),
    ("KARNATAKA", "29-Karnataka"),
    ("GOA", "30-Goa"),
    ("LAKSHDWEEP", "31-Lakshdweep"),
    ("KERALA", "32-Kerala"),
    ("TAMIL NADU", "33-Tamil Nadu"),
    ("PUDUCHERRY", "34-Puducherry"),
    ("ANDAMAN & NICOBAR ISLANDS", "35-Andaman & Nicobar Islands"),
    ("TELANGANA", "36-Telangana"),
    ("ANDHRA PRADESH", "37-Andhra Pradesh"),
    ("LADAKH", "38-Ladakh"),
    ("OTHER TERRITORY", "97-Other Territory"),
    ("OTHER COUNTRY", "96-Other Country"),
];

/// 易混淆缩写的消歧表（优先于通用缩写表）
pub const AMBIGUOUS_ABBREVIATIONS: &[(&str, &str)] = &[
    ("KA", "KARNATAKA"),
    ("DL", "DELHI"),
    ("WB", "WEST BENGAL"),
    ("CH", "CHANDIGARH"),
    ("BH", "BIHAR"),
];

/// 两字母州代码 → 州名
pub const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("JK", "JAMMU & KASHMIR"),
    ("HP", "HIMACHAL PRADESH"),
    ("PB", "PUNJAB"),
    ("CH", "CHANDIGARH"),
    ("UK", "UTTARAKHAND"),
    ("UT", "UTTARAKHAND"),
    ("HR", "HARYANA"),
    ("DL", "DELHI"),
    ("RJ", "RAJASTHAN"),
    ("UP", "UTTAR PRADESH"),
    ("BR", "BIHAR"),
    ("SK", "SIKKIM"),
    ("AR", "ARUNACHAL PRADESH"),
    ("NL", "NAGALAND"),
    ("MN", "MANIPUR"),
    ("MZ", "MIZORAM"),
    ("TR", "TRIPURA"),
    ("ML", "MEGHALAYA"),
    ("AS", "ASSAM"),
    ("WB", "WEST BENGAL"),
    ("JH", "JHARKHAND"),
    ("OD", "ODISHA"),
    ("OR", "ODISHA"),
    ("CG", "CHHATTISGARH"),
    ("CT", "CHHATTISGARH"),
    ("MP", "MADHYA PRADESH"),
    ("GJ", "GUJARAT"),
    ("DD", "DAMAN & DIU"),
    ("DN", "DADRA & NAGAR HAVELI & DAMAN & DIU"),
    ("MH", "MAHARASHTRA"),
    ("KA", "KARNATAKA"),
    ("GA", "GOA"),
    ("LD", "LAKSHDWEEP"),
    ("KL", "KERALA"),
    ("TN", "TAMIL NADU"),
    ("PY", "PUDUCHERRY"),
    ("AN", "ANDAMAN & NICOBAR ISLANDS"),
    ("TS", "TELANGANA"),
    ("TG", "TELANGANA"),
    ("AP", "ANDHRA PRADESH"),
    ("LA", "LADAKH"),
];

// ==========================================
// 查找索引（首次使用时构建，之后只读）
// ==========================================

struct JurisdictionIndex {
    by_name: HashMap<String, Jurisdiction>,
    by_code: HashMap<u8, Jurisdiction>,
    abbreviations: HashMap<&'static str, &'static str>,
}

fn index() -> &'static JurisdictionIndex {
    static INDEX: OnceLock<JurisdictionIndex> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut by_name = HashMap::new();
        let mut by_code = HashMap::new();
        for (name, canonical) in STATE_TABLE {
            if let Some(jurisdiction) = Jurisdiction::parse_canonical(canonical) {
                if let Some(code) = jurisdiction.code() {
                    by_code.entry(code).or_insert_with(|| jurisdiction.clone());
                }
                by_name.insert(lookup_key(name), jurisdiction);
            }
        }

        // 通用缩写表先入，消歧表覆盖
        let mut abbreviations = HashMap::new();
        for (code, name) in STATE_ABBREVIATIONS.iter().chain(AMBIGUOUS_ABBREVIATIONS) {
            abbreviations.insert(*code, *name);
        }

        JurisdictionIndex {
            by_name,
            by_code,
            abbreviations,
        }
    })
}

/// 查找键：`&` → `AND`，折叠空白，大写
pub fn lookup_key(value: &str) -> String {
    value
        .replace('&', " AND ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// 两字母代码 → 州名（非两字母或未知代码返回 None）
fn resolve_abbreviation(segment: &str) -> Option<&'static str> {
    let segment = segment.trim();
    if segment.len() != 2 || !segment.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    index()
        .abbreviations
        .get(segment.to_ascii_uppercase().as_str())
        .copied()
}

// ==========================================
// JurisdictionNormalizer - 辖区规范化器
// ==========================================
pub struct JurisdictionNormalizer;

impl JurisdictionNormalizer {
    /// 规范化辖区
    ///
    /// # 规则
    /// 1. 含连字符：连字符后段为已知两字母代码 → 先还原为州名；
    ///    否则前段为已知两字母代码 → 还原为州名；否则取连字符后段
    /// 2. 消歧表优先于通用缩写表
    /// 3. `&` 与 `AND` 等价，大写、去空白后查表
    /// 4. 未命中 → 原值（去首尾空白）作为未映射辖区返回
    pub fn normalize(&self, raw: &str) -> Jurisdiction {
        let trimmed = raw.trim();
        let candidate = match trimmed.split_once('-') {
            Some((head, tail)) => resolve_abbreviation(tail)
                .or_else(|| resolve_abbreviation(head))
                .unwrap_or(tail),
            None => trimmed,
        };

        match index().by_name.get(&lookup_key(candidate)) {
            Some(jurisdiction) => jurisdiction.clone(),
            None => Jurisdiction::unmapped(trimmed),
        }
    }

    /// 按两位州代码查找规范辖区
    pub fn from_state_code(&self, code: u8) -> Option<Jurisdiction> {
        index().by_code.get(&code).cloned()
    }

    /// 按 GSTIN 前两位（州代码）查找注册地辖区
    pub fn from_gstin(&self, gstin: &str) -> Option<Jurisdiction> {
        let prefix = gstin.trim().get(0..2)?;
        if !prefix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        self.from_state_code(prefix.parse().ok()?)
    }
}
