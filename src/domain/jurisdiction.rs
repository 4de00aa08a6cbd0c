// ==========================================
// GSTR-1 汇总工具 - 辖区（供应地）值对象
// ==========================================
// 职责: 规范辖区表示 "NN-Name"（两位代码 + 连字符 + 名称）
// 说明: 无法映射的原始值按原样保留（code = None），下游归入"其他"桶
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 辖区（州 / 联邦属地）
///
/// 规范形式: `06-Haryana`；未映射形式: 原始文本（去首尾空白）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Jurisdiction {
    code: Option<u8>,
    name: String,
}

impl Jurisdiction {
    /// 构造规范辖区
    pub fn canonical(code: u8, name: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            name: name.into(),
        }
    }

    /// 构造未映射辖区（原样保留）
    pub fn unmapped(raw: impl AsRef<str>) -> Self {
        Self {
            code: None,
            name: raw.as_ref().trim().to_string(),
        }
    }

    /// 解析规范形式 "NN-Name"
    ///
    /// 前缀必须恰好两位数字，名称非空
    pub fn parse_canonical(value: &str) -> Option<Self> {
        let (prefix, name) = value.trim().split_once('-')?;
        if prefix.len() != 2 || !prefix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let code = prefix.parse::<u8>().ok()?;
        Some(Self::canonical(code, name))
    }

    pub fn code(&self) -> Option<u8> {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否为已映射的规范辖区
    pub fn is_mapped(&self) -> bool {
        self.code.is_some()
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{:02}-{}", code, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<Jurisdiction> for String {
    fn from(value: Jurisdiction) -> Self {
        value.to_string()
    }
}

impl From<String> for Jurisdiction {
    fn from(value: String) -> Self {
        Jurisdiction::parse_canonical(&value).unwrap_or_else(|| Jurisdiction::unmapped(&value))
    }
}
