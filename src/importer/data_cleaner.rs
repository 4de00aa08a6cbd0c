// ==========================================
// GSTR-1 汇总工具 - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / NULL 标准化 / 数值"解析或置零" / 状态词匹配 / 符号规范
// 红线: 数值字段非法或空白一律按 0 处理（刻意行为，不报错）
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 去首尾空白，可选转大写
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 空白 → None
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 数值解析：非法 / 空白 / 非有限值 → 0.0
    pub fn parse_or_zero(&self, value: Option<&str>) -> f64 {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// 身份（GSTIN）标准化：TRIM + UPPER，空白 → None
    pub fn normalize_identity(&self, value: Option<&str>) -> Option<String> {
        self.normalize_null(value).map(|v| v.to_uppercase())
    }

    /// 大小写不敏感的子串匹配（任一词命中即为真；空值为假）
    pub fn contains_any(&self, value: Option<&str>, vocabulary: &[&str]) -> bool {
        match self.normalize_null(value) {
            None => false,
            Some(v) => {
                let upper = v.to_uppercase();
                vocabulary
                    .iter()
                    .any(|word| upper.contains(&word.to_uppercase()))
            }
        }
    }

    /// 精确匹配（TRIM + UPPER 后比较）；空值按空字符串参与匹配
    pub fn matches_exact(&self, value: Option<&str>, set: &[&str]) -> bool {
        let normalized = self.clean_text(value.unwrap_or(""), true);
        set.iter().any(|candidate| candidate.eq_ignore_ascii_case(&normalized))
    }

    /// 符号规范：逆向交易为负，正向交易为正
    pub fn apply_sign(&self, value: f64, is_reversal: bool) -> f64 {
        if is_reversal {
            -value.abs()
        } else {
            value.abs()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  hello  ", false), "hello");
        assert_eq!(cleaner.clean_text("  hello  ", true), "HELLO");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ")), None);
        assert_eq!(cleaner.normalize_null(Some("")), None);
        assert_eq!(
            cleaner.normalize_null(Some("  value  ")),
            Some("value".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_parse_or_zero() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_or_zero(Some(" 118.5 ")), 118.5);
        assert_eq!(cleaner.parse_or_zero(Some("-12")), -12.0);
        assert_eq!(cleaner.parse_or_zero(Some("abc")), 0.0);
        assert_eq!(cleaner.parse_or_zero(Some("")), 0.0);
        assert_eq!(cleaner.parse_or_zero(Some("NaN")), 0.0);
        assert_eq!(cleaner.parse_or_zero(None), 0.0);
    }

    #[test]
    fn test_normalize_identity() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.normalize_identity(Some(" 29abcde1234f1z5 ")),
            Some("29ABCDE1234F1Z5".to_string())
        );
        assert_eq!(cleaner.normalize_identity(Some("   ")), None);
    }

    #[test]
    fn test_contains_any_is_case_insensitive_substring() {
        let cleaner = DataCleaner;
        let vocab = ["CANCEL", "REFUND", "RETURN"];
        assert!(cleaner.contains_any(Some("Refund"), &vocab));
        assert!(cleaner.contains_any(Some("order cancelled"), &vocab));
        assert!(!cleaner.contains_any(Some("Shipment"), &vocab));
        assert!(!cleaner.contains_any(None, &vocab));
    }

    #[test]
    fn test_matches_exact_treats_blank_as_empty() {
        let cleaner = DataCleaner;
        let set = ["RTO_DELIVERED", "N/A", ""];
        assert!(cleaner.matches_exact(Some("rto_delivered"), &set));
        assert!(cleaner.matches_exact(Some("  "), &set));
        assert!(cleaner.matches_exact(None, &set));
        assert!(!cleaner.matches_exact(Some("DELIVERED"), &set));
    }

    #[test]
    fn test_apply_sign() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.apply_sign(100.0, true), -100.0);
        assert_eq!(cleaner.apply_sign(-100.0, true), -100.0);
        assert_eq!(cleaner.apply_sign(-100.0, false), 100.0);
    }
}
