// ==========================================
// GSTR-1 汇总工具 - 原始数据集模型
// ==========================================
// 职责: 上传报表的表格化表示（表头 + 行）
// 红线: 读取后不可变；列名解析之前不做任何类型转换
// ==========================================

/// 原始行记录
///
/// 值按表头顺序存放；缺失单元格视为空字符串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    row_number: usize,
    values: Vec<String>,
}

impl RawRecord {
    /// 创建原始行
    ///
    /// # 参数
    /// - row_number: 源文件中的行号（表头为第 1 行）
    /// - values: 单元格文本
    pub fn new(row_number: usize, values: Vec<String>) -> Self {
        Self { row_number, values }
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// 按列下标取值（越界返回 None）
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// 整行是否为空白
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| v.trim().is_empty())
    }
}

/// 原始数据集（一个上传文件的第一张表）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDataset {
    headers: Vec<String>,
    records: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            records: Vec::new(),
        }
    }

    /// 由表头与行文本直接构造（行号自 2 起编）
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut dataset = Self::new(headers.into_iter().map(Into::into).collect());
        for (idx, row) in rows.into_iter().enumerate() {
            let values = row.into_iter().map(Into::into).collect();
            dataset.push(RawRecord::new(idx + 2, values));
        }
        dataset
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<RawRecord>) {
        (self.headers, self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_numbers_rows_after_header() {
        let dataset = RawDataset::from_rows(
            ["Ship To State", "Total Tax Amount"],
            vec![vec!["Haryana", "18"], vec!["Delhi", "5"]],
        );

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].row_number(), 2);
        assert_eq!(dataset.records()[1].get(0), Some("Delhi"));
        assert_eq!(dataset.records()[1].get(5), None);
    }

    #[test]
    fn test_blank_row_detection() {
        assert!(RawRecord::new(2, vec!["  ".into(), "".into()]).is_blank());
        assert!(!RawRecord::new(2, vec!["".into(), "x".into()]).is_blank());
    }
}
