// ==========================================
// GSTR-1 汇总工具 - 导入层 Trait
// ==========================================
// 职责: 定义文件解析接口（不包含实现）
// ==========================================

use crate::domain::dataset::RawDataset;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 上传文件 → 原始数据集
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始数据集
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(RawDataset): 表头 + 行（已跳过完全空白行，单元格已去首尾空白）
    /// - Err: 文件读取错误、格式错误
    fn parse_dataset(&self, file_path: &Path) -> ImportResult<RawDataset>;
}
