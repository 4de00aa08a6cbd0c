// ==========================================
// GSTR-1 汇总工具 - 导入层
// ==========================================
// 职责: 上传文件 → 原始数据集 → 标准字段视图
// 支持: CSV, Excel (xlsx / xls / xlsm / xlsb / ods)
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod schema_mapper;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use schema_mapper::{
    ColumnPlan, FieldSpec, Requirement, ResolvedDataset, ResolvedRow, SchemaMap, SchemaMapper,
    SchemaValidationError,
};

// 重导出 Trait 接口
pub use importer_trait::FileParser;
