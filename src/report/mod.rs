// ==========================================
// GSTR-1 汇总工具 - 报表层
// ==========================================
// 职责: 汇总结果 → 工作簿模型 → 受保护的 .xlsx 文件
// 红线: 只读汇总，不参与任何计算
// ==========================================

pub mod error;
pub mod sheet;
pub mod xlsx_writer;

pub use error::{ReportError, ReportResult};
pub use sheet::{
    build_workbook, CellValue, ReportWorkbook, SheetData, SheetKind, SheetNamer,
    COMBINED_BUCKET_SHEET, COMBINED_IDENTITY_SHEET,
};
pub use xlsx_writer::{ReportEmitter, XlsxEmitter};
