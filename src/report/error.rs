// ==========================================
// GSTR-1 汇总工具 - 报表层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to render workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to write report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook has no sheets to write")]
    EmptyWorkbook,
}

pub type ReportResult<T> = Result<T, ReportError>;
