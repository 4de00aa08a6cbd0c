// ==========================================
// GSTR-1 汇总工具 - API 层
// ==========================================
// 职责: 提供报表生成入口,供命令行外壳调用
// ==========================================

pub mod error;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use report_api::{ReportApi, ReportArtifact};
