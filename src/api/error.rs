// ==========================================
// GSTR-1 汇总工具 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，向外壳提供单一、可读的错误消息
// 红线: 来源错误保留平台名称；任何错误都不产出工作簿
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::PipelineError;
use crate::report::error::ReportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 来源处理 / 运行校验失败
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// 工作簿渲染 / 写出失败
    #[error(transparent)]
    Report(#[from] ReportError),

    /// 配置加载失败
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
