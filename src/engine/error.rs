// ==========================================
// GSTR-1 汇总工具 - 引擎层错误类型
// ==========================================
// 红线: 任一错误都终止整次运行，不输出部分结果
// 红线: 来源相关错误必须带上平台名称再上抛
// ==========================================

use crate::domain::platform::Platform;
use crate::importer::error::ImportError;
use crate::importer::schema_mapper::SchemaValidationError;
use thiserror::Error;

/// 单个来源（上传文件）处理错误
#[derive(Error, Debug)]
pub enum SourceError {
    /// 必填字段无法从表头解析
    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),

    /// 需要身份字段但缺失，且平台无默认身份
    #[error("Missing required columns: {field} (needed to split the report by seller GSTIN)")]
    IdentityResolution { field: String },

    /// 既无显式税率列也无税额列
    #[error("cannot determine tax rate: neither rate columns ({rate_columns}) nor tax amount columns ({amount_columns}) are present")]
    RateResolution {
        rate_columns: String,
        amount_columns: String,
    },

    /// 文件读取 / 解析失败
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// 整次运行错误
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Please upload at least one report file.")]
    NoInput,

    #[error("more than one {0} report was supplied; upload one file per platform")]
    DuplicateSource(Platform),

    #[error("Error processing {platform} file: {source}")]
    Source {
        platform: Platform,
        #[source]
        source: SourceError,
    },
}

impl PipelineError {
    /// 以平台名称包装来源错误
    pub fn wrap(platform: Platform, source: impl Into<SourceError>) -> Self {
        PipelineError::Source {
            platform,
            source: source.into(),
        }
    }

    /// 出错的平台（若有）
    pub fn platform(&self) -> Option<Platform> {
        match self {
            PipelineError::Source { platform, .. } | PipelineError::DuplicateSource(platform) => {
                Some(*platform)
            }
            PipelineError::NoInput => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_message_names_platform() {
        let err = PipelineError::wrap(
            Platform::Amazon,
            SchemaValidationError {
                missing: vec!["ship to state".to_string()],
            },
        );

        assert_eq!(
            err.to_string(),
            "Error processing Amazon file: Missing required columns: ship to state"
        );
        assert_eq!(err.platform(), Some(Platform::Amazon));
    }

    #[test]
    fn test_no_input_has_no_platform() {
        assert_eq!(PipelineError::NoInput.platform(), None);
    }
}
