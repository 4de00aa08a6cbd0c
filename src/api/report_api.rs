// ==========================================
// GSTR-1 汇总工具 - 报表生成API
// ==========================================
// 职责: 上传文件 → 解析 → 编排 → 工作簿模型 → .xlsx 产物
// 红线: 任一步骤失败即整体失败，不返回部分产物
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ReportConfig};
use crate::domain::summary::ReportBundle;
use crate::engine::orchestrator::{ReportOrchestrator, SourceInput, SourceUpload};
use crate::importer::{FileParser, UniversalFileParser};
use crate::report::error::ReportError;
use crate::report::sheet::{build_workbook, ReportWorkbook};
use crate::report::xlsx_writer::{ReportEmitter, XlsxEmitter};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 输出文件扩展名
const OUTPUT_EXTENSION: &str = "xlsx";

/// 报表产物
#[derive(Debug, Clone, Serialize)]
pub struct ReportArtifact {
    /// 建议文件名 `GSTR1_Reports_<dd-mm-YYYY_HH-MM-SS>.xlsx`
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub workbook: ReportWorkbook,
    pub bundle: ReportBundle,
}

impl ReportArtifact {
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// 写出产物
    ///
    /// # 参数
    /// - output: 已存在的目录、以 .xlsx 结尾的文件路径，或待创建的目录
    ///
    /// # 返回
    /// 实际写出的文件路径
    pub fn write_to(&self, output: &Path) -> ApiResult<PathBuf> {
        let is_file_target = !output.is_dir()
            && output
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION))
                .unwrap_or(false);

        let target = if is_file_target {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(ReportError::from)?;
            }
            output.to_path_buf()
        } else {
            std::fs::create_dir_all(output).map_err(ReportError::from)?;
            output.join(&self.file_name)
        };

        std::fs::write(&target, &self.bytes).map_err(ReportError::from)?;
        info!(path = %target.display(), bytes = self.bytes.len(), "报表已写出");
        Ok(target)
    }
}

// ==========================================
// ReportApi - 报表生成API
// ==========================================
pub struct ReportApi {
    config: Arc<ReportConfig>,
    orchestrator: ReportOrchestrator,
    parser: Box<dyn FileParser>,
    emitter: Box<dyn ReportEmitter>,
}

impl ReportApi {
    /// 创建API实例（配置须已校验）
    pub fn new(config: ReportConfig) -> Self {
        let emitter = Box::new(XlsxEmitter::new(config.workbook.clone()));
        Self::with_components(config, Box::new(UniversalFileParser), emitter)
    }

    /// 按配置查找顺序加载配置后创建
    ///
    /// # 参数
    /// - config_path: 显式配置文件（None 时依次尝试环境变量、用户配置目录、内置默认值）
    ///
    /// # 返回
    /// - Err(ApiError::Config): 读取 / 解析 / 校验失败
    pub fn from_config_path(config_path: Option<&Path>) -> ApiResult<Self> {
        let config = ConfigManager::load(config_path)?;
        Ok(Self::new(config))
    }

    /// 自定义解析器 / 渲染器
    pub fn with_components(
        config: ReportConfig,
        parser: Box<dyn FileParser>,
        emitter: Box<dyn ReportEmitter>,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            orchestrator: ReportOrchestrator::new(config.clone()),
            config,
            parser,
            emitter,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// 由上传文件生成报表
    ///
    /// # 参数
    /// - uploads: 每个平台至多一个文件
    ///
    /// # 返回
    /// - Ok(ReportArtifact): 工作簿字节与汇总结果
    /// - Err(ApiError): 无输入 / 来源错误（带平台名称） / 渲染错误
    pub fn generate(&self, uploads: &[SourceUpload]) -> ApiResult<ReportArtifact> {
        let run_id = Uuid::new_v4();
        let bundle = self
            .orchestrator
            .run_uploads(run_id, uploads, self.parser.as_ref())?;
        self.render(bundle, Local::now())
    }

    /// 由内存数据集生成报表
    pub fn generate_from_datasets(&self, inputs: Vec<SourceInput>) -> ApiResult<ReportArtifact> {
        let bundle = self.orchestrator.run(inputs)?;
        self.render(bundle, Local::now())
    }

    fn render(&self, bundle: ReportBundle, generated_at: DateTime<Local>) -> ApiResult<ReportArtifact> {
        let workbook = build_workbook(&bundle, &self.config);
        if workbook.is_empty() {
            return Err(ApiError::InvalidInput(
                "no seller identities found in the uploaded reports".to_string(),
            ));
        }
        let bytes = self.emitter.emit(&workbook)?;

        info!(
            run_id = %bundle.run_id,
            sheets = workbook.len(),
            "工作簿生成完成"
        );

        Ok(ReportArtifact {
            file_name: Self::file_name(generated_at),
            bytes,
            workbook,
            bundle,
        })
    }

    /// 输出文件名
    pub fn file_name(generated_at: DateTime<Local>) -> String {
        format!(
            "GSTR1_Reports_{}.{}",
            generated_at.format("%d-%m-%Y_%H-%M-%S"),
            OUTPUT_EXTENSION
        )
    }
}
