// ==========================================
// GSTR-1 汇总工具 - 引擎编排器
// ==========================================
// 职责: 上传来源 → 适配器 → 汇总收集 → 按需合并 → ReportBundle
// 红线: 同步、逐个来源处理完毕后再处理下一个；任一错误终止整次运行
// 红线: 来源错误一律以平台名称包装后上抛
// ==========================================

use crate::config::ReportConfig;
use crate::domain::dataset::RawDataset;
use crate::domain::platform::Platform;
use crate::domain::summary::{ReportBundle, SourceSummary};
use crate::engine::adapters::adapter_for;
use crate::engine::aggregation::AggregationEngine;
use crate::engine::error::{PipelineError, SourceError};
use crate::importer::FileParser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// 内存中的来源数据集
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub platform: Platform,
    pub dataset: RawDataset,
}

impl SourceInput {
    pub fn new(platform: Platform, dataset: RawDataset) -> Self {
        Self { platform, dataset }
    }
}

/// 磁盘上的来源文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUpload {
    pub platform: Platform,
    pub path: PathBuf,
}

impl SourceUpload {
    pub fn new(platform: Platform, path: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            path: path.into(),
        }
    }
}

// ==========================================
// ReportOrchestrator - 引擎编排器
// ==========================================
pub struct ReportOrchestrator {
    config: Arc<ReportConfig>,
    aggregation: AggregationEngine,
}

impl ReportOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - config: 已校验的报表配置
    pub fn new(config: Arc<ReportConfig>) -> Self {
        Self {
            config,
            aggregation: AggregationEngine::new(),
        }
    }

    /// 处理单个来源
    pub fn process_source(
        &self,
        platform: Platform,
        dataset: RawDataset,
    ) -> Result<Vec<SourceSummary>, PipelineError> {
        let rows = dataset.len();
        let summaries = adapter_for(platform, &self.config)
            .process(dataset)
            .map_err(|e| PipelineError::wrap(platform, e))?;

        info!(
            platform = %platform,
            rows,
            identities = summaries.len(),
            "来源处理完成"
        );
        Ok(summaries)
    }

    /// 组装结果：汇总数 > 1 时追加合并汇总
    pub fn assemble(&self, run_id: Uuid, sources: Vec<SourceSummary>) -> ReportBundle {
        let combined = if self.aggregation.needs_combination(&sources) {
            let combined = self.aggregation.combine(&sources);
            debug!(
                buckets = combined.buckets.len(),
                identities = combined.identities.len(),
                "已生成合并汇总"
            );
            Some(combined)
        } else {
            None
        };

        ReportBundle {
            run_id,
            sources,
            combined,
        }
    }

    /// 执行一次完整运行（内存数据集）
    pub fn run(&self, inputs: Vec<SourceInput>) -> Result<ReportBundle, PipelineError> {
        self.run_with_id(Uuid::new_v4(), inputs)
    }

    pub fn run_with_id(
        &self,
        run_id: Uuid,
        inputs: Vec<SourceInput>,
    ) -> Result<ReportBundle, PipelineError> {
        let items = inputs
            .into_iter()
            .map(|input| (input.platform, input.dataset))
            .collect();
        self.execute(run_id, items, Ok)
    }

    /// 执行一次完整运行（磁盘文件，逐个解析）
    pub fn run_uploads(
        &self,
        run_id: Uuid,
        uploads: &[SourceUpload],
        parser: &dyn FileParser,
    ) -> Result<ReportBundle, PipelineError> {
        let items = uploads
            .iter()
            .map(|upload| (upload.platform, upload.path.clone()))
            .collect();
        self.execute(run_id, items, |path| {
            parser.parse_dataset(&path).map_err(SourceError::from)
        })
    }

    /// 公共流程：校验来源 → 按平台顺序逐个加载并处理 → 组装
    fn execute<T, F>(
        &self,
        run_id: Uuid,
        mut items: Vec<(Platform, T)>,
        load: F,
    ) -> Result<ReportBundle, PipelineError>
    where
        F: Fn(T) -> Result<RawDataset, SourceError>,
    {
        let span = info_span!("report_run", run_id = %run_id);
        let _guard = span.enter();

        if items.is_empty() {
            return Err(PipelineError::NoInput);
        }
        let mut seen = BTreeSet::new();
        for (platform, _) in &items {
            if !seen.insert(*platform) {
                return Err(PipelineError::DuplicateSource(*platform));
            }
        }
        items.sort_by_key(|(platform, _)| *platform);

        info!(sources = items.len(), "开始生成 GSTR-1 汇总");

        let mut sources = Vec::new();
        for (platform, item) in items {
            let dataset = load(item).map_err(|e| PipelineError::wrap(platform, e))?;
            sources.extend(self.process_source(platform, dataset)?);
        }

        let bundle = self.assemble(run_id, sources);
        info!(
            identities = bundle.identity_count(),
            combined = bundle.combined.is_some(),
            "GSTR-1 汇总完成"
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator() -> ReportOrchestrator {
        ReportOrchestrator::new(Arc::new(ReportConfig::default()))
    }

    fn amazon_dataset() -> RawDataset {
        RawDataset::from_rows(
            [
                "Ship To State",
                "Tax Exclusive Gross",
                "Total Tax Amount",
                "IGST Tax",
                "CGST Tax",
                "SGST Tax",
            ],
            vec![vec!["Delhi", "100", "18", "18", "0", "0"]],
        )
    }

    fn shopify_dataset() -> RawDataset {
        RawDataset::from_rows(["Order Total", "State"], vec![vec!["118", "Delhi"]])
    }

    #[test]
    fn test_no_input() {
        let err = orchestrator().run(Vec::new()).unwrap_err();
        assert!(matches!(err, PipelineError::NoInput));
    }

    #[test]
    fn test_duplicate_platform_is_rejected() {
        let err = orchestrator()
            .run(vec![
                SourceInput::new(Platform::Amazon, amazon_dataset()),
                SourceInput::new(Platform::Amazon, amazon_dataset()),
            ])
            .unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateSource(Platform::Amazon)));
    }

    #[test]
    fn test_single_source_has_no_combined_summary() {
        let bundle = orchestrator()
            .run(vec![SourceInput::new(Platform::Amazon, amazon_dataset())])
            .unwrap();

        assert_eq!(bundle.identity_count(), 1);
        assert!(bundle.combined.is_none());
    }

    #[test]
    fn test_sources_processed_in_platform_order_and_combined() {
        let bundle = orchestrator()
            .run(vec![
                SourceInput::new(Platform::Shopify, shopify_dataset()),
                SourceInput::new(Platform::Amazon, amazon_dataset()),
            ])
            .unwrap();

        let platforms: Vec<_> = bundle.sources.iter().map(|s| s.platform).collect();
        assert_eq!(platforms, vec![Platform::Amazon, Platform::Shopify]);

        let combined = bundle.combined.unwrap();
        assert_eq!(combined.buckets.len(), 1);
        assert_eq!(combined.buckets[0].taxable_value, 200.0);
        assert_eq!(combined.identities.len(), 2);
    }

    #[test]
    fn test_source_error_is_wrapped_with_platform() {
        let broken = RawDataset::from_rows(["Order Total"], vec![vec!["118"]]);
        let err = orchestrator()
            .run(vec![
                SourceInput::new(Platform::Amazon, amazon_dataset()),
                SourceInput::new(Platform::Shopify, broken),
            ])
            .unwrap_err();

        assert_eq!(err.platform(), Some(Platform::Shopify));
        assert_eq!(
            err.to_string(),
            "Error processing Shopify file: Missing required columns: address state"
        );
    }
}
