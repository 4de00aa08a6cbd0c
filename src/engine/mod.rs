// ==========================================
// GSTR-1 汇总工具 - 引擎层
// ==========================================
// 职责: 辖区规范化 / 税率推导 / 来源适配 / 聚合 / 编排
// 红线: 引擎不做文件 I/O 之外的副作用，所有数值规则集中在此层
// ==========================================

pub mod adapters;
pub mod aggregation;
pub mod error;
pub mod jurisdiction;
pub mod orchestrator;
pub mod tax_rate;

// 重导出核心引擎
pub use adapters::{adapter_for, PlatformRules, RateSource, ReversalHandling, SourceAdapter};
pub use aggregation::AggregationEngine;
pub use error::{PipelineError, SourceError};
pub use jurisdiction::JurisdictionNormalizer;
pub use orchestrator::{ReportOrchestrator, SourceInput, SourceUpload};
pub use tax_rate::{effective_rate, round2, RateKey, SlabSnapper, TaxSplit};
