// ==========================================
// GSTR-1 汇总工具 - 核心库
// ==========================================
// 职责: 电商销售报表（Amazon / Shopify / Flipkart）→ B2CS / TCS 申报工作簿
// 流程: 原始表 → 列名映射 → 来源适配 → 聚合 → 工作簿
// 定位: 单次批处理，无跨运行状态
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 文件解析与列名映射
pub mod importer;

// 引擎层 - 业务规则
pub mod engine;

// 报表层 - 工作簿模型与渲染
pub mod report;

// 配置层 - 报表配置
pub mod config;

// API 层 - 报表生成入口
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    BucketSummary, ClassifiedRecord, CombinedSummary, IdentitySummary, Jurisdiction, Platform,
    RawDataset, ReportBundle, SourceSummary,
};

// 引擎
pub use engine::{
    AggregationEngine, JurisdictionNormalizer, PipelineError, ReportOrchestrator, SourceError,
    SourceInput, SourceUpload,
};

// 配置
pub use config::{ConfigManager, ReportConfig};

// API
pub use api::{ApiError, ReportApi, ReportArtifact};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "GSTR-1 汇总工具";
