// ==========================================
// GSTR-1 汇总工具 - 领域模型层
// ==========================================
// 职责: 平台、辖区、原始数据集、分类记录与汇总实体
// 红线: 不含文件访问逻辑,不含引擎规则
// 生命周期: 全部实体只存在于单次运行内，不做跨运行持久化
// ==========================================

pub mod dataset;
pub mod jurisdiction;
pub mod platform;
pub mod summary;

// 重导出核心类型
pub use dataset::{RawDataset, RawRecord};
pub use jurisdiction::Jurisdiction;
pub use platform::Platform;
pub use summary::{
    BucketSummary, ClassifiedRecord, CombinedSummary, IdentitySummary, ReportBundle,
    SourceSummary,
};
