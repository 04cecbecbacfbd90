// ==========================================
// EMAGE 关联加载器 - 引擎层
// ==========================================
// 流程: 解析 → 参照键解析 → 暂存装载 → 匹配 → {差异报告, 关联构建} → 写出
// 红线: 单线程顺序执行;计数器只由 RunContext 持有
// ==========================================

pub mod association_builder;
pub mod discrepancy_report;
pub mod error;
pub mod load_pipeline;
pub mod match_engine;
pub mod reference_resolver;

// 重导出核心引擎
pub use association_builder::AssociationBuilder;
pub use discrepancy_report::DiscrepancyReport;
pub use error::{LoadError, LoadResult};
pub use load_pipeline::{EmageLoadPipeline, LoadSummary, SqliteLoadPipeline};
pub use match_engine::{CandidateOutcome, MatchEngine, MatchedAssociation, ReconciliationResult};
pub use reference_resolver::{AccessionKeyCounter, ReferenceNames, ReferenceResolver, RunContext};
