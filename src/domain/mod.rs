// ==========================================
// EMAGE 关联加载器 - 领域模型层
// ==========================================
// 职责: 定义候选记录、子标签、关联记录、差异条目
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod association;
pub mod candidate;
pub mod discrepancy;
pub mod types;

// 重导出核心类型
pub use association::{AccIdParts, AssociationRecord, PREFERRED, PRIVATE};
pub use candidate::CandidateRecord;
pub use discrepancy::{DiscrepancyEntry, DiscrepancyKind};
pub use types::{ChildLabel, ReferenceKeys};
