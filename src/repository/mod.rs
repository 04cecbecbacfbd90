// ==========================================
// EMAGE 关联加载器 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑（匹配规则在引擎层）
// 职责: 参照键查询、标签索引、暂存表批量装载
// 约束: 所有取值使用参数化查询
// ==========================================

pub mod error;
pub mod label_index_repo;
pub mod reference_repo;
pub mod staging_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use label_index_repo::{LabelIndex, SqliteLabelIndex};
pub use reference_repo::{ReferenceRepository, SqliteReferenceRepository};
pub use staging_repo::{SqliteStagingRepository, StagingArea};
