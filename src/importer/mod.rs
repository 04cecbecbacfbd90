// ==========================================
// EMAGE 关联加载器 - 导入层
// ==========================================
// 职责: 读取外部 EMAGE 列表,生成候选记录
// 格式: TAB 分隔,无表头,每行三列
// ==========================================

pub mod candidate_source;
pub mod error;
pub mod input_parser;

// 重导出核心类型
pub use candidate_source::CandidateSource;
pub use error::{ImportError, ImportResult};
pub use input_parser::{TabDelimitedParser, INPUT_FIELD_COUNT};
