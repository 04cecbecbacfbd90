// ==========================================
// EMAGE 关联加载器 - 输出层
// ==========================================
// 职责: 暂存文件、ACC_Accession 装载文件、差异报告、运行摘要的写出
// 格式: 装载文件为 TAB 分隔,无表头,无引号
// ==========================================

pub mod bcp_writer;
pub mod error;
pub mod report_writer;

pub use bcp_writer::{write_association_file, write_staging_file};
pub use error::{OutputError, OutputResult};
pub use report_writer::{write_json_summary, write_text_report};
