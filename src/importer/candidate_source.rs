// ==========================================
// EMAGE 关联加载器 - 候选记录来源 Trait
// ==========================================
// 职责: 定义输入读取接口（不包含实现）
// ==========================================

use crate::domain::CandidateRecord;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// CandidateSource Trait
// ==========================================
// 用途: 输入文件 → 候选记录
// 实现者: TabDelimitedParser
pub trait CandidateSource {
    /// 读取全部候选记录
    ///
    /// # 参数
    /// - file_path: 输入文件路径
    ///
    /// # 返回
    /// - Ok(Vec<CandidateRecord>): 与输入顺序一致的候选记录
    /// - Err: 文件不可读,或任意一行结构非法（遇到第一处错误即返回）
    fn read_candidates(&self, file_path: &Path) -> ImportResult<Vec<CandidateRecord>>;
}
