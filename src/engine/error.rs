// ==========================================
// EMAGE 关联加载器 - 运行级错误类型
// ==========================================
// 分类:
// 1. 致命配置错误（ConfigError）: 对账开始前中止
// 2. 致命输入错误（ImportError / MalformedAccId）: 立即中止
// 3. 数据差异: 不是错误,见 ReconciliationResult
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::output::OutputError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 运行级错误类型（任一变体均以退出码 1 结束进程）
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Output(#[from] OutputError),

    // ===== 数据完整性错误 =====
    #[error("Invalid EMAGE ID (line {line}): \"{acc_id}\" 不符合 前缀+数字 格式")]
    MalformedAccId { acc_id: String, line: usize },

    #[error("暂存表装载行数不一致: 期望 {expected}，实际 {actual}")]
    StagingMismatch { expected: usize, actual: usize },
}

impl LoadError {
    /// 是否属于配置类错误（对账开始前即失败）
    pub fn is_configuration(&self) -> bool {
        matches!(self, LoadError::Config(_))
    }
}

/// Result 类型别名
pub type LoadResult<T> = Result<T, LoadError>;
