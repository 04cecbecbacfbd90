// ==========================================
// EMAGE 关联加载器 - 导入模块错误类型
// ==========================================
// 分类: 致命输入错误（行结构非法即中止,不跳过）
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Cannot open input file: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 行结构错误 =====
    #[error("Invalid input record (line {line}): {reason}")]
    InvalidRecord { line: usize, reason: String },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
