// ==========================================
// EMAGE 关联加载器 - 输出错误类型
// ==========================================

use thiserror::Error;

/// 输出错误类型
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Cannot open output file: {path} ({message})")]
    CreateError { path: String, message: String },

    #[error("输出写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    #[error("摘要序列化失败: {0}")]
    SerializeError(String),
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        OutputError::SerializeError(err.to_string())
    }
}

/// Result 类型别名
pub type OutputResult<T> = Result<T, OutputError>;
