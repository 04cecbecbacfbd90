// ==========================================
// EMAGE 关联加载器 - 配置错误类型
// ==========================================
// 分类: 致命配置错误（对账开始前即中止运行）
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 配置装配错误 =====
    #[error("缺少必需配置项: {0}")]
    MissingSetting(String),

    #[error("配置项取值非法 (key: {key}, value: {value}): {message}")]
    InvalidSetting {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置文件读取失败 ({path}): {message}")]
    ConfigFileError { path: String, message: String },

    // ===== 参照键解析错误 =====
    #[error("Cannot determine the {what} key for \"{name}\" (查询返回 {rows} 行，期望 1 行)")]
    UnresolvedReference {
        what: String,
        name: String,
        rows: usize,
    },

    #[error("Cannot determine the next Accession key: {0}")]
    NextAccessionKey(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
