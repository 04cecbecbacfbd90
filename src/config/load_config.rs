// ==========================================
// EMAGE 关联加载器 - 加载配置
// ==========================================
// 来源（后者覆盖前者）:
// 1. JSON 配置文件（EMAGELOAD_CONFIG 或命令行第一个参数）
// 2. 环境变量
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod config_keys {
    pub const CONFIG_FILE: &str = "EMAGELOAD_CONFIG";
    pub const DB_PATH: &str = "EMAGELOAD_DBPATH";
    pub const INPUT_FILE: &str = "EMAGELOAD_INPUTFILE";
    pub const REPORT_FILE: &str = "EMAGELOAD_RPTFILE";
    pub const TEMP_BCP_FILE: &str = "EMAGELOAD_TEMP_BCPFILE";
    pub const ACC_BCP_FILE: &str = "EMAGELOAD_ACC_BCPFILE";
    pub const SUMMARY_FILE: &str = "EMAGELOAD_SUMMARY_FILE";
    pub const TEMP_TABLE: &str = "EMAGE_TEMP_TABLE";
    pub const LOGICAL_DB: &str = "EMAGE_LOGICAL_DB";
    pub const MGI_TYPE: &str = "EMAGE_MGITYPE";
    pub const PARENT_MGI_TYPE: &str = "EMAGE_PARENT_MGITYPE";
    pub const CREATED_BY: &str = "EMAGE_CREATED_BY";

    /// 父实体类型默认值（检测）
    pub const DEFAULT_PARENT_MGI_TYPE: &str = "GXD Assay";

    /// 暂存表默认名
    pub const DEFAULT_TEMP_TABLE: &str = "emage_staging";
}

// ==========================================
// LoadConfigFile - JSON 配置文件（全部可选）
// ==========================================
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfigFile {
    pub db_path: Option<String>,
    pub input_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub temp_bcp_file: Option<PathBuf>,
    pub acc_bcp_file: Option<PathBuf>,
    pub summary_file: Option<PathBuf>,
    pub temp_table: Option<String>,
    pub logical_db: Option<String>,
    pub mgi_type: Option<String>,
    pub parent_mgi_type: Option<String>,
    pub created_by: Option<String>,
}

impl LoadConfigFile {
    /// 读取 JSON 配置文件
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| ConfigError::ConfigFileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

// ==========================================
// LoadConfig - 已校验的运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    pub db_path: String,
    pub input_file: PathBuf,
    pub report_file: PathBuf,
    pub temp_bcp_file: PathBuf,
    pub acc_bcp_file: PathBuf,
    pub summary_file: Option<PathBuf>,
    pub temp_table: String,
    pub logical_db: String,       // 逻辑库名（如 EMAGE）
    pub mgi_type: String,         // 关联对象类型名（如 Image Pane）
    pub parent_mgi_type: String,  // 父实体类型名（如 GXD Assay）
    pub created_by: String,       // 操作员名
}

impl LoadConfig {
    /// 从进程环境装配配置
    ///
    /// # 参数
    /// - config_file: 显式指定的 JSON 配置文件（优先于 EMAGELOAD_CONFIG）
    pub fn from_env(config_file: Option<&Path>) -> ConfigResult<Self> {
        let lookup = |key: &str| std::env::var(key).ok();

        let file_path = config_file
            .map(Path::to_path_buf)
            .or_else(|| lookup(config_keys::CONFIG_FILE).map(PathBuf::from));

        let file = match file_path {
            Some(path) => LoadConfigFile::from_path(&path)?,
            None => LoadConfigFile::default(),
        };

        Self::from_sources(file, lookup)
    }

    /// 合并配置文件与键值来源（键值来源优先）
    ///
    /// 说明：lookup 抽象为闭包，测试无需修改进程环境
    pub fn from_sources<F>(file: LoadConfigFile, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, fallback: Option<String>| -> Option<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or(fallback)
        };
        let path = |key: &str, fallback: Option<PathBuf>| -> Option<PathBuf> {
            text(key, None).map(PathBuf::from).or(fallback)
        };
        let required = |key: &str, value: Option<String>| -> ConfigResult<String> {
            value.ok_or_else(|| ConfigError::MissingSetting(key.to_string()))
        };
        let required_path = |key: &str, value: Option<PathBuf>| -> ConfigResult<PathBuf> {
            value.ok_or_else(|| ConfigError::MissingSetting(key.to_string()))
        };

        let temp_table = text(config_keys::TEMP_TABLE, file.temp_table)
            .unwrap_or_else(|| config_keys::DEFAULT_TEMP_TABLE.to_string());
        validate_table_name(&temp_table)?;

        Ok(Self {
            db_path: required(config_keys::DB_PATH, text(config_keys::DB_PATH, file.db_path))?,
            input_file: required_path(
                config_keys::INPUT_FILE,
                path(config_keys::INPUT_FILE, file.input_file),
            )?,
            report_file: required_path(
                config_keys::REPORT_FILE,
                path(config_keys::REPORT_FILE, file.report_file),
            )?,
            temp_bcp_file: required_path(
                config_keys::TEMP_BCP_FILE,
                path(config_keys::TEMP_BCP_FILE, file.temp_bcp_file),
            )?,
            acc_bcp_file: required_path(
                config_keys::ACC_BCP_FILE,
                path(config_keys::ACC_BCP_FILE, file.acc_bcp_file),
            )?,
            summary_file: path(config_keys::SUMMARY_FILE, file.summary_file),
            temp_table,
            logical_db: required(
                config_keys::LOGICAL_DB,
                text(config_keys::LOGICAL_DB, file.logical_db),
            )?,
            mgi_type: required(config_keys::MGI_TYPE, text(config_keys::MGI_TYPE, file.mgi_type))?,
            parent_mgi_type: text(config_keys::PARENT_MGI_TYPE, file.parent_mgi_type)
                .unwrap_or_else(|| config_keys::DEFAULT_PARENT_MGI_TYPE.to_string()),
            created_by: required(
                config_keys::CREATED_BY,
                text(config_keys::CREATED_BY, file.created_by),
            )?,
        })
    }
}

/// 暂存表名只能是普通 SQL 标识符（表名无法参数化绑定）
fn validate_table_name(name: &str) -> ConfigResult<()> {
    let mut chars = name.chars();
    let valid_head = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    if valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ConfigError::InvalidSetting {
            key: config_keys::TEMP_TABLE.to_string(),
            value: name.to_string(),
            message: "表名只允许字母、数字和下划线，且不能以数字开头".to_string(),
        })
    }
}
