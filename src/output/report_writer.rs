// ==========================================
// EMAGE 关联加载器 - 报告与摘要写出
// ==========================================

use crate::output::error::{OutputError, OutputResult};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// 写出文本报告（覆盖已有文件）
pub fn write_text_report(path: &Path, content: &str) -> OutputResult<()> {
    fs::write(path, content).map_err(|e| OutputError::CreateError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// 写出 JSON 格式的运行摘要
pub fn write_json_summary<T: Serialize>(path: &Path, summary: &T) -> OutputResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json + "\n").map_err(|e| OutputError::CreateError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
