// ==========================================
// EMAGE 关联加载器 - 装载文件写出
// ==========================================
// 暂存文件: EMAGE ID \t 标签 \t MGI ID
// 关联文件: AssociationRecord 字段顺序（见 domain::association）
// ==========================================

use crate::domain::{AssociationRecord, CandidateRecord};
use crate::output::error::{OutputError, OutputResult};
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;
use tracing::info;

fn open_tab_writer(path: &Path) -> OutputResult<Writer<File>> {
    let file = File::create(path).map_err(|e| OutputError::CreateError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(file))
}

fn write_error(path: &Path) -> impl Fn(csv::Error) -> OutputError + '_ {
    move |e| OutputError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// 写出暂存文件（供批量装载）
pub fn write_staging_file(path: &Path, candidates: &[CandidateRecord]) -> OutputResult<usize> {
    let mut writer = open_tab_writer(path)?;

    for candidate in candidates {
        writer
            .write_record([
                candidate.external_id.as_str(),
                candidate.composite_label.as_str(),
                candidate.parent_mgi_id.as_str(),
            ])
            .map_err(write_error(path))?;
    }
    writer.flush().map_err(|e| OutputError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(candidates.len())
}

/// 写出 ACC_Accession 装载文件
pub fn write_association_file(path: &Path, records: &[AssociationRecord]) -> OutputResult<usize> {
    let mut writer = open_tab_writer(path)?;

    for record in records {
        writer
            .write_record(record.to_fields())
            .map_err(write_error(path))?;
    }
    writer.flush().map_err(|e| OutputError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    info!(path = %path.display(), records = records.len(), "关联装载文件已写出");
    Ok(records.len())
}
