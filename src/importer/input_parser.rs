// ==========================================
// EMAGE 关联加载器 - 输入文件解析器
// ==========================================
// 输入列: 1) EMAGE ID  2) 图/面板标签  3) 检测 MGI ID
// 规则: 每个物理行恰好三列且均非空,否则报告行号并中止
// 说明: 空行同样是非法行（不跳过）;文件末尾的换行符不构成新行
// ==========================================

use crate::domain::CandidateRecord;
use crate::importer::candidate_source::CandidateSource;
use crate::importer::error::{ImportError, ImportResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// 每行字段数
pub const INPUT_FIELD_COUNT: usize = 3;

/// 字段分隔符
pub const FIELD_DELIMITER: char = '\t';

const FIELD_NAMES: [&str; INPUT_FIELD_COUNT] = ["EMAGE ID", "figure/pane label", "MGI ID"];

// ==========================================
// TabDelimitedParser 实现
// ==========================================
pub struct TabDelimitedParser;

impl TabDelimitedParser {
    /// 从任意 Reader 解析候选记录
    ///
    /// 按物理行读取（LF 或 CRLF 结尾）,不处理引号
    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<Vec<CandidateRecord>> {
        let mut candidates = Vec::new();

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line_number = idx + 1;
            candidates.push(Self::parse_line(&line?, line_number)?);
        }

        debug!(count = candidates.len(), "输入解析完成");
        Ok(candidates)
    }

    /// 解析单行
    fn parse_line(line: &str, line_number: usize) -> ImportResult<CandidateRecord> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

        if fields.len() != INPUT_FIELD_COUNT {
            return Err(ImportError::InvalidRecord {
                line: line_number,
                reason: format!("期望 {} 列，实际 {} 列", INPUT_FIELD_COUNT, fields.len()),
            });
        }

        if let Some(empty_idx) = fields.iter().position(|field| field.is_empty()) {
            return Err(ImportError::InvalidRecord {
                line: line_number,
                reason: format!("{} 为空", FIELD_NAMES[empty_idx]),
            });
        }

        Ok(CandidateRecord::new(fields[0], fields[1], fields[2], line_number))
    }
}

impl CandidateSource for TabDelimitedParser {
    fn read_candidates(&self, file_path: &Path) -> ImportResult<Vec<CandidateRecord>> {
        let file = File::open(file_path)
            .map_err(|_| ImportError::FileNotFound(file_path.display().to_string()))?;
        let candidates = self.parse_reader(file)?;

        info!(
            file_path = %file_path.display(),
            count = candidates.len(),
            "读取输入文件"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_valid_lines_preserves_order() {
        let input = "EMAGE:3\t1A\tMGI:300\nEMAGE:1\tFig 2\tMGI:100\n";
        let records = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], CandidateRecord::new("EMAGE:3", "1A", "MGI:300", 1));
        assert_eq!(records[1], CandidateRecord::new("EMAGE:1", "Fig 2", "MGI:100", 2));
    }

    #[test]
    fn test_missing_field_reports_line_number() {
        let input = "EMAGE:1\t1A\tMGI:100\nEMAGE:2\t1B\n";
        let err = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap_err();

        match err {
            ImportError::InvalidRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("期望 InvalidRecord，实际 {:?}", other),
        }
    }

    #[test]
    fn test_empty_field_reports_line_number() {
        let input = "EMAGE:1\t1A\tMGI:100\nEMAGE:2\t1B\tMGI:100\nEMAGE:3\t\tMGI:100\n";
        let err = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap_err();

        assert!(matches!(err, ImportError::InvalidRecord { line: 3, .. }));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_extra_field_rejected() {
        let input = "EMAGE:1\t1A\tMGI:100\t\n";
        let err = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRecord { line: 1, .. }));
    }

    #[test]
    fn test_blank_middle_line_is_fatal() {
        let input = "EMAGE:1\t1A\tMGI:100\n\nEMAGE:2\t1B\tMGI:100\n";
        let err = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap_err();

        match err {
            ImportError::InvalidRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("实际 1 列"));
            }
            other => panic!("期望 InvalidRecord，实际 {:?}", other),
        }
    }

    #[test]
    fn test_trailing_blank_line_is_fatal() {
        let input = "EMAGE:1\t1A\tMGI:100\r\n\r\n";
        let err = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_final_line_without_newline() {
        let input = "EMAGE:1\t1A\tMGI:100\nEMAGE:2\t1B\tMGI:100";
        let records = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line_number, 2);
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let input: &[u8] = b"EMAGE:1\t\xff\xfe\tMGI:100\n";
        let err = TabDelimitedParser.parse_reader(input).unwrap_err();
        assert!(matches!(err, ImportError::FileReadError(_)));
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        let records = TabDelimitedParser.parse_reader("".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_crlf_and_trailing_label_whitespace_kept() {
        let input = "EMAGE:1\t1A  \tMGI:100\r\n";
        let records = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap();

        assert_eq!(records[0].composite_label, "1A  ");
        assert_eq!(records[0].parent_mgi_id, "MGI:100");
    }

    #[test]
    fn test_quotes_are_literal() {
        let input = "EMAGE:1\t\"1A\"\tMGI:100\n";
        let records = TabDelimitedParser.parse_reader(input.as_bytes()).unwrap();
        assert_eq!(records[0].composite_label, "\"1A\"");
    }

    #[test]
    fn test_read_candidates_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "EMAGE:1\t1A\tMGI:100").unwrap();

        let records = TabDelimitedParser.read_candidates(temp_file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_read_candidates_file_not_found() {
        let result = TabDelimitedParser.read_candidates(Path::new("non_existent.txt"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
