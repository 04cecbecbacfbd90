// ==========================================
// EMAGE 关联加载器 - 差异报告
// ==========================================
// 格式: 定宽文本
// 列宽: EMAGE ID 12 / Assay 12 / Figure/Pane Label 25 / Discrepancy 40
// 规则: 左对齐,列间两个空格;超长值不截断
// 说明: 报告仅供参考,不阻断关联记录生成
// ==========================================

use crate::domain::DiscrepancyEntry;
use serde::Serialize;

pub const REPORT_TITLE: &str = "EMAGE Discrepancy Report";

const COLUMN_HEADERS: [&str; 4] = ["EMAGE ID", "Assay", "Figure/Pane Label", "Discrepancy"];

// ==========================================
// DiscrepancyReport - 差异报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct DiscrepancyReport {
    pub generated_at: String,
    pub entries: Vec<DiscrepancyEntry>,
}

impl DiscrepancyReport {
    pub fn new(generated_at: impl Into<String>, entries: Vec<DiscrepancyEntry>) -> Self {
        Self {
            generated_at: generated_at.into(),
            entries,
        }
    }

    /// 渲染完整报告文本
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}{}\n", " ".repeat(25), REPORT_TITLE));
        out.push_str(&format!("{}({})\n\n", " ".repeat(24), self.generated_at));

        out.push_str(&format_row(
            COLUMN_HEADERS[0],
            COLUMN_HEADERS[1],
            COLUMN_HEADERS[2],
            COLUMN_HEADERS[3],
        ));
        out.push_str(&format!(
            "{}  {}  {}  {}\n",
            "-".repeat(12),
            "-".repeat(12),
            "-".repeat(25),
            "-".repeat(40)
        ));

        for entry in &self.entries {
            out.push_str(&format_row(
                &entry.external_id,
                &entry.parent_mgi_id,
                &entry.composite_label,
                entry.kind.message(),
            ));
        }

        out.push_str(&format!("\nNumber of discrepancies: {}\n", self.entries.len()));
        out
    }
}

fn format_row(emage_id: &str, assay: &str, label: &str, discrepancy: &str) -> String {
    format!(
        "{:<12}  {:<12}  {:<25}  {:<40}\n",
        emage_id, assay, label, discrepancy
    )
}
