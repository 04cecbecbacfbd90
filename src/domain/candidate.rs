// ==========================================
// EMAGE 关联加载器 - 候选记录
// ==========================================
// 来源: 输入文件一行（EMAGE ID / 图/面板标签 / 检测 MGI ID）
// 红线: 创建后不可变,三个文本字段均非空
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CandidateRecord - 候选记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub external_id: String,     // EMAGE ID（如 EMAGE:1234）
    pub composite_label: String, // 图标签 + 面板标签（如 1A）
    pub parent_mgi_id: String,   // 检测（assay）的 MGI ID
    pub line_number: usize,      // 源文件行号（1 起）
}

impl CandidateRecord {
    pub fn new(
        external_id: impl Into<String>,
        composite_label: impl Into<String>,
        parent_mgi_id: impl Into<String>,
        line_number: usize,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            composite_label: composite_label.into(),
            parent_mgi_id: parent_mgi_id.into(),
            line_number,
        }
    }

    /// 参与比对的标签（去除尾部空白）
    pub fn match_label(&self) -> &str {
        self.composite_label.trim_end()
    }
}
