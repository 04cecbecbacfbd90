// ==========================================
// EMAGE 关联加载器 - 差异条目
// ==========================================
// 用途: 未能匹配的候选记录（仅进入差异报告,不中断运行）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 差异类型
///
/// 派生的 `Ord` 决定报告中的分组顺序：`NoParent` 在前
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiscrepancyKind {
    NoParent,
    NoMatchingLabel,
}

impl DiscrepancyKind {
    /// 报告中显示的说明文字
    pub fn message(&self) -> &'static str {
        match self {
            DiscrepancyKind::NoParent => {
                "parent identifier does not exist for the expected entity type"
            }
            DiscrepancyKind::NoMatchingLabel => {
                "no matching figure/pane label exists for the parent"
            }
        }
    }
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            DiscrepancyKind::NoParent => "NO_PARENT",
            DiscrepancyKind::NoMatchingLabel => "NO_MATCHING_LABEL",
        };
        write!(f, "{}", code)
    }
}

// ==========================================
// DiscrepancyEntry - 差异条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyEntry {
    pub external_id: String,
    pub parent_mgi_id: String,
    pub composite_label: String,
    pub kind: DiscrepancyKind,
}

impl DiscrepancyEntry {
    /// 报告排序键：类型 → EMAGE ID → MGI ID → 标签
    pub fn sort_key(&self) -> (DiscrepancyKind, &str, &str, &str) {
        (
            self.kind,
            self.external_id.as_str(),
            self.parent_mgi_id.as_str(),
            self.composite_label.as_str(),
        )
    }
}
