// ==========================================
// EMAGE 关联加载器 - 基础类型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ChildLabel - 检测下的图像面板标签
// ==========================================
// 对齐: IMG_Image.figureLabel + IMG_ImagePane.paneLabel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLabel {
    pub image_pane_key: i64,        // IMG_ImagePane._ImagePane_key（关联目标）
    pub figure_label: String,       // 图标签
    pub pane_label: Option<String>, // 面板标签（可能为空）
}

impl ChildLabel {
    /// 拼接后的标签（面板标签缺失按空串处理）
    pub fn concatenated(&self) -> String {
        let mut label = self.figure_label.clone();
        if let Some(pane) = &self.pane_label {
            label.push_str(pane);
        }
        label
    }
}

// ==========================================
// ReferenceKeys - 已解析的参照键
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceKeys {
    pub logical_db_key: i64,      // ACC_LogicalDB._LogicalDB_key
    pub mgi_type_key: i64,        // 关联对象类型（图像面板）
    pub parent_mgi_type_key: i64, // 父实体类型（检测）
    pub created_by_key: i64,      // MGI_User._User_key
}
