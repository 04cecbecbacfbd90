// ==========================================
// EMAGE 关联加载器 - 关联记录
// ==========================================
// 对齐: ACC_Accession 表装载文件（字段顺序即写出顺序）
// 红线: 每个接受的匹配生成一条,创建后不可变
// ==========================================

use serde::{Deserialize, Serialize};

/// private 标记（非公开）
pub const PRIVATE: i32 = 0;

/// preferred 标记（首选）
pub const PREFERRED: i32 = 1;

// ==========================================
// AccIdParts - 外部标识拆分结果
// ==========================================
// 规则: 前缀 = 最长的前导非数字串（非空）
//       后缀 = 剩余字符,必须全部为 ASCII 数字（非空）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccIdParts {
    pub prefix_part: String,
    pub numeric_part: u64,
}

impl AccIdParts {
    /// 拆分外部标识，不符合 `前缀+数字` 格式时返回 None
    ///
    /// # 示例
    /// ```
    /// use emage_load::domain::AccIdParts;
    /// let parts = AccIdParts::parse("EMAGE:1234").unwrap();
    /// assert_eq!(parts.prefix_part, "EMAGE:");
    /// assert_eq!(parts.numeric_part, 1234);
    /// ```
    pub fn parse(acc_id: &str) -> Option<Self> {
        let split_at = acc_id.find(|c: char| c.is_ascii_digit())?;
        let (prefix, digits) = acc_id.split_at(split_at);

        if prefix.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let numeric_part = digits.parse::<u64>().ok()?;
        Some(Self {
            prefix_part: prefix.to_string(),
            numeric_part,
        })
    }
}

// ==========================================
// AssociationRecord - 待装载的关联记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub accession_key: i64,        // _Accession_key（计数器分配）
    pub acc_id: String,            // accID（EMAGE ID）
    pub prefix_part: String,       // prefixPart
    pub numeric_part: u64,         // numericPart
    pub logical_db_key: i64,       // _LogicalDB_key
    pub object_key: i64,           // _Object_key（图像面板键）
    pub mgi_type_key: i64,         // _MGIType_key
    pub private: i32,              // private
    pub preferred: i32,            // preferred
    pub created_by_key: i64,       // _CreatedBy_key
    pub modified_by_key: i64,      // _ModifiedBy_key
    pub creation_date: String,     // creation_date
    pub modification_date: String, // modification_date
}

impl AssociationRecord {
    /// 按装载文件字段顺序输出
    pub fn to_fields(&self) -> [String; 13] {
        [
            self.accession_key.to_string(),
            self.acc_id.clone(),
            self.prefix_part.clone(),
            self.numeric_part.to_string(),
            self.logical_db_key.to_string(),
            self.object_key.to_string(),
            self.mgi_type_key.to_string(),
            self.private.to_string(),
            self.preferred.to_string(),
            self.created_by_key.to_string(),
            self.modified_by_key.to_string(),
            self.creation_date.clone(),
            self.modification_date.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_emage_id() {
        let parts = AccIdParts::parse("EMAGE:1234").unwrap();
        assert_eq!(parts.prefix_part, "EMAGE:");
        assert_eq!(parts.numeric_part, 1234);
        assert_eq!(
            format!("{}{}", parts.prefix_part, parts.numeric_part),
            "EMAGE:1234"
        );
    }

    #[test]
    fn test_parse_rejects_non_conforming_ids() {
        assert!(AccIdParts::parse("EMAGE:").is_none()); // 无数字
        assert!(AccIdParts::parse("1234").is_none()); // 无前缀
        assert!(AccIdParts::parse("EMAGE:12a4").is_none()); // 数字后夹杂字母
        assert!(AccIdParts::parse("").is_none());
        assert!(AccIdParts::parse("EMAGE:99999999999999999999999").is_none()); // 溢出
    }

    #[test]
    fn test_to_fields_order() {
        let record = AssociationRecord {
            accession_key: 1001,
            acc_id: "EMAGE:7".to_string(),
            prefix_part: "EMAGE:".to_string(),
            numeric_part: 7,
            logical_db_key: 80,
            object_key: 5,
            mgi_type_key: 35,
            private: PRIVATE,
            preferred: PREFERRED,
            created_by_key: 1400,
            modified_by_key: 1400,
            creation_date: "07/07/2008".to_string(),
            modification_date: "07/07/2008".to_string(),
        };

        assert_eq!(
            record.to_fields().join("\t"),
            "1001\tEMAGE:7\tEMAGE:\t7\t80\t5\t35\t0\t1\t1400\t1400\t07/07/2008\t07/07/2008"
        );
    }
}
