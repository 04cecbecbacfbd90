// ==========================================
// EMAGE 关联加载器 - 关联记录构建器
// ==========================================
// 职责: 为每个已接受的匹配分配 accession 键并生成关联记录
// 红线: 键连续递增,无间隔、无复用
// 红线: EMAGE ID 不符合 前缀+数字 格式 → 整个运行中止（不是差异）
// ==========================================

use crate::config::ConfigError;
use crate::domain::{AccIdParts, AssociationRecord, PREFERRED, PRIVATE};
use crate::engine::error::{LoadError, LoadResult};
use crate::engine::match_engine::MatchedAssociation;
use crate::engine::reference_resolver::RunContext;
use tracing::info;

pub struct AssociationBuilder;

impl AssociationBuilder {
    /// 构建关联记录
    ///
    /// 先校验全部 EMAGE ID 再分配键：任一 ID 非法时计数器保持不变
    ///
    /// # 参数
    /// - matches: 匹配引擎输出（已排序、已去重）
    /// - ctx: 运行上下文（计数器在此推进）
    pub fn build(
        matches: &[MatchedAssociation],
        ctx: &mut RunContext,
    ) -> LoadResult<Vec<AssociationRecord>> {
        let parts = matches
            .iter()
            .map(|m| {
                AccIdParts::parse(&m.external_id).ok_or_else(|| LoadError::MalformedAccId {
                    acc_id: m.external_id.clone(),
                    line: m.line_number,
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        if !ctx.accession.can_allocate(matches.len()) {
            return Err(ConfigError::NextAccessionKey(format!(
                "{} keys requested from {}",
                matches.len(),
                ctx.accession.next_value()
            ))
            .into());
        }

        let keys = ctx.keys;
        let records: Vec<AssociationRecord> = matches
            .iter()
            .zip(parts)
            .map(|(m, acc_parts)| AssociationRecord {
                accession_key: ctx.accession.allocate(),
                acc_id: m.external_id.clone(),
                prefix_part: acc_parts.prefix_part,
                numeric_part: acc_parts.numeric_part,
                logical_db_key: keys.logical_db_key,
                object_key: m.image_pane_key,
                mgi_type_key: keys.mgi_type_key,
                private: PRIVATE,
                preferred: PREFERRED,
                created_by_key: keys.created_by_key,
                modified_by_key: keys.created_by_key,
                creation_date: ctx.load_date.clone(),
                modification_date: ctx.load_date.clone(),
            })
            .collect();

        info!(
            associations = records.len(),
            next_accession_key = ctx.accession.next_value(),
            "关联记录构建完成"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReferenceKeys;
    use crate::engine::reference_resolver::AccessionKeyCounter;

    fn context(max_key: Option<i64>) -> RunContext {
        RunContext {
            keys: ReferenceKeys {
                logical_db_key: 80,
                mgi_type_key: 35,
                parent_mgi_type_key: 8,
                created_by_key: 1400,
            },
            accession: AccessionKeyCounter::seeded_from(max_key).unwrap(),
            load_date: "07/07/2008".to_string(),
            report_timestamp: "07/07/2008 14:05".to_string(),
        }
    }

    fn matched(id: &str, pane_key: i64, line: usize) -> MatchedAssociation {
        MatchedAssociation {
            external_id: id.to_string(),
            parent_mgi_id: "MGI:100".to_string(),
            composite_label: "1A".to_string(),
            image_pane_key: pane_key,
            line_number: line,
        }
    }

    #[test]
    fn test_keys_are_consecutive_from_seed() {
        let mut ctx = context(Some(1000));
        let matches = vec![
            matched("EMAGE:1", 11, 1),
            matched("EMAGE:1", 12, 1),
            matched("EMAGE:2", 13, 2),
        ];

        let records = AssociationBuilder::build(&matches, &mut ctx).unwrap();

        let keys: Vec<i64> = records.iter().map(|r| r.accession_key).collect();
        assert_eq!(keys, vec![1001, 1002, 1003]);
        assert_eq!(ctx.accession.next_value(), 1001 + records.len() as i64);
    }

    #[test]
    fn test_record_fields() {
        let mut ctx = context(None);
        let records = AssociationBuilder::build(&[matched("EMAGE:1234", 77, 1)], &mut ctx).unwrap();

        let record = &records[0];
        assert_eq!(record.accession_key, 1);
        assert_eq!(record.prefix_part, "EMAGE:");
        assert_eq!(record.numeric_part, 1234);
        assert_eq!(record.object_key, 77);
        assert_eq!(record.mgi_type_key, 35);
        assert_eq!(record.logical_db_key, 80);
        assert_eq!(record.created_by_key, record.modified_by_key);
        assert_eq!(record.private, PRIVATE);
        assert_eq!(record.preferred, PREFERRED);
        assert_eq!(record.creation_date, "07/07/2008");
    }

    #[test]
    fn test_malformed_id_aborts_without_advancing_counter() {
        let mut ctx = context(Some(10));
        let matches = vec![matched("EMAGE:1", 11, 1), matched("EMAGE:7x", 12, 4)];

        let err = AssociationBuilder::build(&matches, &mut ctx).unwrap_err();

        assert!(matches!(err, LoadError::MalformedAccId { line: 4, .. }));
        assert_eq!(ctx.accession.next_value(), 11);
    }

    #[test]
    fn test_no_matches_no_records() {
        let mut ctx = context(Some(10));
        let records = AssociationBuilder::build(&[], &mut ctx).unwrap();

        assert!(records.is_empty());
        assert_eq!(ctx.accession.allocated(), 0);
    }

    #[test]
    fn test_key_space_exhaustion_aborts_without_advancing_counter() {
        let mut ctx = context(Some(i64::MAX - 2));
        let matches = vec![matched("EMAGE:1", 11, 1), matched("EMAGE:2", 12, 2)];

        let err = AssociationBuilder::build(&matches, &mut ctx).unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(ctx.accession.next_value(), i64::MAX - 1);
    }
}
