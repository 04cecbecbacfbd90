// ==========================================
// EMAGE 关联加载器 - 参照键解析器
// ==========================================
// 职责: 每次运行解析一次逻辑库键、类型键、操作员键与 accession 起始键
// 红线: 每项查询必须恰好返回一行,否则整个运行中止（无部分输出）
// 输出: RunContext（后续阶段以引用方式使用）
// ==========================================

use crate::config::{ConfigError, LoadConfig};
use crate::domain::ReferenceKeys;
use crate::engine::error::LoadResult;
use crate::repository::ReferenceRepository;
use chrono::NaiveDateTime;
use tracing::{info, instrument};

/// 关联记录日期格式
pub const LOAD_DATE_FORMAT: &str = "%m/%d/%Y";

/// 报告时间戳格式
pub const REPORT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

// ==========================================
// ReferenceNames - 待解析的参照名称
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceNames {
    pub logical_db: String,
    pub mgi_type: String,
    pub parent_mgi_type: String,
    pub created_by: String,
}

impl From<&LoadConfig> for ReferenceNames {
    fn from(config: &LoadConfig) -> Self {
        Self {
            logical_db: config.logical_db.clone(),
            mgi_type: config.mgi_type.clone(),
            parent_mgi_type: config.parent_mgi_type.clone(),
            created_by: config.created_by.clone(),
        }
    }
}

// ==========================================
// AccessionKeyCounter - accession 键计数器
// ==========================================
// 单调递增,每次分配 +1,不回退、不复用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessionKeyCounter {
    first: i64,
    next: i64,
}

impl AccessionKeyCounter {
    /// 由当前最大键初始化（表为空时从 1 开始）
    ///
    /// # 返回
    /// - Err(ConfigError::NextAccessionKey): 最大键已到 i64 上限
    pub fn seeded_from(max_existing: Option<i64>) -> Result<Self, ConfigError> {
        let first = match max_existing {
            Some(max_key) => max_key.checked_add(1).ok_or_else(|| {
                ConfigError::NextAccessionKey(format!("current maximum key {} cannot be incremented", max_key))
            })?,
            None => 1,
        };
        Ok(Self { first, next: first })
    }

    /// 剩余可分配数量是否足够
    pub fn can_allocate(&self, count: usize) -> bool {
        i64::try_from(count)
            .ok()
            .and_then(|n| self.next.checked_add(n))
            .is_some()
    }

    /// 分配下一个键
    pub fn allocate(&mut self) -> i64 {
        let key = self.next;
        self.next += 1;
        key
    }

    pub fn first_value(&self) -> i64 {
        self.first
    }

    /// 下一个待分配的键（= 起始值 + 已分配数）
    pub fn next_value(&self) -> i64 {
        self.next
    }

    pub fn allocated(&self) -> usize {
        (self.next - self.first) as usize
    }
}

// ==========================================
// RunContext - 单次运行上下文
// ==========================================
#[derive(Debug, Clone)]
pub struct RunContext {
    pub keys: ReferenceKeys,
    pub accession: AccessionKeyCounter,
    pub load_date: String,        // 关联记录的 creation/modification 日期
    pub report_timestamp: String, // 差异报告生成时间
}

// ==========================================
// ReferenceResolver - 参照键解析器
// ==========================================
pub struct ReferenceResolver<'a, R: ReferenceRepository> {
    repo: &'a R,
}

impl<'a, R: ReferenceRepository> ReferenceResolver<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// 解析全部参照键并构造 RunContext
    ///
    /// # 参数
    /// - names: 参照名称
    /// - now: 运行时刻（决定装载日期与报告时间戳）
    ///
    /// # 返回
    /// - Err(LoadError::Config): 任一名称未解析到恰好一行
    /// - Err(LoadError::Repository): 查询失败
    #[instrument(skip(self, names), fields(logical_db = %names.logical_db))]
    pub fn resolve(&self, names: &ReferenceNames, now: NaiveDateTime) -> LoadResult<RunContext> {
        let max_key = self.repo.max_accession_key().map_err(|e| {
            ConfigError::NextAccessionKey(e.to_string())
        })?;
        let accession = AccessionKeyCounter::seeded_from(max_key)?;

        let logical_db_key = exactly_one(
            "Logical DB",
            &names.logical_db,
            self.repo.find_logical_db_keys(&names.logical_db)?,
        )?;
        let mgi_type_key = exactly_one(
            "MGI Type",
            &names.mgi_type,
            self.repo.find_mgi_type_keys(&names.mgi_type)?,
        )?;
        let parent_mgi_type_key = exactly_one(
            "MGI Type",
            &names.parent_mgi_type,
            self.repo.find_mgi_type_keys(&names.parent_mgi_type)?,
        )?;
        let created_by_key = exactly_one(
            "User",
            &names.created_by,
            self.repo.find_user_keys(&names.created_by)?,
        )?;

        let keys = ReferenceKeys {
            logical_db_key,
            mgi_type_key,
            parent_mgi_type_key,
            created_by_key,
        };

        info!(
            logical_db_key,
            mgi_type_key,
            parent_mgi_type_key,
            created_by_key,
            first_accession_key = accession.first_value(),
            "参照键解析完成"
        );

        Ok(RunContext {
            keys,
            accession,
            load_date: now.format(LOAD_DATE_FORMAT).to_string(),
            report_timestamp: now.format(REPORT_TIMESTAMP_FORMAT).to_string(),
        })
    }
}

fn exactly_one(what: &str, name: &str, rows: Vec<i64>) -> Result<i64, ConfigError> {
    match rows.as_slice() {
        [key] => Ok(*key),
        _ => Err(ConfigError::UnresolvedReference {
            what: what.to_string(),
            name: name.to_string(),
            rows: rows.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::LoadError;
    use crate::repository::RepositoryResult;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeReferenceRepo {
        logical_dbs: HashMap<String, Vec<i64>>,
        mgi_types: HashMap<String, Vec<i64>>,
        users: HashMap<String, Vec<i64>>,
        max_accession: Option<i64>,
    }

    impl ReferenceRepository for FakeReferenceRepo {
        fn find_logical_db_keys(&self, name: &str) -> RepositoryResult<Vec<i64>> {
            Ok(self.logical_dbs.get(name).cloned().unwrap_or_default())
        }

        fn find_mgi_type_keys(&self, name: &str) -> RepositoryResult<Vec<i64>> {
            Ok(self.mgi_types.get(name).cloned().unwrap_or_default())
        }

        fn find_user_keys(&self, name: &str) -> RepositoryResult<Vec<i64>> {
            Ok(self.users.get(name).cloned().unwrap_or_default())
        }

        fn max_accession_key(&self) -> RepositoryResult<Option<i64>> {
            Ok(self.max_accession)
        }
    }

    fn seeded_repo() -> FakeReferenceRepo {
        FakeReferenceRepo {
            logical_dbs: HashMap::from([("EMAGE".to_string(), vec![80])]),
            mgi_types: HashMap::from([
                ("Image Pane".to_string(), vec![35]),
                ("GXD Assay".to_string(), vec![8]),
            ]),
            users: HashMap::from([("emageload".to_string(), vec![1400])]),
            max_accession: Some(5000),
        }
    }

    fn names() -> ReferenceNames {
        ReferenceNames {
            logical_db: "EMAGE".to_string(),
            mgi_type: "Image Pane".to_string(),
            parent_mgi_type: "GXD Assay".to_string(),
            created_by: "emageload".to_string(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2008, 7, 7)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_resolve_all_keys() {
        let repo = seeded_repo();
        let ctx = ReferenceResolver::new(&repo).resolve(&names(), now()).unwrap();

        assert_eq!(
            ctx.keys,
            ReferenceKeys {
                logical_db_key: 80,
                mgi_type_key: 35,
                parent_mgi_type_key: 8,
                created_by_key: 1400,
            }
        );
        assert_eq!(ctx.accession.first_value(), 5001);
        assert_eq!(ctx.load_date, "07/07/2008");
        assert_eq!(ctx.report_timestamp, "07/07/2008 14:05");
    }

    #[test]
    fn test_empty_accession_table_starts_at_one() {
        let mut repo = seeded_repo();
        repo.max_accession = None;

        let ctx = ReferenceResolver::new(&repo).resolve(&names(), now()).unwrap();
        assert_eq!(ctx.accession.first_value(), 1);
    }

    #[test]
    fn test_missing_logical_db_is_configuration_error() {
        let mut repo = seeded_repo();
        repo.logical_dbs.clear();

        let err = ReferenceResolver::new(&repo).resolve(&names(), now()).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::UnresolvedReference { rows: 0, .. })
        ));
    }

    #[test]
    fn test_ambiguous_user_is_configuration_error() {
        let mut repo = seeded_repo();
        repo.users.insert("emageload".to_string(), vec![1400, 1401]);

        let err = ReferenceResolver::new(&repo).resolve(&names(), now()).unwrap_err();
        match err {
            LoadError::Config(ConfigError::UnresolvedReference { what, rows, .. }) => {
                assert_eq!(what, "User");
                assert_eq!(rows, 2);
            }
            other => panic!("期望 UnresolvedReference，实际 {:?}", other),
        }
    }

    #[test]
    fn test_counter_allocates_sequentially() {
        let mut counter = AccessionKeyCounter::seeded_from(Some(9)).unwrap();
        assert_eq!(counter.allocate(), 10);
        assert_eq!(counter.allocate(), 11);
        assert_eq!(counter.next_value(), 12);
        assert_eq!(counter.allocated(), 2);
    }

    #[test]
    fn test_counter_seed_at_key_limit_is_rejected() {
        let err = AccessionKeyCounter::seeded_from(Some(i64::MAX)).unwrap_err();
        assert!(matches!(err, ConfigError::NextAccessionKey(_)));

        let mut repo = seeded_repo();
        repo.max_accession = Some(i64::MAX);
        let err = ReferenceResolver::new(&repo).resolve(&names(), now()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_counter_capacity_near_key_limit() {
        let counter = AccessionKeyCounter::seeded_from(Some(i64::MAX - 3)).unwrap();
        assert!(counter.can_allocate(2));
        assert!(!counter.can_allocate(3));
    }
}
