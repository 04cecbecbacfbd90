// ==========================================
// EMAGE 关联加载器 - 参照键仓储
// ==========================================
// 职责: 查询 ACC_LogicalDB / ACC_MGIType / MGI_User / ACC_Accession
// 红线: 只返回原始行,"恰好一行"的判定在解析器中完成
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ReferenceRepository Trait
// ==========================================
// 实现者: SqliteReferenceRepository
pub trait ReferenceRepository {
    /// 按名称查询逻辑库键（可能 0 行或多行）
    fn find_logical_db_keys(&self, name: &str) -> RepositoryResult<Vec<i64>>;

    /// 按名称查询 MGI 类型键
    fn find_mgi_type_keys(&self, name: &str) -> RepositoryResult<Vec<i64>>;

    /// 按名称查询用户键
    fn find_user_keys(&self, name: &str) -> RepositoryResult<Vec<i64>>;

    /// 当前最大 accession 键（表为空时返回 None）
    fn max_accession_key(&self) -> RepositoryResult<Option<i64>>;
}

// ==========================================
// SqliteReferenceRepository
// ==========================================
pub struct SqliteReferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReferenceRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 执行单列键查询，返回全部命中行
    fn query_keys(&self, sql: &str, name: &str) -> RepositoryResult<Vec<i64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![name], |row| row.get::<_, i64>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl ReferenceRepository for SqliteReferenceRepository {
    fn find_logical_db_keys(&self, name: &str) -> RepositoryResult<Vec<i64>> {
        self.query_keys(
            "SELECT _LogicalDB_key FROM ACC_LogicalDB WHERE name = ?1 COLLATE NOCASE",
            name,
        )
    }

    fn find_mgi_type_keys(&self, name: &str) -> RepositoryResult<Vec<i64>> {
        self.query_keys(
            "SELECT _MGIType_key FROM ACC_MGIType WHERE name = ?1 COLLATE NOCASE",
            name,
        )
    }

    fn find_user_keys(&self, name: &str) -> RepositoryResult<Vec<i64>> {
        self.query_keys(
            "SELECT _User_key FROM MGI_User WHERE name = ?1 COLLATE NOCASE",
            name,
        )
    }

    fn max_accession_key(&self) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let max_key: Option<i64> =
            conn.query_row("SELECT MAX(_Accession_key) FROM ACC_Accession", [], |row| {
                row.get(0)
            })?;
        Ok(max_key)
    }
}
