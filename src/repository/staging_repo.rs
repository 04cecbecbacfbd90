// ==========================================
// EMAGE 关联加载器 - 暂存表仓储
// ==========================================
// 职责: 将暂存文件（TAB 分隔）批量装入 TEMP 暂存表,并作为对账的候选来源
// 说明: TEMP 表只对当前连接可见,须与其他仓储共享连接
// 说明: lineNumber 为暂存文件行序号,与输入文件行号一致（输入不允许跳行）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::CandidateRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// StagingArea Trait
// ==========================================
// 用途: 批量装载设施（对账开始前执行）,对账读取已装载的行
// 实现者: SqliteStagingRepository
pub trait StagingArea {
    /// 清空暂存区并装入文件全部行
    ///
    /// # 返回
    /// - Ok(usize): 装入行数
    fn bulk_load(&self, file_path: &Path) -> RepositoryResult<usize>;

    /// 按行号顺序读取暂存区全部候选记录
    fn staged_candidates(&self) -> RepositoryResult<Vec<CandidateRecord>>;
}

// ==========================================
// SqliteStagingRepository
// ==========================================
pub struct SqliteStagingRepository {
    conn: Arc<Mutex<Connection>>,
    table_name: String,
}

impl SqliteStagingRepository {
    /// 创建暂存仓储
    ///
    /// # 参数
    /// - table_name: 暂存表名（调用方保证是合法标识符,见 LoadConfig 校验）
    pub fn new(db_path: &str, table_name: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)), table_name)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>, table_name: &str) -> RepositoryResult<Self> {
        let repo = Self {
            conn,
            table_name: table_name.to_string(),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保 TEMP 暂存表存在
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(&format!(
            r#"
            CREATE TEMP TABLE IF NOT EXISTS {table} (
              lineNumber INTEGER NOT NULL,
              emageID TEXT NOT NULL,
              label TEXT NOT NULL,
              mgiID TEXT NOT NULL
            );
            "#,
            table = self.table_name
        ))?;
        Ok(())
    }
}

impl StagingArea for SqliteStagingRepository {
    fn bulk_load(&self, file_path: &Path) -> RepositoryResult<usize> {
        let staging_file_error = |message: String| RepositoryError::StagingFileError {
            path: file_path.display().to_string(),
            message,
        };

        let file = File::open(file_path).map_err(|e| staging_file_error(e.to_string()))?;
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .from_reader(file);

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(&format!("DELETE FROM {}", self.table_name), [])?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (lineNumber, emageID, label, mgiID) VALUES (?1, ?2, ?3, ?4)",
                self.table_name
            ))?;

            for result in reader.records() {
                let record = result.map_err(|e| staging_file_error(e.to_string()))?;
                if record.len() != 3 {
                    return Err(staging_file_error(format!(
                        "第 {} 行列数为 {}",
                        count + 1,
                        record.len()
                    )));
                }
                count += 1;
                stmt.execute(params![count as i64, &record[0], &record[1], &record[2]])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(table = %self.table_name, rows = count, "暂存表装载完成");
        Ok(count)
    }

    fn staged_candidates(&self) -> RepositoryResult<Vec<CandidateRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT lineNumber, emageID, label, mgiID FROM {} ORDER BY lineNumber",
            self.table_name
        ))?;

        let candidates = stmt
            .query_map([], |row| {
                let line_number: i64 = row.get(0)?;
                Ok(CandidateRecord::new(
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    line_number as usize,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(candidates)
    }
}
