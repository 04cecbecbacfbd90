// ==========================================
// EMAGE 关联加载器 - 标签索引仓储
// ==========================================
// 职责: 给定检测 MGI ID,判断其是否存在并返回其图像面板标签
// 关联路径: ACC_Accession → GXD_Specimen → GXD_InSituResult
//           → GXD_InSituResultImage → IMG_ImagePane → IMG_Image
// 注意: MGI ID 比较不区分大小写;标签比较留给引擎（区分大小写）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::ChildLabel;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// LabelIndex Trait
// ==========================================
// 用途: 引擎只依赖此能力,不感知底层多表关联
// 实现者: SqliteLabelIndex
pub trait LabelIndex {
    /// 父实体是否存在（MGI ID 不区分大小写,限定父实体类型）
    fn parent_exists(&self, parent_mgi_id: &str, parent_type_key: i64) -> RepositoryResult<bool>;

    /// 父实体下全部图像面板标签（已按面板键去重、升序）
    fn labels_for_parent(
        &self,
        parent_mgi_id: &str,
        parent_type_key: i64,
    ) -> RepositoryResult<Vec<ChildLabel>>;
}

// ==========================================
// SqliteLabelIndex
// ==========================================
pub struct SqliteLabelIndex {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLabelIndex {
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
}

impl LabelIndex for SqliteLabelIndex {
    fn parent_exists(&self, parent_mgi_id: &str, parent_type_key: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let exists: i64 = conn.query_row(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM ACC_Accession a
                WHERE a.accID = ?1 COLLATE NOCASE
                  AND a._MGIType_key = ?2
            )
            "#,
            params![parent_mgi_id, parent_type_key],
            |row| row.get(0),
        )?;
        Ok(exists != 0)
    }

    fn labels_for_parent(
        &self,
        parent_mgi_id: &str,
        parent_type_key: i64,
    ) -> RepositoryResult<Vec<ChildLabel>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT
                ip._ImagePane_key,
                i.figureLabel,
                ip.paneLabel
            FROM ACC_Accession a
            JOIN GXD_Specimen s ON a._Object_key = s._Assay_key
            JOIN GXD_InSituResult r ON s._Specimen_key = r._Specimen_key
            JOIN GXD_InSituResultImage ri ON r._Result_key = ri._Result_key
            JOIN IMG_ImagePane ip ON ri._ImagePane_key = ip._ImagePane_key
            JOIN IMG_Image i ON ip._Image_key = i._Image_key
            WHERE a.accID = ?1 COLLATE NOCASE
              AND a._MGIType_key = ?2
            ORDER BY ip._ImagePane_key
            "#,
        )?;

        let rows = stmt.query_map(params![parent_mgi_id, parent_type_key], |row| {
            Ok(ChildLabel {
                image_pane_key: row.get(0)?,
                figure_label: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                pane_label: row.get(2)?,
            })
        })?;

        let mut labels = Vec::new();
        for row in rows {
            labels.push(row?);
        }
        Ok(labels)
    }
}
