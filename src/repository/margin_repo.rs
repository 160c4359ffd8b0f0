// ==========================================
// Apex OTB 采购计划系统 - 部门毛利率数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 部门平均毛利率行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeptMargin {
    pub dept_id: i64,          // 部门ID
    pub margin_percent: f64,   // 平均毛利率 (%)
}

// ==========================================
// MarginRepository - 部门毛利率仓储
// ==========================================

/// 部门毛利率仓储
/// 职责: 管理 dept_margin 表的查询与写入
pub struct MarginRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MarginRepository {
    /// 创建新的毛利率仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部部门平均毛利率
    pub fn list_average_margins(&self) -> RepositoryResult<Vec<DeptMargin>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT dept_id, margin_percent FROM dept_margin ORDER BY dept_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DeptMargin {
                dept_id: row.get(0)?,
                margin_percent: row.get(1)?,
            })
        })?;

        let mut margins = Vec::new();
        for row in rows {
            margins.push(row?);
        }
        Ok(margins)
    }

    /// 部门毛利率映射 (dept_id -> margin_percent)
    ///
    /// 聚合引擎的查找表; 缺失部门由引擎按 0 处理
    pub fn margin_map(&self) -> RepositoryResult<HashMap<i64, f64>> {
        let margins = self.list_average_margins()?;
        Ok(margins
            .into_iter()
            .map(|m| (m.dept_id, m.margin_percent))
            .collect())
    }

    /// 写入/覆盖部门平均毛利率
    pub fn upsert(&self, dept_id: i64, margin_percent: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO dept_margin (dept_id, margin_percent)
            VALUES (?1, ?2)
            ON CONFLICT(dept_id) DO UPDATE SET margin_percent = excluded.margin_percent
            "#,
            params![dept_id, margin_percent],
        )?;
        Ok(())
    }
}
