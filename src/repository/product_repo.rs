// ==========================================
// Apex OTB 采购计划系统 - 商品目录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: dept_id <= 0 的查询直接返回空集, 不访问数据库
// ==========================================

use crate::domain::product::RawProductRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 商品目录仓储
// ==========================================

/// 商品目录仓储
/// 职责: 管理 product_catalog 表的查询与写入
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的商品仓储实例
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

    /// 查询全部商品记录
    pub fn list_all(&self) -> RepositoryResult<Vec<RawProductRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT style_id, dept_id, cost, retail_price FROM product_catalog ORDER BY style_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawProductRecord {
                style_id: row.get(0)?,
                dept_id: row.get(1)?,
                cost: row.get(2)?,
                retail_price: row.get(3)?,
            })
        })?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }
        Ok(products)
    }

    /// 按部门查询商品记录
    ///
    /// # 参数
    /// - dept_id: 部门ID; 非正值直接返回空集
    pub fn list_by_dept(&self, dept_id: i64) -> RepositoryResult<Vec<RawProductRecord>> {
        if dept_id <= 0 {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT style_id, dept_id, cost, retail_price
            FROM product_catalog
            WHERE dept_id = ?1
            ORDER BY style_id
            "#,
        )?;

        let rows = stmt.query_map(params![dept_id], |row| {
            Ok(RawProductRecord {
                style_id: row.get(0)?,
                dept_id: row.get(1)?,
                cost: row.get(2)?,
                retail_price: row.get(3)?,
            })
        })?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }
        Ok(products)
    }

    /// 写入/覆盖商品记录 (按 style_id)
    pub fn upsert(&self, record: &RawProductRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO product_catalog (style_id, dept_id, cost, retail_price)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(style_id) DO UPDATE SET
                dept_id = excluded.dept_id,
                cost = excluded.cost,
                retail_price = excluded.retail_price
            "#,
            params![
                record.style_id,
                record.dept_id,
                record.cost,
                record.retail_price
            ],
        )?;
        Ok(())
    }
}
