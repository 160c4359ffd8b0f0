// ==========================================
// Apex OTB 采购计划系统 - OTB 预算数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

use crate::domain::budget::{BudgetAllocationRecord, NewBudgetEntry};
use crate::domain::types::FiscalMonth;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// BudgetRepository - OTB 预算仓储
// ==========================================

/// OTB 预算仓储
/// 职责: 管理 otb_budget 表的查询与写入
pub struct BudgetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BudgetRepository {
    /// 创建新的预算仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部预算分配记录
    ///
    /// # 返回
    /// - Ok(Vec<BudgetAllocationRecord>): 按写入顺序返回
    pub fn list_all(&self) -> RepositoryResult<Vec<BudgetAllocationRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, dept_id, fiscal_month, fiscal_year,
                allocated_receipts, based_on_cogs_ly, otb_status, created_at
            FROM otb_budget
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)?,
                row.get::<_, Option<f64>>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, chrono::DateTime<Utc>>(7)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, dept_id, month_str, fiscal_year, receipts, cogs_ly, status, created_at) =
                row?;

            let fiscal_month = FiscalMonth::from_str(&month_str).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    field: "fiscal_month".to_string(),
                    message: format!("无法识别的月份: {}", month_str),
                }
            })?;

            records.push(BudgetAllocationRecord {
                id: Some(id),
                dept_id,
                fiscal_month,
                fiscal_year,
                // NULL 视为坏数据, 由聚合引擎按 0 降级
                allocated_receipts: receipts.unwrap_or(f64::NAN),
                based_on_cogs_ly: cogs_ly,
                otb_status: status,
                created_at,
            });
        }

        Ok(records)
    }

    /// 写入新预算分配记录
    ///
    /// 透传字段 based_on_cogs_ly / otb_status 由调用方给定
    /// （提交命令填充固定值, 语义属于外部系统）。
    ///
    /// # 返回
    /// - Ok(i64): 新记录的行 id
    pub fn insert(
        &self,
        entry: &NewBudgetEntry,
        based_on_cogs_ly: f64,
        otb_status: &str,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO otb_budget (
                dept_id, fiscal_month, fiscal_year,
                allocated_receipts, based_on_cogs_ly, otb_status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.dept_id,
                entry.fiscal_month.to_db_str(),
                entry.fiscal_year,
                entry.allocated_receipts,
                based_on_cogs_ly,
                otb_status,
                Utc::now(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }
}
