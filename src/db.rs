// ==========================================
// Apex OTB 采购计划系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表语句集中管理（本系统无迁移机制，建表幂等）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库表结构（幂等）
///
/// 表清单：
/// - otb_budget: OTB 预算分配记录（外部数据，allocated_receipts 允许为 NULL）
/// - product_catalog: 商品成本/零售价记录
/// - dept_margin: 部门平均毛利率
/// - config_kv: 配置键值表（scope + key）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS otb_budget (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            dept_id             INTEGER NOT NULL,
            fiscal_month        TEXT    NOT NULL,
            fiscal_year         INTEGER NOT NULL,
            allocated_receipts  REAL,
            based_on_cogs_ly    REAL    NOT NULL DEFAULT 0,
            otb_status          TEXT    NOT NULL DEFAULT 'OPEN',
            created_at          TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_otb_budget_dept
            ON otb_budget(dept_id);
        CREATE INDEX IF NOT EXISTS idx_otb_budget_period
            ON otb_budget(fiscal_year, fiscal_month);

        CREATE TABLE IF NOT EXISTS product_catalog (
            style_id     TEXT    PRIMARY KEY,
            dept_id      INTEGER NOT NULL,
            cost         REAL    NOT NULL,
            retail_price REAL    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_product_catalog_dept
            ON product_catalog(dept_id);

        CREATE TABLE IF NOT EXISTS dept_margin (
            dept_id        INTEGER PRIMARY KEY,
            margin_percent REAL    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key      TEXT NOT NULL,
            value    TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;
    Ok(())
}
