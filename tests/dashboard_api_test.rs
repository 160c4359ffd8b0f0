// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 验证预算提交、聚合查询与部门明细的端到端链路
// 存储: tempfile 临时 SQLite 数据库
// ==========================================

use std::sync::Arc;

use apex_planner::api::error::ApiError;
use apex_planner::api::DashboardApi;
use apex_planner::db::{init_schema, open_sqlite_connection};
use apex_planner::domain::budget::{NewBudgetEntry, PeriodFilter, BUY_RATIO};
use apex_planner::domain::product::RawProductRecord;
use apex_planner::domain::types::{FiscalMonth, FiscalQuarter};
use apex_planner::repository::{BudgetRepository, MarginRepository, ProductRepository};
use tempfile::TempDir;

// ==========================================
// 测试辅助函数
// ==========================================

/// 创建临时数据库并初始化表结构
fn create_test_db() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir
        .path()
        .join("apex_planner_test.db")
        .to_string_lossy()
        .to_string();
    let conn = open_sqlite_connection(&db_path).unwrap();
    init_schema(&conn).unwrap();
    (dir, db_path)
}

/// 构建 DashboardApi (同路径独立连接)
fn create_api(db_path: &str) -> DashboardApi {
    DashboardApi::new(
        Arc::new(BudgetRepository::new(db_path).unwrap()),
        Arc::new(MarginRepository::new(db_path).unwrap()),
        Arc::new(ProductRepository::new(db_path).unwrap()),
    )
}

/// 提交一条预算分配
fn submit(api: &DashboardApi, dept_id: i64, month: FiscalMonth, year: i32, receipts: f64) -> i64 {
    api.submit_budget_entry(&NewBudgetEntry {
        dept_id,
        allocated_receipts: receipts,
        fiscal_month: month,
        fiscal_year: year,
    })
    .unwrap()
}

// ==========================================
// 测试用例 1: 预算提交与透传字段填充
// ==========================================

#[test]
fn test_submit_fills_pass_through_defaults() {
    let (_dir, db_path) = create_test_db();
    let api = create_api(&db_path);

    let id = submit(&api, 100, FiscalMonth::Jan, 2025, 500_000.0);
    assert!(id > 0);

    let records = BudgetRepository::new(&db_path).unwrap().list_all().unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.id, Some(id));
    assert_eq!(record.dept_id, 100);
    assert_eq!(record.fiscal_month, FiscalMonth::Jan);
    assert_eq!(record.fiscal_year, 2025);
    assert!((record.allocated_receipts - 500_000.0).abs() < 1e-9);
    // 透传字段由提交命令填充固定值
    assert_eq!(record.based_on_cogs_ly, 100_000.0);
    assert_eq!(record.otb_status, "OPEN");
}

// ==========================================
// 测试用例 2: 提交校验
// ==========================================

#[test]
fn test_submit_validation() {
    let (_dir, db_path) = create_test_db();
    let api = create_api(&db_path);

    // 部门ID必须为正
    let bad_dept = api.submit_budget_entry(&NewBudgetEntry {
        dept_id: 0,
        allocated_receipts: 100.0,
        fiscal_month: FiscalMonth::Jan,
        fiscal_year: 2025,
    });
    assert!(matches!(bad_dept, Err(ApiError::InvalidInput(_))));

    // 预算金额必须为有限非负数
    for receipts in [-100.0, f64::NAN, f64::INFINITY] {
        let result = api.submit_budget_entry(&NewBudgetEntry {
            dept_id: 100,
            allocated_receipts: receipts,
            fiscal_month: FiscalMonth::Jan,
            fiscal_year: 2025,
        });
        assert!(
            matches!(result, Err(ApiError::ValidationError(_))),
            "receipts={} 应被拒绝",
            receipts
        );
    }
}

// ==========================================
// 测试用例 3: 全量聚合查询
// ==========================================

#[test]
fn test_dashboard_summary_unfiltered() {
    let (_dir, db_path) = create_test_db();
    let api = create_api(&db_path);

    submit(&api, 100, FiscalMonth::Jan, 2025, 300_000.0);
    submit(&api, 200, FiscalMonth::Feb, 2025, 100_000.0);

    let margin_repo = MarginRepository::new(&db_path).unwrap();
    margin_repo.upsert(100, 60.0).unwrap();
    margin_repo.upsert(200, 40.0).unwrap();

    let summary = api.get_dashboard_summary(None).unwrap();

    assert!((summary.total_budget - 400_000.0).abs() < 1e-6);
    assert!((summary.total_buy - 400_000.0 * BUY_RATIO).abs() < 1e-6);
    assert!((summary.weighted_margin_pct - 55.0).abs() < 1e-9);

    assert_eq!(summary.dept_aggregates.len(), 2);
    assert_eq!(summary.time_buckets.len(), 2, "无筛选时产出时间桶");
    assert_eq!(summary.time_buckets[0].fiscal_month, FiscalMonth::Jan);
}

// ==========================================
// 测试用例 4: 周期筛选查询
// ==========================================

#[test]
fn test_dashboard_summary_filtered() {
    let (_dir, db_path) = create_test_db();
    let api = create_api(&db_path);

    submit(&api, 100, FiscalMonth::Jan, 2025, 300_000.0);
    submit(&api, 100, FiscalMonth::Jul, 2025, 200_000.0);
    submit(&api, 100, FiscalMonth::Jan, 2026, 150_000.0);

    let filter = PeriodFilter::for_quarter_of_year(FiscalQuarter::Q1, 2025);
    let summary = api.get_dashboard_summary(Some(&filter)).unwrap();

    assert!((summary.total_budget - 300_000.0).abs() < 1e-6);
    assert!(summary.time_buckets.is_empty(), "筛选激活时不产出时间桶");

    // 无匹配周期: 全零结果, 展示层显示"该周期无数据"
    let empty = api
        .get_dashboard_summary(Some(&PeriodFilter::for_year(2099)))
        .unwrap();
    assert_eq!(empty.total_budget, 0.0);
    assert!(empty.dept_aggregates.is_empty());
}

// ==========================================
// 测试用例 5: 坏数据记录不拖垮驾驶舱
// ==========================================

#[test]
fn test_null_receipts_degrade_to_zero() {
    let (_dir, db_path) = create_test_db();
    let api = create_api(&db_path);

    submit(&api, 100, FiscalMonth::Jan, 2025, 100_000.0);

    // 外部系统写入的 NULL 预算记录
    let conn = open_sqlite_connection(&db_path).unwrap();
    conn.execute(
        r#"
        INSERT INTO otb_budget (
            dept_id, fiscal_month, fiscal_year,
            allocated_receipts, based_on_cogs_ly, otb_status, created_at
        ) VALUES (200, 'FEB', 2025, NULL, 0, 'OPEN', '2025-02-01T00:00:00Z')
        "#,
        [],
    )
    .unwrap();

    let summary = api.get_dashboard_summary(None).unwrap();
    assert!(
        (summary.total_budget - 100_000.0).abs() < 1e-6,
        "NULL 预算按 0 聚合, 不中断整轮"
    );
    assert_eq!(summary.dept_aggregates.len(), 2);
    assert_eq!(summary.dept_aggregates[1].budget, 0.0);
}

// ==========================================
// 测试用例 6: 部门商品明细
// ==========================================

#[test]
fn test_list_products_by_dept() {
    let (_dir, db_path) = create_test_db();
    let product_repo = ProductRepository::new(&db_path).unwrap();
    product_repo
        .upsert(&RawProductRecord {
            style_id: "S001_A".to_string(),
            dept_id: 100,
            cost: 50_000.0,
            retail_price: 125_000.0,
        })
        .unwrap();
    product_repo
        .upsert(&RawProductRecord {
            style_id: "S003_C".to_string(),
            dept_id: 200,
            cost: 80_000.0,
            retail_price: 180_000.0,
        })
        .unwrap();

    let api = create_api(&db_path);

    let dept_100 = api.list_products_by_dept(100).unwrap();
    assert_eq!(dept_100.len(), 1);
    assert_eq!(dept_100[0].style_id, "S001_A");

    // 非正部门ID返回空集, 不访问数据库
    assert!(api.list_products_by_dept(0).unwrap().is_empty());
    assert!(api.list_products_by_dept(-1).unwrap().is_empty());

    // 不存在的部门返回空集
    assert!(api.list_products_by_dept(999).unwrap().is_empty());
}

// ==========================================
// 测试用例 7: 空数据库聚合
// ==========================================

#[test]
fn test_empty_database_summary() {
    let (_dir, db_path) = create_test_db();
    let api = create_api(&db_path);

    let summary = api.get_dashboard_summary(None).unwrap();
    assert_eq!(summary.total_budget, 0.0);
    assert!(summary.dept_aggregates.is_empty());
    assert!(summary.time_buckets.is_empty());
}
