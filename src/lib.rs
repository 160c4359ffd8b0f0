// ==========================================
// Apex OTB 采购计划系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (人工最终控制权)
// 红线: 推荐只是建议, 采购员手工选择独立于推荐结果
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FiscalMonth, FiscalQuarter, Recommendation, RiskCategory};

// 领域实体
pub use domain::{
    AllocationResult, BudgetAllocationRecord, CandidateProduct, DashboardSummary, DeptAggregate,
    NewBudgetEntry, PeriodFilter, RawProductRecord, TimeBucket,
};

// 引擎
pub use engine::{
    AllocationEngine, BacktestComparator, BuySummary, CatalogNormalizer, OtbAggregator,
    SelectionLedger,
};

// API
pub use api::{DashboardApi, PlanningApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Apex OTB 采购计划系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
