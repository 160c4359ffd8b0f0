// ==========================================
// Apex OTB 采购计划系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、派生规则接口
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod budget;
pub mod product;
pub mod types;

// 重导出核心类型
pub use budget::{
    BudgetAllocationRecord, DashboardSummary, DeptAggregate, NewBudgetEntry, PeriodFilter,
    TimeBucket, BUY_RATIO,
};
pub use product::{AllocationResult, CandidateProduct, RawProductRecord};
pub use types::{FiscalMonth, FiscalQuarter, Recommendation, RiskCategory};
