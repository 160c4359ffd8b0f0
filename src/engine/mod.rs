// ==========================================
// Apex OTB 采购计划系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎, 不拼 SQL
// 红线: 引擎为纯函数, 相同输入必得相同输出; 所有 PASS 必须带原因
// ==========================================

pub mod aggregation;
pub mod allocation;
pub mod backtest;
pub mod normalizer;
pub mod selection_ledger;

// 重导出核心引擎
pub use aggregation::OtbAggregator;
pub use allocation::AllocationEngine;
pub use backtest::{BacktestComparator, KpiComparison, KpiDirection};
pub use normalizer::{CatalogNormalizer, NormalizeError, NormalizeResult};
pub use selection_ledger::{BuySummary, SelectionEntry, SelectionLedger};
