// ==========================================
// Apex OTB 采购计划系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供展示层调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod planning_api;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use planning_api::PlanningApi;
