// ==========================================
// Apex OTB 采购计划系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod budget_repo;
pub mod error;
pub mod margin_repo;
pub mod product_repo;

// 重导出
pub use budget_repo::BudgetRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use margin_repo::{DeptMargin, MarginRepository};
pub use product_repo::ProductRepository;
