// ==========================================
// Apex OTB 采购计划系统 - 驾驶舱 API
// ==========================================
// 职责: 封装周期聚合引擎, 提供驾驶舱聚合查询、
//       预算提交与部门商品明细查询
// 架构: API 层 → Engine 层 (OtbAggregator) + Repository 层
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::budget::{DashboardSummary, NewBudgetEntry, PeriodFilter};
use crate::domain::product::RawProductRecord;
use crate::engine::aggregation::OtbAggregator;
use crate::repository::budget_repo::BudgetRepository;
use crate::repository::margin_repo::MarginRepository;
use crate::repository::product_repo::ProductRepository;

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================

/// 驾驶舱API
///
/// 职责:
/// 1. 聚合查询 (全量/按周期/按年度)
/// 2. 新预算分配提交 (校验 + 透传字段填充)
/// 3. 部门商品明细查询
pub struct DashboardApi {
    /// OTB 预算仓储
    budget_repo: Arc<BudgetRepository>,
    /// 部门毛利率仓储
    margin_repo: Arc<MarginRepository>,
    /// 商品目录仓储
    product_repo: Arc<ProductRepository>,
    /// 周期聚合引擎
    aggregator: OtbAggregator,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    ///
    /// # 参数
    /// - budget_repo: OTB 预算仓储
    /// - margin_repo: 部门毛利率仓储
    /// - product_repo: 商品目录仓储
    pub fn new(
        budget_repo: Arc<BudgetRepository>,
        margin_repo: Arc<MarginRepository>,
        product_repo: Arc<ProductRepository>,
    ) -> Self {
        Self {
            budget_repo,
            margin_repo,
            product_repo,
            aggregator: OtbAggregator::new(),
        }
    }

    // ==========================================
    // 聚合查询接口
    // ==========================================

    /// 驾驶舱聚合查询
    ///
    /// 筛选激活时不产出时间桶; 筛选无匹配记录时返回全零结果
    /// (展示层显示"该周期无数据", 不是错误)。
    ///
    /// # 参数
    /// - filter: 可选周期/年度筛选
    pub fn get_dashboard_summary(
        &self,
        filter: Option<&PeriodFilter>,
    ) -> ApiResult<DashboardSummary> {
        let records = self.budget_repo.list_all()?;
        let margin_map = self.margin_repo.margin_map()?;

        Ok(self.aggregator.aggregate(&records, &margin_map, filter))
    }

    // ==========================================
    // 预算提交接口
    // ==========================================

    /// 提交新预算分配记录
    ///
    /// 校验: dept_id 必须为正, allocated_receipts 必须为有限非负数。
    /// 透传字段 based_on_cogs_ly / otb_status 填充固定提交值,
    /// 其语义属于外部系统。
    ///
    /// # 返回
    /// - Ok(i64): 新记录的行 id
    pub fn submit_budget_entry(&self, entry: &NewBudgetEntry) -> ApiResult<i64> {
        if entry.dept_id <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "部门ID必须为正整数: {}",
                entry.dept_id
            )));
        }
        if !entry.allocated_receipts.is_finite() || entry.allocated_receipts < 0.0 {
            return Err(ApiError::ValidationError(format!(
                "预算金额必须为有限非负数: {}",
                entry.allocated_receipts
            )));
        }

        let id = self.budget_repo.insert(
            entry,
            NewBudgetEntry::DEFAULT_BASED_ON_COGS_LY,
            NewBudgetEntry::DEFAULT_OTB_STATUS,
        )?;

        info!(
            id,
            dept_id = entry.dept_id,
            fiscal_year = entry.fiscal_year,
            fiscal_month = %entry.fiscal_month,
            allocated_receipts = entry.allocated_receipts,
            "预算分配记录已提交"
        );
        Ok(id)
    }

    // ==========================================
    // 商品明细接口
    // ==========================================

    /// 按部门查询商品明细
    ///
    /// 非正 dept_id 返回空集 (与仓储层守卫一致)
    pub fn list_products_by_dept(&self, dept_id: i64) -> ApiResult<Vec<RawProductRecord>> {
        Ok(self.product_repo.list_by_dept(dept_id)?)
    }
}
