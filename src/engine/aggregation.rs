// ==========================================
// Apex OTB 采购计划系统 - 周期聚合引擎
// ==========================================
// 职责: 将预算分配记录流折叠为部门/时间桶聚合与全局 KPI
// 输入: 预算记录 + 部门毛利率映射 + 可选周期筛选
// 输出: DashboardSummary (每轮全量重建)
// 红线: 驾驶舱可用性优先, 单条坏记录按 0 降级, 不中断整轮聚合
// ==========================================

use crate::domain::budget::{
    BudgetAllocationRecord, DashboardSummary, DeptAggregate, PeriodFilter, TimeBucket, BUY_RATIO,
};
use crate::domain::types::FiscalMonth;
use std::collections::HashMap;
use tracing::{instrument, warn};

// ==========================================
// OtbAggregator - 周期聚合引擎
// ==========================================
pub struct OtbAggregator {
    // 无状态引擎, 不需要注入依赖
}

impl OtbAggregator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 聚合预算分配记录
    ///
    /// 步骤:
    /// 1) 筛选激活时, 仅保留月份/年度都匹配的记录;
    ///    筛选后为空 -> 全零结果 (不是错误)
    /// 2) 逐条计算 buy = allocated_receipts * 0.90, variance = budget - buy,
    ///    累计进部门聚合 (按首次出现顺序建立) 与全局合计;
    ///    部门 margin_percent 每条覆写 (最后一次写入生效)
    /// 3) weighted_margin_pct = Σ(budget_i * margin_i/100) / totalBudget * 100
    ///    (totalBudget = 0 时为 0)
    /// 4) 时间桶仅在无激活筛选时产出, 按 year*100 + month_index 升序
    ///
    /// # 参数
    /// - `records`: 预算分配记录
    /// - `margin_by_dept`: 部门平均毛利率映射 (缺失按 0)
    /// - `filter`: 可选周期/年度筛选
    #[instrument(skip(self, records, margin_by_dept, filter), fields(
        records_count = records.len()
    ))]
    pub fn aggregate(
        &self,
        records: &[BudgetAllocationRecord],
        margin_by_dept: &HashMap<i64, f64>,
        filter: Option<&PeriodFilter>,
    ) -> DashboardSummary {
        // 1. 周期/年度筛选 (两字段 AND 关系)
        let active_filter = filter.filter(|f| f.is_active());
        let retained: Vec<&BudgetAllocationRecord> = match active_filter {
            Some(f) => records.iter().filter(|r| f.matches(r)).collect(),
            None => records.iter().collect(),
        };
        let filter_active = active_filter.is_some();

        if filter_active && retained.is_empty() {
            return DashboardSummary::empty();
        }

        // 2. 逐条累计
        let mut total_budget: f64 = 0.0;
        let mut total_buy: f64 = 0.0;
        let mut total_weighted_margin: f64 = 0.0;

        let mut dept_aggregates: Vec<DeptAggregate> = Vec::new();
        let mut dept_index: HashMap<i64, usize> = HashMap::new();
        let mut bucket_map: HashMap<(i32, FiscalMonth), TimeBucket> = HashMap::new();

        for record in retained {
            // 坏数据降级: 非有限预算按 0 计
            let budget = if record.allocated_receipts.is_finite() {
                record.allocated_receipts
            } else {
                warn!(
                    dept_id = record.dept_id,
                    fiscal_year = record.fiscal_year,
                    fiscal_month = %record.fiscal_month,
                    "allocated_receipts 非法, 按 0 聚合"
                );
                0.0
            };
            let buy = budget * BUY_RATIO;
            let variance = budget - buy;

            let margin = margin_by_dept
                .get(&record.dept_id)
                .copied()
                .unwrap_or(0.0);

            // 部门聚合按首次出现顺序建立
            let idx = *dept_index.entry(record.dept_id).or_insert_with(|| {
                dept_aggregates.push(DeptAggregate {
                    dept_id: record.dept_id,
                    budget: 0.0,
                    buy: 0.0,
                    variance: 0.0,
                    margin_percent: 0.0,
                });
                dept_aggregates.len() - 1
            });
            let dept = &mut dept_aggregates[idx];
            dept.budget += budget;
            dept.buy += buy;
            dept.variance += variance;
            // 覆写而非平均: 同一部门取值恒定, 最后一次写入生效
            dept.margin_percent = margin;

            total_weighted_margin += budget * (margin / 100.0);
            total_budget += budget;
            total_buy += buy;

            // 时间桶仅在无激活筛选时产出
            if !filter_active {
                let bucket = bucket_map
                    .entry((record.fiscal_year, record.fiscal_month))
                    .or_insert_with(|| TimeBucket {
                        fiscal_year: record.fiscal_year,
                        fiscal_month: record.fiscal_month,
                        budget: 0.0,
                        buy: 0.0,
                        variance: 0.0,
                    });
                bucket.budget += budget;
                bucket.buy += buy;
                bucket.variance += variance;
            }
        }

        // 3. 全局 KPI
        let total_variance = total_budget - total_buy;
        let weighted_margin_pct = if total_budget > 0.0 {
            total_weighted_margin / total_budget * 100.0
        } else {
            0.0
        };

        // 4. 时间桶排序: 年份为主, 月份为辅
        let mut time_buckets: Vec<TimeBucket> = bucket_map.into_values().collect();
        time_buckets.sort_by_key(|b| b.order_key());

        DashboardSummary {
            total_budget,
            total_buy,
            total_variance,
            weighted_margin_pct,
            dept_aggregates,
            time_buckets,
        }
    }
}
