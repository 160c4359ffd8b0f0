// ==========================================
// Apex OTB 采购计划系统 - 预算领域模型
// ==========================================
// 职责: 定义 OTB 预算分配记录与驾驶舱聚合结构
// 红线: buy/variance 为派生值, 逐条计算, 不落库
// ==========================================

use crate::domain::types::{FiscalMonth, FiscalQuarter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 采购比例: buy = allocated_receipts * 0.90
pub const BUY_RATIO: f64 = 0.90;

// ==========================================
// BudgetAllocationRecord - OTB 预算分配记录
// ==========================================
// 来源: 外部数据协作方 (本系统消费, 不拥有)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocationRecord {
    pub id: Option<i64>,                // 记录ID (外部存储主键)
    pub dept_id: i64,                   // 部门ID
    pub fiscal_month: FiscalMonth,      // 财务月份
    pub fiscal_year: i32,               // 财务年度
    pub allocated_receipts: f64,        // 预算金额 (坏数据时为非有限值, 聚合按 0 处理)
    pub based_on_cogs_ly: f64,          // 透传字段: 语义属于外部系统
    pub otb_status: String,             // 透传字段: 语义属于外部系统
    pub created_at: DateTime<Utc>,      // 创建时间
}

// ==========================================
// NewBudgetEntry - 新预算分配提交
// ==========================================
// 提交命令只携带业务字段, 透传字段由系统填充固定值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudgetEntry {
    pub dept_id: i64,                   // 部门ID
    pub allocated_receipts: f64,        // 预算金额 ($)
    pub fiscal_month: FiscalMonth,      // 财务月份
    pub fiscal_year: i32,               // 财务年度
}

impl NewBudgetEntry {
    /// 透传字段 based_on_cogs_ly 的固定提交值
    pub const DEFAULT_BASED_ON_COGS_LY: f64 = 100_000.0;

    /// 透传字段 otb_status 的固定提交值
    pub const DEFAULT_OTB_STATUS: &'static str = "OPEN";
}

// ==========================================
// DeptAggregate - 部门聚合
// ==========================================
// 每次聚合全量重建, 不做增量更新
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeptAggregate {
    pub dept_id: i64,          // 部门ID
    pub budget: f64,           // 预算合计
    pub buy: f64,              // 采购合计
    pub variance: f64,         // 差异合计 (budget - buy)
    pub margin_percent: f64,   // 部门平均毛利率 (同一轮聚合内最后一次写入生效)
}

// ==========================================
// TimeBucket - 时间桶聚合
// ==========================================
// 键: (fiscal_year, fiscal_month); 仅在无周期筛选时产出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub fiscal_year: i32,           // 财务年度
    pub fiscal_month: FiscalMonth,  // 财务月份
    pub budget: f64,                // 预算合计
    pub buy: f64,                   // 采购合计
    pub variance: f64,              // 差异合计
}

impl TimeBucket {
    /// 排序键: 年份为主, 月份为辅 (JAN..DEC = 0..11)
    pub fn order_key(&self) -> i64 {
        self.fiscal_year as i64 * 100 + self.fiscal_month.month_index() as i64
    }
}

// ==========================================
// DashboardSummary - 驾驶舱聚合结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_budget: f64,                    // 预算总计
    pub total_buy: f64,                       // 采购总计
    pub total_variance: f64,                  // 差异总计
    pub weighted_margin_pct: f64,             // 预算加权平均毛利率
    pub dept_aggregates: Vec<DeptAggregate>,  // 部门聚合 (首次出现顺序)
    pub time_buckets: Vec<TimeBucket>,        // 时间桶 (按日历顺序升序)
}

impl DashboardSummary {
    /// 全零结果 (筛选无匹配记录时返回, 不是错误)
    pub fn empty() -> Self {
        Self {
            total_budget: 0.0,
            total_buy: 0.0,
            total_variance: 0.0,
            weighted_margin_pct: 0.0,
            dept_aggregates: Vec::new(),
            time_buckets: Vec::new(),
        }
    }
}

// ==========================================
// PeriodFilter - 周期/年度筛选
// ==========================================
// 月份与年度为 AND 关系; 任一字段生效即视为激活筛选
// 激活筛选时不产出时间桶
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub months: Option<Vec<FiscalMonth>>,  // 保留的月份集合
    pub year: Option<i32>,                 // 保留的年度
}

impl PeriodFilter {
    /// 按季度预设构造 (Q1=JAN,FEB,MAR ...)
    pub fn for_quarter(quarter: FiscalQuarter) -> Self {
        Self {
            months: Some(quarter.months().to_vec()),
            year: None,
        }
    }

    /// 按年度构造
    pub fn for_year(year: i32) -> Self {
        Self {
            months: None,
            year: Some(year),
        }
    }

    /// 按季度 + 年度构造
    pub fn for_quarter_of_year(quarter: FiscalQuarter, year: i32) -> Self {
        Self {
            months: Some(quarter.months().to_vec()),
            year: Some(year),
        }
    }

    /// 筛选是否激活
    pub fn is_active(&self) -> bool {
        self.months.is_some() || self.year.is_some()
    }

    /// 记录是否通过筛选
    pub fn matches(&self, record: &BudgetAllocationRecord) -> bool {
        let matches_month = self
            .months
            .as_ref()
            .map(|months| months.contains(&record.fiscal_month))
            .unwrap_or(true);
        let matches_year = self
            .year
            .map(|year| record.fiscal_year == year)
            .unwrap_or(true);
        matches_month && matches_year
    }
}
