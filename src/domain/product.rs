// ==========================================
// Apex OTB 采购计划系统 - 商品领域模型
// ==========================================
// 职责: 定义原始商品记录与规范化后的候选商品
// 红线: risk_category 由 priority_score 派生, 候选创建后不可变更
// ==========================================

use crate::domain::types::{Recommendation, RiskCategory};
use serde::{Deserialize, Serialize};

// ==========================================
// RawProductRecord - 原始商品记录
// ==========================================
// 来源: 外部数据协作方的成本/零售价查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProductRecord {
    pub style_id: String,     // 款号 (唯一标识)
    pub dept_id: i64,         // 部门ID
    pub cost: f64,            // 成本 ($)
    pub retail_price: f64,    // 零售价 ($)
}

// ==========================================
// CandidateProduct - 候选商品
// ==========================================
// 由 CatalogNormalizer 产出, 携带利润指标与风险分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub style_id: String,               // 款号
    pub dept_id: i64,                   // 部门ID
    pub cost: f64,                      // 成本 ($)
    pub retail_price: f64,              // 零售价 ($)
    pub buy_cost: f64,                  // 采购承诺金额 (当前等于 cost)
    pub imu_percent: f64,               // 初始加价率 IMU% = (1 - cost/retail) * 100
    pub priority_score: f64,            // 优先级分数 (当前等于 imu_percent)
    pub risk_category: RiskCategory,    // 风险分类 (由 priority_score 派生)
}

impl CandidateProduct {
    /// 是否为高风险候选
    pub fn is_high_risk(&self) -> bool {
        self.risk_category == RiskCategory::HighRisk
    }
}

// ==========================================
// AllocationResult - 分配结果
// ==========================================
// 候选商品 + 采购建议; 每次引擎重算全量刷新, 不持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub candidate: CandidateProduct,        // 候选商品
    pub recommendation: Recommendation,     // 采购建议
}

impl AllocationResult {
    /// 款号（便捷访问）
    pub fn style_id(&self) -> &str {
        &self.candidate.style_id
    }
}
