// ==========================================
// Apex OTB 采购计划系统 - 商品目录规范化引擎
// ==========================================
// 职责: 将原始成本/零售价记录转为统一候选集
// 输入: 原始商品记录
// 输出: 候选商品 (利润指标 + 风险分类)
// 红线: 计划引擎要求数据集正确性, 批量规范化遇坏记录立即失败
// ==========================================

use crate::domain::product::{CandidateProduct, RawProductRecord};
use crate::domain::types::RiskCategory;
use thiserror::Error;

/// LowRisk 的 IMU% 下限
pub const LOW_RISK_IMU_THRESHOLD: f64 = 60.0;

/// MediumRisk 的 IMU% 下限
pub const MEDIUM_RISK_IMU_THRESHOLD: f64 = 55.0;

/// 规范化错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// 数值字段非法（要求有限非负数; retail_price = 0 合法, 得分按 0 计）
    #[error("无效输入: style_id={style_id}, field={field}, value={value}")]
    InvalidInput {
        style_id: String,
        field: &'static str,
        value: f64,
    },
}

/// Result 类型别名
pub type NormalizeResult<T> = Result<T, NormalizeError>;

// ==========================================
// CatalogNormalizer - 商品目录规范化引擎
// ==========================================
pub struct CatalogNormalizer {
    // 无状态引擎, 不需要注入依赖
}

impl CatalogNormalizer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 规范化单条商品记录
    ///
    /// 规则:
    /// - `imu_percent = retail_price > 0 ? (1 - cost/retail_price) * 100 : 0`
    /// - `priority_score = imu_percent`
    /// - `buy_cost = cost`
    /// - 风险分类由 IMU% 派生, 候选创建后不再变更
    ///
    /// # 参数
    /// - `raw`: 原始商品记录
    ///
    /// # 返回
    /// - Ok(CandidateProduct): 规范化后的候选商品
    /// - Err(NormalizeError::InvalidInput): cost/retail_price 非有限或为负
    pub fn normalize(&self, raw: &RawProductRecord) -> NormalizeResult<CandidateProduct> {
        Self::validate_amount(&raw.style_id, "cost", raw.cost)?;
        Self::validate_amount(&raw.style_id, "retail_price", raw.retail_price)?;

        // retail_price = 0 合法: 得分按 0 计, 不做除法
        let imu_percent = if raw.retail_price > 0.0 {
            (1.0 - raw.cost / raw.retail_price) * 100.0
        } else {
            0.0
        };

        Ok(CandidateProduct {
            style_id: raw.style_id.clone(),
            dept_id: raw.dept_id,
            cost: raw.cost,
            retail_price: raw.retail_price,
            buy_cost: raw.cost,
            imu_percent,
            priority_score: imu_percent,
            risk_category: Self::classify(imu_percent),
        })
    }

    /// 批量规范化（计划引擎入口）
    ///
    /// 严格策略: 任一记录非法即整体失败, 保证喂给分配引擎的数据集正确。
    /// 驾驶舱聚合的宽松降级策略见 OtbAggregator。
    pub fn normalize_all(
        &self,
        raws: &[RawProductRecord],
    ) -> NormalizeResult<Vec<CandidateProduct>> {
        raws.iter().map(|raw| self.normalize(raw)).collect()
    }

    /// IMU% 风险分类
    ///
    /// - `imu_percent >= 60` -> LowRisk
    /// - `55 <= imu_percent < 60` -> MediumRisk
    /// - `imu_percent < 55` -> HighRisk
    pub fn classify(imu_percent: f64) -> RiskCategory {
        if imu_percent >= LOW_RISK_IMU_THRESHOLD {
            RiskCategory::LowRisk
        } else if imu_percent >= MEDIUM_RISK_IMU_THRESHOLD {
            RiskCategory::MediumRisk
        } else {
            RiskCategory::HighRisk
        }
    }

    // ==========================================
    // 校验方法
    // ==========================================

    /// 校验金额字段（有限非负）
    fn validate_amount(style_id: &str, field: &'static str, value: f64) -> NormalizeResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(NormalizeError::InvalidInput {
                style_id: style_id.to_string(),
                field,
                value,
            });
        }
        Ok(())
    }
}
