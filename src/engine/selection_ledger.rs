// ==========================================
// Apex OTB 采购计划系统 - 手工选择台账
// ==========================================
// 职责: 采购员手工勾选集合与 KPI 汇总
// 红线: 台账完全独立于引擎建议, 引擎 PASS 的商品也可手工选入;
//       超支 (remaining < 0) 是合法信号, 不是错误
// ==========================================

use crate::domain::types::RiskCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 台账条目: 按 style_id 幂等, 最新勾选状态生效
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub cost: f64,                      // 采购金额
    pub risk_category: RiskCategory,    // 勾选时的风险分类
}

/// 手工选择 KPI 汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuySummary {
    pub total_buy: f64,           // 已承诺采购总额
    pub remaining_capacity: f64,  // 剩余容量 (可为负: 超支信号)
    pub high_risk_pct: f64,       // 高风险占比 (%; 空选择时为 0)
    pub total_selected: usize,    // 已选款数
}

// ==========================================
// SelectionLedger - 手工选择台账
// ==========================================
// 生命周期: 归属计划会话; 只在显式操作或会话结束时清空,
// 分配引擎不会隐式修剪它。会话内单写者约束由 API 层互斥锁保证。
#[derive(Debug, Clone, Default)]
pub struct SelectionLedger {
    entries: HashMap<String, SelectionEntry>,
}

impl SelectionLedger {
    /// 创建空台账
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 勾选商品 (upsert, 按 style_id 幂等)
    pub fn select(&mut self, style_id: &str, cost: f64, risk_category: RiskCategory) {
        self.entries.insert(
            style_id.to_string(),
            SelectionEntry {
                cost,
                risk_category,
            },
        );
    }

    /// 取消勾选; 条目不存在时为无操作, 不报错
    pub fn deselect(&mut self, style_id: &str) {
        self.entries.remove(style_id);
    }

    /// 商品是否已勾选
    pub fn is_selected(&self, style_id: &str) -> bool {
        self.entries.contains_key(style_id)
    }

    /// 已选款数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 台账是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空台账 (仅显式调用)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 按当前选择重算 KPI 汇总
    ///
    /// # 参数
    /// - `max_capacity`: 预算容量上限 ($)
    ///
    /// # 返回
    /// - `total_buy` = Σ cost
    /// - `remaining_capacity` = max_capacity - total_buy (可为负)
    /// - `high_risk_pct` = 100 * 高风险款数 / 已选款数 (空选择为 0)
    pub fn summary(&self, max_capacity: f64) -> BuySummary {
        let total_selected = self.entries.len();
        let total_buy: f64 = self.entries.values().map(|e| e.cost).sum();
        let high_risk_count = self
            .entries
            .values()
            .filter(|e| e.risk_category == RiskCategory::HighRisk)
            .count();

        // 空选择时避免除零
        let high_risk_pct = if total_selected > 0 {
            high_risk_count as f64 / total_selected as f64 * 100.0
        } else {
            0.0
        };

        BuySummary {
            total_buy,
            remaining_capacity: max_capacity - total_buy,
            high_risk_pct,
            total_selected,
        }
    }
}
