// ==========================================
// Apex OTB 采购计划系统 - 预算分配引擎
// ==========================================
// 职责: 利润优先的贪心选择 (单趟, 无回溯)
// 输入: 候选商品列表 + 预算容量 + 风险容忍度
// 输出: 逐条采购建议 (BUY / PASS_CAPACITY / PASS_RISK_LIMIT)
// 红线: 固定启发式是契约本身, 平分处理与边界行为不可改动
// ==========================================

use crate::domain::product::{AllocationResult, CandidateProduct};
use crate::domain::types::Recommendation;
use tracing::instrument;

// ==========================================
// AllocationEngine - 预算分配引擎
// ==========================================
pub struct AllocationEngine {
    // 无状态引擎, 不需要注入依赖
}

impl AllocationEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成逐条采购建议
    ///
    /// 算法 (确定性, 单趟, 顺序敏感):
    /// 1) 按 priority_score 降序稳定排序, 同分保持输入相对顺序
    /// 2) 高风险配额 = ceil(候选总数 * max_risk_pct / 100),
    ///    基于全集数量一次算定, 遍历期间不重算
    /// 3) 维护 current_buy_cost 与 high_risk_count 单趟遍历:
    ///    - 放得下且非高风险 -> BUY
    ///    - 放得下且高风险且配额未满 -> BUY, 配额 +1
    ///    - 放得下且高风险且配额已满 -> PASS_RISK_LIMIT
    ///    - 放不下 -> PASS_CAPACITY
    ///
    /// 纯函数: 相同输入必得相同输出, 无隐藏状态, 无 I/O,
    /// 参数变化时可安全全量重算。
    ///
    /// # 参数
    /// - `candidates`: 候选商品列表（无需预排序）
    /// - `max_capacity`: 预算容量上限 ($)
    /// - `max_risk_pct`: 高风险数量容忍度 (%)
    ///
    /// # 返回
    /// 按排序后顺序逐条标注建议的结果列表, 长度等于输入长度
    #[instrument(skip(self, candidates), fields(candidates_count = candidates.len()))]
    pub fn allocate(
        &self,
        candidates: Vec<CandidateProduct>,
        max_capacity: f64,
        max_risk_pct: f64,
    ) -> Vec<AllocationResult> {
        // 1. 按优先级分数降序稳定排序
        let mut sorted = candidates;
        sorted.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

        // 2. 高风险配额基于全集数量一次算定
        let high_risk_limit = Self::high_risk_limit(sorted.len(), max_risk_pct);

        // 3. 单趟遍历
        let mut current_buy_cost: f64 = 0.0;
        let mut high_risk_count: usize = 0;
        let mut results = Vec::with_capacity(sorted.len());

        for candidate in sorted {
            let recommendation = if current_buy_cost + candidate.buy_cost <= max_capacity {
                if !candidate.is_high_risk() {
                    current_buy_cost += candidate.buy_cost;
                    Recommendation::Buy
                } else if high_risk_count < high_risk_limit {
                    current_buy_cost += candidate.buy_cost;
                    high_risk_count += 1;
                    Recommendation::Buy
                } else {
                    Recommendation::PassRiskLimit
                }
            } else {
                // 超出容量, 跳过 (不回溯, 后续更小的候选仍可能放得下)
                Recommendation::PassCapacity
            };

            results.push(AllocationResult {
                candidate,
                recommendation,
            });
        }

        results
    }

    /// 高风险数量配额
    ///
    /// `ceil(candidate_count * max_risk_pct / 100)`, 是对候选全集的
    /// 数量配额, 不是金额配额, 也不按部门拆分。
    /// `max_risk_pct <= 0` 时配额为 0, 高风险候选一律 PASS_RISK_LIMIT。
    pub fn high_risk_limit(candidate_count: usize, max_risk_pct: f64) -> usize {
        let limit = (candidate_count as f64 * max_risk_pct / 100.0).ceil();
        if limit > 0.0 {
            // 饱和转换: 超出 usize 上限视为不设限
            limit as usize
        } else {
            // 非正值与 NaN 一律归零
            0
        }
    }
}
