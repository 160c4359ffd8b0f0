// ==========================================
// Apex OTB 采购计划系统 - 回测对比引擎
// ==========================================
// 职责: 人工实际采购 vs 引擎推荐的逐 KPI 差值评估
// 说明: 方向敏感 - 毛利率越高越好, 风险敞口/存销比越低越好;
//       "越低越好"的改善以正差值呈现
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// KpiDirection - KPI 优化方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiDirection {
    HigherIsBetter, // 例: 毛利率
    LowerIsBetter,  // 例: 高风险敞口, 存销比
    Neutral,        // 例: 采购总额 (不评优劣)
}

impl fmt::Display for KpiDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiDirection::HigherIsBetter => write!(f, "HIGHER_IS_BETTER"),
            KpiDirection::LowerIsBetter => write!(f, "LOWER_IS_BETTER"),
            KpiDirection::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

// ==========================================
// KpiComparison - 单 KPI 对比结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiComparison {
    pub kpi: String,          // KPI 名称
    pub human_value: f64,     // 人工实际值
    pub engine_value: f64,    // 引擎推荐值
    pub delta: f64,           // 差值 (LowerIsBetter 的改善取正)
    pub delta_pct: f64,       // 差值百分比 (%)
    pub engine_better: bool,  // 引擎是否更优
}

// ==========================================
// BacktestComparator - 回测对比引擎
// ==========================================
pub struct BacktestComparator {
    // 无状态引擎, 不需要注入依赖
}

impl BacktestComparator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 单 KPI 对比
    ///
    /// # 参数
    /// - `kpi`: KPI 名称
    /// - `direction`: 优化方向
    /// - `human_value`: 人工实际值
    /// - `engine_value`: 引擎推荐值
    pub fn compare(
        &self,
        kpi: &str,
        direction: KpiDirection,
        human_value: f64,
        engine_value: f64,
    ) -> KpiComparison {
        let (delta, engine_better) = match direction {
            KpiDirection::HigherIsBetter => {
                (engine_value - human_value, engine_value > human_value)
            }
            // 越低越好: 降幅取正呈现
            KpiDirection::LowerIsBetter => {
                (human_value - engine_value, engine_value < human_value)
            }
            KpiDirection::Neutral => (engine_value - human_value, true),
        };

        // 人工基准为 0 时无法计算百分比
        let delta_pct = if human_value != 0.0 {
            delta / human_value * 100.0
        } else {
            0.0
        };

        KpiComparison {
            kpi: kpi.to_string(),
            human_value,
            engine_value,
            delta,
            delta_pct,
            engine_better,
        }
    }

    /// 批量对比
    pub fn compare_all(
        &self,
        entries: &[(String, KpiDirection, f64, f64)],
    ) -> Vec<KpiComparison> {
        entries
            .iter()
            .map(|(kpi, direction, human, engine)| {
                self.compare(kpi, *direction, *human, *engine)
            })
            .collect()
    }
}
