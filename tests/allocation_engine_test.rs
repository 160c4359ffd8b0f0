// ==========================================
// AllocationEngine 引擎测试
// ==========================================
// 测试目标: 验证贪心分配的确定性行为
// 覆盖范围: 排序稳定性 / 容量门控 / 高风险配额 / 边界输入
// ==========================================

use apex_planner::domain::product::CandidateProduct;
use apex_planner::domain::types::{Recommendation, RiskCategory};
use apex_planner::engine::{AllocationEngine, CatalogNormalizer};

// ==========================================
// 测试辅助函数
// ==========================================

/// 创建测试用的候选商品 (风险分类由分数派生)
fn create_test_candidate(style_id: &str, priority_score: f64, buy_cost: f64) -> CandidateProduct {
    CandidateProduct {
        style_id: style_id.to_string(),
        dept_id: 100,
        cost: buy_cost,
        retail_price: 0.0,
        buy_cost,
        imu_percent: priority_score,
        priority_score,
        risk_category: CatalogNormalizer::classify(priority_score),
    }
}

/// 提取 (style_id, recommendation) 序列, 便于断言
fn decisions(results: &[apex_planner::domain::product::AllocationResult]) -> Vec<(String, Recommendation)> {
    results
        .iter()
        .map(|r| (r.candidate.style_id.clone(), r.recommendation))
        .collect()
}

// ==========================================
// 测试用例 1: 命名场景 (容量 + 风险配额)
// ==========================================

#[test]
fn test_capacity_and_risk_limit_scenario() {
    let engine = AllocationEngine::new();

    // A: 65 分 50 万, B: 58 分 60 万, C: 50 分 40 万 (高风险)
    let candidates = vec![
        create_test_candidate("A", 65.0, 500_000.0),
        create_test_candidate("B", 58.0, 600_000.0),
        create_test_candidate("C", 50.0, 400_000.0),
    ];

    let results = engine.allocate(candidates, 900_000.0, 0.0);

    assert_eq!(
        decisions(&results),
        vec![
            // A 买入后已用 50 万
            ("A".to_string(), Recommendation::Buy),
            // 50 万 + 60 万 = 110 万 > 90 万, 超容量
            ("B".to_string(), Recommendation::PassCapacity),
            // 50 万 + 40 万 = 90 万 放得下, 但配额为 0
            ("C".to_string(), Recommendation::PassRiskLimit),
        ]
    );
}

// ==========================================
// 测试用例 2: 输出长度与建议取值
// ==========================================

#[test]
fn test_output_length_and_recommendation_domain() {
    let engine = AllocationEngine::new();
    let candidates: Vec<CandidateProduct> = (0..20)
        .map(|i| create_test_candidate(&format!("S{:03}", i), 40.0 + i as f64, 50_000.0))
        .collect();

    let results = engine.allocate(candidates, 300_000.0, 15.0);

    assert_eq!(results.len(), 20, "输出长度必须等于输入长度");
    for result in &results {
        assert!(
            matches!(
                result.recommendation,
                Recommendation::Buy
                    | Recommendation::PassCapacity
                    | Recommendation::PassRiskLimit
            ),
            "建议必须是三个定义值之一"
        );
    }
}

// ==========================================
// 测试用例 3: 排序稳定性 (同分保持输入顺序)
// ==========================================

#[test]
fn test_stable_sort_preserves_input_order_on_ties() {
    let engine = AllocationEngine::new();

    let candidates = vec![
        create_test_candidate("FIRST", 58.0, 10_000.0),
        create_test_candidate("SECOND", 58.0, 10_000.0),
        create_test_candidate("TOP", 62.0, 10_000.0),
        create_test_candidate("THIRD", 58.0, 10_000.0),
    ];

    let results = engine.allocate(candidates, 1_000_000.0, 100.0);

    let order: Vec<&str> = results.iter().map(|r| r.style_id()).collect();
    assert_eq!(
        order,
        vec!["TOP", "FIRST", "SECOND", "THIRD"],
        "同分候选必须保持输入相对顺序"
    );
}

// ==========================================
// 测试用例 4: 输出按优先级分数降序
// ==========================================

#[test]
fn test_output_sorted_by_priority_desc() {
    let engine = AllocationEngine::new();

    let candidates = vec![
        create_test_candidate("LOW", 48.0, 10_000.0),
        create_test_candidate("HIGH", 66.0, 10_000.0),
        create_test_candidate("MID", 57.0, 10_000.0),
    ];

    let results = engine.allocate(candidates, 1_000_000.0, 100.0);

    let scores: Vec<f64> = results.iter().map(|r| r.candidate.priority_score).collect();
    assert_eq!(scores, vec![66.0, 57.0, 48.0]);
}

// ==========================================
// 测试用例 5: 容量单调性 (提升容量不会使 BUY 变 PASS)
// ==========================================

#[test]
fn test_capacity_monotonicity() {
    let engine = AllocationEngine::new();

    // 等成本候选: 贪心逐位扩展, 提升容量只会追加 BUY
    let candidates = vec![
        create_test_candidate("S001", 65.0, 150_000.0),
        create_test_candidate("S002", 62.0, 150_000.0),
        create_test_candidate("S003", 58.0, 150_000.0),
        create_test_candidate("S004", 52.0, 150_000.0),
        create_test_candidate("S005", 48.0, 150_000.0),
    ];

    let mut previous_buys: Vec<String> = Vec::new();
    for max_capacity in [100_000.0, 300_000.0, 450_000.0, 600_000.0, 1_000_000.0] {
        let results = engine.allocate(candidates.clone(), max_capacity, 40.0);
        let buys: Vec<String> = results
            .iter()
            .filter(|r| r.recommendation.is_buy())
            .map(|r| r.style_id().to_string())
            .collect();

        for style_id in &previous_buys {
            assert!(
                buys.contains(style_id),
                "容量从小到大, {} 不应从 BUY 退化为 PASS",
                style_id
            );
        }
        previous_buys = buys;
    }
}

// ==========================================
// 测试用例 6: 高风险配额精确性
// ==========================================

#[test]
fn test_high_risk_quota_exactness() {
    let engine = AllocationEngine::new();

    // 10 个候选全部高风险 (分数 < 55), 预算充足
    let candidates: Vec<CandidateProduct> = (0..10)
        .map(|i| create_test_candidate(&format!("HR{:02}", i), 50.0 - i as f64, 10_000.0))
        .collect();

    for max_risk_pct in [0.0, 10.0, 15.0, 33.0, 50.0, 100.0] {
        let quota = AllocationEngine::high_risk_limit(10, max_risk_pct);
        let results = engine.allocate(candidates.clone(), 1_000_000.0, max_risk_pct);

        let high_risk_buys = results
            .iter()
            .filter(|r| r.candidate.is_high_risk() && r.recommendation.is_buy())
            .count();

        assert!(
            high_risk_buys <= quota,
            "risk_pct={}: 高风险 BUY 数 {} 超过配额 {}",
            max_risk_pct,
            high_risk_buys,
            quota
        );
        // 预算充足时恰好用满配额
        assert_eq!(high_risk_buys, quota.min(10));
    }
}

// ==========================================
// 测试用例 7: 配额基于全集数量, 遍历期间不重算
// ==========================================

#[test]
fn test_quota_computed_from_full_list_once() {
    let engine = AllocationEngine::new();

    // 4 个候选: 2 个低风险超容量被跳过, 2 个高风险
    // 配额 = ceil(4 * 50 / 100) = 2, 与容量跳过无关
    let candidates = vec![
        create_test_candidate("BIG1", 70.0, 900_000.0),
        create_test_candidate("BIG2", 68.0, 900_000.0),
        create_test_candidate("HR1", 50.0, 10_000.0),
        create_test_candidate("HR2", 49.0, 10_000.0),
    ];

    let results = engine.allocate(candidates, 100_000.0, 50.0);

    assert_eq!(
        decisions(&results),
        vec![
            ("BIG1".to_string(), Recommendation::PassCapacity),
            ("BIG2".to_string(), Recommendation::PassCapacity),
            ("HR1".to_string(), Recommendation::Buy),
            ("HR2".to_string(), Recommendation::Buy),
        ],
        "配额按全集 4 个候选算定为 2, 容量跳过不影响配额"
    );
}

// ==========================================
// 测试用例 8: 边界输入
// ==========================================

#[test]
fn test_zero_capacity_passes_everything() {
    let engine = AllocationEngine::new();
    let candidates = vec![
        create_test_candidate("S001", 65.0, 100.0),
        create_test_candidate("S002", 50.0, 100.0),
    ];

    for max_capacity in [0.0, -500.0] {
        let results = engine.allocate(candidates.clone(), max_capacity, 100.0);
        for result in &results {
            assert_eq!(
                result.recommendation,
                Recommendation::PassCapacity,
                "容量 {} 时所有正成本候选都应 PASS_CAPACITY",
                max_capacity
            );
        }
    }
}

#[test]
fn test_zero_risk_pct_blocks_high_risk_despite_budget() {
    let engine = AllocationEngine::new();
    let candidates = vec![
        create_test_candidate("LOWRISK", 65.0, 10_000.0),
        create_test_candidate("HIGHRISK", 50.0, 10_000.0),
    ];

    // 预算远超所有成本, 但配额为 0
    let results = engine.allocate(candidates, 10_000_000.0, 0.0);

    assert_eq!(
        decisions(&results),
        vec![
            ("LOWRISK".to_string(), Recommendation::Buy),
            ("HIGHRISK".to_string(), Recommendation::PassRiskLimit),
        ]
    );
}

#[test]
fn test_empty_candidate_list() {
    let engine = AllocationEngine::new();
    let results = engine.allocate(Vec::new(), 1_000_000.0, 15.0);
    assert!(results.is_empty(), "空候选集产出空结果, 不报错");
}

// ==========================================
// 测试用例 9: 幂等性 (纯函数)
// ==========================================

#[test]
fn test_idempotence() {
    let engine = AllocationEngine::new();
    let candidates = vec![
        create_test_candidate("S001", 63.2, 35_000.0),
        create_test_candidate("S002", 57.4, 20_000.0),
        create_test_candidate("S003", 50.0, 45_000.0),
        create_test_candidate("S004", 61.3, 60_000.0),
    ];

    let first = engine.allocate(candidates.clone(), 100_000.0, 25.0);
    let second = engine.allocate(candidates, 100_000.0, 25.0);

    assert_eq!(first, second, "相同输入必得相同输出");
}

// ==========================================
// 测试用例 10: 中等风险不占高风险配额
// ==========================================

#[test]
fn test_medium_risk_not_counted_against_quota() {
    let engine = AllocationEngine::new();
    let candidates = vec![
        create_test_candidate("MED1", 57.0, 10_000.0),
        create_test_candidate("MED2", 56.0, 10_000.0),
        create_test_candidate("HR1", 50.0, 10_000.0),
    ];

    // 配额 = ceil(3 * 34 / 100) = 2, 中风险不占配额
    let results = engine.allocate(candidates, 1_000_000.0, 34.0);

    for result in &results {
        assert!(
            result.recommendation.is_buy(),
            "{} 应为 BUY",
            result.style_id()
        );
    }
}
