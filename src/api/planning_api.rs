// ==========================================
// Apex OTB 采购计划系统 - 计划智能 API
// ==========================================
// 职责: 封装规范化引擎 + 分配引擎 + 手工选择台账,
//       供前端计划界面在每次参数变化时同步调用
// 架构: API 层 → Engine 层 (CatalogNormalizer / AllocationEngine)
// 红线: 引擎建议与手工选择互不干扰; 台账单写者约束由互斥锁保证
// ==========================================

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::product::{AllocationResult, CandidateProduct};
use crate::domain::types::RiskCategory;
use crate::engine::allocation::AllocationEngine;
use crate::engine::normalizer::CatalogNormalizer;
use crate::engine::selection_ledger::{BuySummary, SelectionLedger};
use crate::repository::product_repo::ProductRepository;

// ==========================================
// 推荐备忘缓存
// ==========================================

/// 备忘键: (候选集版本, 容量位模式, 风险容忍度位模式)
///
/// f64 以位模式比较, 保证键相等判断是精确的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AllocationKey {
    candidate_set_version: u64,
    max_capacity_bits: u64,
    max_risk_pct_bits: u64,
}

impl AllocationKey {
    fn new(candidate_set_version: u64, max_capacity: f64, max_risk_pct: f64) -> Self {
        Self {
            candidate_set_version,
            max_capacity_bits: max_capacity.to_bits(),
            max_risk_pct_bits: max_risk_pct.to_bits(),
        }
    }
}

/// 候选集缓存: 版本号随每次刷新递增
struct CandidateCache {
    version: u64,
    candidates: Arc<Vec<CandidateProduct>>,
}

/// 最近一次推荐结果的确定性缓存
/// (引擎是纯函数, 相同键直接复用结果, 避免冗余重算)
struct AllocationMemo {
    key: AllocationKey,
    results: Arc<Vec<AllocationResult>>,
}

// ==========================================
// PlanningApi - 计划智能 API
// ==========================================

/// 计划智能API
///
/// 职责:
/// 1. 候选集加载与严格规范化 (坏记录整体失败)
/// 2. 推荐计算 (带确定性备忘缓存)
/// 3. 手工选择台账操作与 KPI 汇总
pub struct PlanningApi {
    /// 商品目录仓储
    product_repo: Arc<ProductRepository>,
    /// 规范化引擎
    normalizer: CatalogNormalizer,
    /// 分配引擎
    engine: AllocationEngine,
    /// 候选集缓存
    candidates: Mutex<CandidateCache>,
    /// 推荐备忘缓存
    memo: Mutex<Option<AllocationMemo>>,
    /// 手工选择台账 (会话内单写者)
    ledger: Arc<Mutex<SelectionLedger>>,
}

impl PlanningApi {
    /// 创建新的PlanningApi实例
    ///
    /// # 参数
    /// - product_repo: 商品目录仓储
    pub fn new(product_repo: Arc<ProductRepository>) -> Self {
        Self {
            product_repo,
            normalizer: CatalogNormalizer::new(),
            engine: AllocationEngine::new(),
            candidates: Mutex::new(CandidateCache {
                version: 0,
                candidates: Arc::new(Vec::new()),
            }),
            memo: Mutex::new(None),
            ledger: Arc::new(Mutex::new(SelectionLedger::new())),
        }
    }

    /// 台账句柄 (供上层共享同一会话台账)
    pub fn ledger_handle(&self) -> Arc<Mutex<SelectionLedger>> {
        Arc::clone(&self.ledger)
    }

    // ==========================================
    // 候选集管理
    // ==========================================

    /// 重新加载候选集
    ///
    /// 严格策略: 任一记录 cost/retail_price 非法, 整体失败,
    /// 保证喂给分配引擎的数据集正确。
    ///
    /// # 参数
    /// - dept_id: 可选部门过滤; None 加载全部商品
    ///
    /// # 返回
    /// - Ok(usize): 加载的候选数量
    pub fn refresh_candidates(&self, dept_id: Option<i64>) -> ApiResult<usize> {
        let raws = match dept_id {
            Some(id) => self.product_repo.list_by_dept(id)?,
            None => self.product_repo.list_all()?,
        };

        let normalized = self.normalizer.normalize_all(&raws)?;
        let count = normalized.len();

        let mut cache = self
            .candidates
            .lock()
            .map_err(|e| ApiError::InternalError(format!("候选集锁获取失败: {}", e)))?;
        cache.version += 1;
        cache.candidates = Arc::new(normalized);
        let version = cache.version;
        drop(cache);

        // 候选集变化使备忘缓存失效 (键含版本号, 清空只是提前释放)
        let mut memo = self
            .memo
            .lock()
            .map_err(|e| ApiError::InternalError(format!("备忘锁获取失败: {}", e)))?;
        *memo = None;

        info!(count, version, "候选集已刷新");
        Ok(count)
    }

    /// 当前候选集快照
    pub fn candidates(&self) -> ApiResult<Arc<Vec<CandidateProduct>>> {
        let cache = self
            .candidates
            .lock()
            .map_err(|e| ApiError::InternalError(format!("候选集锁获取失败: {}", e)))?;
        Ok(Arc::clone(&cache.candidates))
    }

    // ==========================================
    // 推荐计算
    // ==========================================

    /// 计算逐条采购建议
    ///
    /// 纯函数语义: 键 (候选集版本, 容量, 风险容忍度) 相同时
    /// 直接复用上次结果, 不重新执行引擎。
    ///
    /// # 参数
    /// - max_capacity: 预算容量上限 ($)
    /// - max_risk_pct: 高风险数量容忍度 (%)
    ///
    /// # 返回
    /// - Ok(Arc<Vec<AllocationResult>>): 按优先级降序的标注结果
    /// - Err(ApiError::InvalidInput): 参数非有限数
    pub fn get_recommendations(
        &self,
        max_capacity: f64,
        max_risk_pct: f64,
    ) -> ApiResult<Arc<Vec<AllocationResult>>> {
        if !max_capacity.is_finite() {
            return Err(ApiError::InvalidInput(format!(
                "max_capacity 必须为有限数: {}",
                max_capacity
            )));
        }
        if !max_risk_pct.is_finite() {
            return Err(ApiError::InvalidInput(format!(
                "max_risk_pct 必须为有限数: {}",
                max_risk_pct
            )));
        }

        let (version, candidates) = {
            let cache = self
                .candidates
                .lock()
                .map_err(|e| ApiError::InternalError(format!("候选集锁获取失败: {}", e)))?;
            (cache.version, Arc::clone(&cache.candidates))
        };

        let key = AllocationKey::new(version, max_capacity, max_risk_pct);

        let mut memo = self
            .memo
            .lock()
            .map_err(|e| ApiError::InternalError(format!("备忘锁获取失败: {}", e)))?;

        if let Some(cached) = memo.as_ref() {
            if cached.key == key {
                debug!(version, "推荐命中备忘缓存");
                return Ok(Arc::clone(&cached.results));
            }
        }

        let results = Arc::new(
            self.engine
                .allocate((*candidates).clone(), max_capacity, max_risk_pct),
        );
        *memo = Some(AllocationMemo {
            key,
            results: Arc::clone(&results),
        });

        Ok(results)
    }

    // ==========================================
    // 手工选择台账
    // ==========================================

    /// 勾选商品 (upsert)
    ///
    /// 引擎标记 PASS 的商品同样可以勾选; 差异提示由展示层负责
    pub fn select_style(
        &self,
        style_id: &str,
        cost: f64,
        risk_category: RiskCategory,
    ) -> ApiResult<()> {
        if style_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("款号不能为空".to_string()));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "采购金额必须为有限非负数: {}",
                cost
            )));
        }

        let mut ledger = self
            .ledger
            .lock()
            .map_err(|e| ApiError::InternalError(format!("台账锁获取失败: {}", e)))?;
        ledger.select(style_id, cost, risk_category);
        Ok(())
    }

    /// 取消勾选; 不存在时为无操作
    pub fn deselect_style(&self, style_id: &str) -> ApiResult<()> {
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|e| ApiError::InternalError(format!("台账锁获取失败: {}", e)))?;
        ledger.deselect(style_id);
        Ok(())
    }

    /// 清空台账 (显式操作)
    pub fn clear_selection(&self) -> ApiResult<()> {
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|e| ApiError::InternalError(format!("台账锁获取失败: {}", e)))?;
        ledger.clear();
        Ok(())
    }

    /// 按当前手工选择重算 KPI 汇总
    ///
    /// 与引擎建议无关, 只反映手工勾选状态
    pub fn buy_summary(&self, max_capacity: f64) -> ApiResult<BuySummary> {
        if !max_capacity.is_finite() {
            return Err(ApiError::InvalidInput(format!(
                "max_capacity 必须为有限数: {}",
                max_capacity
            )));
        }

        let ledger = self
            .ledger
            .lock()
            .map_err(|e| ApiError::InternalError(format!("台账锁获取失败: {}", e)))?;
        Ok(ledger.summary(max_capacity))
    }
}
