// ==========================================
// 包装车间周排班系统 - 周排班生成 API
// ==========================================
// 职责: 校验请求 → 读取输入 → 引擎计算 → 事务化持久 → 汇总响应
// 红线: 同一周单写者 —— 每周一把咨询锁, 并发生成串行化
// 红线: 输入缺失在任何删除/写入之前返回, 绝不半写
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::rota_config_trait::RotaConfigReader;
use crate::engine::orchestrator::RotaOrchestrator;
use crate::engine::rotation::FairnessPolicy;
use crate::repository::history_repo::AllocationHistoryRepository;
use crate::repository::line_plan_repo::LinePlanRepository;
use crate::repository::rota_repo::RotaRepository;
use crate::repository::staff_plan_repo::StaffPlanRepository;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, instrument};

// ==========================================
// GenerateRotaResponse - 生成结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRotaResponse {
    pub week_commencing: String,
    /// 写入的分配行数
    pub allocated_count: usize,
    /// 参与分配的池规模
    pub pool_count: usize,
}

// ==========================================
// RotaApi - 周排班生成 API
// ==========================================
pub struct RotaApi<C>
where
    C: RotaConfigReader,
{
    line_plan_repo: Arc<LinePlanRepository>,
    staff_plan_repo: Arc<StaffPlanRepository>,
    rota_repo: Arc<RotaRepository>,
    history_repo: Arc<AllocationHistoryRepository>,
    config: Arc<C>,
    /// 周 → 咨询锁; 同一周的并发生成请求在此串行化
    week_locks: AsyncMutex<HashMap<NaiveDate, Arc<AsyncMutex<()>>>>,
}

impl<C> RotaApi<C>
where
    C: RotaConfigReader,
{
    /// 创建新的 RotaApi 实例
    ///
    /// # 参数
    /// - line_plan_repo: 产线计划仓储
    /// - staff_plan_repo: 周人员计划仓储
    /// - rota_repo: 周排班仓储
    /// - history_repo: 分配历史仓储
    /// - config: 配置读取器
    pub fn new(
        line_plan_repo: Arc<LinePlanRepository>,
        staff_plan_repo: Arc<StaffPlanRepository>,
        rota_repo: Arc<RotaRepository>,
        history_repo: Arc<AllocationHistoryRepository>,
        config: Arc<C>,
    ) -> Self {
        Self {
            line_plan_repo,
            staff_plan_repo,
            rota_repo,
            history_repo,
            config,
            week_locks: AsyncMutex::new(HashMap::new()),
        }
    }

    /// 生成一周排班
    ///
    /// # 参数
    /// - week_commencing: 周起始日, ISO 格式 (YYYY-MM-DD), 必须为周一
    ///
    /// # 返回
    /// - Ok(GenerateRotaResponse): 周键 + 分配行数 + 池规模
    /// - Err(ApiError::InvalidInput): 日期不可解析或非周一
    /// - Err(ApiError::NotFound): 当周无产线计划或无人员计划
    ///
    /// # 说明
    /// - 重跑同一周: 分配/缺口整体替换, 历史只追加
    /// - 候选短缺不是错误, 落入缺口报告
    #[instrument(skip(self))]
    pub async fn generate_weekly_rota(
        &self,
        week_commencing: &str,
    ) -> ApiResult<GenerateRotaResponse> {
        let week = Self::parse_week(week_commencing)?;

        // 同一周单写者: 先取周锁再碰存储
        let week_lock = {
            let mut locks = self.week_locks.lock().await;
            locks
                .entry(week)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let _guard = week_lock.lock().await;

        // === 配置快照 ===
        let lookback_days = self
            .config
            .get_rotation_lookback_days()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let penalty_tiers = self
            .config
            .get_rotation_penalty_tiers()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let default_pilots = self
            .config
            .get_default_pilots_required()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        // === 读取输入（缺失即终止, 未发生任何写入） ===
        let daily_plans = self.line_plan_repo.find_week(week)?;
        if daily_plans.is_empty() {
            return Err(ApiError::NotFound(format!(
                "周 {} 没有任何产线计划, 请先创建产线计划",
                week
            )));
        }

        let staff_rows = self.staff_plan_repo.find_week_rows(week)?;
        if staff_rows.is_empty() {
            return Err(ApiError::NotFound(format!(
                "周 {} 没有任何人员计划行",
                week
            )));
        }

        let history_records = self.history_repo.find_window(week, lookback_days)?;

        // === 引擎计算 ===
        let policy = FairnessPolicy {
            lookback_days,
            penalty_tiers,
        };
        let orchestrator = RotaOrchestrator::new(policy, default_pilots);
        let computation = orchestrator.run(week, &daily_plans, &staff_rows, &history_records);

        // === 事务化持久: 分配/缺口整周替换, 历史追加 ===
        let (allocated, gaps, history) = self.rota_repo.replace_week(
            week,
            &computation.allocations,
            &computation.gaps,
            &computation.history,
        )?;

        info!(
            week_commencing = %week,
            allocated_count = allocated,
            gap_count = gaps,
            history_count = history,
            pool_count = computation.pool_count,
            "周排班生成完成"
        );

        Ok(GenerateRotaResponse {
            week_commencing: week.to_string(),
            allocated_count: allocated,
            pool_count: computation.pool_count,
        })
    }

    /// 解析并校验周起始日
    fn parse_week(raw: &str) -> ApiResult<NaiveDate> {
        let week = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            ApiError::InvalidInput(format!(
                "周起始日必须是 ISO 日期 (YYYY-MM-DD): {}",
                raw
            ))
        })?;

        if week.weekday() != Weekday::Mon {
            return Err(ApiError::InvalidInput(format!(
                "周起始日必须是周一: {} 是 {:?}",
                week,
                week.weekday()
            )));
        }

        Ok(week)
    }
}
