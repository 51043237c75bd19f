// ==========================================
// 包装车间周排班系统 - 引擎编排器
// ==========================================
// 用途: 协调需求/池/轮换/分配/缺口/历史各引擎的执行顺序
// 红线: 纯内存计算, 读写外部存储是 API 层的事
// ==========================================

use crate::domain::allocation::{Allocation, AllocationHistoryRecord, Gap};
use crate::domain::line_plan::{DailyLinePlan, WeeklyLinePlan};
use crate::domain::operator::StaffPlanRow;
use crate::engine::allocator::RotaAllocator;
use crate::engine::demand_builder::DemandBuilder;
use crate::engine::gap_reporter::GapReporter;
use crate::engine::history_writer::HistoryWriter;
use crate::engine::pool_builder::OperatorPoolBuilder;
use crate::engine::rotation::{FairnessPolicy, RotationHistoryIndex};
use chrono::NaiveDate;
use tracing::{debug, info};

// ==========================================
// RotaComputation - 排班计算结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RotaComputation {
    pub week_commencing: NaiveDate,
    pub allocations: Vec<Allocation>,
    pub gaps: Vec<Gap>,
    pub history: Vec<AllocationHistoryRecord>,
    /// 参与分配的池规模
    pub pool_count: usize,
}

// ==========================================
// RotaOrchestrator - 引擎编排器
// ==========================================
pub struct RotaOrchestrator {
    policy: FairnessPolicy,
    default_pilots: i32,
}

impl RotaOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - policy: 轮换公平性策略
    /// - default_pilots: 领航员默认需求人数
    pub fn new(policy: FairnessPolicy, default_pilots: i32) -> Self {
        Self {
            policy,
            default_pilots,
        }
    }

    /// 执行完整排班计算（单周）
    ///
    /// # 参数
    /// - week_commencing: 周起始日（周一）
    /// - daily_plans: 当周逐日产线计划
    /// - staff_rows: 当周人员计划联查行
    /// - history_records: 回看窗口内的分配历史
    ///
    /// # 返回
    /// 排班计算结果（未持久化）
    pub fn run(
        &self,
        week_commencing: NaiveDate,
        daily_plans: &[DailyLinePlan],
        staff_rows: &[StaffPlanRow],
        history_records: &[AllocationHistoryRecord],
    ) -> RotaComputation {
        info!(
            week_commencing = %week_commencing,
            daily_plans = daily_plans.len(),
            staff_rows = staff_rows.len(),
            history_records = history_records.len(),
            "开始执行排班计算"
        );

        // 步骤1: 聚合周产线计划
        debug!("步骤1: 聚合周产线计划");
        let weekly_plan = WeeklyLinePlan::aggregate(daily_plans, self.default_pilots);

        // 步骤2: 构建区域需求表
        debug!("步骤2: 构建区域需求表");
        let demand = DemandBuilder::build(&weekly_plan);

        // 步骤3: 构建操作工池
        debug!("步骤3: 构建操作工池");
        let pool = OperatorPoolBuilder::build(staff_rows);

        // 步骤4: 构建轮换历史索引
        debug!("步骤4: 构建轮换历史索引");
        let rotation = RotationHistoryIndex::build(history_records, week_commencing, self.policy);

        // 步骤5: 逐班段两阶段分配
        debug!("步骤5: 逐班段两阶段分配");
        let allocator = RotaAllocator::new(&pool, &demand, &rotation);
        let allocations = allocator.allocate(week_commencing);

        // 步骤6: 缺口统计与推荐
        debug!("步骤6: 缺口统计与推荐");
        let gaps = GapReporter::report(&pool, &demand, &allocations, week_commencing);

        // 步骤7: 派生分配历史
        debug!("步骤7: 派生分配历史");
        let history = HistoryWriter::derive(&allocations);

        info!(
            allocations = allocations.len(),
            gaps = gaps.len(),
            pool_count = pool.len(),
            "排班计算完成"
        );

        RotaComputation {
            week_commencing,
            allocations,
            gaps,
            history,
            pool_count: pool.len(),
        }
    }
}
