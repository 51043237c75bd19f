// ==========================================
// 包装车间周排班系统 - 排班产出实体
// ==========================================
// 职责: 周排班分配 / 缺口 / 分配历史 三类产出行
// ==========================================

use crate::domain::types::{ShiftBlock, ShiftKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Allocation - 单条排班分配
// ==========================================
// 一个操作工（或外包 "Agency"）→ 一个区域 × 一个班段
// 不变量: 同一 (周, 班段) 内一个操作工最多出现一次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    pub week_commencing: NaiveDate,
    pub area: String,
    pub shift_block: ShiftBlock,
    /// 外包占位行 (assigned_to = "Agency") 时为 None
    pub operator_id: Option<String>,
    /// 人工复核界面写入的占位标记, 引擎只写 None
    pub assigned_to: Option<String>,
    /// 胜出时的综合评分
    pub score: i32,
    /// 休息顶岗行标记（人工复核新增, 引擎不产出）
    pub is_break_cover: bool,
    /// 仅 is_break_cover 时有意义
    pub hours_required: f64,
}

impl Allocation {
    /// 引擎产出的标准分配行
    pub fn engine_row(
        week_commencing: NaiveDate,
        area: &str,
        shift_block: ShiftBlock,
        operator_id: &str,
        score: i32,
    ) -> Allocation {
        Allocation {
            id: Uuid::new_v4().to_string(),
            week_commencing,
            area: area.to_string(),
            shift_block,
            operator_id: Some(operator_id.to_string()),
            assigned_to: None,
            score,
            is_break_cover: false,
            hours_required: 0.0,
        }
    }
}

// ==========================================
// Recommendation - 缺口候选推荐
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub operator_id: String,
    pub name: String,
    pub score: i32,
}

// ==========================================
// Gap - 未满足需求
// ==========================================
// 每次生成整体重算并替换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub id: String,
    pub week_commencing: NaiveDate,
    pub shift_block: ShiftBlock,
    pub area: String,
    /// 缺员数, 恒 ≥ 1
    pub missing_count: u32,
    /// 按评分降序的候选, 最多 5 条
    pub recommendations: Vec<Recommendation>,
}

// ==========================================
// AllocationHistoryRecord - 分配历史
// ==========================================
// 不可变事实: 某操作工在某周承担过某区域
// 红线: 只追加, 引擎绝不更新或删除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationHistoryRecord {
    pub id: String,
    pub operator_id: String,
    pub week_commencing: NaiveDate,
    /// 来源班段标签 (DAY1 等)
    pub day_name: String,
    pub shift: ShiftKind,
    pub area: String,
    /// 岗位名, 当前与区域同值
    pub position: String,
}

impl AllocationHistoryRecord {
    /// 由一条分配行派生历史记录
    pub fn from_allocation(allocation: &Allocation, operator_id: &str) -> AllocationHistoryRecord {
        AllocationHistoryRecord {
            id: Uuid::new_v4().to_string(),
            operator_id: operator_id.to_string(),
            week_commencing: allocation.week_commencing,
            day_name: allocation.shift_block.as_str().to_string(),
            shift: allocation.shift_block.kind(),
            area: allocation.area.clone(),
            position: allocation.area.clone(),
        }
    }
}
