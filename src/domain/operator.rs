// ==========================================
// 包装车间周排班系统 - 操作工实体
// ==========================================
// 职责: 操作工档案 + 周人员计划行 + 分配就绪的池条目
// 红线: 引擎内只读, 核心算法不得回写操作工数据
// ==========================================

use crate::domain::types::ShiftBlock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SkillScores - 派生技能分
// ==========================================
// 由能力等级 (N/B/C/S) 换算得到的 0-3 数值分
// 覆盖 13 个跟踪技能域
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScores {
    pub flt: i32,
    pub canning: i32,
    pub mab1: i32,
    pub mab2: i32,
    pub corona: i32,
    pub keg_in: i32,
    pub keg_out: i32,
    pub wms: i32,
    pub sap: i32,
    pub say: i32,
    pub packaging: i32,
    pub loaders: i32,
    pub pilots: i32,
}

// ==========================================
// Availability - 四个班段的出勤单元格
// ==========================================
// 单元格为自由文本: "Y" 表示出勤, H/SICK/OFF 表示不可用,
// 其余非空值一律按出勤处理（加班、跨班支援等）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub day1: Option<String>,
    pub day2: Option<String>,
    pub night1: Option<String>,
    pub night2: Option<String>,
}

impl Availability {
    /// 取指定班段的单元格原始值
    pub fn cell(&self, block: ShiftBlock) -> Option<&str> {
        match block {
            ShiftBlock::Day1 => self.day1.as_deref(),
            ShiftBlock::Day2 => self.day2.as_deref(),
            ShiftBlock::Night1 => self.night1.as_deref(),
            ShiftBlock::Night2 => self.night2.as_deref(),
        }
    }
}

// ==========================================
// Operator - 分配就绪的池条目
// ==========================================
// 由 OperatorPoolBuilder 过滤/塑形后产出, 引擎只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub operator_id: String,
    pub name: String,
    pub is_agency: bool,
    /// 本班标签 (A/B/C/D), 主班为 None
    pub shift: Option<String>,
    /// 自由文本角色, 用于角色优先加分匹配
    pub role: String,
    /// 自由文本约束, 由约束否决规则做子串匹配
    pub constraints: String,
    /// 最适区域标记: 区域键 → 是否标记
    pub best_suited_areas: BTreeMap<String, bool>,
    pub availability: Availability,
    pub skills: SkillScores,
}

// ==========================================
// CapabilityRatings - 原始能力等级记录
// ==========================================
// 数据来源: operator_capabilities 表, 逐格存放 N/B/C/S 字符串
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityRatings {
    pub flt: Option<String>,
    pub canning: Option<String>,
    pub mab1: Option<String>,
    pub mab2: Option<String>,
    pub corona: Option<String>,
    pub kegging_inside: Option<String>,
    pub kegging_outside: Option<String>,
    pub wms: Option<String>,
    pub sap: Option<String>,
    pub say: Option<String>,
    pub packaging: Option<String>,
    pub loaders: Option<String>,
    pub pilots: Option<String>,
}

// ==========================================
// StaffPlanRow - 周人员计划联查行
// ==========================================
// weekly_staff_plan ⋈ operators ⋈ operator_capabilities
// 未过滤的原始读模型, 由 OperatorPoolBuilder 消化
#[derive(Debug, Clone)]
pub struct StaffPlanRow {
    pub operator_id: String,
    pub name: String,
    pub is_active: bool,
    pub is_agency: bool,
    pub shift: Option<String>,
    pub role: Option<String>,
    pub constraints: Option<String>,
    /// best_suited_areas 的原始 JSON 文本
    pub best_suited_areas: Option<String>,
    pub availability: Availability,
    /// 无能力记录的操作工为 None, 池构建时整行剔除
    pub capabilities: Option<CapabilityRatings>,
}
