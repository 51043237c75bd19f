// ==========================================
// 包装车间周排班系统 - 区域需求描述符
// ==========================================
// 职责: 一个区域一周的用人需求 (人数 + 准入谓词 + 评分函数)
// 红线: 每次生成请求临时重建, 不作为实体持久化
// ==========================================

use crate::domain::operator::SkillScores;

// ==========================================
// 区域名称常量
// ==========================================
pub const AREA_KEGGING_INSIDE: &str = "Kegging - Inside";
pub const AREA_KEGGING_OUTSIDE: &str = "Kegging - Outside";
pub const AREA_PILOTS: &str = "Pilots";
pub const AREA_PACKAGING: &str = "Packaging";
pub const AREA_MAB1: &str = "MAB1";
pub const AREA_MAB2: &str = "MAB2";
pub const AREA_CORONA: &str = "Corona";
pub const AREA_CANNING: &str = "Canning";
pub const AREA_KEG_LOADING: &str = "Keg Loading";
pub const AREA_MAGOR1_LOADING: &str = "Magor 1 Loading";
pub const AREA_TENTS: &str = "Tents";

/// 区域最低技能准入谓词
pub type SkillPredicate = fn(&SkillScores) -> bool;

/// 区域加权技能评分函数
pub type SkillScoreFn = fn(&SkillScores) -> i32;

// ==========================================
// AreaDemand - 区域需求
// ==========================================
// 策略表条目: 准入与评分以纯函数指针携带,
// 区域规则保持声明式, 可单独测试
#[derive(Debug, Clone)]
pub struct AreaDemand {
    pub area: String,
    /// 周内每个班段的需求人数
    pub count: u32,
    /// 保底人数: 即使放宽准入也必须先行填满的席位数 (无保底为 0)
    pub min_count: u32,
    /// 严格候选过滤用的准入谓词; None 表示该区域无准入门槛
    pub min_eligible: Option<SkillPredicate>,
    /// 区域加权技能分
    pub score_fn: SkillScoreFn,
}

impl AreaDemand {
    /// 区域名是否含 "canning"（带包装线保底规则的区域族）
    pub fn is_canning_area(&self) -> bool {
        self.area.to_lowercase().contains("canning")
    }
}
