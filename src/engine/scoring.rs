// ==========================================
// 包装车间周排班系统 - 候选评分引擎
// ==========================================
// 职责: 角色优先加分 / 最适区域加分 / 约束否决 / 综合评分
// 红线: 角色 +10 与最适 +50 两个加分并存, 不互斥
// ==========================================

use crate::domain::demand::AreaDemand;
use crate::domain::operator::Operator;
use crate::domain::types::ShiftBlock;
use crate::engine::rotation::RotationHistoryIndex;

/// 专职角色命中加分
const ROLE_MATCH_BONUS: i32 = 15;
/// 班组长/多面手加分
const ROLE_FLEX_BONUS: i32 = 8;
/// 最适区域键名命中加分（角色加分的一部分）
const ROLE_BEST_SUITED_BONUS: i32 = 10;
/// 最适区域独立加分
const BEST_SUITED_BONUS: i32 = 50;

/// 最适区域键 → 区域名匹配短语表
///
/// 表序固定; 任一标记键的短语与区域名互为子串即命中
const BEST_SUITED_AREA_TERMS: &[(&str, &[&str])] = &[
    ("kegging_inside", &["kegging - inside", "kegging inside"]),
    ("kegging_outside", &["kegging - outside", "kegging outside"]),
    ("keg_loading", &["keg loading"]),
    ("pilots", &["pilots"]),
    ("canning", &["canning"]),
    ("mab1", &["mab1"]),
    ("mab2", &["mab2"]),
    ("corona", &["corona"]),
    ("packaging", &["packaging"]),
    ("loaders", &["magor 1 loading", "magor loading", "loading"]),
    ("tents", &["tents"]),
];

/// 角色优先加分
///
/// 按区域族走互斥分支: 专职角色 +15, 班组长/多面手 +8;
/// 另有最适区域键名匹配的一次性 +10（首个命中即止）
pub fn role_priority_bonus(op: &Operator, area: &str) -> i32 {
    let role = op.role.to_lowercase();
    let area_lower = area.to_lowercase();

    let mut bonus = 0;
    if area_lower.contains("pilot") {
        if role.contains("distop") || role.contains("pilot") {
            bonus = ROLE_MATCH_BONUS;
        } else if role.contains("supervisor") || role.contains("multi-op") {
            bonus = ROLE_FLEX_BONUS;
        }
    } else if area_lower.contains("kegging") {
        if role.contains("kegging") {
            bonus = ROLE_MATCH_BONUS;
        } else if role.contains("supervisor") || role.contains("multi-op") {
            bonus = ROLE_FLEX_BONUS;
        }
    } else if area_lower.contains("packaging") {
        if role.contains("packaging") {
            bonus = ROLE_MATCH_BONUS;
        } else if role.contains("supervisor") || role.contains("multi-op") {
            bonus = ROLE_FLEX_BONUS;
        }
    } else if area_lower.contains("loading") || area_lower.contains("loader") {
        if role.contains("loader") {
            bonus = ROLE_MATCH_BONUS;
        } else if role.contains("supervisor") || role.contains("multi-op") {
            bonus = ROLE_FLEX_BONUS;
        }
    } else if area_lower.contains("canning")
        || area_lower.contains("mab")
        || area_lower.contains("corona")
        || area_lower.contains("tents")
    {
        if role.contains("supervisor") || role.contains("multi-op") {
            bonus = ROLE_FLEX_BONUS;
        }
    }

    // 最适区域键名直接与区域名互为子串 → 一次性 +10
    for (key, suited) in &op.best_suited_areas {
        if *suited {
            let key_normalized = key.to_lowercase().replace('_', " ");
            if area_lower.contains(&key_normalized) || key_normalized.contains(&area_lower) {
                bonus += ROLE_BEST_SUITED_BONUS;
                break;
            }
        }
    }

    bonus
}

/// 最适区域独立加分
///
/// 经固定短语表匹配任一标记键 → +50, 否则 0
pub fn best_suited_bonus(op: &Operator, area: &str) -> i32 {
    let area_lower = area.to_lowercase();

    for (key, terms) in BEST_SUITED_AREA_TERMS {
        if op.best_suited_areas.get(*key).copied().unwrap_or(false) {
            for term in *terms {
                if area_lower.contains(term) || term.contains(&area_lower) {
                    return BEST_SUITED_BONUS;
                }
            }
        }
    }

    0
}

/// 约束否决
///
/// 两条成文规则:
/// 1. 约束含 "flt" 与 "night" 且夜班段且区域名含 "flt" → 否决
/// 2. 约束含 "no" 且含小写区域名 → 否决
pub fn passes_constraints(op: &Operator, area: &str, block: ShiftBlock) -> bool {
    let constraints = op.constraints.to_lowercase();
    let area_lower = area.to_lowercase();

    if constraints.contains("flt")
        && constraints.contains("night")
        && block.is_night()
        && area_lower.contains("flt")
    {
        return false;
    }

    if constraints.contains("no") && constraints.contains(&area_lower) {
        return false;
    }

    true
}

// ==========================================
// CandidateScorer - 综合评分
// ==========================================
// score = 区域技能分 + 角色优先加分 + 轮换惩罚 + 最适区域加分
pub struct CandidateScorer<'a> {
    rotation: &'a RotationHistoryIndex,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(rotation: &'a RotationHistoryIndex) -> Self {
        Self { rotation }
    }

    /// 分配排序用综合评分
    pub fn score(&self, op: &Operator, demand: &AreaDemand) -> i32 {
        let base = (demand.score_fn)(&op.skills);
        let role = role_priority_bonus(op, &demand.area);
        let rotation = self.rotation.penalty(&op.operator_id, &demand.area);
        let suited = best_suited_bonus(op, &demand.area);
        base + role + rotation + suited
    }

    /// 缺口推荐用评分（只计技能分 + 角色加分）
    pub fn recommendation_score(op: &Operator, demand: &AreaDemand) -> i32 {
        (demand.score_fn)(&op.skills) + role_priority_bonus(op, &demand.area)
    }
}
