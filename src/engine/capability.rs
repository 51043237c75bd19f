// ==========================================
// 包装车间周排班系统 - 能力评分核心
// ==========================================
// 职责: 等级换算 + 出勤单元格判定 (纯函数, 不碰数据库)
// 红线: 全函数 —— 任何脏数据都有确定结果, 绝不失败
// ==========================================

use crate::domain::operator::Availability;
use crate::domain::types::Rating;

// ==========================================
// CapabilityScorer - 能力评分核心
// ==========================================
pub struct CapabilityScorer;

impl CapabilityScorer {
    /// 能力等级 → 数值分 (0-3)
    ///
    /// 缺失/未识别的等级按 N (0 分) 处理
    pub fn rating_to_score(raw: Option<&str>) -> i32 {
        Rating::parse(raw.unwrap_or("")).score()
    }

    /// 单元格是否"出勤"
    ///
    /// 非空且不是 H / SICK / OFF (大小写与空白不敏感)
    pub fn is_working_cell(cell: Option<&str>) -> bool {
        let t = cell.unwrap_or("").trim().to_uppercase();
        if t.is_empty() {
            return false;
        }
        !matches!(t.as_str(), "H" | "SICK" | "OFF")
    }

    /// 单元格是否"不可用" (休假/病假/休息)
    pub fn is_unavailable_cell(cell: Option<&str>) -> bool {
        matches!(
            cell.unwrap_or("").trim().to_uppercase().as_str(),
            "H" | "SICK" | "OFF"
        )
    }

    /// 四个班段是否全部不可用
    ///
    /// 注意: 空单元格不算"不可用", 全空的操作工留在池内
    /// （不会被任何班段选中, 但可出现在缺口推荐之外的统计里）
    pub fn fully_unavailable(availability: &Availability) -> bool {
        Self::is_unavailable_cell(availability.day1.as_deref())
            && Self::is_unavailable_cell(availability.day2.as_deref())
            && Self::is_unavailable_cell(availability.night1.as_deref())
            && Self::is_unavailable_cell(availability.night2.as_deref())
    }
}
