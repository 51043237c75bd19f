// ==========================================
// 包装车间周排班系统 - 领域类型定义
// ==========================================
// 职责: 技能等级 / 班段 / 班次类型 等基础枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 技能等级 (Skill Rating)
// ==========================================
// 四级制: N(未培训) / B(基础) / C(胜任) / S(专家)
// 红线: 解析是全函数, 未知输入一律降级为 N
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    None,       // N - 未培训
    Basic,      // B - 基础
    Competent,  // C - 胜任
    Specialist, // S - 专家
}

impl Rating {
    /// 解析原始等级字符串（大小写/空白不敏感）
    ///
    /// 未识别的值（包括空串）降级为 `Rating::None`
    pub fn parse(raw: &str) -> Rating {
        match raw.trim().to_uppercase().as_str() {
            "N" => Rating::None,
            "B" => Rating::Basic,
            "C" => Rating::Competent,
            "S" => Rating::Specialist,
            _ => Rating::None,
        }
    }

    /// 等级对应的数值分 (0-3)
    pub fn score(self) -> i32 {
        match self {
            Rating::None => 0,
            Rating::Basic => 1,
            Rating::Competent => 2,
            Rating::Specialist => 3,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::None => write!(f, "N"),
            Rating::Basic => write!(f, "B"),
            Rating::Competent => write!(f, "C"),
            Rating::Specialist => write!(f, "S"),
        }
    }
}

// ==========================================
// 班段 (Shift Block)
// ==========================================
// 一周四个排班单元, 处理顺序固定: DAY1 → DAY2 → NIGHT1 → NIGHT2
// 红线: 顺序影响稀缺高技能操作工的归属, 不得改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftBlock {
    Day1,
    Day2,
    Night1,
    Night2,
}

impl ShiftBlock {
    /// 固定处理顺序
    pub const ALL: [ShiftBlock; 4] = [
        ShiftBlock::Day1,
        ShiftBlock::Day2,
        ShiftBlock::Night1,
        ShiftBlock::Night2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftBlock::Day1 => "DAY1",
            ShiftBlock::Day2 => "DAY2",
            ShiftBlock::Night1 => "NIGHT1",
            ShiftBlock::Night2 => "NIGHT2",
        }
    }

    /// 从存储字符串解析（未知值返回 None）
    pub fn parse(raw: &str) -> Option<ShiftBlock> {
        match raw.trim().to_uppercase().as_str() {
            "DAY1" => Some(ShiftBlock::Day1),
            "DAY2" => Some(ShiftBlock::Day2),
            "NIGHT1" => Some(ShiftBlock::Night1),
            "NIGHT2" => Some(ShiftBlock::Night2),
            _ => None,
        }
    }

    /// 是否夜班段
    pub fn is_night(self) -> bool {
        matches!(self, ShiftBlock::Night1 | ShiftBlock::Night2)
    }

    /// 班段所属的班次类型 (Day / Night)
    pub fn kind(self) -> ShiftKind {
        if self.is_night() {
            ShiftKind::Night
        } else {
            ShiftKind::Day
        }
    }
}

impl fmt::Display for ShiftBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 班次类型 (Shift Kind)
// ==========================================
// 历史记录按 Day / Night 归档, 用于轮换公平性统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftKind {
    Day,
    Night,
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftKind::Day => write!(f, "Day"),
            ShiftKind::Night => write!(f, "Night"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_parse_and_score() {
        assert_eq!(Rating::parse("N"), Rating::None);
        assert_eq!(Rating::parse("b"), Rating::Basic);
        assert_eq!(Rating::parse(" C "), Rating::Competent);
        assert_eq!(Rating::parse("s"), Rating::Specialist);

        assert_eq!(Rating::parse("N").score(), 0);
        assert_eq!(Rating::parse("B").score(), 1);
        assert_eq!(Rating::parse("C").score(), 2);
        assert_eq!(Rating::parse("S").score(), 3);
    }

    #[test]
    fn test_rating_parse_unknown_degrades_to_none() {
        // 未知/空值不报错, 统一按 N 处理
        assert_eq!(Rating::parse(""), Rating::None);
        assert_eq!(Rating::parse("X"), Rating::None);
        assert_eq!(Rating::parse("specialist"), Rating::None);
        assert_eq!(Rating::parse("  ").score(), 0);
    }

    #[test]
    fn test_shift_block_order_and_kind() {
        let labels: Vec<&str> = ShiftBlock::ALL.iter().map(|b| b.as_str()).collect();
        assert_eq!(labels, vec!["DAY1", "DAY2", "NIGHT1", "NIGHT2"]);

        assert!(!ShiftBlock::Day1.is_night());
        assert!(ShiftBlock::Night2.is_night());
        assert_eq!(ShiftBlock::Day2.kind(), ShiftKind::Day);
        assert_eq!(ShiftBlock::Night1.kind(), ShiftKind::Night);
    }

    #[test]
    fn test_shift_block_roundtrip() {
        for block in ShiftBlock::ALL {
            assert_eq!(ShiftBlock::parse(block.as_str()), Some(block));
        }
        assert_eq!(ShiftBlock::parse("DAY3"), None);
    }
}
