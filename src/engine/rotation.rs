// ==========================================
// 包装车间周排班系统 - 轮换历史索引
// ==========================================
// 职责: 分配历史 → 操作工×区域 的"几周前"索引 + 分级惩罚
// 红线: 回看窗口与惩罚分级是可调公平性策略, 一律参数化
// ==========================================

use crate::domain::allocation::AllocationHistoryRecord;
use chrono::NaiveDate;
use std::collections::HashMap;

// ==========================================
// FairnessPolicy - 轮换公平性策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairnessPolicy {
    /// 历史回看窗口（天）
    pub lookback_days: i64,
    /// 分级惩罚: [1周前, 2周前, 3周前, 4周前]
    pub penalty_tiers: [i32; 4],
}

impl Default for FairnessPolicy {
    fn default() -> Self {
        Self {
            lookback_days: 28,
            penalty_tiers: [-20, -15, -10, -5],
        }
    }
}

// ==========================================
// RotationHistoryIndex - 轮换历史索引
// ==========================================
pub struct RotationHistoryIndex {
    policy: FairnessPolicy,
    /// operator_id → area → 各次分配距今的整周数
    index: HashMap<String, HashMap<String, Vec<i64>>>,
}

impl RotationHistoryIndex {
    /// 由历史记录构建索引
    ///
    /// # 参数
    /// - records: 分配历史（仓储已按窗口查询, 这里再按窗口防御性过滤）
    /// - week_commencing: 目标周起始日
    /// - policy: 公平性策略
    pub fn build(
        records: &[AllocationHistoryRecord],
        week_commencing: NaiveDate,
        policy: FairnessPolicy,
    ) -> Self {
        let mut index: HashMap<String, HashMap<String, Vec<i64>>> = HashMap::new();

        for record in records {
            let days_ago = (week_commencing - record.week_commencing).num_days();
            if days_ago <= 0 || days_ago > policy.lookback_days {
                continue;
            }
            let weeks_ago = days_ago / 7;

            index
                .entry(record.operator_id.clone())
                .or_default()
                .entry(record.area.clone())
                .or_default()
                .push(weeks_ago);
        }

        Self { policy, index }
    }

    /// 空索引（无历史时的快捷构造）
    pub fn empty(policy: FairnessPolicy) -> Self {
        Self {
            policy,
            index: HashMap::new(),
        }
    }

    /// 轮换惩罚分
    ///
    /// 取该操作工在该区域最近一次分配的周数:
    /// 1..=4 周前 → 对应分级惩罚; 无历史或 ≥5 周 → 0
    pub fn penalty(&self, operator_id: &str, area: &str) -> i32 {
        let Some(operator_history) = self.index.get(operator_id) else {
            return 0;
        };
        let Some(area_history) = operator_history.get(area) else {
            return 0;
        };
        let Some(most_recent) = area_history.iter().min().copied() else {
            return 0;
        };

        match most_recent {
            1..=4 => self.policy.penalty_tiers[(most_recent - 1) as usize],
            _ => 0,
        }
    }
}
