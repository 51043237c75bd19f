// ==========================================
// 包装车间周排班系统 - 缺口报告器
// ==========================================
// 职责: 分配完成后统计未满足需求, 并给出排序候选推荐
// 说明: 推荐不做准入门槛过滤（缺口本身就是人手不够的信号）,
//       评分只计技能分 + 角色加分
// ==========================================

use crate::domain::allocation::{Allocation, Gap, Recommendation};
use crate::domain::demand::AreaDemand;
use crate::domain::operator::Operator;
use crate::domain::types::ShiftBlock;
use crate::engine::capability::CapabilityScorer;
use crate::engine::scoring::{passes_constraints, CandidateScorer};
use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

/// 每个缺口最多给出的推荐数
const MAX_RECOMMENDATIONS: usize = 5;

// ==========================================
// GapReporter - 缺口报告器
// ==========================================
pub struct GapReporter;

impl GapReporter {
    /// 统计每个 (区域, 班段) 的缺员并生成推荐
    pub fn report(
        pool: &[Operator],
        demand: &[AreaDemand],
        allocations: &[Allocation],
        week_commencing: NaiveDate,
    ) -> Vec<Gap> {
        // 区域需求总量, 保持声明顺序
        let mut totals: Vec<(String, u32)> = Vec::new();
        for d in demand {
            match totals.iter_mut().find(|(area, _)| *area == d.area) {
                Some(entry) => entry.1 += d.count,
                None => totals.push((d.area.clone(), d.count)),
            }
        }

        let mut gaps: Vec<Gap> = Vec::new();

        for block in ShiftBlock::ALL {
            let assigned_in_shift: HashSet<&str> = allocations
                .iter()
                .filter(|a| a.shift_block == block)
                .filter_map(|a| a.operator_id.as_deref())
                .collect();

            for (area, required) in &totals {
                let allocated = allocations
                    .iter()
                    .filter(|a| a.area == *area && a.shift_block == block)
                    .count() as i64;
                let missing = *required as i64 - allocated;
                if missing <= 0 {
                    continue;
                }

                // 区域唯一, find 命中首条声明
                let Some(area_demand) = demand.iter().find(|d| d.area == *area) else {
                    continue;
                };

                let mut recommendations: Vec<Recommendation> = pool
                    .iter()
                    .filter(|op| CapabilityScorer::is_working_cell(op.availability.cell(block)))
                    .filter(|op| !assigned_in_shift.contains(op.operator_id.as_str()))
                    .filter(|op| passes_constraints(op, area, block))
                    .map(|op| Recommendation {
                        operator_id: op.operator_id.clone(),
                        name: op.name.clone(),
                        score: CandidateScorer::recommendation_score(op, area_demand),
                    })
                    .collect();

                recommendations.sort_by(|a, b| b.score.cmp(&a.score));
                recommendations.truncate(MAX_RECOMMENDATIONS);

                gaps.push(Gap {
                    id: Uuid::new_v4().to_string(),
                    week_commencing,
                    shift_block: block,
                    area: area.clone(),
                    missing_count: missing as u32,
                    recommendations,
                });
            }
        }

        gaps
    }
}
