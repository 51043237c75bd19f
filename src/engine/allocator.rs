// ==========================================
// 包装车间周排班系统 - 分配引擎
// ==========================================
// 职责: 逐班段两阶段贪心填充 (保底席位 → 剩余需求)
// 红线:
// - 班段顺序 DAY1 → DAY2 → NIGHT1 → NIGHT2 固定
// - 严格/放宽两轮候选检索共用同一条命名管线, 两处调用不得漂移
// - 罐装族区域: 本班段尚无正式工时, 只要有正式工候选就优先于外包
// ==========================================

use crate::domain::allocation::Allocation;
use crate::domain::demand::AreaDemand;
use crate::domain::operator::Operator;
use crate::domain::types::ShiftBlock;
use crate::engine::capability::CapabilityScorer;
use crate::engine::rotation::RotationHistoryIndex;
use crate::engine::scoring::{passes_constraints, CandidateScorer};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

// ==========================================
// ScoredCandidate - 带分候选
// ==========================================
struct ScoredCandidate<'a> {
    op: &'a Operator,
    score: i32,
}

// ==========================================
// RotaAllocator - 分配引擎
// ==========================================
pub struct RotaAllocator<'a> {
    pool: &'a [Operator],
    demand: &'a [AreaDemand],
    scorer: CandidateScorer<'a>,
}

impl<'a> RotaAllocator<'a> {
    pub fn new(
        pool: &'a [Operator],
        demand: &'a [AreaDemand],
        rotation: &'a RotationHistoryIndex,
    ) -> Self {
        Self {
            pool,
            demand,
            scorer: CandidateScorer::new(rotation),
        }
    }

    /// 为目标周生成全部分配行
    ///
    /// # 流程（逐班段独立）
    /// 1. 阶段一: min_count > 0 的区域按声明顺序先填保底席位
    /// 2. 阶段二: 全部区域按声明顺序补齐剩余需求
    /// 3. 选不出人的席位直接留空, 由缺口报告兜底, 不视为错误
    pub fn allocate(&self, week_commencing: NaiveDate) -> Vec<Allocation> {
        let mut rows: Vec<Allocation> = Vec::new();

        for block in ShiftBlock::ALL {
            let mut used_in_shift: HashSet<String> = HashSet::new();

            // === 阶段一: 保底席位 ===
            for area_def in self.demand.iter().filter(|d| d.min_count > 0) {
                for _ in 0..area_def.min_count {
                    self.fill_slot(area_def, block, &mut used_in_shift, &mut rows, week_commencing);
                }
            }

            // === 阶段二: 剩余需求 ===
            for area_def in self.demand {
                let already_allocated = rows
                    .iter()
                    .filter(|a| a.area == area_def.area && a.shift_block == block)
                    .count() as i64;
                let remaining = area_def.count as i64 - already_allocated;

                for _ in 0..remaining.max(0) {
                    self.fill_slot(area_def, block, &mut used_in_shift, &mut rows, week_commencing);
                }
            }

            debug!(
                shift_block = %block,
                allocated = rows.iter().filter(|a| a.shift_block == block).count(),
                "班段分配完成"
            );
        }

        rows
    }

    /// 填充单个席位（阶段一/阶段二共用）
    ///
    /// 先严格候选, 空则在有准入门槛的区域放宽重试;
    /// 罐装正式工优先规则在两轮均生效
    fn fill_slot(
        &self,
        area_def: &AreaDemand,
        block: ShiftBlock,
        used_in_shift: &mut HashSet<String>,
        rows: &mut Vec<Allocation>,
        week_commencing: NaiveDate,
    ) -> bool {
        let needs_regular_first =
            area_def.is_canning_area() && !self.canning_has_regular(rows, block);

        let mut candidates = self.select_candidates(area_def, block, used_in_shift, false);
        if needs_regular_first {
            Self::prefer_regulars(&mut candidates);
        }

        if candidates.is_empty() && area_def.min_eligible.is_some() {
            // 放宽轮: 丢弃准入谓词, 出勤与约束检查保持不变
            candidates = self.select_candidates(area_def, block, used_in_shift, true);
            if needs_regular_first {
                Self::prefer_regulars(&mut candidates);
            }
        }

        let Some(best) = candidates.first() else {
            return false;
        };

        used_in_shift.insert(best.op.operator_id.clone());
        rows.push(Allocation::engine_row(
            week_commencing,
            &area_def.area,
            block,
            &best.op.operator_id,
            best.score,
        ));
        true
    }

    /// 候选检索管线
    ///
    /// 过滤: 本班段未占用 → 出勤 → 约束否决 → (严格轮) 准入谓词
    /// 排序: 综合评分降序; 稳定排序保证同分按池内枚举顺序决胜
    fn select_candidates(
        &self,
        area_def: &AreaDemand,
        block: ShiftBlock,
        used_in_shift: &HashSet<String>,
        relaxed: bool,
    ) -> Vec<ScoredCandidate<'a>> {
        let mut candidates: Vec<ScoredCandidate<'a>> = self
            .pool
            .iter()
            .filter(|op| !used_in_shift.contains(&op.operator_id))
            .filter(|op| CapabilityScorer::is_working_cell(op.availability.cell(block)))
            .filter(|op| passes_constraints(op, &area_def.area, block))
            .filter(|op| {
                relaxed
                    || area_def
                        .min_eligible
                        .map_or(true, |eligible| eligible(&op.skills))
            })
            .map(|op| ScoredCandidate {
                op,
                score: self.scorer.score(op, area_def),
            })
            .collect();

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    /// 正式工优先过滤: 有正式工候选时剔除外包
    fn prefer_regulars(candidates: &mut Vec<ScoredCandidate<'a>>) {
        if candidates.iter().any(|c| !c.op.is_agency) {
            candidates.retain(|c| !c.op.is_agency);
        }
    }

    /// 本班段罐装族区域是否已有正式工在岗
    fn canning_has_regular(&self, rows: &[Allocation], block: ShiftBlock) -> bool {
        rows.iter()
            .filter(|a| a.shift_block == block && a.area.to_lowercase().contains("canning"))
            .any(|a| {
                a.operator_id.as_deref().is_some_and(|id| {
                    self.pool
                        .iter()
                        .find(|p| p.operator_id == id)
                        .is_some_and(|p| !p.is_agency)
                })
            })
    }
}
