// ==========================================
// 包装车间周排班系统 - 需求构建器
// ==========================================
// 职责: 周聚合产线计划 → 有序区域需求表
// 红线: 规则表声明式给出, 声明顺序即分配顺序, 不得调整
// ==========================================

use crate::domain::demand::{
    AreaDemand, AREA_CANNING, AREA_CORONA, AREA_KEGGING_INSIDE, AREA_KEGGING_OUTSIDE,
    AREA_KEG_LOADING, AREA_MAB1, AREA_MAB2, AREA_MAGOR1_LOADING, AREA_PACKAGING, AREA_PILOTS,
    AREA_TENTS,
};
use crate::domain::line_plan::WeeklyLinePlan;
use crate::domain::operator::SkillScores;
use tracing::debug;

// 罐装线满员/减员编制
const CANNING_CREW_FULL: u32 = 4;
const CANNING_CREW_REDUCED: u32 = 3;

// 装载时段折算: 每名装载工可覆盖的时段数
const KEG_SLOTS_PER_LOADER: i32 = 6;
const LINE_SLOTS_PER_LOADER: i32 = 15;

// 帐篷区编制
const TENTS_RUNNING_CREW: u32 = 4;
const TENTS_LOADING_MIN_CREW: u32 = 2;

// ==========================================
// DemandBuilder - 需求构建器
// ==========================================
pub struct DemandBuilder;

impl DemandBuilder {
    /// 由周聚合产线计划构建区域需求表
    ///
    /// # 返回
    /// - Vec<AreaDemand>: 声明顺序固定, 即后续分配的遍历顺序
    pub fn build(plan: &WeeklyLinePlan) -> Vec<AreaDemand> {
        let mut demand: Vec<AreaDemand> = Vec::new();

        // 桶装线开动 → 桶装内场 + 桶装外场各 1 人
        if plan.mak1_running {
            demand.push(AreaDemand {
                area: AREA_KEGGING_INSIDE.to_string(),
                count: 1,
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.keg_in >= 2 && s.wms >= 2),
                score_fn: |s: &SkillScores| s.keg_in * 3 + s.wms * 2 + s.flt,
            });
            demand.push(AreaDemand {
                area: AREA_KEGGING_OUTSIDE.to_string(),
                count: 1,
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.keg_out >= 2),
                score_fn: |s: &SkillScores| s.keg_out * 3 + s.flt,
            });
        }

        // 领航员: 无条件需求
        demand.push(AreaDemand {
            area: AREA_PILOTS.to_string(),
            count: plan.pilots_required.max(0) as u32,
            min_count: 0,
            min_eligible: Some(|s: &SkillScores| s.wms >= 2 && s.pilots >= 1),
            score_fn: |s: &SkillScores| s.pilots * 3 + s.wms * 2,
        });

        if plan.packaging_running {
            demand.push(AreaDemand {
                area: AREA_PACKAGING.to_string(),
                count: 1,
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.wms >= 2 && s.packaging >= 1),
                score_fn: |s: &SkillScores| s.packaging * 3 + s.wms * 2 + s.sap,
            });
        }

        // MAB1 / MAB2 / Corona 三条瓶装线各自独立
        if plan.mab1_running {
            demand.push(AreaDemand {
                area: AREA_MAB1.to_string(),
                count: 1,
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.mab1 >= 2),
                score_fn: |s: &SkillScores| s.mab1 * 3 + s.flt,
            });
        }
        if plan.mab2_running {
            demand.push(AreaDemand {
                area: AREA_MAB2.to_string(),
                count: 1,
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.mab2 >= 2),
                score_fn: |s: &SkillScores| s.mab2 * 3 + s.flt,
            });
        }
        if plan.corona_running {
            demand.push(AreaDemand {
                area: AREA_CORONA.to_string(),
                count: 1,
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.corona >= 2),
                score_fn: |s: &SkillScores| s.corona * 3 + s.flt,
            });
        }

        // 任一罐装线开动 → 统一的 "Canning" 区域
        let any_canning_running = plan.mac1_running || plan.mac2_running || plan.mab3_running;
        if any_canning_running {
            let canning_count = if plan.canning_reduced {
                CANNING_CREW_REDUCED
            } else {
                CANNING_CREW_FULL
            };
            demand.push(AreaDemand {
                area: AREA_CANNING.to_string(),
                count: canning_count,
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.canning >= 1 && s.flt >= 2),
                score_fn: |s: &SkillScores| s.canning * 3 + s.flt * 2,
            });
        }

        if plan.keg_load_slots > 0 {
            demand.push(AreaDemand {
                area: AREA_KEG_LOADING.to_string(),
                count: div_ceil(plan.keg_load_slots, KEG_SLOTS_PER_LOADER),
                min_count: 0,
                min_eligible: Some(|s: &SkillScores| s.loaders >= 1 && s.flt >= 2),
                score_fn: |s: &SkillScores| s.loaders * 3 + s.flt * 2,
            });
        }

        if plan.mak1_load_slots > 0 {
            demand.push(AreaDemand {
                area: AREA_MAGOR1_LOADING.to_string(),
                count: div_ceil(plan.mak1_load_slots, LINE_SLOTS_PER_LOADER).max(1),
                min_count: 1,
                min_eligible: Some(|s: &SkillScores| s.loaders >= 1 && s.flt >= 2),
                score_fn: |s: &SkillScores| s.loaders * 3 + s.flt * 2,
            });
        }

        // 帐篷区: 装载与运行合并为一个区域
        if plan.tents_load_slots > 0 || plan.tents_running {
            let mut tents_operators: u32 = 0;
            if plan.tents_load_slots > 0 {
                tents_operators +=
                    div_ceil(plan.tents_load_slots, LINE_SLOTS_PER_LOADER).max(TENTS_LOADING_MIN_CREW);
            }
            if plan.tents_running {
                tents_operators += TENTS_RUNNING_CREW;
            }
            demand.push(AreaDemand {
                area: AREA_TENTS.to_string(),
                count: tents_operators,
                min_count: 2,
                min_eligible: Some(|s: &SkillScores| s.flt >= 1),
                score_fn: |s: &SkillScores| s.loaders * 3 + s.flt * 2,
            });
        }

        debug!(
            areas = demand.len(),
            total_headcount = demand.iter().map(|d| d.count).sum::<u32>(),
            "需求表构建完成"
        );

        demand
    }
}

/// 整数向上取整除法（slots, per 均为正）
fn div_ceil(slots: i32, per: i32) -> u32 {
    ((slots + per - 1) / per).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(f: impl Fn(&mut SkillScores)) -> SkillScores {
        let mut s = SkillScores::default();
        f(&mut s);
        s
    }

    #[test]
    fn test_empty_plan_still_demands_pilots() {
        // 全停产的一周仍有领航员需求
        let plan = WeeklyLinePlan {
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);
        assert_eq!(demand.len(), 1);
        assert_eq!(demand[0].area, AREA_PILOTS);
        assert_eq!(demand[0].count, 2);
    }

    #[test]
    fn test_kegging_areas_require_mak1() {
        let plan = WeeklyLinePlan {
            mak1_running: true,
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);
        let areas: Vec<&str> = demand.iter().map(|d| d.area.as_str()).collect();
        // 桶装两个区域排在领航员之前（声明顺序）
        assert_eq!(areas, vec![AREA_KEGGING_INSIDE, AREA_KEGGING_OUTSIDE, AREA_PILOTS]);

        let inside = &demand[0];
        let qualified = scores(|s| {
            s.keg_in = 2;
            s.wms = 2;
            s.flt = 1;
        });
        assert!((inside.min_eligible.unwrap())(&qualified));
        assert_eq!((inside.score_fn)(&qualified), 2 * 3 + 2 * 2 + 1);

        let unqualified = scores(|s| s.keg_in = 3); // 缺 WMS
        assert!(!(inside.min_eligible.unwrap())(&unqualified));
    }

    #[test]
    fn test_canning_crew_size() {
        let plan = WeeklyLinePlan {
            mac2_running: true,
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);
        let canning = demand.iter().find(|d| d.area == AREA_CANNING).unwrap();
        assert_eq!(canning.count, 4);

        let plan = WeeklyLinePlan {
            mab3_running: true,
            canning_reduced: true,
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);
        let canning = demand.iter().find(|d| d.area == AREA_CANNING).unwrap();
        assert_eq!(canning.count, 3);
    }

    #[test]
    fn test_loading_headcount_rounding() {
        let plan = WeeklyLinePlan {
            keg_load_slots: 7, // ceil(7/6) = 2
            mak1_load_slots: 3, // ceil(3/15)=1, 且保底 1
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);

        let keg = demand.iter().find(|d| d.area == AREA_KEG_LOADING).unwrap();
        assert_eq!(keg.count, 2);
        assert_eq!(keg.min_count, 0);

        let magor = demand.iter().find(|d| d.area == AREA_MAGOR1_LOADING).unwrap();
        assert_eq!(magor.count, 1);
        assert_eq!(magor.min_count, 1);
    }

    #[test]
    fn test_tents_combined_headcount() {
        // 装载 + 运行: max(2, ceil(31/15)=3) + 4 = 7
        let plan = WeeklyLinePlan {
            tents_load_slots: 31,
            tents_running: true,
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);
        let tents = demand.iter().find(|d| d.area == AREA_TENTS).unwrap();
        assert_eq!(tents.count, 7);
        assert_eq!(tents.min_count, 2);

        // 仅运行: 4 人
        let plan = WeeklyLinePlan {
            tents_running: true,
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);
        let tents = demand.iter().find(|d| d.area == AREA_TENTS).unwrap();
        assert_eq!(tents.count, 4);

        // 仅少量装载: 保底 2 人
        let plan = WeeklyLinePlan {
            tents_load_slots: 5,
            pilots_required: 2,
            ..Default::default()
        };
        let demand = DemandBuilder::build(&plan);
        let tents = demand.iter().find(|d| d.area == AREA_TENTS).unwrap();
        assert_eq!(tents.count, 2);
    }

    #[test]
    fn test_declared_order_full_plan() {
        let plan = WeeklyLinePlan {
            mak1_running: true,
            mac1_running: true,
            mab1_running: true,
            mab2_running: true,
            corona_running: true,
            packaging_running: true,
            tents_running: true,
            keg_load_slots: 6,
            mak1_load_slots: 15,
            pilots_required: 2,
            ..Default::default()
        };
        let areas: Vec<String> = DemandBuilder::build(&plan)
            .into_iter()
            .map(|d| d.area)
            .collect();
        assert_eq!(
            areas,
            vec![
                AREA_KEGGING_INSIDE,
                AREA_KEGGING_OUTSIDE,
                AREA_PILOTS,
                AREA_PACKAGING,
                AREA_MAB1,
                AREA_MAB2,
                AREA_CORONA,
                AREA_CANNING,
                AREA_KEG_LOADING,
                AREA_MAGOR1_LOADING,
                AREA_TENTS,
            ]
        );
    }
}
