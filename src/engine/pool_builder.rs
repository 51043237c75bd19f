// ==========================================
// 包装车间周排班系统 - 操作工池构建器
// ==========================================
// 职责: 周人员计划联查行 → 分配就绪的操作工池
// 过滤链: 在职 → 有能力记录 → 非整周不可用
// ==========================================

use crate::domain::operator::{Operator, SkillScores, StaffPlanRow};
use crate::engine::capability::CapabilityScorer;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 角色缺省值
const DEFAULT_ROLE: &str = "General Operator";

// ==========================================
// OperatorPoolBuilder - 操作工池构建器
// ==========================================
pub struct OperatorPoolBuilder;

impl OperatorPoolBuilder {
    /// 过滤并塑形操作工池
    ///
    /// # 参数
    /// - rows: 周人员计划联查行（保持读出顺序, 该顺序是同分并列的决胜序）
    ///
    /// # 返回
    /// - Vec<Operator>: 分配就绪的池条目
    pub fn build(rows: &[StaffPlanRow]) -> Vec<Operator> {
        let total = rows.len();
        let pool: Vec<Operator> = rows
            .iter()
            .filter(|r| r.is_active)
            .filter(|r| r.capabilities.is_some())
            .filter(|r| !CapabilityScorer::fully_unavailable(&r.availability))
            .map(Self::shape)
            .collect();

        debug!(total_rows = total, pool_size = pool.len(), "操作工池构建完成");
        pool
    }

    /// 单行塑形: 派生技能分 + 字段缺省
    fn shape(row: &StaffPlanRow) -> Operator {
        // 过滤链保证 capabilities 存在
        let c = row.capabilities.clone().unwrap_or_default();

        Operator {
            operator_id: row.operator_id.clone(),
            name: row.name.clone(),
            is_agency: row.is_agency,
            shift: row.shift.clone(),
            role: row
                .role
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            constraints: row.constraints.clone().unwrap_or_default(),
            best_suited_areas: Self::parse_best_suited(row),
            availability: row.availability.clone(),
            skills: SkillScores {
                flt: CapabilityScorer::rating_to_score(c.flt.as_deref()),
                canning: CapabilityScorer::rating_to_score(c.canning.as_deref()),
                mab1: CapabilityScorer::rating_to_score(c.mab1.as_deref()),
                mab2: CapabilityScorer::rating_to_score(c.mab2.as_deref()),
                corona: CapabilityScorer::rating_to_score(c.corona.as_deref()),
                keg_in: CapabilityScorer::rating_to_score(c.kegging_inside.as_deref()),
                keg_out: CapabilityScorer::rating_to_score(c.kegging_outside.as_deref()),
                wms: CapabilityScorer::rating_to_score(c.wms.as_deref()),
                sap: CapabilityScorer::rating_to_score(c.sap.as_deref()),
                say: CapabilityScorer::rating_to_score(c.say.as_deref()),
                packaging: CapabilityScorer::rating_to_score(c.packaging.as_deref()),
                loaders: CapabilityScorer::rating_to_score(c.loaders.as_deref()),
                pilots: CapabilityScorer::rating_to_score(c.pilots.as_deref()),
            },
        }
    }

    /// 解析 best_suited_areas JSON（损坏值告警后按空表处理）
    fn parse_best_suited(row: &StaffPlanRow) -> BTreeMap<String, bool> {
        match row.best_suited_areas.as_deref() {
            None | Some("") => BTreeMap::new(),
            Some(raw) => match serde_json::from_str::<BTreeMap<String, bool>>(raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        operator_id = %row.operator_id,
                        error = %e,
                        "best_suited_areas JSON 解析失败, 按空表处理"
                    );
                    BTreeMap::new()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operator::{Availability, CapabilityRatings};

    fn base_row(id: &str) -> StaffPlanRow {
        StaffPlanRow {
            operator_id: id.to_string(),
            name: format!("Operator {}", id),
            is_active: true,
            is_agency: false,
            shift: None,
            role: None,
            constraints: None,
            best_suited_areas: None,
            availability: Availability {
                day1: Some("Y".to_string()),
                day2: Some("Y".to_string()),
                night1: Some("OFF".to_string()),
                night2: Some("OFF".to_string()),
            },
            capabilities: Some(CapabilityRatings {
                flt: Some("C".to_string()),
                canning: Some("S".to_string()),
                wms: Some("B".to_string()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_filter_chain() {
        let active = base_row("OP1");

        let mut inactive = base_row("OP2");
        inactive.is_active = false;

        let mut no_capabilities = base_row("OP3");
        no_capabilities.capabilities = None;

        let mut all_off = base_row("OP4");
        all_off.availability = Availability {
            day1: Some("H".to_string()),
            day2: Some("SICK".to_string()),
            night1: Some("OFF".to_string()),
            night2: Some("OFF".to_string()),
        };

        let pool = OperatorPoolBuilder::build(&[active, inactive, no_capabilities, all_off]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].operator_id, "OP1");
    }

    #[test]
    fn test_shape_derives_scores_and_defaults() {
        let mut row = base_row("OP1");
        row.role = Some("  ".to_string()); // 空白角色按缺省
        row.best_suited_areas = Some(r#"{"canning": true, "pilots": false}"#.to_string());

        let pool = OperatorPoolBuilder::build(&[row]);
        let op = &pool[0];

        assert_eq!(op.role, "General Operator");
        assert_eq!(op.skills.flt, 2);
        assert_eq!(op.skills.canning, 3);
        assert_eq!(op.skills.wms, 1);
        assert_eq!(op.skills.pilots, 0);
        assert_eq!(op.best_suited_areas.get("canning"), Some(&true));
        assert_eq!(op.best_suited_areas.get("pilots"), Some(&false));
    }

    #[test]
    fn test_malformed_best_suited_json() {
        let mut row = base_row("OP1");
        row.best_suited_areas = Some("not-json".to_string());

        let pool = OperatorPoolBuilder::build(&[row]);
        assert!(pool[0].best_suited_areas.is_empty());
    }
}
