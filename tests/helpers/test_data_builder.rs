// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::HashMap;

// ==========================================
// OperatorSeed 构建器
// ==========================================
// 一次性写入 operators + operator_capabilities + weekly_staff_plan

pub struct OperatorSeedBuilder {
    operator_id: String,
    name: String,
    is_active: bool,
    is_agency: bool,
    shift: Option<String>,
    role: Option<String>,
    constraints: Option<String>,
    best_suited_areas: Option<String>,
    day1: Option<String>,
    day2: Option<String>,
    night1: Option<String>,
    night2: Option<String>,
    ratings: HashMap<String, String>,
    with_capabilities: bool,
}

impl OperatorSeedBuilder {
    pub fn new(operator_id: &str, name: &str) -> Self {
        Self {
            operator_id: operator_id.to_string(),
            name: name.to_string(),
            is_active: true,
            is_agency: false,
            shift: None,
            role: None,
            constraints: None,
            best_suited_areas: None,
            day1: Some("Y".to_string()),
            day2: Some("Y".to_string()),
            night1: Some("Y".to_string()),
            night2: Some("Y".to_string()),
            ratings: HashMap::new(),
            with_capabilities: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn agency(mut self) -> Self {
        self.is_agency = true;
        self
    }

    pub fn shift(mut self, shift: &str) -> Self {
        self.shift = Some(shift.to_string());
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn constraints(mut self, constraints: &str) -> Self {
        self.constraints = Some(constraints.to_string());
        self
    }

    pub fn best_suited(mut self, json: &str) -> Self {
        self.best_suited_areas = Some(json.to_string());
        self
    }

    pub fn availability(mut self, day1: &str, day2: &str, night1: &str, night2: &str) -> Self {
        self.day1 = Some(day1.to_string());
        self.day2 = Some(day2.to_string());
        self.night1 = Some(night1.to_string());
        self.night2 = Some(night2.to_string());
        self
    }

    /// 设置单个技能等级, 列名同 operator_capabilities 表
    pub fn rating(mut self, skill: &str, rating: &str) -> Self {
        self.ratings.insert(skill.to_string(), rating.to_string());
        self
    }

    /// 不写能力记录（池构建时应被剔除）
    pub fn no_capabilities(mut self) -> Self {
        self.with_capabilities = false;
        self
    }

    /// 写入三张表
    pub fn insert(&self, conn: &Connection, week_commencing: NaiveDate) {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO operators (
                id, name, is_active, is_agency, shift, role, constraints, best_suited_areas
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                self.operator_id,
                self.name,
                self.is_active,
                self.is_agency,
                self.shift,
                self.role,
                self.constraints,
                self.best_suited_areas,
            ],
        )
        .expect("写入 operators 失败");

        if self.with_capabilities {
            let get = |k: &str| self.ratings.get(k).cloned();
            conn.execute(
                r#"
                INSERT OR REPLACE INTO operator_capabilities (
                    operator_id, flt, canning, mab1, mab2, corona,
                    kegging_inside, kegging_outside, wms, sap, say,
                    packaging, loaders, pilots
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                "#,
                params![
                    self.operator_id,
                    get("flt"),
                    get("canning"),
                    get("mab1"),
                    get("mab2"),
                    get("corona"),
                    get("kegging_inside"),
                    get("kegging_outside"),
                    get("wms"),
                    get("sap"),
                    get("say"),
                    get("packaging"),
                    get("loaders"),
                    get("pilots"),
                ],
            )
            .expect("写入 operator_capabilities 失败");
        }

        conn.execute(
            r#"
            INSERT OR REPLACE INTO weekly_staff_plan (
                week_commencing, operator_id, day1, day2, night1, night2
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                week_commencing.to_string(),
                self.operator_id,
                self.day1,
                self.day2,
                self.night1,
                self.night2,
            ],
        )
        .expect("写入 weekly_staff_plan 失败");
    }
}
