// ==========================================
// 包装车间周排班系统 - 周人员计划仓储
// ==========================================
// 职责: weekly_staff_plan ⋈ operators ⋈ operator_capabilities 联查
// 红线: 不含业务逻辑, 过滤/塑形交给 OperatorPoolBuilder
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::operator::{Availability, CapabilityRatings, StaffPlanRow};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// StaffPlanRepository - 周人员计划仓储
// ==========================================
pub struct StaffPlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StaffPlanRepository {
    /// 创建新的 StaffPlanRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询目标周的人员计划联查行
    ///
    /// # 参数
    /// - week_commencing: 周起始日（周一）
    ///
    /// # 返回
    /// - Ok(Vec<StaffPlanRow>): 未过滤的原始读模型, 保持表内顺序
    ///
    /// # 说明
    /// - operator_capabilities 用 LEFT JOIN: 无能力记录的操作工
    ///   capabilities 为 None, 池构建阶段整行剔除
    pub fn find_week_rows(&self, week_commencing: NaiveDate) -> RepositoryResult<Vec<StaffPlanRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                sp.day1, sp.day2, sp.night1, sp.night2,
                o.id, o.name, o.is_active, o.is_agency, o.shift, o.role,
                o.constraints, o.best_suited_areas,
                c.operator_id,
                c.flt, c.canning, c.mab1, c.mab2, c.corona,
                c.kegging_inside, c.kegging_outside,
                c.wms, c.sap, c.say, c.packaging, c.loaders, c.pilots
            FROM weekly_staff_plan sp
            JOIN operators o ON o.id = sp.operator_id
            LEFT JOIN operator_capabilities c ON c.operator_id = o.id
            WHERE sp.week_commencing = ?1
            ORDER BY o.name ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![week_commencing.to_string()], |row| {
                let has_capabilities: Option<String> = row.get(12)?;
                let capabilities = match has_capabilities {
                    Some(_) => Some(CapabilityRatings {
                        flt: row.get(13)?,
                        canning: row.get(14)?,
                        mab1: row.get(15)?,
                        mab2: row.get(16)?,
                        corona: row.get(17)?,
                        kegging_inside: row.get(18)?,
                        kegging_outside: row.get(19)?,
                        wms: row.get(20)?,
                        sap: row.get(21)?,
                        say: row.get(22)?,
                        packaging: row.get(23)?,
                        loaders: row.get(24)?,
                        pilots: row.get(25)?,
                    }),
                    None => None,
                };

                Ok(StaffPlanRow {
                    operator_id: row.get(4)?,
                    name: row.get(5)?,
                    is_active: row.get(6)?,
                    is_agency: row.get(7)?,
                    shift: row.get(8)?,
                    role: row.get(9)?,
                    constraints: row.get(10)?,
                    best_suited_areas: row.get(11)?,
                    availability: Availability {
                        day1: row.get(0)?,
                        day2: row.get(1)?,
                        night1: row.get(2)?,
                        night2: row.get(3)?,
                    },
                    capabilities,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// 写入/覆盖一条周人员计划行（外部计划编辑器与测试夹具用）
    pub fn upsert_row(
        &self,
        week_commencing: NaiveDate,
        operator_id: &str,
        availability: &Availability,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO weekly_staff_plan (
                week_commencing, operator_id, day1, day2, night1, night2
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                week_commencing.to_string(),
                operator_id,
                availability.day1,
                availability.day2,
                availability.night1,
                availability.night2,
            ],
        )?;
        Ok(())
    }
}
