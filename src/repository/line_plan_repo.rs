// ==========================================
// 包装车间周排班系统 - 产线计划仓储
// ==========================================
// 职责: 管理 daily_line_plan 表的数据访问
// 红线: 不含业务逻辑, 只负责数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::line_plan::DailyLinePlan;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// LinePlanRepository - 产线计划仓储
// ==========================================
pub struct LinePlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LinePlanRepository {
    /// 创建新的 LinePlanRepository 实例
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

    /// 查询目标周（周一起 7 个日历日）的逐日产线计划
    ///
    /// # 参数
    /// - week_commencing: 周起始日（周一）
    ///
    /// # 返回
    /// - Ok(Vec<DailyLinePlan>): 按日期升序, 无计划的日子不占行
    pub fn find_week(&self, week_commencing: NaiveDate) -> RepositoryResult<Vec<DailyLinePlan>> {
        let week_end = week_commencing + Duration::days(6);
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                plan_date,
                mak1_running, mac1_running, mac2_running,
                mab1_running, mab2_running, mab3_running,
                corona_running, packaging_running, tents_running,
                canning_reduced,
                keg_load_slots, mak1_load_slots, tents_load_slots,
                pilots_required
            FROM daily_line_plan
            WHERE plan_date >= ?1 AND plan_date <= ?2
            ORDER BY plan_date ASC
            "#,
        )?;

        let plans = stmt
            .query_map(
                params![week_commencing.to_string(), week_end.to_string()],
                |row| {
                    Ok(DailyLinePlan {
                        plan_date: parse_date(&row.get::<_, String>(0)?),
                        mak1_running: row.get(1)?,
                        mac1_running: row.get(2)?,
                        mac2_running: row.get(3)?,
                        mab1_running: row.get(4)?,
                        mab2_running: row.get(5)?,
                        mab3_running: row.get(6)?,
                        corona_running: row.get(7)?,
                        packaging_running: row.get(8)?,
                        tents_running: row.get(9)?,
                        canning_reduced: row.get(10)?,
                        keg_load_slots: row.get(11)?,
                        mak1_load_slots: row.get(12)?,
                        tents_load_slots: row.get(13)?,
                        pilots_required: row.get(14)?,
                    })
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(plans)
    }

    /// 写入/覆盖单日计划（INSERT OR REPLACE, 外部计划编辑器与测试夹具用）
    pub fn upsert_day(&self, plan: &DailyLinePlan) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO daily_line_plan (
                plan_date,
                mak1_running, mac1_running, mac2_running,
                mab1_running, mab2_running, mab3_running,
                corona_running, packaging_running, tents_running,
                canning_reduced,
                keg_load_slots, mak1_load_slots, tents_load_slots,
                pilots_required
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                plan.plan_date.to_string(),
                plan.mak1_running,
                plan.mac1_running,
                plan.mac2_running,
                plan.mab1_running,
                plan.mab2_running,
                plan.mab3_running,
                plan.corona_running,
                plan.packaging_running,
                plan.tents_running,
                plan.canning_reduced,
                plan.keg_load_slots,
                plan.mak1_load_slots,
                plan.tents_load_slots,
                plan.pilots_required,
            ],
        )?;
        Ok(())
    }
}

/// 解析存储日期（损坏值回落 epoch, 与查询范围不匹配自然丢弃）
fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}
