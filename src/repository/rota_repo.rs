// ==========================================
// 包装车间周排班系统 - 周排班仓储
// ==========================================
// 职责: 周排班写入单元 (weekly_rota_allocation + weekly_rota_gaps
//       + allocation_history) 与排班行 CRUD
// 红线: 整周替换必须在单事务内完成, 避免并发重算下的丢行/重行
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::allocation::{Allocation, AllocationHistoryRecord, Gap, Recommendation};
use crate::domain::types::ShiftBlock;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// RotaRepository - 周排班仓储
// ==========================================
pub struct RotaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RotaRepository {
    /// 创建新的 RotaRepository 实例
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

    /// 整周替换排班结果（单事务）
    ///
    /// # 参数
    /// - week_commencing: 周起始日
    /// - allocations: 新的分配行
    /// - gaps: 新的缺口行
    /// - history: 追加的分配历史
    ///
    /// # 返回
    /// - Ok((分配数, 缺口数, 历史数))
    ///
    /// # 说明
    /// - 删除当周 allocation/gaps 后插入新行, 历史只追加不删除
    /// - 全程一个事务: 并发重算同一周时不会观察到半替换状态
    pub fn replace_week(
        &self,
        week_commencing: NaiveDate,
        allocations: &[Allocation],
        gaps: &[Gap],
        history: &[AllocationHistoryRecord],
    ) -> RepositoryResult<(usize, usize, usize)> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let week_key = week_commencing.to_string();
        tx.execute(
            "DELETE FROM weekly_rota_allocation WHERE week_commencing = ?1",
            params![week_key],
        )?;
        tx.execute(
            "DELETE FROM weekly_rota_gaps WHERE week_commencing = ?1",
            params![week_key],
        )?;

        for allocation in allocations {
            tx.execute(
                r#"
                INSERT INTO weekly_rota_allocation (
                    id, week_commencing, area, shift_block,
                    operator_id, assigned_to, score, is_break_cover, hours_required
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    allocation.id,
                    allocation.week_commencing.to_string(),
                    allocation.area,
                    allocation.shift_block.as_str(),
                    allocation.operator_id,
                    allocation.assigned_to,
                    allocation.score,
                    allocation.is_break_cover,
                    allocation.hours_required,
                ],
            )?;
        }

        for gap in gaps {
            let recommendations = serde_json::to_string(&gap.recommendations)
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "recommendations".to_string(),
                    message: e.to_string(),
                })?;
            tx.execute(
                r#"
                INSERT INTO weekly_rota_gaps (
                    id, week_commencing, shift_block, area, missing_count, recommendations
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    gap.id,
                    gap.week_commencing.to_string(),
                    gap.shift_block.as_str(),
                    gap.area,
                    gap.missing_count,
                    recommendations,
                ],
            )?;
        }

        for record in history {
            tx.execute(
                r#"
                INSERT INTO allocation_history (
                    id, operator_id, week_commencing, day_name, shift, area, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.id,
                    record.operator_id,
                    record.week_commencing.to_string(),
                    record.day_name,
                    record.shift.to_string(),
                    record.area,
                    record.position,
                ],
            )?;
        }

        tx.commit()?;
        Ok((allocations.len(), gaps.len(), history.len()))
    }

    /// 查询当周全部分配行
    pub fn list_allocations(&self, week_commencing: NaiveDate) -> RepositoryResult<Vec<Allocation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, week_commencing, area, shift_block,
                   operator_id, assigned_to, score, is_break_cover, hours_required
            FROM weekly_rota_allocation
            WHERE week_commencing = ?1
            ORDER BY shift_block ASC, area ASC
            "#,
        )?;

        let allocations = stmt
            .query_map(params![week_commencing.to_string()], |row| {
                Ok(Allocation {
                    id: row.get(0)?,
                    week_commencing: parse_date(&row.get::<_, String>(1)?),
                    area: row.get(2)?,
                    shift_block: parse_block(&row.get::<_, String>(3)?),
                    operator_id: row.get(4)?,
                    assigned_to: row.get(5)?,
                    score: row.get(6)?,
                    is_break_cover: row.get(7)?,
                    hours_required: row.get(8)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(allocations)
    }

    /// 查询当周全部缺口行
    pub fn list_gaps(&self, week_commencing: NaiveDate) -> RepositoryResult<Vec<Gap>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, week_commencing, shift_block, area, missing_count, recommendations
            FROM weekly_rota_gaps
            WHERE week_commencing = ?1
            ORDER BY shift_block ASC, area ASC
            "#,
        )?;

        let gaps = stmt
            .query_map(params![week_commencing.to_string()], |row| {
                let raw: String = row.get(5)?;
                let recommendations: Vec<Recommendation> =
                    serde_json::from_str(&raw).unwrap_or_default();
                Ok(Gap {
                    id: row.get(0)?,
                    week_commencing: parse_date(&row.get::<_, String>(1)?),
                    shift_block: parse_block(&row.get::<_, String>(2)?),
                    area: row.get(3)?,
                    missing_count: row.get(4)?,
                    recommendations,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(gaps)
    }

    /// 插入单条分配行（人工复核界面: 外包占位/休息顶岗等）
    pub fn insert_allocation(&self, allocation: &Allocation) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO weekly_rota_allocation (
                id, week_commencing, area, shift_block,
                operator_id, assigned_to, score, is_break_cover, hours_required
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                allocation.id,
                allocation.week_commencing.to_string(),
                allocation.area,
                allocation.shift_block.as_str(),
                allocation.operator_id,
                allocation.assigned_to,
                allocation.score,
                allocation.is_break_cover,
                allocation.hours_required,
            ],
        )?;
        Ok(())
    }

    /// 删除单条分配行（人工复核界面）
    ///
    /// # 返回
    /// - Ok(true): 删除了一行
    /// - Ok(false): 无此 id
    pub fn delete_allocation(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count = conn.execute(
            "DELETE FROM weekly_rota_allocation WHERE id = ?1",
            params![id],
        )?;
        Ok(count > 0)
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

/// 解析班段字符串（损坏值回落 DAY1）
fn parse_block(s: &str) -> ShiftBlock {
    ShiftBlock::parse(s).unwrap_or(ShiftBlock::Day1)
}
