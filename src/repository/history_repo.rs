// ==========================================
// 包装车间周排班系统 - 分配历史仓储
// ==========================================
// 职责: allocation_history 表的窗口查询与追加
// 红线: 只追加; 删除当周排班不回收历史（公平性统计按既成事实计）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::allocation::AllocationHistoryRecord;
use crate::domain::types::ShiftKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// AllocationHistoryRepository - 分配历史仓储
// ==========================================
pub struct AllocationHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AllocationHistoryRepository {
    /// 创建新的 AllocationHistoryRepository 实例
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

    /// 查询回看窗口内的分配历史
    ///
    /// # 参数
    /// - week_commencing: 目标周起始日
    /// - lookback_days: 回看天数
    ///
    /// # 返回
    /// - Ok(Vec<AllocationHistoryRecord>): 窗口 [week - lookback, week) 内的记录
    pub fn find_window(
        &self,
        week_commencing: NaiveDate,
        lookback_days: i64,
    ) -> RepositoryResult<Vec<AllocationHistoryRecord>> {
        let window_start = week_commencing - Duration::days(lookback_days);
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, operator_id, week_commencing, day_name, shift, area, position
            FROM allocation_history
            WHERE week_commencing >= ?1 AND week_commencing < ?2
            ORDER BY week_commencing ASC
            "#,
        )?;

        let records = stmt
            .query_map(
                params![window_start.to_string(), week_commencing.to_string()],
                |row| {
                    let shift_raw: Option<String> = row.get(4)?;
                    Ok(AllocationHistoryRecord {
                        id: row.get(0)?,
                        operator_id: row.get(1)?,
                        week_commencing: parse_date(&row.get::<_, String>(2)?),
                        day_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        shift: parse_shift_kind(shift_raw.as_deref()),
                        area: row.get(5)?,
                        position: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                    })
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }

    /// 批量追加历史记录（测试夹具与手工补录用; 正常生成走 RotaRepository 的事务）
    pub fn append_batch(&self, records: &[AllocationHistoryRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
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
        Ok(records.len())
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

/// 解析班次类型（损坏值按 Day 计）
fn parse_shift_kind(s: Option<&str>) -> ShiftKind {
    match s.map(|v| v.trim().to_uppercase()) {
        Some(ref v) if v == "NIGHT" => ShiftKind::Night,
        _ => ShiftKind::Day,
    }
}
