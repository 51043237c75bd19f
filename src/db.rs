// ==========================================
// 包装车间周排班系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 内嵌建表语句, 空库首次打开即可用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等, CREATE TABLE IF NOT EXISTS）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 操作工档案（外部花名册应用维护, 引擎只读）
        CREATE TABLE IF NOT EXISTS operators (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_agency INTEGER NOT NULL DEFAULT 0,
            shift TEXT,
            role TEXT,
            constraints TEXT,
            best_suited_areas TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 能力等级, 逐格 N/B/C/S
        CREATE TABLE IF NOT EXISTS operator_capabilities (
            operator_id TEXT PRIMARY KEY REFERENCES operators(id) ON DELETE CASCADE,
            flt TEXT, canning TEXT, mab1 TEXT, mab2 TEXT, corona TEXT,
            kegging_inside TEXT, kegging_outside TEXT,
            wms TEXT, sap TEXT, say TEXT,
            packaging TEXT, loaders TEXT, pilots TEXT,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 逐日产线运行计划
        CREATE TABLE IF NOT EXISTS daily_line_plan (
            plan_date TEXT PRIMARY KEY,
            mak1_running INTEGER NOT NULL DEFAULT 0,
            mac1_running INTEGER NOT NULL DEFAULT 0,
            mac2_running INTEGER NOT NULL DEFAULT 0,
            mab1_running INTEGER NOT NULL DEFAULT 0,
            mab2_running INTEGER NOT NULL DEFAULT 0,
            mab3_running INTEGER NOT NULL DEFAULT 0,
            corona_running INTEGER NOT NULL DEFAULT 0,
            packaging_running INTEGER NOT NULL DEFAULT 0,
            tents_running INTEGER NOT NULL DEFAULT 0,
            canning_reduced INTEGER NOT NULL DEFAULT 0,
            keg_load_slots INTEGER NOT NULL DEFAULT 0,
            mak1_load_slots INTEGER NOT NULL DEFAULT 0,
            tents_load_slots INTEGER NOT NULL DEFAULT 0,
            pilots_required INTEGER
        );

        -- 周人员计划（出勤单元格为自由文本）
        CREATE TABLE IF NOT EXISTS weekly_staff_plan (
            week_commencing TEXT NOT NULL,
            operator_id TEXT NOT NULL REFERENCES operators(id) ON DELETE CASCADE,
            day1 TEXT, day2 TEXT, night1 TEXT, night2 TEXT,
            PRIMARY KEY (week_commencing, operator_id)
        );

        -- 周排班分配（引擎整周替换; 人工复核可增删单行）
        CREATE TABLE IF NOT EXISTS weekly_rota_allocation (
            id TEXT PRIMARY KEY,
            week_commencing TEXT NOT NULL,
            area TEXT NOT NULL,
            shift_block TEXT NOT NULL,
            operator_id TEXT,
            assigned_to TEXT,
            score INTEGER NOT NULL DEFAULT 0,
            is_break_cover INTEGER NOT NULL DEFAULT 0,
            hours_required REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_rota_alloc_week
            ON weekly_rota_allocation(week_commencing);

        -- 周排班缺口（recommendations 为 JSON 数组）
        CREATE TABLE IF NOT EXISTS weekly_rota_gaps (
            id TEXT PRIMARY KEY,
            week_commencing TEXT NOT NULL,
            shift_block TEXT NOT NULL,
            area TEXT NOT NULL,
            missing_count INTEGER NOT NULL,
            recommendations TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_rota_gaps_week
            ON weekly_rota_gaps(week_commencing);

        -- 分配历史（只追加, 轮换公平性统计用）
        CREATE TABLE IF NOT EXISTS allocation_history (
            id TEXT PRIMARY KEY,
            operator_id TEXT NOT NULL,
            week_commencing TEXT NOT NULL,
            day_name TEXT,
            shift TEXT,
            area TEXT NOT NULL,
            position TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_alloc_history_week
            ON allocation_history(week_commencing);

        -- 系统配置 key-value
        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
