// ==========================================
// 包装车间周排班系统 - 命令行入口
// ==========================================
// 用法:
//   packhall-rota-aps <week_commencing> [db_path]
//
// 为指定周（周一, YYYY-MM-DD）生成一次排班并打印摘要;
// 排班复核/花名册/计划录入等界面由外部应用承担。
// ==========================================

use packhall_rota_aps::api::RotaApi;
use packhall_rota_aps::config::ConfigManager;
use packhall_rota_aps::db::{
    init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION,
};
use packhall_rota_aps::repository::{
    AllocationHistoryRepository, LinePlanRepository, RotaRepository, StaffPlanRepository,
};
use packhall_rota_aps::logging;
use std::sync::{Arc, Mutex};

/// 默认数据库路径（用户数据目录下, 不可用时回落当前目录）
fn default_db_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("packhall-rota-aps").join("rota.db"))
        .and_then(|path| {
            let parent = path.parent()?.to_path_buf();
            std::fs::create_dir_all(parent).ok()?;
            Some(path.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "packhall_rota.db".to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("包装车间周排班系统 - 决策支持系统");
    tracing::info!("系统版本: {}", packhall_rota_aps::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let week_commencing = args
        .next()
        .ok_or("用法: packhall-rota-aps <week_commencing> [db_path]")?;
    let db_path = args.next().unwrap_or_else(default_db_path);

    tracing::info!("使用数据库: {}", db_path);

    // 初始化连接与 schema
    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    match read_schema_version(&conn)? {
        Some(version) if version == CURRENT_SCHEMA_VERSION => {}
        Some(version) => tracing::warn!(
            "schema_version={} 与代码期望 {} 不一致, 请检查数据库",
            version,
            CURRENT_SCHEMA_VERSION
        ),
        None => tracing::warn!("数据库缺少 schema_version 表"),
    }
    let conn = Arc::new(Mutex::new(conn));

    // 组装仓储与 API
    let api = RotaApi::new(
        Arc::new(LinePlanRepository::from_connection(conn.clone())),
        Arc::new(StaffPlanRepository::from_connection(conn.clone())),
        Arc::new(RotaRepository::from_connection(conn.clone())),
        Arc::new(AllocationHistoryRepository::from_connection(conn.clone())),
        Arc::new(ConfigManager::from_connection(conn.clone())),
    );

    let response = api.generate_weekly_rota(&week_commencing).await?;

    println!(
        "week={} allocated={} pool={}",
        response.week_commencing, response.allocated_count, response.pool_count
    );
    Ok(())
}
