// ==========================================
// 周排班生成端到端测试
// ==========================================
// 职责: 验证从请求校验到持久化的完整流程
// 场景: 临时 SQLite 库 + RotaApi
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use chrono::NaiveDate;
use packhall_rota_aps::api::{ApiError, RotaApi};
use packhall_rota_aps::config::ConfigManager;
use packhall_rota_aps::domain::line_plan::DailyLinePlan;
use packhall_rota_aps::repository::{
    AllocationHistoryRepository, LinePlanRepository, RotaRepository, StaffPlanRepository,
};
use std::sync::Arc;
use test_data_builder::OperatorSeedBuilder;
use test_helpers::{create_test_db, open_test_connection};

const WEEK: &str = "2026-03-02"; // 周一

fn week() -> NaiveDate {
    WEEK.parse().unwrap()
}

/// 组装指向同一临时库的 API 与各仓储
fn build_api(db_path: &str) -> (RotaApi<ConfigManager>, Arc<RotaRepository>, Arc<AllocationHistoryRepository>) {
    let conn = open_test_connection(db_path).expect("打开测试连接失败");
    let rota_repo = Arc::new(RotaRepository::from_connection(conn.clone()));
    let history_repo = Arc::new(AllocationHistoryRepository::from_connection(conn.clone()));
    let api = RotaApi::new(
        Arc::new(LinePlanRepository::from_connection(conn.clone())),
        Arc::new(StaffPlanRepository::from_connection(conn.clone())),
        rota_repo.clone(),
        history_repo.clone(),
        Arc::new(ConfigManager::from_connection(conn)),
    );
    (api, rota_repo, history_repo)
}

/// 写入一条"仅 MAB1 开动"的单日计划
fn seed_mab1_line_plan(db_path: &str) {
    let repo = LinePlanRepository::new(db_path).unwrap();
    repo.upsert_day(&DailyLinePlan {
        plan_date: week(),
        mab1_running: true,
        ..Default::default()
    })
    .unwrap();
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_invalid_week_rejected_before_any_read() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let (api, _, _) = build_api(&db_path);

    // 非周一
    let err = api.generate_weekly_rota("2026-03-03").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    // 不可解析
    let err = api.generate_weekly_rota("03/02/2026").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_missing_line_plan_aborts_without_writes() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let (api, rota_repo, _) = build_api(&db_path);

    // 有人员计划但无产线计划
    {
        let conn = open_test_connection(&db_path).unwrap();
        let guard = conn.lock().unwrap();
        OperatorSeedBuilder::new("OP1", "Owen")
            .rating("wms", "C")
            .rating("pilots", "B")
            .insert(&guard, week());
    }

    let err = api.generate_weekly_rota(WEEK).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // 未发生任何写入
    assert!(rota_repo.list_allocations(week()).unwrap().is_empty());
    assert!(rota_repo.list_gaps(week()).unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_staff_plan_aborts_without_writes() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let (api, rota_repo, _) = build_api(&db_path);

    seed_mab1_line_plan(&db_path);

    let err = api.generate_weekly_rota(WEEK).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(rota_repo.list_allocations(week()).unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_writes_allocations_gaps_and_history() {
    packhall_rota_aps::logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let (api, rota_repo, history_repo) = build_api(&db_path);

    seed_mab1_line_plan(&db_path);
    {
        let conn = open_test_connection(&db_path).unwrap();
        let guard = conn.lock().unwrap();
        // MAB1 专家 + 两名合格领航员
        OperatorSeedBuilder::new("OPS", "Sian")
            .rating("mab1", "S")
            .rating("flt", "B")
            .insert(&guard, week());
        OperatorSeedBuilder::new("P1", "Pat")
            .rating("wms", "C")
            .rating("pilots", "B")
            .insert(&guard, week());
        OperatorSeedBuilder::new("P2", "Priya")
            .rating("wms", "C")
            .rating("pilots", "B")
            .insert(&guard, week());
    }

    let response = api.generate_weekly_rota(WEEK).await.unwrap();
    assert_eq!(response.week_commencing, WEEK);
    assert_eq!(response.pool_count, 3);
    // 每班段: MAB1×1 + Pilots×2
    assert_eq!(response.allocated_count, 12);

    let allocations = rota_repo.list_allocations(week()).unwrap();
    assert_eq!(allocations.len(), 12);
    assert!(allocations
        .iter()
        .all(|a| !a.is_break_cover && a.assigned_to.is_none()));

    let mab1_count = allocations.iter().filter(|a| a.area == "MAB1").count();
    assert_eq!(mab1_count, 4);

    // 人手充足, 无缺口
    assert!(rota_repo.list_gaps(week()).unwrap().is_empty());

    // 历史逐行追加（下一周可见）
    let next_week: NaiveDate = "2026-03-09".parse().unwrap();
    let window = history_repo.find_window(next_week, 28).unwrap();
    assert_eq!(window.len(), 12);
}

#[tokio::test]
async fn test_regenerate_replaces_rota_but_appends_history() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let (api, rota_repo, history_repo) = build_api(&db_path);

    seed_mab1_line_plan(&db_path);
    {
        let conn = open_test_connection(&db_path).unwrap();
        let guard = conn.lock().unwrap();
        OperatorSeedBuilder::new("OPS", "Sian")
            .rating("mab1", "S")
            .insert(&guard, week());
    }

    let first = api.generate_weekly_rota(WEEK).await.unwrap();
    let first_rows = rota_repo.list_allocations(week()).unwrap();

    let second = api.generate_weekly_rota(WEEK).await.unwrap();
    let second_rows = rota_repo.list_allocations(week()).unwrap();

    // 同输入重跑: 行数与 (区域, 班段, 操作工, 评分) 完全一致
    assert_eq!(first.allocated_count, second.allocated_count);
    let shape = |rows: &[packhall_rota_aps::domain::allocation::Allocation]| {
        let mut v: Vec<(String, String, Option<String>, i32)> = rows
            .iter()
            .map(|a| {
                (
                    a.area.clone(),
                    a.shift_block.to_string(),
                    a.operator_id.clone(),
                    a.score,
                )
            })
            .collect();
        v.sort();
        v
    };
    assert_eq!(shape(&first_rows), shape(&second_rows));

    // 分配整体替换（旧 id 消失）, 历史翻倍（只追加）
    let first_ids: Vec<&str> = first_rows.iter().map(|a| a.id.as_str()).collect();
    assert!(second_rows.iter().all(|a| !first_ids.contains(&a.id.as_str())));

    let next_week: NaiveDate = "2026-03-09".parse().unwrap();
    let window = history_repo.find_window(next_week, 28).unwrap();
    assert_eq!(window.len(), first.allocated_count * 2);
}

#[tokio::test]
async fn test_count_two_demand_with_single_candidate_yields_gap() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let (api, rota_repo, _) = build_api(&db_path);

    // 全停产周: 仅固定的 Pilots 需求 (默认 2 人)
    let repo = LinePlanRepository::new(&db_path).unwrap();
    repo.upsert_day(&DailyLinePlan {
        plan_date: week(),
        ..Default::default()
    })
    .unwrap();

    {
        let conn = open_test_connection(&db_path).unwrap();
        let guard = conn.lock().unwrap();
        OperatorSeedBuilder::new("P1", "Pat")
            .rating("wms", "C")
            .rating("pilots", "B")
            .insert(&guard, week());
    }

    let response = api.generate_weekly_rota(WEEK).await.unwrap();
    assert_eq!(response.allocated_count, 4); // 每班段 1 人

    let gaps = rota_repo.list_gaps(week()).unwrap();
    assert_eq!(gaps.len(), 4);
    assert!(gaps
        .iter()
        .all(|g| g.area == "Pilots" && g.missing_count == 1));
}

#[tokio::test]
async fn test_rotation_history_affects_next_week() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let (api, rota_repo, _) = build_api(&db_path);

    // 第 1 周与第 2 周相同输入: 两名同条件 MAB1 操作工 + 两名领航员
    let line_repo = LinePlanRepository::new(&db_path).unwrap();
    let week2: NaiveDate = "2026-03-09".parse().unwrap();
    for wk in [week(), week2] {
        line_repo
            .upsert_day(&DailyLinePlan {
                plan_date: wk,
                mab1_running: true,
                ..Default::default()
            })
            .unwrap();
        let conn = open_test_connection(&db_path).unwrap();
        let guard = conn.lock().unwrap();
        for (id, name) in [("OPA", "Aled"), ("OPB", "Bethan")] {
            OperatorSeedBuilder::new(id, name)
                .availability("Y", "OFF", "OFF", "OFF")
                .rating("mab1", "C")
                .insert(&guard, wk);
        }
        for (id, name) in [("P1", "Pat"), ("P2", "Priya")] {
            OperatorSeedBuilder::new(id, name)
                .rating("wms", "C")
                .rating("pilots", "B")
                .insert(&guard, wk);
        }
    }

    api.generate_weekly_rota(WEEK).await.unwrap();
    let week1_mab1: Vec<_> = rota_repo
        .list_allocations(week())
        .unwrap()
        .into_iter()
        .filter(|a| a.area == "MAB1")
        .collect();
    assert_eq!(week1_mab1.len(), 1);
    let week1_winner = week1_mab1[0].operator_id.clone().unwrap();

    // 第 2 周: 上周在岗者被轮换惩罚压制, 换人
    api.generate_weekly_rota("2026-03-09").await.unwrap();
    let week2_mab1: Vec<_> = rota_repo
        .list_allocations(week2)
        .unwrap()
        .into_iter()
        .filter(|a| a.area == "MAB1")
        .collect();
    assert_eq!(week2_mab1.len(), 1);
    let week2_winner = week2_mab1[0].operator_id.clone().unwrap();

    assert_ne!(week1_winner, week2_winner);
}
