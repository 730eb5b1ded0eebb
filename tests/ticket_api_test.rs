// ==========================================
// ResPlanTicketApi 集成测试
// ==========================================
// 测试范围:
// 1. 拆分成功: 回写 SPLIT, 子单可查询
// 2. 拆分失败: 回写 FAILED + 原因, 不留下子单
// 3. 重复拆分被拒绝; 已有子单时拒绝拆分并补写状态
// 4. 状态回写失败不覆盖拆分错误
// 5. AppState 组装 + JSON CRP 快照
// ==========================================

mod helpers;

use std::sync::Arc;

use helpers::api_test_helper::SplitterTestEnv;
use helpers::mock_capacity::MockCapacitySource;
use helpers::mock_config::MockConfig;
use helpers::test_data_builder::*;

use hcm_res_plan::api::ApiError;
use hcm_res_plan::app::AppState;
use hcm_res_plan::domain::demand::Demand;
use hcm_res_plan::domain::ticket::TicketBaseInfo;
use hcm_res_plan::domain::types::{SubTicketType, TicketSplitStatus, TicketType};
use hcm_res_plan::engine::StaticCapacitySource;

#[tokio::test]
async fn test_split_ticket_marks_split() {
    let capacity = MockCapacitySource::new(vec![SliceBuilder::new(9001, 16).build()], vec![]);
    let env = SplitterTestEnv::new(MockConfig::default(), capacity).unwrap();
    let demands = vec![Demand::add("d-1", SnapshotBuilder::new(32).build())];
    env.seed_ticket("T-API-1", TicketType::Add, demands).unwrap();

    let subs = env.ticket_api.split_ticket("T-API-1").await.unwrap();

    assert_eq!(subs.len(), 2);
    let ticket = env.ticket_api.get_ticket("T-API-1").unwrap();
    assert_eq!(ticket.split_status, TicketSplitStatus::Split);
    assert!(ticket.split_message.is_none());

    let listed = env.ticket_api.list_sub_tickets("T-API-1").unwrap();
    let listed_ids: Vec<_> = listed.iter().map(|s| s.id.clone()).collect();
    let created_ids: Vec<_> = subs.iter().map(|s| s.id.clone()).collect();
    assert_eq!(listed_ids, created_ids);

    let err = env.ticket_api.split_ticket("T-API-1").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
    assert_eq!(env.ticket_api.list_sub_tickets("T-API-1").unwrap().len(), 2);
}

#[tokio::test]
async fn test_split_ticket_failure_marks_failed() {
    let env = SplitterTestEnv::new(MockConfig::default(), MockCapacitySource::default()).unwrap();
    let demands = vec![Demand::delete("d-1", SnapshotBuilder::new(16).build())];
    env.seed_ticket("T-API-2", TicketType::Delete, demands).unwrap();

    let err = env.ticket_api.split_ticket("T-API-2").await.unwrap_err();
    assert!(matches!(err, ApiError::NoAdjustableDemand(_)));

    let ticket = env.ticket_api.get_ticket("T-API-2").unwrap();
    assert_eq!(ticket.split_status, TicketSplitStatus::Failed);
    assert!(ticket
        .split_message
        .unwrap()
        .contains("no demands can be adjusted in CRP"));
    assert!(env.ticket_api.list_sub_tickets("T-API-2").unwrap().is_empty());

    // 失败后允许重试
    let err = env.ticket_api.split_ticket("T-API-2").await.unwrap_err();
    assert!(matches!(err, ApiError::NoAdjustableDemand(_)));
}

#[tokio::test]
async fn test_split_failure_keeps_engine_error_when_status_write_fails() {
    let env = SplitterTestEnv::new(MockConfig::default(), MockCapacitySource::default()).unwrap();
    let demands = vec![Demand::delete("d-1", SnapshotBuilder::new(16).build())];
    env.seed_ticket("T-API-3", TicketType::Delete, demands).unwrap();

    let conn = test_helpers::open_test_connection(&env.db_path).unwrap();
    conn.lock()
        .unwrap()
        .execute_batch(
            r#"CREATE TRIGGER block_failed_status
               BEFORE UPDATE OF split_status ON res_plan_ticket
               WHEN NEW.split_status = 'FAILED'
               BEGIN SELECT RAISE(ABORT, 'split status locked'); END;"#,
        )
        .unwrap();

    let err = env.ticket_api.split_ticket("T-API-3").await.unwrap_err();
    assert!(matches!(err, ApiError::NoAdjustableDemand(_)), "got {:?}", err);

    let ticket = env.ticket_api.get_ticket("T-API-3").unwrap();
    assert_eq!(ticket.split_status, TicketSplitStatus::Init);
}

#[tokio::test]
async fn test_split_ticket_refuses_when_sub_tickets_exist() {
    let capacity = MockCapacitySource::new(vec![SliceBuilder::new(9001, 16).build()], vec![]);
    let env = SplitterTestEnv::new(MockConfig::default(), capacity).unwrap();
    let demands = vec![Demand::add("d-1", SnapshotBuilder::new(32).build())];
    env.seed_ticket("T-API-4", TicketType::Add, demands).unwrap();

    // 子单已提交但主单状态未回写
    let created = env.splitter.split_ticket("T-API-4").await.unwrap();
    assert_eq!(
        env.ticket_api.get_ticket("T-API-4").unwrap().split_status,
        TicketSplitStatus::Init
    );

    let err = env.ticket_api.split_ticket("T-API-4").await.unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

    assert_eq!(
        env.ticket_api.list_sub_tickets("T-API-4").unwrap().len(),
        created.len()
    );
    assert_eq!(
        env.ticket_api.get_ticket("T-API-4").unwrap().split_status,
        TicketSplitStatus::Split
    );
}

#[tokio::test]
async fn test_split_ticket_unknown_id() {
    let env = SplitterTestEnv::new(MockConfig::default(), MockCapacitySource::default()).unwrap();

    assert!(matches!(
        env.ticket_api.split_ticket("T-NONE").await.unwrap_err(),
        ApiError::NotFound(_)
    ));
    assert!(matches!(
        env.ticket_api.list_sub_tickets(" ").unwrap_err(),
        ApiError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn test_app_state_with_json_capacity_snapshot() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();

    let mut slice = SliceBuilder::new(7001, 64).build();
    slice.disk_type = String::new();
    let snapshot = serde_json::json!({ "adjustable": [slice] }).to_string();
    let capacity = StaticCapacitySource::from_json_str(&snapshot).unwrap();
    assert!(capacity.transfer_pool.is_empty());

    let state = AppState::new(&db_path, Arc::new(capacity)).await.unwrap();
    for device in default_device_types() {
        state.device_type_repo.upsert(&device).unwrap();
    }
    let demands = vec![Demand::delete("d-1", SnapshotBuilder::new(24).build())];
    let ticket: TicketBaseInfo = ticket("T-APP-1", TicketType::Delete, demands);
    state.ticket_repo.create(&ticket).unwrap();

    let subs = state.ticket_api.split_ticket("T-APP-1").await.unwrap();

    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].sub_type, SubTicketType::Transfer);
    assert_eq!(subs[0].original.cpu_core, 24);
}
