// ==========================================
// Repository 层集成测试
// ==========================================
// 测试范围:
// 1. 主单: 创建/查询/拆分状态回写
// 2. 子单: 批量创建与按主单查询
// 3. 机型/转移额度
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use hcm_res_plan::domain::demand::{Demand, ResourceTotals};
use hcm_res_plan::domain::ticket::SubTicket;
use hcm_res_plan::domain::types::{
    AdminAuditStatus, SubTicketStage, SubTicketStatus, SubTicketType, TicketSplitStatus,
    TicketType,
};
use hcm_res_plan::repository::{
    DeviceTypeRepository, RepositoryError, ResPlanSubTicketRepository, ResPlanTicketRepository,
    TransferQuotaRepository,
};

fn sub_ticket(id: &str, ticket_id: &str, sub_type: SubTicketType, demands: Vec<Demand>) -> SubTicket {
    let (original, updated) = ResourceTotals::of_demands(&demands);
    SubTicket {
        id: id.to_string(),
        ticket_id: ticket_id.to_string(),
        bk_biz_id: BIZ_ID,
        sub_type,
        sub_demands: demands,
        original,
        updated,
        status: SubTicketStatus::WaitingMerge,
        stage: SubTicketStage::WaitingMerge,
        admin_audit_status: AdminAuditStatus::Skip,
        crp_sn: None,
        submitted_at: ts(2024, 5, 21),
    }
}

#[test]
fn test_ticket_create_and_get() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let repo = ResPlanTicketRepository::new(conn);

    let demands = vec![
        Demand::add("d-1", SnapshotBuilder::new(32).build()),
        Demand::delete("d-2", SnapshotBuilder::new(8).build()),
    ];
    repo.create(&ticket("T-1", TicketType::Adjust, demands.clone())).unwrap();

    let loaded = repo.get_ticket_base_info("T-1").unwrap();
    assert_eq!(loaded.ticket_type, TicketType::Adjust);
    assert_eq!(loaded.demands, demands);
    assert_eq!(loaded.updated.cpu_core, 32);
    assert_eq!(loaded.original.cpu_core, 8);
    assert_eq!(loaded.submitted_at, ts(2024, 5, 20));
    assert_eq!(loaded.split_status, TicketSplitStatus::Init);
}

#[test]
fn test_ticket_get_missing_is_not_found() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let repo = ResPlanTicketRepository::new(test_helpers::open_test_connection(&db_path).unwrap());

    let err = repo.get_ticket_base_info("T-NONE").unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_ticket_update_split_status() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let repo = ResPlanTicketRepository::new(test_helpers::open_test_connection(&db_path).unwrap());
    repo.create(&ticket("T-1", TicketType::Add, vec![])).unwrap();

    repo.update_split_status("T-1", TicketSplitStatus::Failed, Some("crp timeout"))
        .unwrap();

    let loaded = repo.get_ticket_base_info("T-1").unwrap();
    assert_eq!(loaded.split_status, TicketSplitStatus::Failed);
    assert_eq!(loaded.split_message.as_deref(), Some("crp timeout"));

    let err = repo
        .update_split_status("T-NONE", TicketSplitStatus::Split, None)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_sub_ticket_batch_create_and_list() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let ticket_repo = ResPlanTicketRepository::new(conn.clone());
    let sub_repo = ResPlanSubTicketRepository::new(conn);
    ticket_repo.create(&ticket("T-1", TicketType::Add, vec![])).unwrap();

    let subs = vec![
        sub_ticket("S-2", "T-1", SubTicketType::Transfer, vec![Demand::add("d-1", SnapshotBuilder::new(16).build())]),
        sub_ticket("S-1", "T-1", SubTicketType::Add, vec![Demand::add("d-2", SnapshotBuilder::new(8).build())]),
    ];
    let ids = sub_repo.batch_create(&subs).unwrap();
    assert_eq!(ids, vec!["S-2".to_string(), "S-1".to_string()]);

    let listed = sub_repo.list_by_ticket("T-1").unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "S-2");
    assert_eq!(listed[0].sub_type, SubTicketType::Transfer);
    assert_eq!(listed[0].updated.cpu_core, 16);
    assert_eq!(listed[1].sub_demands, subs[1].sub_demands);
    assert!(sub_repo.list_by_ticket("T-OTHER").unwrap().is_empty());
}

#[test]
fn test_sub_ticket_batch_create_is_all_or_nothing() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let ticket_repo = ResPlanTicketRepository::new(conn.clone());
    let sub_repo = ResPlanSubTicketRepository::new(conn);
    ticket_repo.create(&ticket("T-1", TicketType::Add, vec![])).unwrap();

    // 第二条子单重复主键, 整批回滚
    let subs = vec![
        sub_ticket("S-1", "T-1", SubTicketType::Add, vec![]),
        sub_ticket("S-1", "T-1", SubTicketType::Add, vec![]),
    ];
    let err = sub_repo.batch_create(&subs).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    assert!(sub_repo.list_by_ticket("T-1").unwrap().is_empty());
}

#[test]
fn test_device_type_upsert_and_list() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let repo = DeviceTypeRepository::new(test_helpers::open_test_connection(&db_path).unwrap());

    for device in default_device_types() {
        repo.upsert(&device).unwrap();
    }
    let mut updated = default_device_types()[0].clone();
    updated.memory = 32.0;
    repo.upsert(&updated).unwrap();

    let devices = repo.list_all().unwrap();
    assert_eq!(devices.len(), 2);
    let device = devices.iter().find(|d| d.device_type == DEVICE_TYPE).unwrap();
    assert_eq!(device.memory, 32.0);
}

#[test]
fn test_remain_transfer_quota() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let repo = TransferQuotaRepository::new(test_helpers::open_test_connection(&db_path).unwrap());

    assert_eq!(repo.remain_transfer_quota(2024, BIZ_ID, &[]).unwrap(), 0);

    repo.upsert_quota(2024, BIZ_ID, OBS_PROJECT, 100, 40).unwrap();
    repo.upsert_quota(2024, BIZ_ID, "春节保障", 50, 10).unwrap();
    repo.upsert_quota(2023, BIZ_ID, OBS_PROJECT, 500, 0).unwrap();

    assert_eq!(
        repo.remain_transfer_quota(2024, BIZ_ID, &[OBS_PROJECT.to_string()]).unwrap(),
        60
    );
    assert_eq!(repo.remain_transfer_quota(2024, BIZ_ID, &[]).unwrap(), 100);
    assert_eq!(repo.remain_transfer_quota(2024, 1, &[]).unwrap(), 0);
}
