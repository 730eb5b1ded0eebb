// ==========================================
// 拆分集成测试辅助工具
// ==========================================
// 职责: 组装临时数据库 + Mock 配置 + Mock CRP 的拆分测试环境
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;

use hcm_res_plan::api::ResPlanTicketApi;
use hcm_res_plan::domain::demand::Demand;
use hcm_res_plan::domain::ticket::TicketBaseInfo;
use hcm_res_plan::domain::types::TicketType;
use hcm_res_plan::engine::{
    DeviceCatalog, QuotaGate, SplitterDeps, SqliteTicketStore, TicketSplitter,
};
use hcm_res_plan::repository::{
    DeviceTypeRepository, ResPlanSubTicketRepository, ResPlanTicketRepository,
    TransferQuotaRepository,
};

use super::mock_capacity::MockCapacitySource;
use super::mock_config::MockConfig;
use super::test_data_builder::{default_device_types, ticket};

// ==========================================
// 拆分测试环境
// ==========================================

pub struct SplitterTestEnv {
    pub db_path: String,
    pub splitter: Arc<TicketSplitter>,
    pub ticket_api: Arc<ResPlanTicketApi>,
    pub capacity: Arc<MockCapacitySource>,

    // Repository层（用于测试数据准备与校验）
    pub ticket_repo: Arc<ResPlanTicketRepository>,
    pub sub_ticket_repo: Arc<ResPlanSubTicketRepository>,
    pub device_type_repo: Arc<DeviceTypeRepository>,
    pub transfer_quota_repo: Arc<TransferQuotaRepository>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl SplitterTestEnv {
    /// 创建测试环境, 预置测试机型
    pub fn new(config: MockConfig, capacity: MockCapacitySource) -> Result<Self, Box<dyn Error>> {
        let (temp_file, db_path) = test_helpers::create_test_db()?;
        let conn = test_helpers::open_test_connection(&db_path)?;

        let ticket_repo = Arc::new(ResPlanTicketRepository::new(conn.clone()));
        let sub_ticket_repo = Arc::new(ResPlanSubTicketRepository::new(conn.clone()));
        let device_type_repo = Arc::new(DeviceTypeRepository::new(conn.clone()));
        let transfer_quota_repo = Arc::new(TransferQuotaRepository::new(conn.clone()));

        for device in default_device_types() {
            device_type_repo.upsert(&device)?;
        }

        let capacity = Arc::new(capacity);
        let device_catalog = Arc::new(DeviceCatalog::new(
            device_type_repo.clone(),
            Duration::from_secs(config.device_cache_ttl_secs),
        ));
        let quota_gate = Arc::new(QuotaGate::new(
            Arc::new(config),
            transfer_quota_repo.clone(),
        ));
        let ticket_store = Arc::new(SqliteTicketStore::new(
            ticket_repo.clone(),
            sub_ticket_repo.clone(),
        ));

        let splitter = Arc::new(TicketSplitter::new(SplitterDeps::new(
            ticket_store,
            capacity.clone(),
            device_catalog,
            quota_gate,
        )));
        let ticket_api = Arc::new(ResPlanTicketApi::new(
            ticket_repo.clone(),
            sub_ticket_repo.clone(),
            splitter.clone(),
        ));

        Ok(Self {
            db_path,
            splitter,
            ticket_api,
            capacity,
            ticket_repo,
            sub_ticket_repo,
            device_type_repo,
            transfer_quota_repo,
            _temp_file: temp_file,
        })
    }

    /// 写入主单并返回
    pub fn seed_ticket(
        &self,
        id: &str,
        ticket_type: TicketType,
        demands: Vec<Demand>,
    ) -> Result<TicketBaseInfo, Box<dyn Error>> {
        let ticket = ticket(id, ticket_type, demands);
        self.ticket_repo.create(&ticket)?;
        Ok(self.ticket_repo.get_ticket_base_info(id)?)
    }
}
