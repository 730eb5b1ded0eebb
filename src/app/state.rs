// ==========================================
// 资源预测单据拆分 - 应用状态
// ==========================================
// 职责: 组装仓储/配置/引擎/API, 管理共享连接
// ==========================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;

use crate::api::ResPlanTicketApi;
use crate::config::{ConfigManager, PlanConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{
    CapacitySource, DeviceCatalog, QuotaGate, SplitterDeps, SqliteTicketStore, TicketSplitter,
};
use crate::repository::{
    DeviceTypeRepository, ResPlanSubTicketRepository, ResPlanTicketRepository,
    TransferQuotaRepository,
};

/// 应用状态
///
/// 单据 API 与共享资源; 同一数据库连接在各仓储间共享
pub struct AppState {
    /// 单据API
    pub ticket_api: Arc<ResPlanTicketApi>,

    /// 拆分引擎
    pub splitter: Arc<TicketSplitter>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 机型仓储（用于机型维护）
    pub device_type_repo: Arc<DeviceTypeRepository>,

    /// 转移额度仓储（用于额度维护）
    pub transfer_quota_repo: Arc<TransferQuotaRepository>,

    /// 主单仓储
    pub ticket_repo: Arc<ResPlanTicketRepository>,
}

impl AppState {
    /// 打开数据库文件并组装应用状态
    ///
    /// 数据库不存在表结构时自动初始化
    pub async fn new(
        db_path: &str,
        capacity_source: Arc<dyn CapacitySource>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库表结构: {}", e))?;

        Self::from_connection(Arc::new(Mutex::new(conn)), capacity_source).await
    }

    /// 基于已有连接组装应用状态
    pub async fn from_connection(
        conn: Arc<Mutex<Connection>>,
        capacity_source: Arc<dyn CapacitySource>,
    ) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let ticket_repo = Arc::new(ResPlanTicketRepository::new(conn.clone()));
        let sub_ticket_repo = Arc::new(ResPlanSubTicketRepository::new(conn.clone()));
        let device_type_repo = Arc::new(DeviceTypeRepository::new(conn.clone()));
        let transfer_quota_repo = Arc::new(TransferQuotaRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let ttl_secs = config_manager
            .get_device_cache_ttl_secs()
            .await
            .map_err(|e| format!("无法读取机型缓存有效期: {}", e))?;
        let device_catalog = Arc::new(DeviceCatalog::new(
            device_type_repo.clone(),
            Duration::from_secs(ttl_secs),
        ));
        let quota_gate = Arc::new(QuotaGate::new(
            config_manager.clone(),
            transfer_quota_repo.clone(),
        ));
        let ticket_store = Arc::new(SqliteTicketStore::new(
            ticket_repo.clone(),
            sub_ticket_repo.clone(),
        ));

        let splitter = Arc::new(TicketSplitter::new(SplitterDeps::new(
            ticket_store,
            capacity_source,
            device_catalog,
            quota_gate,
        )));

        // ==========================================
        // 创建API实例
        // ==========================================
        let ticket_api = Arc::new(ResPlanTicketApi::new(
            ticket_repo.clone(),
            sub_ticket_repo,
            splitter.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            ticket_api,
            splitter,
            config_manager,
            device_type_repo,
            transfer_quota_repo,
            ticket_repo,
        })
    }
}

/// 默认数据库路径
///
/// 优先读取环境变量 HCM_RES_PLAN_DB
pub fn get_default_db_path() -> String {
    std::env::var("HCM_RES_PLAN_DB").unwrap_or_else(|_| "hcm_res_plan.db".to_string())
}
