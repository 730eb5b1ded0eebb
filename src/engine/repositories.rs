// ==========================================
// 资源预测单据拆分 - 引擎层协作方聚合
// ==========================================
// 职责: 聚合拆分引擎所需的所有协作方, 简化依赖注入
// 说明: 单据读取/子单落库以 trait 暴露, 便于测试替换
// ==========================================

use std::sync::Arc;

use crate::domain::ticket::{SubTicket, TicketBaseInfo};
use crate::engine::capacity_source::CapacitySource;
use crate::engine::device_catalog::DeviceCatalog;
use crate::engine::error::SplitResult;
use crate::engine::quota_gate::QuotaGate;
use crate::repository::{ResPlanSubTicketRepository, ResPlanTicketRepository};

// ==========================================
// Trait: ResPlanTicketStore
// ==========================================
pub trait ResPlanTicketStore: Send + Sync {
    /// 查询主单 (必须恰好一条)
    fn get_ticket_base_info(&self, ticket_id: &str) -> SplitResult<TicketBaseInfo>;

    /// 批量创建子单 (单事务, 全部成功或全部失败)
    fn batch_create_sub_tickets(&self, sub_tickets: &[SubTicket]) -> SplitResult<Vec<String>>;
}

/// 基于 SQLite 仓储的单据存储
#[derive(Clone)]
pub struct SqliteTicketStore {
    ticket_repo: Arc<ResPlanTicketRepository>,
    sub_ticket_repo: Arc<ResPlanSubTicketRepository>,
}

impl SqliteTicketStore {
    pub fn new(
        ticket_repo: Arc<ResPlanTicketRepository>,
        sub_ticket_repo: Arc<ResPlanSubTicketRepository>,
    ) -> Self {
        Self {
            ticket_repo,
            sub_ticket_repo,
        }
    }
}

impl ResPlanTicketStore for SqliteTicketStore {
    fn get_ticket_base_info(&self, ticket_id: &str) -> SplitResult<TicketBaseInfo> {
        Ok(self.ticket_repo.get_ticket_base_info(ticket_id)?)
    }

    fn batch_create_sub_tickets(&self, sub_tickets: &[SubTicket]) -> SplitResult<Vec<String>> {
        Ok(self.sub_ticket_repo.batch_create(sub_tickets)?)
    }
}

/// 拆分引擎协作方集合
///
/// # 包含的协作方
/// - `ticket_store`: 主单读取与子单落库
/// - `capacity_source`: CRP 预测查询
/// - `device_catalog`: 机型目录缓存
/// - `quota_gate`: 转移额度门控
#[derive(Clone)]
pub struct SplitterDeps {
    pub ticket_store: Arc<dyn ResPlanTicketStore>,
    pub capacity_source: Arc<dyn CapacitySource>,
    pub device_catalog: Arc<DeviceCatalog>,
    pub quota_gate: Arc<QuotaGate>,
}

impl SplitterDeps {
    pub fn new(
        ticket_store: Arc<dyn ResPlanTicketStore>,
        capacity_source: Arc<dyn CapacitySource>,
        device_catalog: Arc<DeviceCatalog>,
        quota_gate: Arc<QuotaGate>,
    ) -> Self {
        Self {
            ticket_store,
            capacity_source,
            device_catalog,
            quota_gate,
        }
    }
}
