// ==========================================
// 资源预测单据拆分 - 子单组装
// ==========================================
// 职责: 拆分分组 → 子单记录 (汇总/审批路由/状态路由) → 批量落库
// 红线: 单次拆分的全部子单一次性提交, 不存在部分成功
// 红线: 转入/转出统一落库为转移子单, 且不进入等待合并
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::demand::{Demand, ResourceTotals};
use crate::domain::ticket::{SubTicket, TicketBaseInfo};
use crate::domain::types::{
    AdminAuditStatus, SubTicketStage, SubTicketStatus, SubTicketType, TicketType,
};
use crate::engine::error::SplitResult;
use crate::engine::repositories::ResPlanTicketStore;
use crate::engine::split_group::SplitGroups;

// ==========================================
// 路由规则
// ==========================================

/// 管理员审批路由
///
/// 删除单与非转移子单免审; 转移子单变更后核数不超过审批额度时免审
pub fn admin_audit_status(
    ticket_type: TicketType,
    sub_type: SubTicketType,
    updated_cpu_core: i64,
    audit_quota: i64,
) -> AdminAuditStatus {
    if ticket_type == TicketType::Delete || !sub_type.is_transfer() {
        return AdminAuditStatus::Skip;
    }
    if updated_cpu_core <= audit_quota {
        return AdminAuditStatus::Skip;
    }
    AdminAuditStatus::Auditing
}

/// 子单初始 (状态, 阶段)
pub fn initial_status(
    sub_type: SubTicketType,
    admin_audit: AdminAuditStatus,
) -> (SubTicketStatus, SubTicketStage) {
    if !sub_type.is_transfer() {
        return (SubTicketStatus::WaitingMerge, SubTicketStage::WaitingMerge);
    }
    match admin_audit {
        AdminAuditStatus::Skip => (SubTicketStatus::Auditing, SubTicketStage::CrpAudit),
        _ => (SubTicketStatus::Auditing, SubTicketStage::AdminAudit),
    }
}

/// 解析最终分组
///
/// 拆分结果只有一个单据默认类型的分组时, 视为未拆分, 使用原始需求列表
pub fn resolve_groups(
    ticket_type: TicketType,
    groups: SplitGroups,
    original_demands: &[Demand],
) -> Vec<(SubTicketType, Vec<Demand>)> {
    let default_sub_type = ticket_type.default_sub_type();
    if groups.is_single_group_of(default_sub_type) {
        debug!(sub_type = %default_sub_type, "未发生拆分，使用原始需求列表");
        return vec![(default_sub_type, original_demands.to_vec())];
    }
    groups.into_groups()
}

// ==========================================
// SubTicketAssembler - 子单组装器
// ==========================================
pub struct SubTicketAssembler {
    ticket_store: Arc<dyn ResPlanTicketStore>,
}

impl SubTicketAssembler {
    pub fn new(ticket_store: Arc<dyn ResPlanTicketStore>) -> Self {
        Self { ticket_store }
    }

    /// 由分组构造子单 (不落库)
    pub fn build_sub_tickets(
        ticket: &TicketBaseInfo,
        ticket_type: TicketType,
        groups: Vec<(SubTicketType, Vec<Demand>)>,
        audit_quota: i64,
        submitted_at: NaiveDateTime,
    ) -> Vec<SubTicket> {
        groups
            .into_iter()
            .filter(|(_, demands)| !demands.is_empty())
            .map(|(group_type, demands)| {
                let sub_type = group_type.assembled();
                let (original, updated): (ResourceTotals, ResourceTotals) =
                    ResourceTotals::of_demands(&demands);
                let admin_audit =
                    admin_audit_status(ticket_type, sub_type, updated.cpu_core, audit_quota);
                let (status, stage) = initial_status(sub_type, admin_audit);

                SubTicket {
                    id: Uuid::new_v4().to_string(),
                    ticket_id: ticket.id.clone(),
                    bk_biz_id: ticket.bk_biz_id,
                    sub_type,
                    sub_demands: demands,
                    original,
                    updated,
                    status,
                    stage,
                    admin_audit_status: admin_audit,
                    crp_sn: None,
                    submitted_at,
                }
            })
            .collect()
    }

    /// 组装并批量创建子单
    pub fn assemble(
        &self,
        ticket: &TicketBaseInfo,
        ticket_type: TicketType,
        groups: SplitGroups,
        original_demands: &[Demand],
        audit_quota: i64,
    ) -> SplitResult<Vec<SubTicket>> {
        let resolved = resolve_groups(ticket_type, groups, original_demands);
        let now = chrono::Utc::now().naive_utc();
        let sub_tickets =
            Self::build_sub_tickets(ticket, ticket_type, resolved, audit_quota, now);

        let ids = self.ticket_store.batch_create_sub_tickets(&sub_tickets)?;
        info!(
            ticket_id = %ticket.id,
            sub_ticket_count = ids.len(),
            "子单批量创建完成"
        );

        Ok(sub_tickets)
    }
}
