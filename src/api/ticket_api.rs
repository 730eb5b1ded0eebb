// ==========================================
// 资源预测单据拆分 - 单据 API
// ==========================================
// 职责: 触发主单拆分并回写拆分结果, 查询子单
// 红线: 拆分失败不留下任何子单, 主单标记为失败以便重试
// ==========================================

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::ticket::{SubTicket, TicketBaseInfo};
use crate::domain::types::TicketSplitStatus;
use crate::engine::TicketSplitter;
use crate::repository::{ResPlanSubTicketRepository, ResPlanTicketRepository};

// ==========================================
// ResPlanTicketApi - 单据 API
// ==========================================
pub struct ResPlanTicketApi {
    ticket_repo: Arc<ResPlanTicketRepository>,
    sub_ticket_repo: Arc<ResPlanSubTicketRepository>,
    splitter: Arc<TicketSplitter>,
}

impl ResPlanTicketApi {
    pub fn new(
        ticket_repo: Arc<ResPlanTicketRepository>,
        sub_ticket_repo: Arc<ResPlanSubTicketRepository>,
        splitter: Arc<TicketSplitter>,
    ) -> Self {
        Self {
            ticket_repo,
            sub_ticket_repo,
            splitter,
        }
    }

    /// 查询主单
    pub fn get_ticket(&self, ticket_id: &str) -> ApiResult<TicketBaseInfo> {
        if ticket_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("ticket_id不能为空".to_string()));
        }
        Ok(self.ticket_repo.get_ticket_base_info(ticket_id)?)
    }

    /// 查询主单下的子单
    pub fn list_sub_tickets(&self, ticket_id: &str) -> ApiResult<Vec<SubTicket>> {
        if ticket_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("ticket_id不能为空".to_string()));
        }
        Ok(self.sub_ticket_repo.list_by_ticket(ticket_id)?)
    }

    /// 拆分主单
    ///
    /// 成功后主单标记为已拆分; 失败时标记为拆分失败并记录原因,
    /// 原错误继续返回给调用方
    pub async fn split_ticket(&self, ticket_id: &str) -> ApiResult<Vec<SubTicket>> {
        let ticket = self.get_ticket(ticket_id)?;
        if ticket.split_status == TicketSplitStatus::Split {
            return Err(ApiError::InvalidStateTransition {
                from: TicketSplitStatus::Split.to_string(),
                to: TicketSplitStatus::Split.to_string(),
            });
        }

        // 子单已落库但状态未回写: 补写状态, 拒绝再次拆分
        let existing = self.sub_ticket_repo.list_by_ticket(ticket_id)?;
        if !existing.is_empty() {
            warn!(
                ticket_id,
                sub_ticket_count = existing.len(),
                "主单已存在子单, 补写拆分状态"
            );
            self.ticket_repo
                .update_split_status(ticket_id, TicketSplitStatus::Split, None)?;
            return Err(ApiError::BusinessRuleViolation(format!(
                "主单已存在子单, 不可重复拆分: ticket_id={}",
                ticket_id
            )));
        }

        match self.splitter.split_ticket(ticket_id).await {
            Ok(sub_tickets) => {
                self.ticket_repo
                    .update_split_status(ticket_id, TicketSplitStatus::Split, None)?;
                info!(ticket_id, sub_ticket_count = sub_tickets.len(), "主单拆分成功");
                Ok(sub_tickets)
            }
            Err(err) => {
                let message = err.to_string();
                error!(ticket_id, error = %message, "主单拆分失败");
                if let Err(write_err) = self.ticket_repo.update_split_status(
                    ticket_id,
                    TicketSplitStatus::Failed,
                    Some(&message),
                ) {
                    error!(ticket_id, error = %write_err, "回写拆分失败状态失败");
                }
                Err(err.into())
            }
        }
    }
}
