// ==========================================
// 资源预测单据拆分 - 拆分引擎
// ==========================================
// 职责: 按单据类型编排拆分流程 (新增/删除/调整)
// 红线: 需求列表只读, 所有片段均为派生副本
// 红线: 切片消耗表仅在单次拆分内有效, 重试从空表开始
// 红线: 需求按顺序处理, 后续需求可见先前需求的消耗
// ==========================================
// 输入: 主单ID + 需求列表 (+ 规划产品/运营产品)
// 输出: 已创建的子单
// ==========================================

use chrono::Datelike;
use tracing::{info, instrument};

use crate::domain::demand::Demand;
use crate::domain::slice::{AdjustableDemandFilter, CrpDemandSlice};
use crate::domain::ticket::{SubTicket, TicketBaseInfo};
use crate::domain::types::TicketType;
use crate::engine::assembler::SubTicketAssembler;
use crate::engine::error::{SplitError, SplitResult};
use crate::engine::matcher::RemainderTable;
use crate::engine::quota_gate::QuotaDecision;
use crate::engine::repositories::SplitterDeps;
use crate::engine::split_group::SplitGroups;

mod add;
mod adjust;
mod delete;

// ==========================================
// SplitRun - 单次拆分的运行态
// ==========================================
/// 单次拆分的可变状态
///
/// 转入消耗与取消/延期消耗分表记录, 两者对应 CRP 中不同的切片集合
#[derive(Debug, Default)]
pub struct SplitRun {
    transfer_remainders: RemainderTable,
    adjust_remainders: RemainderTable,
    groups: SplitGroups,
    quota_decision: Option<QuotaDecision>,
}

impl SplitRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transfer_remainders(&self) -> &RemainderTable {
        &self.transfer_remainders
    }

    pub fn adjust_remainders(&self) -> &RemainderTable {
        &self.adjust_remainders
    }

    pub fn groups(&self) -> &SplitGroups {
        &self.groups
    }

    /// 本次拆分的额度门控结论 (未进入新增流程时为 None)
    pub fn quota_decision(&self) -> Option<&QuotaDecision> {
        self.quota_decision.as_ref()
    }

    pub fn into_groups(self) -> SplitGroups {
        self.groups
    }
}

// ==========================================
// TicketSplitter - 拆分引擎
// ==========================================
pub struct TicketSplitter {
    deps: SplitterDeps,
    assembler: SubTicketAssembler,
}

impl TicketSplitter {
    pub fn new(deps: SplitterDeps) -> Self {
        let assembler = SubTicketAssembler::new(deps.ticket_store.clone());
        Self { deps, assembler }
    }

    // ==========================================
    // 入口
    // ==========================================

    /// 新增单拆分
    #[instrument(skip(self, demands), fields(ticket_id = %ticket_id, demand_count = demands.len()))]
    pub async fn split_add_ticket(
        &self,
        ticket_id: &str,
        demands: &[Demand],
    ) -> SplitResult<Vec<SubTicket>> {
        let ticket = self.deps.ticket_store.get_ticket_base_info(ticket_id)?;
        self.run_add(&ticket, demands).await
    }

    /// 删除单拆分
    #[instrument(skip(self, demands), fields(ticket_id = %ticket_id, demand_count = demands.len()))]
    pub async fn split_delete_ticket(
        &self,
        ticket_id: &str,
        demands: &[Demand],
        plan_product_name: &str,
        op_product_name: &str,
    ) -> SplitResult<Vec<SubTicket>> {
        let ticket = self.deps.ticket_store.get_ticket_base_info(ticket_id)?;
        self.run_delete(&ticket, demands, plan_product_name, op_product_name)
            .await
    }

    /// 调整单拆分
    #[instrument(skip(self, demands), fields(ticket_id = %ticket_id, demand_count = demands.len()))]
    pub async fn split_adjust_ticket(
        &self,
        ticket_id: &str,
        demands: &[Demand],
        plan_product_name: &str,
        op_product_name: &str,
    ) -> SplitResult<Vec<SubTicket>> {
        let ticket = self.deps.ticket_store.get_ticket_base_info(ticket_id)?;
        self.run_adjust(&ticket, demands, plan_product_name, op_product_name)
            .await
    }

    /// 按主单类型分派拆分流程
    #[instrument(skip(self), fields(ticket_id = %ticket_id))]
    pub async fn split_ticket(&self, ticket_id: &str) -> SplitResult<Vec<SubTicket>> {
        let ticket = self.deps.ticket_store.get_ticket_base_info(ticket_id)?;
        info!(ticket_type = %ticket.ticket_type, demand_count = ticket.demands.len(), "开始拆分主单");

        let demands = ticket.demands.clone();
        match ticket.ticket_type {
            TicketType::Add => self.run_add(&ticket, &demands).await,
            TicketType::Delete => {
                self.run_delete(
                    &ticket,
                    &demands,
                    &ticket.plan_product_name,
                    &ticket.op_product_name,
                )
                .await
            }
            TicketType::Adjust => {
                self.run_adjust(
                    &ticket,
                    &demands,
                    &ticket.plan_product_name,
                    &ticket.op_product_name,
                )
                .await
            }
        }
    }

    // ==========================================
    // 流程
    // ==========================================

    async fn run_add(&self, ticket: &TicketBaseInfo, demands: &[Demand]) -> SplitResult<Vec<SubTicket>> {
        ensure_not_empty(demands)?;
        let mut run = SplitRun::new();
        self.prepare_add(&mut run, ticket, demands).await?;
        self.finish(run, ticket, TicketType::Add, demands).await
    }

    async fn run_delete(
        &self,
        ticket: &TicketBaseInfo,
        demands: &[Demand],
        plan_product_name: &str,
        op_product_name: &str,
    ) -> SplitResult<Vec<SubTicket>> {
        ensure_not_empty(demands)?;
        let mut run = SplitRun::new();
        self.prepare_delete(&mut run, ticket, demands, plan_product_name, op_product_name)
            .await?;
        self.finish(run, ticket, TicketType::Delete, demands).await
    }

    async fn run_adjust(
        &self,
        ticket: &TicketBaseInfo,
        demands: &[Demand],
        plan_product_name: &str,
        op_product_name: &str,
    ) -> SplitResult<Vec<SubTicket>> {
        ensure_not_empty(demands)?;
        let mut run = SplitRun::new();
        self.prepare_adjust(&mut run, ticket, demands, plan_product_name, op_product_name)
            .await?;
        self.finish(run, ticket, TicketType::Adjust, demands).await
    }

    /// 组装并落库
    async fn finish(
        &self,
        run: SplitRun,
        ticket: &TicketBaseInfo,
        ticket_type: TicketType,
        demands: &[Demand],
    ) -> SplitResult<Vec<SubTicket>> {
        let audit_quota = match run.quota_decision() {
            Some(decision) => decision.config.audit_quota,
            None => self.deps.quota_gate.transfer_quota_config().await?.audit_quota,
        };

        let groups = run.into_groups();
        info!(
            ticket_id = %ticket.id,
            groups = ?groups.non_empty_types(),
            "需求拆分完成，开始组装子单"
        );
        self.assembler
            .assemble(ticket, ticket_type, groups, demands, audit_quota)
    }

    // ==========================================
    // 共用
    // ==========================================

    /// 额度门控使用的年份 (主单提交年份)
    fn quota_year(ticket: &TicketBaseInfo) -> i32 {
        ticket.submitted_at.year()
    }

    /// 查询可调整切片 (空结果视为错误)
    async fn query_adjustable(
        &self,
        filter: &AdjustableDemandFilter,
    ) -> SplitResult<Vec<CrpDemandSlice>> {
        let slices = self
            .deps
            .capacity_source
            .query_adjustable_demands(filter)
            .await?;
        if slices.is_empty() {
            return Err(SplitError::NoAdjustableDemand(format!(
                "bk_biz_id={}, region={}, device_type={}, expect_time={}",
                filter.bk_biz_id, filter.region_id, filter.device_type, filter.expect_time
            )));
        }
        Ok(slices)
    }
}

fn ensure_not_empty(demands: &[Demand]) -> SplitResult<()> {
    if demands.is_empty() {
        return Err(SplitError::InvalidInput("demands is empty".to_string()));
    }
    Ok(())
}

/// 去重并保持首次出现顺序
fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
