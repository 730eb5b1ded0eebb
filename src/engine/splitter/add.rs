// ==========================================
// 拆分引擎 - 新增准备
// ==========================================
// 额度充足时从中转池借调 (转入), 剩余部分走新增
// ==========================================

use tracing::{debug, info};

use super::{unique_in_order, SplitRun, TicketSplitter};
use crate::domain::demand::{Demand, DemandSnapshot};
use crate::domain::slice::TransferPoolFilter;
use crate::domain::ticket::TicketBaseInfo;
use crate::domain::types::SubTicketType;
use crate::engine::device_catalog::lookup_device;
use crate::engine::error::{SplitError, SplitResult};
use crate::engine::matcher::match_transfer_in;

impl TicketSplitter {
    /// 新增准备: 额度门控 → 中转池查询 → 逐需求转入匹配 → 片段分组
    pub async fn prepare_add(
        &self,
        run: &mut SplitRun,
        ticket: &TicketBaseInfo,
        demands: &[Demand],
    ) -> SplitResult<()> {
        if demands.is_empty() {
            return Ok(());
        }

        let updated_list = demands
            .iter()
            .map(|demand| {
                demand.updated.as_ref().ok_or_else(|| {
                    SplitError::InvalidInput(format!(
                        "updated demand is nil, demand_id={}",
                        demand.demand_id
                    ))
                })
            })
            .collect::<SplitResult<Vec<&DemandSnapshot>>>()?;

        let devices = self.deps.device_catalog.get_device_types()?;

        let obs_projects = unique_in_order(updated_list.iter().map(|u| u.obs_project.as_str()));
        let decision = self
            .deps
            .quota_gate
            .evaluate(Self::quota_year(ticket), ticket.bk_biz_id, &obs_projects)
            .await?;
        run.quota_decision = Some(decision);

        if !decision.can_transfer {
            run.groups.extend(SubTicketType::Add, demands.iter().cloned());
            return Ok(());
        }

        let filter = TransferPoolFilter {
            obs_projects,
            technical_classes: unique_in_order(
                updated_list.iter().map(|u| u.technical_class.as_str()),
            ),
        };
        let pool = self
            .deps
            .capacity_source
            .query_transfer_pool_demands(&filter)
            .await?;
        debug!(slice_count = pool.len(), "中转池 CRP 预测查询完成");

        for (demand, updated) in demands.iter().zip(updated_list) {
            let outcome = match_transfer_in(
                &mut run.transfer_remainders,
                updated,
                updated.cpu_core,
                &pool,
            );

            if outcome.consumed == 0 {
                run.groups.push(SubTicketType::Add, demand.clone());
                continue;
            }

            let device = lookup_device(&devices, &updated.device_type)?;
            run.groups.push(
                SubTicketType::TransferIn,
                demand.with_updated(updated.resized(outcome.consumed, device, true)),
            );
            if outcome.remaining > 0 {
                run.groups.push(
                    SubTicketType::Add,
                    demand.with_updated(updated.resized(outcome.remaining, device, false)),
                );
            }

            info!(
                demand_id = %demand.demand_id,
                transfer_core = outcome.consumed,
                add_core = outcome.remaining,
                "新增需求拆分"
            );
        }

        Ok(())
    }
}
