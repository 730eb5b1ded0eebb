// ==========================================
// 拆分引擎 - 删除准备
// ==========================================
// 已审核可取消的部分归还中转池 (转出), 剩余部分走删除
// ==========================================

use tracing::info;

use super::{SplitRun, TicketSplitter};
use crate::domain::demand::Demand;
use crate::domain::slice::{AdjustableDemandFilter, Adjustment};
use crate::domain::ticket::TicketBaseInfo;
use crate::domain::types::SubTicketType;
use crate::engine::device_catalog::lookup_device;
use crate::engine::error::{SplitError, SplitResult};
use crate::engine::matcher::match_adjustable;

impl TicketSplitter {
    /// 删除准备: 逐需求查询可调整切片 → 取消匹配 → 片段分组
    pub async fn prepare_delete(
        &self,
        run: &mut SplitRun,
        ticket: &TicketBaseInfo,
        demands: &[Demand],
        plan_product_name: &str,
        op_product_name: &str,
    ) -> SplitResult<()> {
        if demands.is_empty() {
            return Ok(());
        }

        let devices = self.deps.device_catalog.get_device_types()?;

        for demand in demands {
            let original = demand.original.as_ref().ok_or_else(|| {
                SplitError::InvalidInput(format!(
                    "original demand is nil, demand_id={}",
                    demand.demand_id
                ))
            })?;

            let filter = AdjustableDemandFilter {
                bk_biz_id: ticket.bk_biz_id,
                region_id: original.region_id.clone(),
                device_family: original.device_family.clone(),
                device_type: original.device_type.clone(),
                expect_time: original.expect_time,
                plan_product_name: plan_product_name.to_string(),
                op_product_name: op_product_name.to_string(),
                disk_type: original.disk_type.clone(),
                res_mode: original.res_mode.clone(),
            };
            let slices = self.query_adjustable(&filter).await?;

            let outcome = match_adjustable(
                &mut run.adjust_remainders,
                original,
                original.cpu_core,
                &slices,
                &Adjustment::Cancel,
            );

            if outcome.consumed == 0 {
                run.groups.push(SubTicketType::Delete, demand.clone());
                continue;
            }

            let device = lookup_device(&devices, &original.device_type)?;
            run.groups.push(
                SubTicketType::TransferOut,
                demand.with_original(original.resized(outcome.consumed, device, true)),
            );
            if outcome.remaining > 0 {
                run.groups.push(
                    SubTicketType::Delete,
                    demand.with_original(original.resized(outcome.remaining, device, false)),
                );
            }

            info!(
                demand_id = %demand.demand_id,
                transfer_core = outcome.consumed,
                delete_core = outcome.remaining,
                "删除需求拆分"
            );
        }

        Ok(())
    }
}
