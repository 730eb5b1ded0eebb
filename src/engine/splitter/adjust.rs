// ==========================================
// 拆分引擎 - 调整准备
// ==========================================
// 纯延期直接归入延期分组; 其余拆为删除半边 + 新增半边分别准备
// 最终将可合并分组并入调整分组, 转移分组保持独立
// ==========================================

use tracing::debug;

use super::{SplitRun, TicketSplitter};
use crate::domain::demand::{Demand, DemandChange};
use crate::domain::ticket::TicketBaseInfo;
use crate::domain::types::SubTicketType;
use crate::engine::error::{SplitError, SplitResult};

impl TicketSplitter {
    /// 调整准备
    pub async fn prepare_adjust(
        &self,
        run: &mut SplitRun,
        ticket: &TicketBaseInfo,
        demands: &[Demand],
        plan_product_name: &str,
        op_product_name: &str,
    ) -> SplitResult<()> {
        let mut add_half = Vec::new();
        let mut delete_half = Vec::new();

        for demand in demands {
            match demand.change() {
                None => {
                    return Err(SplitError::InvalidInput(format!(
                        "original and updated demand are both nil, demand_id={}",
                        demand.demand_id
                    )))
                }
                Some(DemandChange::Add { .. }) => add_half.push(demand.clone()),
                Some(DemandChange::Delete { .. }) => delete_half.push(demand.clone()),
                Some(DemandChange::Adjust { .. }) if demand.is_transfer_free() => {
                    run.groups.push(SubTicketType::Delay, demand.clone());
                }
                Some(DemandChange::Adjust { .. }) => {
                    delete_half.extend(demand.delete_half());
                    add_half.extend(demand.add_half());
                }
            }
        }

        debug!(
            delay_count = run.groups.get(SubTicketType::Delay).len(),
            add_half = add_half.len(),
            delete_half = delete_half.len(),
            "调整需求分类完成"
        );

        self.prepare_delete(run, ticket, &delete_half, plan_product_name, op_product_name)
            .await?;
        // 额度不足时 prepare_add 会将新增半边整体归入新增分组
        self.prepare_add(run, ticket, &add_half).await?;

        run.groups.fold_mergeable_into_adjust();
        Ok(())
    }
}
