// ==========================================
// Mock CRP 预测来源 - 用于集成测试
// ==========================================
// 不做过滤, 原样返回预置切片, 并记录调用次数
// ==========================================

use async_trait::async_trait;
use hcm_res_plan::domain::slice::{AdjustableDemandFilter, CrpDemandSlice, TransferPoolFilter};
use hcm_res_plan::engine::{CapacitySource, SplitResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockCapacitySource {
    pub transfer_pool: Vec<CrpDemandSlice>,
    pub adjustable: Vec<CrpDemandSlice>,
    transfer_calls: AtomicUsize,
    adjustable_calls: AtomicUsize,
    last_transfer_filter: Mutex<Option<TransferPoolFilter>>,
}

impl MockCapacitySource {
    pub fn new(transfer_pool: Vec<CrpDemandSlice>, adjustable: Vec<CrpDemandSlice>) -> Self {
        Self {
            transfer_pool,
            adjustable,
            ..Self::default()
        }
    }

    pub fn transfer_calls(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    pub fn adjustable_calls(&self) -> usize {
        self.adjustable_calls.load(Ordering::SeqCst)
    }

    pub fn last_transfer_filter(&self) -> Option<TransferPoolFilter> {
        self.last_transfer_filter.lock().unwrap().clone()
    }
}

#[async_trait]
impl CapacitySource for MockCapacitySource {
    async fn query_transfer_pool_demands(
        &self,
        filter: &TransferPoolFilter,
    ) -> SplitResult<Vec<CrpDemandSlice>> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_transfer_filter.lock().unwrap() = Some(filter.clone());
        Ok(self.transfer_pool.clone())
    }

    async fn query_adjustable_demands(
        &self,
        _filter: &AdjustableDemandFilter,
    ) -> SplitResult<Vec<CrpDemandSlice>> {
        self.adjustable_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.adjustable.clone())
    }
}
