// ==========================================
// 资源预测单据拆分 - CRP 额度来源
// ==========================================
// 职责: 定义 CRP 预测查询接口, 实现依赖倒置
// 说明: 引擎只读 CRP, 消耗记录在拆分内存中完成
// ==========================================

use crate::domain::slice::{AdjustableDemandFilter, CrpDemandSlice, TransferPoolFilter};
use crate::engine::error::{SplitError, SplitResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// Trait: CapacitySource
// ==========================================
// 返回顺序即消耗顺序, 调用方不得重排
#[async_trait]
pub trait CapacitySource: Send + Sync {
    /// 查询中转池中可转入的预测
    async fn query_transfer_pool_demands(
        &self,
        filter: &TransferPoolFilter,
    ) -> SplitResult<Vec<CrpDemandSlice>>;

    /// 查询本业务可调整的预测
    ///
    /// 结果为空时返回 `SplitError::NoAdjustableDemand`
    async fn query_adjustable_demands(
        &self,
        filter: &AdjustableDemandFilter,
    ) -> SplitResult<Vec<CrpDemandSlice>>;
}

// ==========================================
// StaticCapacitySource - 静态额度来源
// ==========================================
// 用途: 开发工具与测试, 从 JSON 快照加载 CRP 预测
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCapacitySource {
    /// 中转池预测
    #[serde(default)]
    pub transfer_pool: Vec<CrpDemandSlice>,
    /// 各业务自有预测
    #[serde(default)]
    pub adjustable: Vec<CrpDemandSlice>,
}

impl StaticCapacitySource {
    pub fn new(transfer_pool: Vec<CrpDemandSlice>, adjustable: Vec<CrpDemandSlice>) -> Self {
        Self {
            transfer_pool,
            adjustable,
        }
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> SplitResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> SplitResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SplitError::CapacitySource(format!("读取 {} 失败: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }
}

fn contains_or_any(values: &[String], value: &str) -> bool {
    values.is_empty() || values.iter().any(|v| v == value)
}

#[async_trait]
impl CapacitySource for StaticCapacitySource {
    async fn query_transfer_pool_demands(
        &self,
        filter: &TransferPoolFilter,
    ) -> SplitResult<Vec<CrpDemandSlice>> {
        Ok(self
            .transfer_pool
            .iter()
            .filter(|s| contains_or_any(&filter.obs_projects, &s.obs_project))
            .filter(|s| contains_or_any(&filter.technical_classes, &s.technical_class))
            .cloned()
            .collect())
    }

    async fn query_adjustable_demands(
        &self,
        filter: &AdjustableDemandFilter,
    ) -> SplitResult<Vec<CrpDemandSlice>> {
        let slices: Vec<CrpDemandSlice> = self
            .adjustable
            .iter()
            .filter(|s| {
                s.bk_biz_id == filter.bk_biz_id
                    && s.region_id == filter.region_id
                    && s.device_family == filter.device_family
                    && s.device_type == filter.device_type
                    && s.expect_time == filter.expect_time
                    && s.plan_product_name == filter.plan_product_name
                    && (filter.res_mode.is_empty() || s.res_mode == filter.res_mode)
                    && (s.disk_type.is_empty() || s.disk_type == filter.disk_type)
            })
            .cloned()
            .collect();

        if slices.is_empty() {
            return Err(SplitError::NoAdjustableDemand(format!(
                "biz={}, region={}, device_type={}, expect_time={}",
                filter.bk_biz_id, filter.region_id, filter.device_type, filter.expect_time
            )));
        }
        Ok(slices)
    }
}
