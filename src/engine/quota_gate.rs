// ==========================================
// 资源预测单据拆分 - 转移额度门控
// ==========================================
// 规则: 业务剩余转移额度低于配置门槛时, 新增需求不尝试转移
// ==========================================

use crate::config::PlanConfigReader;
use crate::domain::quota::TransferQuotaConfig;
use crate::engine::error::{SplitError, SplitResult};
use crate::repository::TransferQuotaRepository;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// Trait: TransferQuotaSource
// ==========================================
pub trait TransferQuotaSource: Send + Sync {
    /// 查询业务剩余转移额度 (核)
    fn remain_transfer_quota(
        &self,
        year: i32,
        bk_biz_id: i64,
        obs_projects: &[String],
    ) -> SplitResult<i64>;
}

impl TransferQuotaSource for TransferQuotaRepository {
    fn remain_transfer_quota(
        &self,
        year: i32,
        bk_biz_id: i64,
        obs_projects: &[String],
    ) -> SplitResult<i64> {
        Ok(TransferQuotaRepository::remain_transfer_quota(
            self,
            year,
            bk_biz_id,
            obs_projects,
        )?)
    }
}

/// 门控结论
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaDecision {
    pub can_transfer: bool,
    pub remain: i64,
    pub config: TransferQuotaConfig,
}

// ==========================================
// QuotaGate - 转移额度门控
// ==========================================
pub struct QuotaGate {
    config: Arc<dyn PlanConfigReader>,
    quota_source: Arc<dyn TransferQuotaSource>,
}

impl QuotaGate {
    pub fn new(
        config: Arc<dyn PlanConfigReader>,
        quota_source: Arc<dyn TransferQuotaSource>,
    ) -> Self {
        Self {
            config,
            quota_source,
        }
    }

    /// 读取转移额度配置
    pub async fn transfer_quota_config(&self) -> SplitResult<TransferQuotaConfig> {
        self.config
            .get_plan_transfer_quota_configs()
            .await
            .map_err(|e| SplitError::Config(e.to_string()))
    }

    /// 判断本次新增是否尝试转移
    pub async fn evaluate(
        &self,
        year: i32,
        bk_biz_id: i64,
        obs_projects: &[String],
    ) -> SplitResult<QuotaDecision> {
        let config = self.transfer_quota_config().await?;
        let remain = self
            .quota_source
            .remain_transfer_quota(year, bk_biz_id, obs_projects)?;

        let can_transfer = remain >= config.quota;
        if can_transfer {
            debug!(bk_biz_id, year, remain, quota = config.quota, "剩余转移额度充足");
        } else {
            info!(
                bk_biz_id,
                year,
                remain,
                quota = config.quota,
                "剩余转移额度不足，跳过转移匹配"
            );
        }

        Ok(QuotaDecision {
            can_transfer,
            remain,
            config,
        })
    }
}
