// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use hcm_res_plan::config::PlanConfigReader;
use hcm_res_plan::domain::quota::TransferQuotaConfig;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub quota: i64,
    pub audit_quota: i64,
    pub device_cache_ttl_secs: u64,
}

impl MockConfig {
    /// 创建默认配置 (额度门槛为 0, 始终尝试转移)
    pub fn default() -> Self {
        Self {
            quota: 0,
            audit_quota: 0,
            device_cache_ttl_secs: 300,
        }
    }

    /// 指定转移额度门槛
    pub fn with_quota(quota: i64) -> Self {
        let mut config = Self::default();
        config.quota = quota;
        config
    }

    /// 指定审批额度
    pub fn with_audit_quota(audit_quota: i64) -> Self {
        let mut config = Self::default();
        config.audit_quota = audit_quota;
        config
    }
}

#[async_trait]
impl PlanConfigReader for MockConfig {
    async fn get_plan_transfer_quota_configs(&self) -> Result<TransferQuotaConfig, Box<dyn Error>> {
        Ok(TransferQuotaConfig {
            quota: self.quota,
            audit_quota: self.audit_quota,
        })
    }

    async fn get_device_cache_ttl_secs(&self) -> Result<u64, Box<dyn Error>> {
        Ok(self.device_cache_ttl_secs)
    }
}
