// ==========================================
// 资源预测单据拆分 - 配置读取 Trait
// ==========================================
// 职责: 定义拆分引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::quota::TransferQuotaConfig;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// PlanConfigReader Trait
// ==========================================
// 用途: 拆分引擎所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PlanConfigReader: Send + Sync {
    /// 获取转移额度配置
    ///
    /// # 返回
    /// - quota: 转移额度门槛（默认 0）
    /// - audit_quota: 转移免审额度（默认 0）
    async fn get_plan_transfer_quota_configs(&self) -> Result<TransferQuotaConfig, Box<dyn Error>>;

    /// 获取机型缓存有效期（秒）
    ///
    /// # 默认值
    /// - 300
    async fn get_device_cache_ttl_secs(&self) -> Result<u64, Box<dyn Error>>;
}
