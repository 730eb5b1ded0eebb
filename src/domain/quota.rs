// ==========================================
// 资源预测单据拆分 - 转移额度配置
// ==========================================

use serde::{Deserialize, Serialize};

/// 转移额度配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferQuotaConfig {
    /// 转移额度门槛 (核): 业务剩余额度低于该值时不尝试转移
    pub quota: i64,
    /// 审批额度门槛 (核): 转移子单核数不超过该值时免审
    pub audit_quota: i64,
}
