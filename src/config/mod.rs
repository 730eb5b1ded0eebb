// ==========================================
// 资源预测单据拆分 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod plan_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_DEVICE_TYPE_CACHE_TTL_SECS};
pub use plan_config_trait::PlanConfigReader;
