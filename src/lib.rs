// ==========================================
// 资源预测单据拆分 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 资源预测单据拆分与转移额度匹配
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 拆分与匹配规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 实例组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AdminAuditStatus, PlanType, ReviewStatus, SubTicketStage, SubTicketStatus, SubTicketType,
    TicketSplitStatus, TicketType,
};

// 领域实体
pub use domain::{
    Adjustment, CrpDemandSlice, Demand, DemandSnapshot, DeviceTypeInfo, RemainderRecord,
    ResourceTotals, SubTicket, TicketBaseInfo, TransferQuotaConfig,
};

// 引擎
pub use engine::{
    DeviceCatalog, QuotaGate, RemainderTable, SplitError, SplitGroups, SubTicketAssembler,
    TicketSplitter,
};

// API
pub use api::{ApiError, ResPlanTicketApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "资源预测单据拆分";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
