// ==========================================
// 资源预测单据拆分 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod demand;
pub mod device;
pub mod quota;
pub mod slice;
pub mod ticket;
pub mod types;

// 重导出核心类型
pub use demand::{Demand, DemandChange, DemandSnapshot, ResourceTotals};
pub use device::DeviceTypeInfo;
pub use quota::TransferQuotaConfig;
pub use slice::{
    AdjustableDemandFilter, Adjustment, CrpDemandSlice, RemainderRecord, TransferPoolFilter,
};
pub use ticket::{SubTicket, TicketBaseInfo};
pub use types::{
    AdminAuditStatus, PlanType, ReviewStatus, SubTicketStage, SubTicketStatus, SubTicketType,
    TicketSplitStatus, TicketType,
};
