// ==========================================
// 资源预测单据拆分 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod device_type_repo;
pub mod error;
pub mod sub_ticket_repo;
pub mod ticket_repo;
pub mod transfer_quota_repo;

// 重导出核心仓储
pub use device_type_repo::DeviceTypeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use sub_ticket_repo::ResPlanSubTicketRepository;
pub use ticket_repo::ResPlanTicketRepository;
pub use transfer_quota_repo::TransferQuotaRepository;
