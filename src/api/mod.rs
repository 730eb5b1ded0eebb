// ==========================================
// 资源预测单据拆分 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供单据服务调用
// ==========================================

pub mod error;
pub mod ticket_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use ticket_api::ResPlanTicketApi;
