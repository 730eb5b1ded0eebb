// ==========================================
// 资源预测单据拆分 - 应用层
// ==========================================
// 职责: 组装各层实例, 供命令行工具与单据服务使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
