// ==========================================
// 资源预测单据拆分 - 引擎层错误类型
// ==========================================
// 分类:
// - 输入错误: 快照缺失、机型缺失, 本次拆分直接失败
// - 协作方错误: CRP 查询、配置读取、落库失败, 原样上抛
// - 资格不符: 不是错误, 匹配时跳过并记 warn 日志
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 拆分引擎错误类型
#[derive(Error, Debug)]
pub enum SplitError {
    // ===== 输入错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("cannot found device type: {0}")]
    DeviceTypeNotFound(String),

    // ===== 协作方错误 =====
    #[error("no demands can be adjusted in CRP: {0}")]
    NoAdjustableDemand(String),

    #[error("CRP 查询失败: {0}")]
    CapacitySource(String),

    #[error("配置读取失败: {0}")]
    Config(String),

    #[error("数据访问失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result 类型别名
pub type SplitResult<T> = Result<T, SplitError>;
