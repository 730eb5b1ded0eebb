// ==========================================
// 资源预测单据拆分 - 领域类型定义
// ==========================================
// 职责: 单据类型、子单类型、审核/状态枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单据类型 (Ticket Type)
// ==========================================
// 每种类型对应一个拆分入口, 不存在类型间的状态迁移
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    Add,    // 新增
    Delete, // 删除
    Adjust, // 调整
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl TicketType {
    /// 从字符串解析单据类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADD" => Some(TicketType::Add),
            "DELETE" => Some(TicketType::Delete),
            "ADJUST" => Some(TicketType::Adjust),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TicketType::Add => "ADD",
            TicketType::Delete => "DELETE",
            TicketType::Adjust => "ADJUST",
        }
    }

    /// 未发生拆分时兜底使用的子单类型
    pub fn default_sub_type(&self) -> SubTicketType {
        match self {
            TicketType::Add => SubTicketType::Add,
            TicketType::Delete => SubTicketType::Delete,
            TicketType::Adjust => SubTicketType::Adjust,
        }
    }
}

// ==========================================
// 子单类型 (Sub-Ticket Type)
// ==========================================
// TransferIn / TransferOut 只存在于拆分分组阶段,
// 组装子单时统一归为 Transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubTicketType {
    Add,         // 新增
    Delete,      // 删除
    Adjust,      // 调整
    TransferIn,  // 转入(从中转池借调)
    TransferOut, // 转出(归还中转池)
    Transfer,    // 转移(子单落库类型)
    Delay,       // 延期
}

impl fmt::Display for SubTicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl SubTicketType {
    /// 从字符串解析子单类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADD" => Some(SubTicketType::Add),
            "DELETE" => Some(SubTicketType::Delete),
            "ADJUST" => Some(SubTicketType::Adjust),
            "TRANSFER_IN" => Some(SubTicketType::TransferIn),
            "TRANSFER_OUT" => Some(SubTicketType::TransferOut),
            "TRANSFER" => Some(SubTicketType::Transfer),
            "DELAY" => Some(SubTicketType::Delay),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SubTicketType::Add => "ADD",
            SubTicketType::Delete => "DELETE",
            SubTicketType::Adjust => "ADJUST",
            SubTicketType::TransferIn => "TRANSFER_IN",
            SubTicketType::TransferOut => "TRANSFER_OUT",
            SubTicketType::Transfer => "TRANSFER",
            SubTicketType::Delay => "DELAY",
        }
    }

    /// 调整单中可并入 Adjust 子单的类型
    pub fn is_mergeable(&self) -> bool {
        matches!(
            self,
            SubTicketType::Add | SubTicketType::Delete | SubTicketType::Delay
        )
    }

    /// 组装子单时使用的落库类型
    pub fn assembled(&self) -> SubTicketType {
        match self {
            SubTicketType::TransferIn | SubTicketType::TransferOut => SubTicketType::Transfer,
            other => *other,
        }
    }

    /// 是否为转移类子单
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            SubTicketType::Transfer | SubTicketType::TransferIn | SubTicketType::TransferOut
        )
    }
}

// ==========================================
// CRP 预测审核状态 (Review Status)
// ==========================================
// 红线: 未审核的预测不可作为可用额度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,  // 待审核
    Reviewed, // 已审核
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "PENDING"),
            ReviewStatus::Reviewed => write!(f, "REVIEWED"),
        }
    }
}

// ==========================================
// 计划内/计划外 (Plan Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    InPlan,  // 计划内
    OutPlan, // 计划外
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanType::InPlan => write!(f, "IN_PLAN"),
            PlanType::OutPlan => write!(f, "OUT_PLAN"),
        }
    }
}

// ==========================================
// 子单状态 (Sub-Ticket Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubTicketStatus {
    WaitingMerge, // 等待合并
    Auditing,     // 审批中
    Done,         // 已完成
    Failed,       // 失败
    Invalid,      // 已失效
}

impl fmt::Display for SubTicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl SubTicketStatus {
    /// 从字符串解析子单状态
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "WAITING_MERGE" => SubTicketStatus::WaitingMerge,
            "AUDITING" => SubTicketStatus::Auditing,
            "DONE" => SubTicketStatus::Done,
            "FAILED" => SubTicketStatus::Failed,
            _ => SubTicketStatus::Invalid,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SubTicketStatus::WaitingMerge => "WAITING_MERGE",
            SubTicketStatus::Auditing => "AUDITING",
            SubTicketStatus::Done => "DONE",
            SubTicketStatus::Failed => "FAILED",
            SubTicketStatus::Invalid => "INVALID",
        }
    }
}

// ==========================================
// 子单处理阶段 (Sub-Ticket Stage)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubTicketStage {
    WaitingMerge, // 等待合并
    AdminAudit,   // 管理员审批
    CrpAudit,     // CRP 审批
    Done,         // 结束
}

impl fmt::Display for SubTicketStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl SubTicketStage {
    /// 从字符串解析处理阶段
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ADMIN_AUDIT" => SubTicketStage::AdminAudit,
            "CRP_AUDIT" => SubTicketStage::CrpAudit,
            "DONE" => SubTicketStage::Done,
            _ => SubTicketStage::WaitingMerge,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SubTicketStage::WaitingMerge => "WAITING_MERGE",
            SubTicketStage::AdminAudit => "ADMIN_AUDIT",
            SubTicketStage::CrpAudit => "CRP_AUDIT",
            SubTicketStage::Done => "DONE",
        }
    }
}

// ==========================================
// 管理员审批状态 (Admin Audit Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminAuditStatus {
    Skip,     // 免审
    Auditing, // 待审
    Done,     // 审批通过
    Rejected, // 审批驳回
}

impl fmt::Display for AdminAuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl AdminAuditStatus {
    /// 从字符串解析审批状态
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "SKIP" => AdminAuditStatus::Skip,
            "DONE" => AdminAuditStatus::Done,
            "REJECTED" => AdminAuditStatus::Rejected,
            _ => AdminAuditStatus::Auditing,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AdminAuditStatus::Skip => "SKIP",
            AdminAuditStatus::Auditing => "AUDITING",
            AdminAuditStatus::Done => "DONE",
            AdminAuditStatus::Rejected => "REJECTED",
        }
    }
}

// ==========================================
// 主单拆分状态 (Ticket Split Status)
// ==========================================
// 由 API 层在一次拆分结束后回写, 供人工重试判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketSplitStatus {
    Init,   // 未拆分
    Split,  // 已拆分
    Failed, // 拆分失败
}

impl fmt::Display for TicketSplitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl TicketSplitStatus {
    /// 从字符串解析拆分状态
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "SPLIT" => TicketSplitStatus::Split,
            "FAILED" => TicketSplitStatus::Failed,
            _ => TicketSplitStatus::Init,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TicketSplitStatus::Init => "INIT",
            TicketSplitStatus::Split => "SPLIT",
            TicketSplitStatus::Failed => "FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_ticket_type_assembled() {
        assert_eq!(SubTicketType::TransferIn.assembled(), SubTicketType::Transfer);
        assert_eq!(SubTicketType::TransferOut.assembled(), SubTicketType::Transfer);
        assert_eq!(SubTicketType::Delay.assembled(), SubTicketType::Delay);
    }

    #[test]
    fn test_sub_ticket_type_mergeable() {
        assert!(SubTicketType::Add.is_mergeable());
        assert!(SubTicketType::Delete.is_mergeable());
        assert!(SubTicketType::Delay.is_mergeable());
        assert!(!SubTicketType::TransferIn.is_mergeable());
        assert!(!SubTicketType::TransferOut.is_mergeable());
        assert!(!SubTicketType::Adjust.is_mergeable());
    }

    #[test]
    fn test_db_str_parse_back() {
        for t in [TicketType::Add, TicketType::Delete, TicketType::Adjust] {
            assert_eq!(TicketType::from_str(t.to_db_str()), Some(t));
        }
        assert_eq!(SubTicketType::from_str("transfer_in"), Some(SubTicketType::TransferIn));
        assert_eq!(SubTicketType::from_str("unknown"), None);
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&SubTicketType::TransferOut).unwrap();
        assert_eq!(json, "\"TRANSFER_OUT\"");
        let plan: PlanType = serde_json::from_str("\"OUT_PLAN\"").unwrap();
        assert_eq!(plan, PlanType::OutPlan);
    }
}
