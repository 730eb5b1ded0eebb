// ==========================================
// 资源预测单据拆分 - 单据与子单领域模型
// ==========================================

use crate::domain::demand::{Demand, ResourceTotals};
use crate::domain::types::{
    AdminAuditStatus, SubTicketStage, SubTicketStatus, SubTicketType, TicketSplitStatus,
    TicketType,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// TicketBaseInfo - 资源预测主单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketBaseInfo {
    pub id: String,                   // 单据ID
    pub ticket_type: TicketType,      // 单据类型
    pub demands: Vec<Demand>,         // 需求列表 (JSON 存储)
    pub bk_biz_id: i64,               // 业务ID
    pub bk_biz_name: String,          // 业务名称
    pub bk_product_id: i64,           // 运营产品ID
    pub bk_product_name: String,      // 运营产品名称
    pub plan_product_id: i64,         // 规划产品ID
    pub plan_product_name: String,    // 规划产品名称
    pub op_product_name: String,      // 运营产品 (CRP 口径)
    pub virtual_dept_id: i64,         // 虚拟部门ID
    pub virtual_dept_name: String,    // 虚拟部门名称
    pub original: ResourceTotals,     // 变更前汇总
    pub updated: ResourceTotals,      // 变更后汇总
    pub applicant: String,            // 申请人
    pub remark: String,               // 备注
    pub split_status: TicketSplitStatus, // 拆分状态
    pub split_message: Option<String>,   // 拆分失败原因
    pub submitted_at: NaiveDateTime,  // 提交时间
    pub created_at: NaiveDateTime,    // 创建时间
    pub updated_at: NaiveDateTime,    // 更新时间
}

// ==========================================
// SubTicket - 资源预测子单
// ==========================================
// 红线: 同一次拆分的子单一次性批量创建
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTicket {
    pub id: String,                        // 子单ID
    pub ticket_id: String,                 // 主单ID
    pub bk_biz_id: i64,                    // 业务ID
    pub sub_type: SubTicketType,           // 子单类型
    pub sub_demands: Vec<Demand>,          // 子需求列表 (JSON 存储)
    pub original: ResourceTotals,          // 变更前汇总
    pub updated: ResourceTotals,           // 变更后汇总
    pub status: SubTicketStatus,           // 子单状态
    pub stage: SubTicketStage,             // 处理阶段
    pub admin_audit_status: AdminAuditStatus, // 管理员审批状态
    pub crp_sn: Option<String>,            // CRP 单号 (下游执行回填)
    pub submitted_at: NaiveDateTime,       // 提交时间
}
