// ==========================================
// 资源预测单据拆分 - CRP 预测切片
// ==========================================
// 职责: CRP 预测记录 (只读) 与本次拆分内的逻辑消耗记录
// 红线: 本系统从不直接修改 CRP 预测, 只在内存中记录消耗
// ==========================================

use crate::domain::types::{PlanType, ReviewStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// CrpDemandSlice - CRP 预测切片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrpDemandSlice {
    pub slice_id: i64,                // CRP 预测ID
    pub bk_biz_id: i64,               // 所属业务
    pub region_id: String,            // 地域
    pub device_family: String,        // 机型族
    pub device_type: String,          // 机型
    pub expect_time: NaiveDate,       // 期望交付时间
    pub plan_product_name: String,    // 规划产品
    pub res_mode: String,             // 资源模式
    pub real_core_amount: i64,        // 实际核数
    pub os: f64,                      // 实例数
    pub review_status: ReviewStatus,  // 审核状态
    pub plan_type: PlanType,          // 计划内/计划外
    #[serde(default)]
    pub disk_type: String,            // 云盘类型 (可能为空)
    pub obs_project: String,          // 项目类型
    pub technical_class: String,      // 技术分类
}

impl CrpDemandSlice {
    /// 是否已审核
    pub fn is_reviewed(&self) -> bool {
        self.review_status == ReviewStatus::Reviewed
    }
}

// ==========================================
// Adjustment - 调整方式
// ==========================================
// 延期调整携带目标期望时间, 取消调整不携带
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Adjustment {
    Cancel,
    Delay { expect_time: NaiveDate },
}

impl Adjustment {
    pub fn is_delay(&self) -> bool {
        matches!(self, Adjustment::Delay { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Adjustment::Cancel => "CANCEL",
            Adjustment::Delay { .. } => "DELAY",
        }
    }
}

// ==========================================
// RemainderRecord - 切片消耗记录
// ==========================================
// 单次拆分内有效, 首次消耗时创建, 从不落库
#[derive(Debug, Clone, PartialEq)]
pub struct RemainderRecord {
    pub origin: CrpDemandSlice,         // 原始切片副本
    pub adjustment: Option<Adjustment>, // 调整方式 (转入消耗为 None)
    pub will_consume: i64,              // 累计将消耗核数
}

impl RemainderRecord {
    pub fn new(origin: CrpDemandSlice, adjustment: Option<Adjustment>) -> Self {
        Self {
            origin,
            adjustment,
            will_consume: 0,
        }
    }

    /// 剩余可消耗核数
    pub fn available(&self) -> i64 {
        self.origin.real_core_amount - self.will_consume
    }
}

// ==========================================
// 查询条件
// ==========================================

/// 中转池查询条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferPoolFilter {
    pub obs_projects: Vec<String>,
    pub technical_classes: Vec<String>,
}

/// 可调整预测查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustableDemandFilter {
    pub bk_biz_id: i64,
    pub region_id: String,
    pub device_family: String,
    pub device_type: String,
    pub expect_time: NaiveDate,
    pub plan_product_name: String,
    pub op_product_name: String,
    pub disk_type: String,
    pub res_mode: String,
}
