// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use hcm_res_plan::domain::demand::{Demand, DemandSnapshot, ResourceTotals};
use hcm_res_plan::domain::device::DeviceTypeInfo;
use hcm_res_plan::domain::slice::CrpDemandSlice;
use hcm_res_plan::domain::ticket::TicketBaseInfo;
use hcm_res_plan::domain::types::{PlanType, ReviewStatus, TicketSplitStatus, TicketType};

pub const BIZ_ID: i64 = 2005000002;
pub const DEVICE_TYPE: &str = "S5.2XLARGE16";
pub const ZERO_CORE_DEVICE_TYPE: &str = "S5.ZERO";
pub const OBS_PROJECT: &str = "常规项目";
pub const TECHNICAL_CLASS: &str = "通用计算";
pub const DISK_PREMIUM: &str = "CLOUD_PREMIUM";
pub const PLAN_PRODUCT: &str = "云游戏";
pub const OP_PRODUCT: &str = "云游戏运营";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(10, 0, 0).unwrap()
}

/// 测试机型: 单台 8 核 16G; 另含一个 0 核机型
pub fn default_device_types() -> Vec<DeviceTypeInfo> {
    vec![
        DeviceTypeInfo {
            device_type: DEVICE_TYPE.to_string(),
            device_family: "S5".to_string(),
            cpu_core: 8,
            memory: 16.0,
        },
        DeviceTypeInfo {
            device_type: ZERO_CORE_DEVICE_TYPE.to_string(),
            device_family: "S5".to_string(),
            cpu_core: 0,
            memory: 0.0,
        },
    ]
}

// ==========================================
// DemandSnapshot 构建器
// ==========================================

pub struct SnapshotBuilder {
    snapshot: DemandSnapshot,
}

impl SnapshotBuilder {
    pub fn new(cpu_core: i64) -> Self {
        Self {
            snapshot: DemandSnapshot {
                region_id: "ap-shanghai".to_string(),
                zone_id: "ap-shanghai-2".to_string(),
                device_family: "S5".to_string(),
                device_type: DEVICE_TYPE.to_string(),
                cpu_core,
                os: cpu_core as f64 / 8.0,
                memory: cpu_core as f64 * 2.0,
                disk_type: DISK_PREMIUM.to_string(),
                disk_size: 200,
                expect_time: day(2024, 7, 1),
                obs_project: OBS_PROJECT.to_string(),
                technical_class: TECHNICAL_CLASS.to_string(),
                plan_type: PlanType::InPlan,
                res_mode: "按机型".to_string(),
            },
        }
    }

    pub fn device_type(mut self, device_type: &str) -> Self {
        self.snapshot.device_type = device_type.to_string();
        self
    }

    pub fn disk_type(mut self, disk_type: &str) -> Self {
        self.snapshot.disk_type = disk_type.to_string();
        self
    }

    pub fn expect_time(mut self, expect_time: NaiveDate) -> Self {
        self.snapshot.expect_time = expect_time;
        self
    }

    pub fn obs_project(mut self, obs_project: &str) -> Self {
        self.snapshot.obs_project = obs_project.to_string();
        self
    }

    pub fn build(self) -> DemandSnapshot {
        self.snapshot
    }
}

// ==========================================
// CrpDemandSlice 构建器
// ==========================================

pub struct SliceBuilder {
    slice: CrpDemandSlice,
}

impl SliceBuilder {
    pub fn new(slice_id: i64, real_core_amount: i64) -> Self {
        Self {
            slice: CrpDemandSlice {
                slice_id,
                bk_biz_id: BIZ_ID,
                region_id: "ap-shanghai".to_string(),
                device_family: "S5".to_string(),
                device_type: DEVICE_TYPE.to_string(),
                expect_time: day(2024, 7, 1),
                plan_product_name: PLAN_PRODUCT.to_string(),
                res_mode: "按机型".to_string(),
                real_core_amount,
                os: real_core_amount as f64 / 8.0,
                review_status: ReviewStatus::Reviewed,
                plan_type: PlanType::InPlan,
                disk_type: DISK_PREMIUM.to_string(),
                obs_project: OBS_PROJECT.to_string(),
                technical_class: TECHNICAL_CLASS.to_string(),
            },
        }
    }

    pub fn pending(mut self) -> Self {
        self.slice.review_status = ReviewStatus::Pending;
        self
    }

    pub fn disk_type(mut self, disk_type: &str) -> Self {
        self.slice.disk_type = disk_type.to_string();
        self
    }

    pub fn build(self) -> CrpDemandSlice {
        self.slice
    }
}

// ==========================================
// TicketBaseInfo 构建器
// ==========================================

pub fn ticket(id: &str, ticket_type: TicketType, demands: Vec<Demand>) -> TicketBaseInfo {
    let submitted_at = ts(2024, 5, 20);
    TicketBaseInfo {
        id: id.to_string(),
        ticket_type,
        demands,
        bk_biz_id: BIZ_ID,
        bk_biz_name: "云游戏业务".to_string(),
        bk_product_id: 101,
        bk_product_name: "云游戏".to_string(),
        plan_product_id: 201,
        plan_product_name: PLAN_PRODUCT.to_string(),
        op_product_name: OP_PRODUCT.to_string(),
        virtual_dept_id: 301,
        virtual_dept_name: "互娱".to_string(),
        original: ResourceTotals::default(),
        updated: ResourceTotals::default(),
        applicant: "tester".to_string(),
        remark: String::new(),
        split_status: TicketSplitStatus::Init,
        split_message: None,
        submitted_at,
        created_at: submitted_at,
        updated_at: submitted_at,
    }
}
