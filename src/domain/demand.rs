// ==========================================
// 资源预测单据拆分 - 需求领域模型
// ==========================================
// 职责: 单据需求行 (变更前/变更后快照) 与拆分片段派生
// 红线: 派生片段一律返回新值, 不修改原始需求列表
// ==========================================

use crate::domain::device::DeviceTypeInfo;
use crate::domain::types::PlanType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DemandSnapshot - 需求快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSnapshot {
    // ===== 位置 =====
    pub region_id: String,          // 地域
    #[serde(default)]
    pub zone_id: String,            // 可用区

    // ===== 机型 =====
    pub device_family: String,      // 机型族
    pub device_type: String,        // 机型

    // ===== 资源量 =====
    pub cpu_core: i64,              // CPU 核数
    pub os: f64,                    // 实例数 (OS 数)
    pub memory: f64,                // 内存 (GB)
    #[serde(default)]
    pub disk_type: String,          // 云盘类型
    #[serde(default)]
    pub disk_size: i64,             // 云盘大小 (GB)

    // ===== 期望交付与分类 =====
    pub expect_time: NaiveDate,     // 期望交付时间
    pub obs_project: String,        // 项目类型
    pub technical_class: String,    // 技术分类
    pub plan_type: PlanType,        // 计划内/计划外
    #[serde(default)]
    pub res_mode: String,           // 资源模式 (按机型/按机型族)
}

impl DemandSnapshot {
    /// 按核数重新派生快照
    ///
    /// 实例数 = 核数 / 机型单台核数, 内存 = 实例数 × 机型单台内存,
    /// `keep_disk = false` 时云盘大小置零 (避免拆分后重复申请云盘)
    pub fn resized(&self, cpu_core: i64, device: &DeviceTypeInfo, keep_disk: bool) -> Self {
        let os = device.os_of_cores(cpu_core);
        Self {
            cpu_core,
            os,
            memory: os * device.memory,
            disk_size: if keep_disk { self.disk_size } else { 0 },
            ..self.clone()
        }
    }
}

// ==========================================
// Demand - 单据需求行
// ==========================================
// original 为空表示纯新增, updated 为空表示纯删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    #[serde(default)]
    pub demand_id: String,
    pub original: Option<DemandSnapshot>,
    pub updated: Option<DemandSnapshot>,
}

/// 需求变更视图
///
/// 把 original/updated 的可空组合收敛为三种明确的变更形态
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemandChange<'a> {
    Add {
        updated: &'a DemandSnapshot,
    },
    Delete {
        original: &'a DemandSnapshot,
    },
    Adjust {
        original: &'a DemandSnapshot,
        updated: &'a DemandSnapshot,
    },
}

impl Demand {
    /// 构造纯新增需求
    pub fn add(demand_id: impl Into<String>, updated: DemandSnapshot) -> Self {
        Self {
            demand_id: demand_id.into(),
            original: None,
            updated: Some(updated),
        }
    }

    /// 构造纯删除需求
    pub fn delete(demand_id: impl Into<String>, original: DemandSnapshot) -> Self {
        Self {
            demand_id: demand_id.into(),
            original: Some(original),
            updated: None,
        }
    }

    /// 构造调整需求
    pub fn adjust(
        demand_id: impl Into<String>,
        original: DemandSnapshot,
        updated: DemandSnapshot,
    ) -> Self {
        Self {
            demand_id: demand_id.into(),
            original: Some(original),
            updated: Some(updated),
        }
    }

    /// 变更形态; 两个快照都为空时返回 None
    pub fn change(&self) -> Option<DemandChange<'_>> {
        match (&self.original, &self.updated) {
            (None, Some(updated)) => Some(DemandChange::Add { updated }),
            (Some(original), None) => Some(DemandChange::Delete { original }),
            (Some(original), Some(updated)) => Some(DemandChange::Adjust { original, updated }),
            (None, None) => None,
        }
    }

    /// 替换变更后快照, 返回新的需求片段
    pub fn with_updated(&self, updated: DemandSnapshot) -> Self {
        Self {
            demand_id: self.demand_id.clone(),
            original: self.original.clone(),
            updated: Some(updated),
        }
    }

    /// 替换变更前快照, 返回新的需求片段
    pub fn with_original(&self, original: DemandSnapshot) -> Self {
        Self {
            demand_id: self.demand_id.clone(),
            original: Some(original),
            updated: self.updated.clone(),
        }
    }

    /// 新增半边 (仅保留变更后快照)
    pub fn add_half(&self) -> Option<Self> {
        self.updated
            .as_ref()
            .map(|updated| Self::add(self.demand_id.clone(), updated.clone()))
    }

    /// 删除半边 (仅保留变更前快照)
    pub fn delete_half(&self) -> Option<Self> {
        self.original
            .as_ref()
            .map(|original| Self::delete(self.demand_id.clone(), original.clone()))
    }

    /// 调整是否无需额度转移
    ///
    /// 技术分类/项目类型/核数均未变化的调整直接归入延期,
    /// 机型/地域等其他属性变化不触发 CRP 查询
    pub fn is_transfer_free(&self) -> bool {
        match self.change() {
            Some(DemandChange::Adjust { original, updated }) => {
                original.technical_class == updated.technical_class
                    && original.obs_project == updated.obs_project
                    && original.cpu_core == updated.cpu_core
            }
            _ => false,
        }
    }
}

// ==========================================
// ResourceTotals - 资源汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTotals {
    pub os: f64,
    pub cpu_core: i64,
    pub memory: f64,
    pub disk_size: i64,
}

impl ResourceTotals {
    /// 累加一个快照
    pub fn accumulate(&mut self, snapshot: &DemandSnapshot) {
        self.os += snapshot.os;
        self.cpu_core += snapshot.cpu_core;
        self.memory += snapshot.memory;
        self.disk_size += snapshot.disk_size;
    }

    /// 汇总需求列表的 (变更前, 变更后)
    pub fn of_demands(demands: &[Demand]) -> (Self, Self) {
        let mut original = Self::default();
        let mut updated = Self::default();
        for demand in demands {
            if let Some(snapshot) = &demand.original {
                original.accumulate(snapshot);
            }
            if let Some(snapshot) = &demand.updated {
                updated.accumulate(snapshot);
            }
        }
        (original, updated)
    }
}
