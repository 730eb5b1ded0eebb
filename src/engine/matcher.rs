// ==========================================
// 资源预测单据拆分 - 预测切片匹配
// ==========================================
// 职责: 按 CRP 返回顺序消耗切片, 记录单次拆分内的累计消耗
// 红线: 任一切片累计消耗不得超过其实际核数
// 红线: 消耗顺序 = 切片返回顺序 × 需求处理顺序, 不做二次排序
// ==========================================
// 输入: 需求快照 + 需求核数 + 候选切片
// 输出: (已匹配核数, 未匹配核数) + 更新 RemainderTable
// ==========================================

use crate::domain::demand::DemandSnapshot;
use crate::domain::slice::{Adjustment, CrpDemandSlice, RemainderRecord};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

// ==========================================
// RemainderTable - 切片消耗表
// ==========================================
// 单次拆分独占, 不跨拆分复用; 重试时从空表开始
#[derive(Debug, Default, Clone)]
pub struct RemainderTable {
    records: HashMap<i64, RemainderRecord>,
}

impl RemainderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切片已记录的累计消耗
    pub fn consumed(&self, slice_id: i64) -> i64 {
        self.records.get(&slice_id).map(|r| r.will_consume).unwrap_or(0)
    }

    pub fn get(&self, slice_id: i64) -> Option<&RemainderRecord> {
        self.records.get(&slice_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &RemainderRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 记录一次消耗 (首次消耗时创建记录)
    fn consume(&mut self, slice: &CrpDemandSlice, adjustment: Option<&Adjustment>, cores: i64) {
        let record = self
            .records
            .entry(slice.slice_id)
            .or_insert_with(|| RemainderRecord::new(slice.clone(), adjustment.cloned()));
        record.will_consume += cores;
    }
}

/// 单个需求的匹配结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub consumed: i64,
    pub remaining: i64,
}

// ==========================================
// 跳过原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    NotReviewed,
    ClassMismatch,
    DiskTypeMismatch,
    PlanTypeMismatch,
    AdjustmentMismatch,
    DelayTimeMismatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::NotReviewed => "NOT_REVIEWED",
            SkipReason::ClassMismatch => "PROJECT_OR_TECHNICAL_CLASS_MISMATCH",
            SkipReason::DiskTypeMismatch => "DISK_TYPE_MISMATCH",
            SkipReason::PlanTypeMismatch => "PLAN_TYPE_MISMATCH",
            SkipReason::AdjustmentMismatch => "ADJUST_TYPE_MISMATCH",
            SkipReason::DelayTimeMismatch => "DELAY_EXPECT_TIME_MISMATCH",
        };
        f.write_str(s)
    }
}

// ==========================================
// 资格校验
// ==========================================

/// 转入资格: 项目类型与技术分类一致
fn check_transfer_in(slice: &CrpDemandSlice, demand: &DemandSnapshot) -> Result<(), SkipReason> {
    if slice.obs_project != demand.obs_project || slice.technical_class != demand.technical_class {
        return Err(SkipReason::ClassMismatch);
    }
    Ok(())
}

/// 取消/延期资格
///
/// - 云盘类型一致; 切片云盘类型为空时仅取消可放行, 延期要求非空且一致
/// - 计划内/计划外一致
/// - 已有消耗记录时, 调整方式 (含延期目标时间) 必须一致
fn check_adjustable(
    slice: &CrpDemandSlice,
    demand: &DemandSnapshot,
    adjustment: &Adjustment,
    record: Option<&RemainderRecord>,
) -> Result<(), SkipReason> {
    let disk_type_ok = if adjustment.is_delay() {
        !slice.disk_type.is_empty() && slice.disk_type == demand.disk_type
    } else {
        slice.disk_type.is_empty() || slice.disk_type == demand.disk_type
    };
    if !disk_type_ok {
        return Err(SkipReason::DiskTypeMismatch);
    }

    if slice.plan_type != demand.plan_type {
        return Err(SkipReason::PlanTypeMismatch);
    }

    if let Some(record) = record {
        match (&record.adjustment, adjustment) {
            (Some(Adjustment::Cancel), Adjustment::Cancel) => {}
            (Some(Adjustment::Delay { expect_time: tracked }), Adjustment::Delay { expect_time }) => {
                if tracked != expect_time {
                    return Err(SkipReason::DelayTimeMismatch);
                }
            }
            _ => return Err(SkipReason::AdjustmentMismatch),
        }
    }

    Ok(())
}

// ==========================================
// 消耗主循环
// ==========================================
fn consume_in_order<F>(
    table: &mut RemainderTable,
    required: i64,
    slices: &[CrpDemandSlice],
    adjustment: Option<&Adjustment>,
    eligible: F,
) -> MatchOutcome
where
    F: Fn(&CrpDemandSlice, Option<&RemainderRecord>) -> Result<(), SkipReason>,
{
    let mut remaining = required.max(0);

    for slice in slices {
        if remaining <= 0 {
            break;
        }

        if !slice.is_reviewed() {
            warn!(slice_id = slice.slice_id, reason = %SkipReason::NotReviewed, "跳过 CRP 预测");
            continue;
        }

        if let Err(reason) = eligible(slice, table.get(slice.slice_id)) {
            warn!(slice_id = slice.slice_id, reason = %reason, "跳过 CRP 预测");
            continue;
        }

        let available = slice.real_core_amount - table.consumed(slice.slice_id);
        let can_consume = remaining.min(available);
        // 实例数为 0 的切片无法折算, 一并跳过
        if can_consume <= 0 || slice.os == 0.0 {
            debug!(
                slice_id = slice.slice_id,
                available,
                os = slice.os,
                "CRP 预测无剩余可用额度"
            );
            continue;
        }

        table.consume(slice, adjustment, can_consume);
        remaining -= can_consume;
        debug!(
            slice_id = slice.slice_id,
            consumed = can_consume,
            remaining,
            "消耗 CRP 预测"
        );
    }

    MatchOutcome {
        consumed: required.max(0) - remaining,
        remaining,
    }
}

/// 转入匹配: 从中转池切片中消耗需求核数
pub fn match_transfer_in(
    table: &mut RemainderTable,
    demand: &DemandSnapshot,
    required: i64,
    slices: &[CrpDemandSlice],
) -> MatchOutcome {
    consume_in_order(table, required, slices, None, |slice, _| {
        check_transfer_in(slice, demand)
    })
}

/// 取消/延期匹配: 从本业务可调整切片中消耗需求核数
pub fn match_adjustable(
    table: &mut RemainderTable,
    demand: &DemandSnapshot,
    required: i64,
    slices: &[CrpDemandSlice],
    adjustment: &Adjustment,
) -> MatchOutcome {
    consume_in_order(table, required, slices, Some(adjustment), |slice, record| {
        check_adjustable(slice, demand, adjustment, record)
    })
}
