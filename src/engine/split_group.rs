// ==========================================
// 资源预测单据拆分 - 拆分分组
// ==========================================
// 职责: 按子单类型累积需求片段, 组装前一次性消费
// ==========================================

use crate::domain::demand::Demand;
use crate::domain::types::SubTicketType;
use std::collections::BTreeMap;

/// 拆分分组 (子单类型 → 需求片段)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SplitGroups {
    groups: BTreeMap<SubTicketType, Vec<Demand>>,
}

impl SplitGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sub_type: SubTicketType, demand: Demand) {
        self.groups.entry(sub_type).or_default().push(demand);
    }

    pub fn extend<I>(&mut self, sub_type: SubTicketType, demands: I)
    where
        I: IntoIterator<Item = Demand>,
    {
        self.groups.entry(sub_type).or_default().extend(demands);
    }

    /// 指定类型的片段 (不存在时为空)
    pub fn get(&self, sub_type: SubTicketType) -> &[Demand] {
        self.groups.get(&sub_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// 非空分组的类型
    pub fn non_empty_types(&self) -> Vec<SubTicketType> {
        self.groups
            .iter()
            .filter(|(_, demands)| !demands.is_empty())
            .map(|(sub_type, _)| *sub_type)
            .collect()
    }

    /// 是否只有一个指定类型的非空分组
    pub fn is_single_group_of(&self, sub_type: SubTicketType) -> bool {
        self.non_empty_types() == [sub_type]
    }

    /// 将可合并类型 (新增/删除/延期) 并入调整分组, 并移除源分组
    ///
    /// 转入/转出分组保持独立
    pub fn fold_mergeable_into_adjust(&mut self) {
        let mergeable: Vec<SubTicketType> = self
            .groups
            .keys()
            .copied()
            .filter(SubTicketType::is_mergeable)
            .collect();

        for sub_type in mergeable {
            if let Some(demands) = self.groups.remove(&sub_type) {
                self.extend(SubTicketType::Adjust, demands);
            }
        }
    }

    /// 消费分组, 跳过空分组
    pub fn into_groups(self) -> Vec<(SubTicketType, Vec<Demand>)> {
        self.groups
            .into_iter()
            .filter(|(_, demands)| !demands.is_empty())
            .collect()
    }
}
