// ==========================================
// 包装车间周排班系统 - 历史写入器
// ==========================================
// 职责: 分配行 → 只追加的分配历史记录
// 说明: 仅记录指名操作工的行; 外包占位行不入历史
// ==========================================

use crate::domain::allocation::{Allocation, AllocationHistoryRecord};

// ==========================================
// HistoryWriter - 历史写入器
// ==========================================
pub struct HistoryWriter;

impl HistoryWriter {
    /// 由本次分配派生历史记录
    pub fn derive(allocations: &[Allocation]) -> Vec<AllocationHistoryRecord> {
        allocations
            .iter()
            .filter_map(|allocation| {
                allocation
                    .operator_id
                    .as_deref()
                    .map(|operator_id| AllocationHistoryRecord::from_allocation(allocation, operator_id))
            })
            .collect()
    }
}
