// ==========================================
// 包装车间周排班系统 - 产线运行计划
// ==========================================
// 职责: 逐日产线计划行 + 周聚合视图
// 聚合规则: 布尔按周内任一日 OR, 数值按周内 MAX
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DailyLinePlan - 逐日产线计划
// ==========================================
// 数据来源: daily_line_plan 表, 每个日历日一行
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyLinePlan {
    pub plan_date: NaiveDate,
    // 产线运行标记
    pub mak1_running: bool,
    pub mac1_running: bool,
    pub mac2_running: bool,
    pub mab1_running: bool,
    pub mab2_running: bool,
    pub mab3_running: bool,
    pub corona_running: bool,
    pub packaging_running: bool,
    pub tents_running: bool,
    pub canning_reduced: bool,
    // 装载时段数
    pub keg_load_slots: i32,
    pub mak1_load_slots: i32,
    pub tents_load_slots: i32,
    /// 当日领航员需求, 缺省按系统配置默认值
    pub pilots_required: Option<i32>,
}

// ==========================================
// WeeklyLinePlan - 周聚合产线计划
// ==========================================
// 需求构建器的唯一输入, 每次生成请求临时聚合, 不落库
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyLinePlan {
    pub mak1_running: bool,
    pub mac1_running: bool,
    pub mac2_running: bool,
    pub mab1_running: bool,
    pub mab2_running: bool,
    pub mab3_running: bool,
    pub corona_running: bool,
    pub packaging_running: bool,
    pub tents_running: bool,
    pub canning_reduced: bool,
    pub keg_load_slots: i32,
    pub mak1_load_slots: i32,
    pub tents_load_slots: i32,
    pub pilots_required: i32,
}

impl WeeklyLinePlan {
    /// 聚合一周的逐日计划
    ///
    /// # 参数
    /// - days: 目标周内的逐日计划行（至少一行）
    /// - default_pilots: pilots_required 缺省/非正值时的默认人数
    ///
    /// # 规则
    /// - 运行标记: 周内任一日运行即视为运行 (OR)
    /// - 时段数: 取周内最大值 (MAX)
    /// - pilots_required: 逐日先补默认, 再取最大值
    pub fn aggregate(days: &[DailyLinePlan], default_pilots: i32) -> WeeklyLinePlan {
        WeeklyLinePlan {
            mak1_running: days.iter().any(|d| d.mak1_running),
            mac1_running: days.iter().any(|d| d.mac1_running),
            mac2_running: days.iter().any(|d| d.mac2_running),
            mab1_running: days.iter().any(|d| d.mab1_running),
            mab2_running: days.iter().any(|d| d.mab2_running),
            mab3_running: days.iter().any(|d| d.mab3_running),
            corona_running: days.iter().any(|d| d.corona_running),
            packaging_running: days.iter().any(|d| d.packaging_running),
            tents_running: days.iter().any(|d| d.tents_running),
            canning_reduced: days.iter().any(|d| d.canning_reduced),
            keg_load_slots: days.iter().map(|d| d.keg_load_slots).max().unwrap_or(0),
            mak1_load_slots: days.iter().map(|d| d.mak1_load_slots).max().unwrap_or(0),
            tents_load_slots: days.iter().map(|d| d.tents_load_slots).max().unwrap_or(0),
            pilots_required: days
                .iter()
                .map(|d| d.pilots_required.filter(|v| *v > 0).unwrap_or(default_pilots))
                .max()
                .unwrap_or(default_pilots),
        }
    }
}
