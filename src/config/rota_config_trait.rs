// ==========================================
// 包装车间周排班系统 - 配置读取 trait
// ==========================================
// 职责: 排班引擎的配置读取接口, 供 Mock 测试与多实现
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 排班配置读取接口
///
/// 轮换惩罚是可调的公平性策略而非算法必然,
/// 回看窗口与分级惩罚一律走配置, 不硬编码
#[async_trait]
pub trait RotaConfigReader: Send + Sync {
    /// 轮换历史回看窗口（天）
    async fn get_rotation_lookback_days(&self) -> Result<i64, Box<dyn Error>>;

    /// 轮换惩罚分级: [1周前, 2周前, 3周前, 4周前]
    async fn get_rotation_penalty_tiers(&self) -> Result<[i32; 4], Box<dyn Error>>;

    /// 领航员默认需求人数（逐日计划缺省时使用）
    async fn get_default_pilots_required(&self) -> Result<i32, Box<dyn Error>>;
}
