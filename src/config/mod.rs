// ==========================================
// 包装车间周排班系统 - 配置层
// ==========================================
// 职责: 轮换公平性策略等可调参数的加载与查询
// 存储: config_kv 表 (key-value)
// ==========================================

pub mod config_manager;
pub mod rota_config_trait;

pub use config_manager::ConfigManager;
pub use rota_config_trait::RotaConfigReader;
