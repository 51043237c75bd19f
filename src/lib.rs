// ==========================================
// 包装车间周排班系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Rating, ShiftBlock, ShiftKind};

// 领域实体
pub use domain::{
    Allocation, AllocationHistoryRecord, AreaDemand, Availability, DailyLinePlan, Gap, Operator,
    Recommendation, SkillScores, StaffPlanRow, WeeklyLinePlan,
};

// 引擎
pub use engine::{
    CandidateScorer, CapabilityScorer, DemandBuilder, FairnessPolicy, GapReporter, HistoryWriter,
    OperatorPoolBuilder, RotaAllocator, RotaComputation, RotaOrchestrator, RotationHistoryIndex,
};

// 仓储
pub use repository::{
    AllocationHistoryRepository, LinePlanRepository, RotaRepository, StaffPlanRepository,
};

// API
pub use api::{ApiError, ApiResult, GenerateRotaResponse, RotaApi};

// 配置
pub use config::{ConfigManager, RotaConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "包装车间周排班系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
