// ==========================================
// 包装车间周排班系统 - 引擎层
// ==========================================
// 职责: 实现排班业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL; 分配顺序与评分规则声明式可测
// ==========================================

pub mod allocator;
pub mod capability;
pub mod demand_builder;
pub mod gap_reporter;
pub mod history_writer;
pub mod orchestrator;
pub mod pool_builder;
pub mod rotation;
pub mod scoring;

// 重导出核心引擎
pub use allocator::RotaAllocator;
pub use capability::CapabilityScorer;
pub use demand_builder::DemandBuilder;
pub use gap_reporter::GapReporter;
pub use history_writer::HistoryWriter;
pub use orchestrator::{RotaComputation, RotaOrchestrator};
pub use pool_builder::OperatorPoolBuilder;
pub use rotation::{FairnessPolicy, RotationHistoryIndex};
pub use scoring::CandidateScorer;
