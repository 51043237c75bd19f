// ==========================================
// 包装车间周排班系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑, 只负责数据访问
// ==========================================

pub mod error;
pub mod history_repo;
pub mod line_plan_repo;
pub mod rota_repo;
pub mod staff_plan_repo;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::AllocationHistoryRepository;
pub use line_plan_repo::LinePlanRepository;
pub use rota_repo::RotaRepository;
pub use staff_plan_repo::StaffPlanRepository;
