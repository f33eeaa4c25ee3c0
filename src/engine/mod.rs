// ==========================================
// 高校教务系统 - 引擎层
// ==========================================
// 职责: 实现业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL, 策略性拒绝必须输出 reason
// ==========================================

pub mod access;
pub mod conflict;
pub mod grading;
pub mod registration;
pub mod repositories;
pub mod schedule;

// 重导出核心引擎
pub use access::{AccessDecision, AccessGate, MaintenanceState, MAINTENANCE_DENIED_REASON};
pub use conflict::ConflictDetector;
pub use grading::{ClassStatistics, GradeCore, UNGRADED_KEY};
pub use registration::{DropDecision, RegistrationDecision, RegistrationEngine};
pub use repositories::RegistrationRepositories;
pub use schedule::{is_unscheduled, parse_schedule, ScheduleSlot};
