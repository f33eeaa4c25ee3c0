// ==========================================
// 高校教务系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 选课注册与成绩核算的规则核心
// 控制权: 存储层负责并发保障, 引擎层只做规则判定
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

// API 层 - 业务接口
pub mod api;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{EnrollmentStatus, LetterGrade, Role, SectionStatus, Weekday};

// 领域实体
pub use domain::{ActionLog, ActionType, AssessmentRecord, Enrollment, NewSection, Section};

// 引擎
pub use engine::{
    AccessDecision, AccessGate, ClassStatistics, ConflictDetector, DropDecision, GradeCore,
    MaintenanceState, RegistrationDecision, RegistrationEngine, RegistrationRepositories,
    ScheduleSlot,
};

// API
pub use api::{AdminApi, InstructorApi, ServiceOutcome, StudentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "高校教务系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
