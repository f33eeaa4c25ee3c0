// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、仓储/引擎装配
// ==========================================

use campus_erp::api::{AdminApi, InstructorApi, StudentApi};
use campus_erp::db;
use campus_erp::domain::section::NewSection;
use campus_erp::engine::{MaintenanceState, RegistrationEngine, RegistrationRepositories};
use campus_erp::repository::{
    ActionLogRepository, AssessmentRepository, EnrollmentRepository, SectionRepository,
    SettingsRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 测试上下文: 临时库 + 全套仓储/引擎/接口
pub struct TestContext {
    // 临时数据库文件 (需要保持存活)
    _temp_file: NamedTempFile,
    pub conn: Arc<Mutex<Connection>>,
    pub section_repo: Arc<SectionRepository>,
    pub enrollment_repo: Arc<EnrollmentRepository>,
    pub assessment_repo: Arc<AssessmentRepository>,
    pub settings_repo: Arc<SettingsRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
    pub maintenance: Arc<MaintenanceState>,
}

impl TestContext {
    /// 创建临时测试数据库并装配全部组件
    pub fn new() -> Self {
        let temp_file = NamedTempFile::new().expect("create temp db file");
        let db_path = temp_file.path().to_str().expect("temp path utf-8").to_string();

        let conn = db::open_sqlite_connection(&db_path).expect("open test db");
        db::init_schema(&conn).expect("init schema");
        let conn = Arc::new(Mutex::new(conn));

        let section_repo = Arc::new(SectionRepository::from_connection(conn.clone()));
        let enrollment_repo = Arc::new(EnrollmentRepository::from_connection(conn.clone()));
        let assessment_repo = Arc::new(AssessmentRepository::from_connection(conn.clone()));
        let settings_repo = Arc::new(SettingsRepository::from_connection(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::from_connection(conn.clone()));
        let maintenance = Arc::new(MaintenanceState::new(settings_repo.clone()));

        Self {
            _temp_file: temp_file,
            conn,
            section_repo,
            enrollment_repo,
            assessment_repo,
            settings_repo,
            action_log_repo,
            maintenance,
        }
    }

    /// 装配注册引擎
    pub fn engine(&self) -> RegistrationEngine {
        RegistrationEngine::new(
            RegistrationRepositories::new(self.section_repo.clone(), self.enrollment_repo.clone()),
            self.maintenance.clone(),
        )
    }

    /// 装配学生端接口
    pub fn student_api(&self) -> StudentApi {
        StudentApi::new(
            self.engine(),
            self.section_repo.clone(),
            self.enrollment_repo.clone(),
            self.assessment_repo.clone(),
            self.action_log_repo.clone(),
        )
    }

    /// 装配教师端接口
    pub fn instructor_api(&self) -> InstructorApi {
        InstructorApi::new(
            self.section_repo.clone(),
            self.enrollment_repo.clone(),
            self.assessment_repo.clone(),
            self.action_log_repo.clone(),
            self.maintenance.clone(),
        )
    }

    /// 装配管理端接口
    pub fn admin_api(&self) -> AdminApi {
        AdminApi::new(
            self.section_repo.clone(),
            self.action_log_repo.clone(),
            self.maintenance.clone(),
        )
    }
}

/// 构造测试用建课输入
pub fn new_section(course_code: &str, day_time: &str, capacity: i64) -> NewSection {
    NewSection {
        course_code: course_code.to_string(),
        course_title: format!("{} Title", course_code),
        credits: 4,
        section_name: "A".to_string(),
        instructor_id: Some(7),
        day_time: day_time.to_string(),
        room: Some("B-204".to_string()),
        capacity,
        semester: "Monsoon".to_string(),
        year: 2026,
        drop_deadline: None,
    }
}
