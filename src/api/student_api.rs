// ==========================================
// 高校教务系统 - 学生端接口
// ==========================================
// 职责: 选课/退课/课表/成绩单/CGPA
// ==========================================

use crate::api::error::ApiResult;
use crate::api::ServiceOutcome;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::assessment::AssessmentRecord;
use crate::domain::enrollment::Enrollment;
use crate::domain::types::{EnrollmentStatus, LetterGrade};
use crate::engine::grading::GradeCore;
use crate::engine::registration::{DropDecision, RegistrationDecision, RegistrationEngine};
use crate::repository::{
    ActionLogRepository, AssessmentRepository, EnrollmentRepository, SectionRepository,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

// ==========================================
// StudentGradeInfo - 选课 + 平时成绩 + 定稿等级
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct StudentGradeInfo {
    pub enrollment: Enrollment,
    pub assessment: Option<AssessmentRecord>,
    pub final_grade: Option<LetterGrade>,
}

// ==========================================
// TranscriptRecord - 成绩单条目
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptRecord {
    pub course_code: String,
    pub course_title: String,
    pub credits: i64,
    pub grade: LetterGrade,
    pub semester: String,
    pub year: i32,
}

// ==========================================
// StudentApi - 学生端接口
// ==========================================
pub struct StudentApi {
    engine: RegistrationEngine,
    section_repo: Arc<SectionRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
    assessment_repo: Arc<AssessmentRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl StudentApi {
    /// 创建学生端接口
    pub fn new(
        engine: RegistrationEngine,
        section_repo: Arc<SectionRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
        assessment_repo: Arc<AssessmentRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            engine,
            section_repo,
            enrollment_repo,
            assessment_repo,
            action_log_repo,
        }
    }

    /// 学生选课
    ///
    /// 成功时 data 为 enrollment_id, 消息报出课程代码与名称;
    /// 拒绝时 message 为引擎给出的原因原文
    pub fn register_for_section(
        &self,
        student_id: i64,
        section_id: i64,
    ) -> ApiResult<ServiceOutcome<i64>> {
        match self.engine.register(student_id, section_id)? {
            RegistrationDecision::Accepted {
                enrollment_id,
                reactivated,
            } => {
                let section = self.section_repo.find_by_id(section_id)?;
                let message = match &section {
                    Some(s) => format!(
                        "Successfully registered for {} - {}",
                        s.course_code, s.course_title
                    ),
                    None => "Successfully registered".to_string(),
                };
                self.action_log_repo.insert(
                    &ActionLog::new(format!("student:{}", student_id), ActionType::Register)
                        .with_student(student_id)
                        .with_section(section_id)
                        .with_detail(if reactivated {
                            "reactivated"
                        } else {
                            "created"
                        }),
                )?;
                info!(student_id, section_id, enrollment_id, "register accepted");
                Ok(ServiceOutcome::success_with(message, enrollment_id))
            }
            RegistrationDecision::Rejected { reason } => Ok(ServiceOutcome::rejected(reason)),
        }
    }

    /// 学生退课
    pub fn drop_section(
        &self,
        student_id: i64,
        section_id: i64,
    ) -> ApiResult<ServiceOutcome<i64>> {
        let now = chrono::Local::now().naive_local();
        match self.engine.drop_section(student_id, section_id, now)? {
            DropDecision::Dropped { enrollment_id } => {
                let section = self.section_repo.find_by_id(section_id)?;
                let message = match &section {
                    Some(s) => format!("Successfully dropped {}", s.course_code),
                    None => "Successfully dropped".to_string(),
                };
                self.action_log_repo.insert(
                    &ActionLog::new(format!("student:{}", student_id), ActionType::Drop)
                        .with_student(student_id)
                        .with_section(section_id),
                )?;
                Ok(ServiceOutcome::success_with(message, enrollment_id))
            }
            DropDecision::Rejected { reason } => Ok(ServiceOutcome::rejected(reason)),
        }
    }

    /// 学生课表 (在读选课记录)
    pub fn timetable(&self, student_id: i64) -> ApiResult<Vec<Enrollment>> {
        Ok(self.enrollment_repo.find_active_by_student(student_id)?)
    }

    /// 全部选课记录 (不论状态)
    pub fn all_enrollments(&self, student_id: i64) -> ApiResult<Vec<Enrollment>> {
        Ok(self.enrollment_repo.find_by_student(student_id, None)?)
    }

    /// 全部课程的成绩详情 (选课记录 + 平时成绩 + 定稿等级)
    pub fn grades_with_details(&self, student_id: i64) -> ApiResult<Vec<StudentGradeInfo>> {
        let enrollments = self.enrollment_repo.find_by_student(student_id, None)?;
        let mut infos = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let assessment = self
                .assessment_repo
                .find_by_student_and_section(student_id, enrollment.section_id)?;
            let final_grade = enrollment.final_grade;
            infos.push(StudentGradeInfo {
                enrollment,
                assessment,
                final_grade,
            });
        }
        Ok(infos)
    }

    /// 成绩单 (已结课且有定稿等级的课程)
    pub fn transcript(&self, student_id: i64) -> ApiResult<Vec<TranscriptRecord>> {
        let enrollments = self
            .enrollment_repo
            .find_by_student(student_id, Some(EnrollmentStatus::Completed))?;
        let records = enrollments
            .into_iter()
            .filter_map(|e| {
                e.final_grade.map(|grade| TranscriptRecord {
                    course_code: e.course_code.clone(),
                    course_title: e.course_title.clone(),
                    credits: e.credits,
                    grade,
                    semester: e.semester.clone(),
                    year: e.year,
                })
            })
            .collect();
        Ok(records)
    }

    /// 计算 CGPA (学分加权, 仅计已定稿课程)
    pub fn cgpa(&self, student_id: i64) -> ApiResult<f64> {
        let enrollments = self.enrollment_repo.find_by_student(student_id, None)?;
        let entries: Vec<(Option<LetterGrade>, i64)> = enrollments
            .iter()
            .map(|e| (e.final_grade, e.credits))
            .collect();
        Ok(GradeCore::cgpa(&entries))
    }
}
