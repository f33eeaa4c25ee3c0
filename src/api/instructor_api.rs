// ==========================================
// 高校教务系统 - 教师端接口
// ==========================================
// 职责: 成绩录入/定稿/班级统计/名册
// 红线: 所有写操作先过门禁, 再做班次归属检查
// ==========================================

use crate::api::error::ApiResult;
use crate::api::ServiceOutcome;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::assessment::{
    validate_component, AssessmentRecord, FINAL_MAX, MIDTERM_MAX, QUIZ_MAX,
};
use crate::domain::enrollment::Enrollment;
use crate::domain::section::Section;
use crate::domain::types::{LetterGrade, Role};
use crate::engine::access::AccessGate;
use crate::engine::grading::{ClassStatistics, GradeCore};
use crate::engine::MaintenanceState;
use crate::repository::{
    ActionLogRepository, AssessmentRepository, EnrollmentRepository, SectionRepository,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// 归属检查失败的固定文案
const NOT_YOUR_SECTION: &str = "Access denied: This is not your section";

// ==========================================
// StudentGradeRecord - 名册行 (选课 + 成绩)
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct StudentGradeRecord {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub assessment: Option<AssessmentRecord>,
    pub final_grade: Option<LetterGrade>,
}

// ==========================================
// InstructorApi - 教师端接口
// ==========================================
pub struct InstructorApi {
    section_repo: Arc<SectionRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
    assessment_repo: Arc<AssessmentRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    maintenance: Arc<MaintenanceState>,
}

impl InstructorApi {
    /// 创建教师端接口
    pub fn new(
        section_repo: Arc<SectionRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
        assessment_repo: Arc<AssessmentRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        maintenance: Arc<MaintenanceState>,
    ) -> Self {
        Self {
            section_repo,
            enrollment_repo,
            assessment_repo,
            action_log_repo,
            maintenance,
        }
    }

    /// 教师所授班次
    pub fn my_sections(
        &self,
        instructor_id: i64,
        semester: &str,
        year: i32,
    ) -> ApiResult<Vec<Section>> {
        Ok(self
            .section_repo
            .list_by_instructor(instructor_id, semester, year)?)
    }

    /// 班次是否归属该教师
    pub fn is_my_section(&self, instructor_id: i64, section_id: i64) -> ApiResult<bool> {
        let section = self.section_repo.find_by_id(section_id)?;
        Ok(section
            .map(|s| {
                AccessGate::can_manage_section(
                    Role::Instructor,
                    Some(instructor_id),
                    s.instructor_id,
                )
            })
            .unwrap_or(false))
    }

    /// 班次名册 (全部状态的选课记录)
    pub fn section_roster(
        &self,
        instructor_id: i64,
        section_id: i64,
    ) -> ApiResult<ServiceOutcome<Vec<Enrollment>>> {
        if !self.is_my_section(instructor_id, section_id)? {
            return Ok(ServiceOutcome::rejected(NOT_YOUR_SECTION));
        }
        let roster = self.enrollment_repo.find_by_section(section_id, None)?;
        Ok(ServiceOutcome::success_with("Roster loaded", roster))
    }

    /// 录入分量成绩
    ///
    /// # 检查顺序
    /// 1. 门禁: 教师角色写操作 (维护模式下拒绝)
    /// 2. 班次归属
    /// 3. 各分量取值范围 (None 表示本次不更新该分量)
    pub fn enter_grade(
        &self,
        instructor_id: i64,
        student_id: i64,
        section_id: i64,
        quiz: Option<f64>,
        midterm: Option<f64>,
        final_exam: Option<f64>,
    ) -> ApiResult<ServiceOutcome> {
        let gate = AccessGate::authorize(Role::Instructor, true, self.maintenance.is_active()?);
        if !gate.allowed {
            return Ok(ServiceOutcome::rejected(gate.reason.unwrap_or_default()));
        }
        if !self.is_my_section(instructor_id, section_id)? {
            return Ok(ServiceOutcome::rejected(NOT_YOUR_SECTION));
        }

        for check in [
            validate_component("Quiz", quiz, QUIZ_MAX),
            validate_component("Midterm", midterm, MIDTERM_MAX),
            validate_component("Final", final_exam, FINAL_MAX),
        ] {
            if let Err(message) = check {
                return Ok(ServiceOutcome::rejected(message));
            }
        }

        self.assessment_repo
            .upsert(student_id, section_id, quiz, midterm, final_exam)?;
        self.action_log_repo.insert(
            &ActionLog::new(format!("instructor:{}", instructor_id), ActionType::GradeEntry)
                .with_student(student_id)
                .with_section(section_id),
        )?;
        Ok(ServiceOutcome::success("Grades saved successfully"))
    }

    /// 成绩定稿: 由平时成绩计算等级并写入选课记录 (置 COMPLETED)
    ///
    /// # 检查顺序
    /// 1. 门禁 + 班次归属
    /// 2. 成绩记录存在
    /// 3. 三分量齐全
    /// 4. 选课记录存在
    pub fn compute_final_grade(
        &self,
        instructor_id: i64,
        student_id: i64,
        section_id: i64,
    ) -> ApiResult<ServiceOutcome<LetterGrade>> {
        let gate = AccessGate::authorize(Role::Instructor, true, self.maintenance.is_active()?);
        if !gate.allowed {
            return Ok(ServiceOutcome::rejected(gate.reason.unwrap_or_default()));
        }
        if !self.is_my_section(instructor_id, section_id)? {
            return Ok(ServiceOutcome::rejected(NOT_YOUR_SECTION));
        }

        let Some(record) = self
            .assessment_repo
            .find_by_student_and_section(student_id, section_id)?
        else {
            return Ok(ServiceOutcome::rejected("No grades entered yet"));
        };
        if !record.is_complete() {
            return Ok(ServiceOutcome::rejected(
                "All grade components (quiz, midterm, final) must be entered",
            ));
        }

        let total = record.total_score();
        let letter = GradeCore::letter_grade(total);

        let Some(enrollment) = self
            .enrollment_repo
            .find_by_student_and_section(student_id, section_id)?
        else {
            return Ok(ServiceOutcome::rejected(
                "Student is not enrolled in this section",
            ));
        };

        self.enrollment_repo
            .finalize_grade(enrollment.enrollment_id, letter)?;
        self.action_log_repo.insert(
            &ActionLog::new(
                format!("instructor:{}", instructor_id),
                ActionType::GradeFinalize,
            )
            .with_student(student_id)
            .with_section(section_id)
            .with_detail(letter.to_db_str()),
        )?;
        info!(instructor_id, student_id, section_id, %letter, "final grade computed");
        Ok(ServiceOutcome::success_with(
            format!("Final grade computed: {} ({:.2}%)", letter, total),
            letter,
        ))
    }

    /// 为班次内全部学生定稿, 返回逐学生结果
    pub fn compute_all_final_grades(
        &self,
        instructor_id: i64,
        section_id: i64,
    ) -> ApiResult<ServiceOutcome<HashMap<i64, String>>> {
        if !self.is_my_section(instructor_id, section_id)? {
            return Ok(ServiceOutcome::rejected(NOT_YOUR_SECTION));
        }

        let enrollments = self.enrollment_repo.find_by_section(section_id, None)?;
        let mut results = HashMap::new();
        for enrollment in enrollments {
            let outcome =
                self.compute_final_grade(instructor_id, enrollment.student_id, section_id)?;
            results.insert(enrollment.student_id, outcome.message);
        }
        Ok(ServiceOutcome::success_with(
            "Final grades computed for all students",
            results,
        ))
    }

    /// 班级统计
    pub fn class_statistics(
        &self,
        instructor_id: i64,
        section_id: i64,
    ) -> ApiResult<ServiceOutcome<ClassStatistics>> {
        if !self.is_my_section(instructor_id, section_id)? {
            return Ok(ServiceOutcome::rejected(NOT_YOUR_SECTION));
        }

        let enrollments = self.enrollment_repo.find_by_section(section_id, None)?;
        let assessments = self.assessment_repo.find_by_section(section_id)?;
        let by_student: HashMap<i64, AssessmentRecord> = assessments
            .into_iter()
            .map(|r| (r.student_id, r))
            .collect();

        let rows: Vec<(Enrollment, Option<AssessmentRecord>)> = enrollments
            .into_iter()
            .map(|e| {
                let record = by_student.get(&e.student_id).cloned();
                (e, record)
            })
            .collect();

        let stats = GradeCore::class_statistics(&rows);
        Ok(ServiceOutcome::success_with("Statistics computed", stats))
    }

    /// 班次成绩总览 (名册行)
    pub fn section_grades(
        &self,
        instructor_id: i64,
        section_id: i64,
    ) -> ApiResult<ServiceOutcome<Vec<StudentGradeRecord>>> {
        if !self.is_my_section(instructor_id, section_id)? {
            return Ok(ServiceOutcome::rejected(NOT_YOUR_SECTION));
        }

        let enrollments = self.enrollment_repo.find_by_section(section_id, None)?;
        let mut records = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let assessment = self
                .assessment_repo
                .find_by_student_and_section(enrollment.student_id, section_id)?;
            records.push(StudentGradeRecord {
                enrollment_id: enrollment.enrollment_id,
                student_id: enrollment.student_id,
                assessment,
                final_grade: enrollment.final_grade,
            });
        }
        Ok(ServiceOutcome::success_with("Grades loaded", records))
    }
}
