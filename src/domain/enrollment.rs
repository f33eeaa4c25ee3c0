// ==========================================
// 高校教务系统 - 选课记录领域模型
// ==========================================
// 不变量: 每个 (student_id, section_id) 至多一条记录,
//         重新选课复用原记录而不是新建
// ==========================================

use crate::domain::types::{EnrollmentStatus, LetterGrade};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Enrollment - 选课记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub section_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: NaiveDateTime,
    pub drop_date: Option<NaiveDateTime>,
    /// 定稿等级成绩; 结课前为 None
    pub final_grade: Option<LetterGrade>,

    // ===== JOIN 展示字段 (来自 sections) =====
    pub course_code: String,
    pub course_title: String,
    pub credits: i64,
    pub day_time: String,
    pub semester: String,
    pub year: i32,
}

impl Enrollment {
    /// 是否在读
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }

    /// 是否已退课
    pub fn is_dropped(&self) -> bool {
        self.status == EnrollmentStatus::Dropped
    }

    /// 是否已结课
    pub fn is_completed(&self) -> bool {
        self.status == EnrollmentStatus::Completed
    }

    /// 是否已有定稿成绩
    pub fn has_grade(&self) -> bool {
        self.final_grade.is_some()
    }

    /// 状态描述 (界面/日志用)
    pub fn status_display(&self) -> String {
        match self.status {
            EnrollmentStatus::Active => "Currently Enrolled".to_string(),
            EnrollmentStatus::Dropped => match self.drop_date {
                Some(date) => format!("Dropped on {}", date.format("%Y-%m-%d")),
                None => "Dropped".to_string(),
            },
            EnrollmentStatus::Completed => match self.final_grade {
                Some(grade) => format!("Completed - Grade: {}", grade),
                None => "Completed".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            enrollment_id: 11,
            student_id: 5,
            section_id: 3,
            status,
            enrolled_at: NaiveDate::from_ymd_opt(2026, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            drop_date: None,
            final_grade: None,
            course_code: "CS101".to_string(),
            course_title: "Intro to Computing".to_string(),
            credits: 4,
            day_time: "Mon/Wed 10:00-11:00".to_string(),
            semester: "Monsoon".to_string(),
            year: 2026,
        }
    }

    #[test]
    fn test_status_predicates() {
        assert!(sample(EnrollmentStatus::Active).is_active());
        assert!(sample(EnrollmentStatus::Dropped).is_dropped());
        assert!(sample(EnrollmentStatus::Completed).is_completed());
    }

    #[test]
    fn test_status_display_with_grade() {
        let mut enrollment = sample(EnrollmentStatus::Completed);
        enrollment.final_grade = Some(LetterGrade::AMinus);
        assert_eq!(enrollment.status_display(), "Completed - Grade: A-");
    }
}
