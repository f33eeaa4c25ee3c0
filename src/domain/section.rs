// ==========================================
// 高校教务系统 - 开课班次领域模型
// ==========================================
// 不变量: 0 <= enrolled_count <= capacity
// 红线: enrolled_count 只能由注册引擎经存储层条件更新修改
// ==========================================

use crate::domain::types::SectionStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 容量下限
pub const MIN_CAPACITY: i64 = 1;
/// 容量上限
pub const MAX_CAPACITY: i64 = 500;

/// 未排课标记
pub const UNSCHEDULED_TEXT: &str = "TBA";

// ==========================================
// Section - 开课班次
// ==========================================
// 课程标识 (course_code/course_title/credits) 冗余在班次行上,
// 课程目录本身不在本系统范围内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub section_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub credits: i64,
    pub section_name: String,
    pub instructor_id: Option<i64>,
    /// 课表文本, 例如 "Mon/Wed 10:00-11:30"; "TBA" 或空串表示未排课
    pub day_time: String,
    pub room: Option<String>,
    pub capacity: i64,
    pub enrolled_count: i64,
    pub status: SectionStatus,
    /// 退课截止时间; None 表示随时可退
    pub drop_deadline: Option<NaiveDateTime>,
    pub semester: String,
    pub year: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Section {
    /// 是否还有空位
    pub fn has_seats(&self) -> bool {
        self.enrolled_count < self.capacity
    }

    /// 是否已满
    pub fn is_full(&self) -> bool {
        self.enrolled_count >= self.capacity
    }

    /// 剩余座位数
    pub fn available_seats(&self) -> i64 {
        (self.capacity - self.enrolled_count).max(0)
    }

    /// 是否开放选课
    pub fn is_open(&self) -> bool {
        self.status == SectionStatus::Open
    }

    /// 是否关闭选课
    pub fn is_closed(&self) -> bool {
        self.status == SectionStatus::Closed
    }

    /// 是否未排课 (课表为空或 "TBA")
    pub fn is_unscheduled(&self) -> bool {
        let text = self.day_time.trim();
        text.is_empty() || text.eq_ignore_ascii_case(UNSCHEDULED_TEXT)
    }

    /// 当前时刻是否允许退课
    ///
    /// # 规则
    /// - 未设置截止时间 -> 随时可退
    /// - 否则 now 不晚于截止时间才可退
    pub fn can_drop(&self, now: NaiveDateTime) -> bool {
        match self.drop_deadline {
            None => true,
            Some(deadline) => now <= deadline,
        }
    }

    /// 展示名, 例如 "CS101 A (Monsoon 2026)"
    pub fn display_name(&self) -> String {
        format!(
            "{} {} ({} {})",
            self.course_code, self.section_name, self.semester, self.year
        )
    }
}

// ==========================================
// NewSection - 建课输入
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSection {
    pub course_code: String,
    pub course_title: String,
    pub credits: i64,
    pub section_name: String,
    pub instructor_id: Option<i64>,
    pub day_time: String,
    pub room: Option<String>,
    pub capacity: i64,
    pub semester: String,
    pub year: i32,
    pub drop_deadline: Option<NaiveDateTime>,
}

impl NewSection {
    /// 校验管理端录入的字段
    ///
    /// # 规则
    /// - course_code / course_title / section_name / semester 非空
    /// - capacity 在 [MIN_CAPACITY, MAX_CAPACITY]
    /// - credits > 0
    /// - year 在 [2000, 2100]
    pub fn validate(&self) -> Result<(), String> {
        if self.course_code.trim().is_empty() {
            return Err("Course code cannot be empty".to_string());
        }
        if self.course_title.trim().is_empty() {
            return Err("Course title cannot be empty".to_string());
        }
        if self.section_name.trim().is_empty() {
            return Err("Section name cannot be empty".to_string());
        }
        if self.semester.trim().is_empty() {
            return Err("Semester cannot be empty".to_string());
        }
        if self.capacity < MIN_CAPACITY || self.capacity > MAX_CAPACITY {
            return Err(format!(
                "Capacity must be between {} and {}",
                MIN_CAPACITY, MAX_CAPACITY
            ));
        }
        if self.credits <= 0 {
            return Err("Credits must be positive".to_string());
        }
        if self.year < 2000 || self.year > 2100 {
            return Err("Year must be between 2000 and 2100".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_section() -> Section {
        Section {
            section_id: 1,
            course_code: "CS101".to_string(),
            course_title: "Intro to Computing".to_string(),
            credits: 4,
            section_name: "A".to_string(),
            instructor_id: Some(7),
            day_time: "Mon/Wed 10:00-11:00".to_string(),
            room: Some("B-204".to_string()),
            capacity: 30,
            enrolled_count: 29,
            status: SectionStatus::Open,
            drop_deadline: None,
            semester: "Monsoon".to_string(),
            year: 2026,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_seat_accounting() {
        let mut section = sample_section();
        assert!(section.has_seats());
        assert_eq!(section.available_seats(), 1);

        section.enrolled_count = 30;
        assert!(section.is_full());
        assert_eq!(section.available_seats(), 0);
    }

    #[test]
    fn test_unscheduled_detection() {
        let mut section = sample_section();
        assert!(!section.is_unscheduled());

        section.day_time = "TBA".to_string();
        assert!(section.is_unscheduled());
        section.day_time = " tba ".to_string();
        assert!(section.is_unscheduled());
        section.day_time = "".to_string();
        assert!(section.is_unscheduled());
    }

    #[test]
    fn test_drop_deadline_boundary() {
        let mut section = sample_section();
        let deadline = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();

        // 无截止时间 -> 随时可退
        assert!(section.can_drop(deadline + chrono::Duration::days(100)));

        section.drop_deadline = Some(deadline);
        // 截止时刻当下仍可退
        assert!(section.can_drop(deadline));
        // 超过截止时刻不可退
        assert!(!section.can_drop(deadline + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_new_section_validation() {
        let valid = NewSection {
            course_code: "CS101".to_string(),
            course_title: "Intro to Computing".to_string(),
            credits: 4,
            section_name: "A".to_string(),
            instructor_id: None,
            day_time: "TBA".to_string(),
            room: None,
            capacity: 30,
            semester: "Monsoon".to_string(),
            year: 2026,
            drop_deadline: None,
        };
        assert!(valid.validate().is_ok());

        let mut bad = valid.clone();
        bad.capacity = 0;
        assert!(bad.validate().is_err());

        let mut bad = valid.clone();
        bad.course_code = "  ".to_string();
        assert!(bad.validate().is_err());
    }
}
