// ==========================================
// 高校教务系统 - 领域类型定义
// ==========================================
// 红线: 角色与状态一律用枚举, 不做字符串比较
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 用户角色 (Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,    // 学生
    Instructor, // 教师
    Admin,      // 管理员
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "STUDENT"),
            Role::Instructor => write!(f, "INSTRUCTOR"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl Role {
    /// 从字符串解析角色
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STUDENT" => Some(Role::Student),
            "INSTRUCTOR" => Some(Role::Instructor),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

// ==========================================
// 班次状态 (Section Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionStatus {
    Open,   // 开放选课
    Closed, // 关闭选课
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionStatus::Open => write!(f, "OPEN"),
            SectionStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl SectionStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "CLOSED" => SectionStatus::Closed,
            _ => SectionStatus::Open, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SectionStatus::Open => "OPEN",
            SectionStatus::Closed => "CLOSED",
        }
    }
}

// ==========================================
// 选课记录状态 (Enrollment Status)
// ==========================================
// 状态机: ACTIVE -> DROPPED (截止前退课)
//         ACTIVE -> COMPLETED (成绩定稿, 终态)
//         DROPPED -> ACTIVE (重新选课复用原记录)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Active,    // 在读
    Dropped,   // 已退课
    Completed, // 已结课
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "ACTIVE"),
            EnrollmentStatus::Dropped => write!(f, "DROPPED"),
            EnrollmentStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl EnrollmentStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "DROPPED" => EnrollmentStatus::Dropped,
            "COMPLETED" => EnrollmentStatus::Completed,
            _ => EnrollmentStatus::Active, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Dropped => "DROPPED",
            EnrollmentStatus::Completed => "COMPLETED",
        }
    }
}

// ==========================================
// 等级成绩 (Letter Grade)
// ==========================================
// 10 分制绩点, 阈值表见 GradeCore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "C-")]
    CMinus,
    D,
    F,
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl LetterGrade {
    /// 全部等级, 按绩点从高到低
    pub const ALL: [LetterGrade; 11] = [
        LetterGrade::APlus,
        LetterGrade::A,
        LetterGrade::AMinus,
        LetterGrade::BPlus,
        LetterGrade::B,
        LetterGrade::BMinus,
        LetterGrade::CPlus,
        LetterGrade::C,
        LetterGrade::CMinus,
        LetterGrade::D,
        LetterGrade::F,
    ];

    /// 从字符串解析等级（未知等级返回 None）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Some(LetterGrade::APlus),
            "A" => Some(LetterGrade::A),
            "A-" => Some(LetterGrade::AMinus),
            "B+" => Some(LetterGrade::BPlus),
            "B" => Some(LetterGrade::B),
            "B-" => Some(LetterGrade::BMinus),
            "C+" => Some(LetterGrade::CPlus),
            "C" => Some(LetterGrade::C),
            "C-" => Some(LetterGrade::CMinus),
            "D" => Some(LetterGrade::D),
            "F" => Some(LetterGrade::F),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// 对应绩点 (10 分制)
    pub fn grade_points(&self) -> f64 {
        match self {
            LetterGrade::APlus => 10.0,
            LetterGrade::A => 9.0,
            LetterGrade::AMinus => 8.5,
            LetterGrade::BPlus => 8.0,
            LetterGrade::B => 7.0,
            LetterGrade::BMinus => 6.5,
            LetterGrade::CPlus => 6.0,
            LetterGrade::C => 5.5,
            LetterGrade::CMinus => 5.0,
            LetterGrade::D => 4.0,
            LetterGrade::F => 0.0,
        }
    }
}

// ==========================================
// 星期 (Weekday)
// ==========================================
// 课表字符串中的日次 token, 统一规范为三字母码
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Mon => write!(f, "Mon"),
            Weekday::Tue => write!(f, "Tue"),
            Weekday::Wed => write!(f, "Wed"),
            Weekday::Thu => write!(f, "Thu"),
            Weekday::Fri => write!(f, "Fri"),
            Weekday::Sat => write!(f, "Sat"),
            Weekday::Sun => write!(f, "Sun"),
        }
    }
}

impl Weekday {
    /// 解析课表中的日次 token
    ///
    /// # 规则
    /// - 大小写不敏感, 先剔除所有非字母字符
    /// - 接受全称 (monday) 或三字母缩写 (mon)
    /// - 其余输入一律返回 None, 由调用方静默丢弃
    pub fn parse_token(token: &str) -> Option<Self> {
        let clean: String = token
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match clean.as_str() {
            "mon" | "monday" => Some(Weekday::Mon),
            "tue" | "tuesday" => Some(Weekday::Tue),
            "wed" | "wednesday" => Some(Weekday::Wed),
            "thu" | "thursday" => Some(Weekday::Thu),
            "fri" | "friday" => Some(Weekday::Fri),
            "sat" | "saturday" => Some(Weekday::Sat),
            "sun" | "sunday" => Some(Weekday::Sun),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grade_round_trip() {
        for grade in LetterGrade::ALL {
            assert_eq!(LetterGrade::from_str(grade.to_db_str()), Some(grade));
        }
        assert_eq!(LetterGrade::from_str("W"), None);
        assert_eq!(LetterGrade::from_str(""), None);
    }

    #[test]
    fn test_weekday_token_parsing() {
        assert_eq!(Weekday::parse_token("Mon"), Some(Weekday::Mon));
        assert_eq!(Weekday::parse_token("MONDAY"), Some(Weekday::Mon));
        assert_eq!(Weekday::parse_token(" tue,"), Some(Weekday::Tue));
        assert_eq!(Weekday::parse_token("Thurs"), None); // 非标准缩写
        assert_eq!(Weekday::parse_token("X"), None);
    }

    #[test]
    fn test_enrollment_status_round_trip() {
        assert_eq!(EnrollmentStatus::from_str("dropped"), EnrollmentStatus::Dropped);
        assert_eq!(EnrollmentStatus::from_str("COMPLETED"), EnrollmentStatus::Completed);
        assert_eq!(EnrollmentStatus::from_str("anything"), EnrollmentStatus::Active);
    }
}
