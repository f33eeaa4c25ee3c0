// ==========================================
// 高校教务系统 - 平时成绩领域模型
// ==========================================
// 红线: 分量缺失 (None) 与零分是两回事, 缺失表示"尚未录入"
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 随堂测验满分
pub const QUIZ_MAX: f64 = 20.0;
/// 期中考试满分
pub const MIDTERM_MAX: f64 = 30.0;
/// 期末考试满分
pub const FINAL_MAX: f64 = 50.0;
/// 总分满分
pub const TOTAL_MAX: f64 = 100.0;

// ==========================================
// AssessmentRecord - 平时成绩记录
// ==========================================
// 每个 (student_id, section_id) 一条; 三个分量独立录入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub record_id: i64,
    pub student_id: i64,
    pub section_id: i64,
    /// 随堂测验得分 (0..=20)
    pub quiz: Option<f64>,
    /// 期中得分 (0..=30)
    pub midterm: Option<f64>,
    /// 期末得分 (0..=50)
    pub final_exam: Option<f64>,
    pub updated_at: NaiveDateTime,
}

impl AssessmentRecord {
    /// 随堂测验是否已录入
    pub fn has_quiz(&self) -> bool {
        self.quiz.is_some()
    }

    /// 期中是否已录入
    pub fn has_midterm(&self) -> bool {
        self.midterm.is_some()
    }

    /// 期末是否已录入
    pub fn has_final_exam(&self) -> bool {
        self.final_exam.is_some()
    }

    /// 三个分量是否全部录入
    pub fn is_complete(&self) -> bool {
        self.has_quiz() && self.has_midterm() && self.has_final_exam()
    }

    /// 已录入分量之和 (缺失分量按 0 计入求和, 但不计入完整性)
    pub fn total_score(&self) -> f64 {
        self.quiz.unwrap_or(0.0) + self.midterm.unwrap_or(0.0) + self.final_exam.unwrap_or(0.0)
    }
}

/// 校验单个分量的取值范围
///
/// # 参数
/// - label: 分量名 (用于错误消息)
/// - value: 录入值 (None 表示本次不更新该分量)
/// - max: 该分量满分
pub fn validate_component(label: &str, value: Option<f64>, max: f64) -> Result<(), String> {
    if let Some(v) = value {
        if v < 0.0 || v > max {
            return Err(format!("{} score must be between 0 and {}", label, max));
        }
    }
    Ok(())
}
