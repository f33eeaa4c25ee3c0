// ==========================================
// 高校教务系统 - 成绩核算纯函数库
// ==========================================
// 职责: 分量汇总、等级换算、绩点与 CGPA、班级统计
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::assessment::AssessmentRecord;
use crate::domain::enrollment::Enrollment;
use crate::domain::types::LetterGrade;
use serde::Serialize;
use std::collections::HashMap;

/// 班级统计中"未定稿"的分布桶
pub const UNGRADED_KEY: &str = "N/A";

// ==========================================
// ClassStatistics - 班级统计结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ClassStatistics {
    /// 全部选课人数 (不论状态)
    pub total_students: i64,
    /// 分量齐全、计入均分统计的人数
    pub graded_count: i64,
    /// 齐全记录的总分均值 (无齐全记录时为 0)
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// 按"定稿等级"计数的分布 (全部等级预置为 0, 未定稿归入 N/A)
    pub distribution: HashMap<String, i64>,
}

// ==========================================
// GradeCore - 成绩核算纯函数
// ==========================================
pub struct GradeCore;

impl GradeCore {
    /// 已录入分量之和
    pub fn total_score(record: &AssessmentRecord) -> f64 {
        record.total_score()
    }

    /// 三分量是否全部录入
    pub fn is_complete(record: &AssessmentRecord) -> bool {
        record.is_complete()
    }

    /// 总分 -> 等级成绩
    ///
    /// # 规则 (下界含, 自高向低)
    /// 90→A+, 85→A, 80→A-, 75→B+, 70→B, 65→B-,
    /// 60→C+, 55→C, 50→C-, 45→D, 其余→F
    pub fn letter_grade(total: f64) -> LetterGrade {
        if total >= 90.0 {
            LetterGrade::APlus
        } else if total >= 85.0 {
            LetterGrade::A
        } else if total >= 80.0 {
            LetterGrade::AMinus
        } else if total >= 75.0 {
            LetterGrade::BPlus
        } else if total >= 70.0 {
            LetterGrade::B
        } else if total >= 65.0 {
            LetterGrade::BMinus
        } else if total >= 60.0 {
            LetterGrade::CPlus
        } else if total >= 55.0 {
            LetterGrade::C
        } else if total >= 50.0 {
            LetterGrade::CMinus
        } else if total >= 45.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    /// 按记录求等级: 分量不全返回 None ("尚未评级")
    pub fn letter_for_record(record: &AssessmentRecord) -> Option<LetterGrade> {
        if record.is_complete() {
            Some(Self::letter_grade(record.total_score()))
        } else {
            None
        }
    }

    /// 等级 -> 绩点 (10 分制); 无等级按 0 计
    pub fn gpa_points(letter: Option<LetterGrade>) -> f64 {
        letter.map(|l| l.grade_points()).unwrap_or(0.0)
    }

    /// 计算 CGPA (学分加权均值)
    ///
    /// # 规则
    /// - 仅统计已有定稿等级的条目; 无等级条目不进分子也不进分母
    /// - 分母为零 (没有任何定稿条目) -> 返回 0
    pub fn cgpa(entries: &[(Option<LetterGrade>, i64)]) -> f64 {
        let mut total_points = 0.0;
        let mut total_credits: i64 = 0;

        for (letter, credits) in entries {
            if let Some(grade) = letter {
                total_points += grade.grade_points() * (*credits as f64);
                total_credits += credits;
            }
        }

        if total_credits > 0 {
            total_points / total_credits as f64
        } else {
            0.0
        }
    }

    /// 计算班级统计
    ///
    /// # 规则
    /// - 均分/最高/最低只统计分量齐全的记录 (按 total_score)
    /// - 分布按选课记录上"定稿等级"计数 (不按平时成绩重算),
    ///   未定稿归入 N/A 桶
    /// - 无齐全记录时均分/最高/最低取 0
    pub fn class_statistics(
        rows: &[(Enrollment, Option<AssessmentRecord>)],
    ) -> ClassStatistics {
        let mut distribution: HashMap<String, i64> = HashMap::new();
        for letter in LetterGrade::ALL {
            distribution.insert(letter.to_db_str().to_string(), 0);
        }
        distribution.insert(UNGRADED_KEY.to_string(), 0);

        let mut total_score = 0.0;
        let mut graded_count: i64 = 0;
        let mut min_score = f64::MAX;
        let mut max_score = f64::MIN;

        for (enrollment, record) in rows {
            if let Some(record) = record {
                if record.is_complete() {
                    let score = record.total_score();
                    total_score += score;
                    graded_count += 1;
                    if score < min_score {
                        min_score = score;
                    }
                    if score > max_score {
                        max_score = score;
                    }
                }
            }

            let key = match enrollment.final_grade {
                Some(letter) => letter.to_db_str().to_string(),
                None => UNGRADED_KEY.to_string(),
            };
            *distribution.entry(key).or_insert(0) += 1;
        }

        ClassStatistics {
            total_students: rows.len() as i64,
            graded_count,
            average_score: if graded_count > 0 {
                total_score / graded_count as f64
            } else {
                0.0
            },
            min_score: if graded_count > 0 { min_score } else { 0.0 },
            max_score: if graded_count > 0 { max_score } else { 0.0 },
            distribution,
        }
    }
}
