// ==========================================
// 高校教务系统 - 平时成绩仓储
// ==========================================
// 职责: assessments 表的读写
// 红线: Repository 不含业务逻辑; 分量取值校验在 API 层
// ==========================================

use crate::domain::assessment::AssessmentRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AssessmentRepository - 平时成绩仓储
// ==========================================
pub struct AssessmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssessmentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<AssessmentRecord> {
        Ok(AssessmentRecord {
            record_id: row.get(0)?,
            student_id: row.get(1)?,
            section_id: row.get(2)?,
            quiz: row.get(3)?,
            midterm: row.get(4)?,
            final_exam: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// 录入/更新分量成绩
    ///
    /// # 语义
    /// 传 None 的分量不覆盖既有值 (COALESCE), 只更新显式给出的分量;
    /// 记录不存在时插入
    pub fn upsert(
        &self,
        student_id: i64,
        section_id: i64,
        quiz: Option<f64>,
        midterm: Option<f64>,
        final_exam: Option<f64>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO assessments (student_id, section_id, quiz, midterm, final_exam, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, datetime('now', 'localtime'))
            ON CONFLICT(student_id, section_id) DO UPDATE SET
                quiz = COALESCE(excluded.quiz, quiz),
                midterm = COALESCE(excluded.midterm, midterm),
                final_exam = COALESCE(excluded.final_exam, final_exam),
                updated_at = excluded.updated_at
            "#,
            params![student_id, section_id, quiz, midterm, final_exam],
        )?;
        Ok(())
    }

    /// 查询某学生在某班次的成绩记录
    pub fn find_by_student_and_section(
        &self,
        student_id: i64,
        section_id: i64,
    ) -> RepositoryResult<Option<AssessmentRecord>> {
        let conn = self.get_conn()?;
        let record = conn
            .query_row(
                r#"
                SELECT record_id, student_id, section_id, quiz, midterm, final_exam, updated_at
                FROM assessments
                WHERE student_id = ?1 AND section_id = ?2
                "#,
                params![student_id, section_id],
                Self::map_row,
            )
            .optional()?;
        Ok(record)
    }

    /// 查询班次内全部成绩记录
    pub fn find_by_section(&self, section_id: i64) -> RepositoryResult<Vec<AssessmentRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT record_id, student_id, section_id, quiz, midterm, final_exam, updated_at
            FROM assessments
            WHERE section_id = ?1
            ORDER BY record_id
            "#,
        )?;
        let rows = stmt.query_map(params![section_id], Self::map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
