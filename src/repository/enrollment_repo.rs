// ==========================================
// 高校教务系统 - 选课记录仓储
// ==========================================
// 职责: enrollments 表的读写, 以及"占位 + 建档/复活"与
//       "退课 + 释放座位"两个事务原语
// 红线: 座位计数必须与选课记录在同一事务内条件更新,
//       check-then-act 的最终裁决在这里, 不在引擎层
// ==========================================

use crate::domain::enrollment::Enrollment;
use crate::domain::types::{EnrollmentStatus, LetterGrade};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// EnrollmentWrite - 注册写入结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentWrite {
    /// 新建选课记录
    Created(i64),
    /// 复活既有 DROPPED 记录 (复用原 enrollment_id)
    Reactivated(i64),
    /// 条件占位失败 (并发下座位已被占完)
    SectionFull,
}

// ==========================================
// EnrollmentRepository - 选课记录仓储
// ==========================================
pub struct EnrollmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EnrollmentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    const SELECT_COLUMNS: &'static str = r#"
        e.enrollment_id, e.student_id, e.section_id, e.status,
        e.enrolled_at, e.drop_date, e.final_grade,
        s.course_code, s.course_title, s.credits, s.day_time,
        s.semester, s.year
    "#;

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
        let final_grade: Option<String> = row.get(6)?;
        Ok(Enrollment {
            enrollment_id: row.get(0)?,
            student_id: row.get(1)?,
            section_id: row.get(2)?,
            status: EnrollmentStatus::from_str(&row.get::<_, String>(3)?),
            enrolled_at: row.get(4)?,
            drop_date: row.get(5)?,
            final_grade: final_grade.as_deref().and_then(LetterGrade::from_str),
            course_code: row.get(7)?,
            course_title: row.get(8)?,
            credits: row.get(9)?,
            day_time: row.get(10)?,
            semester: row.get(11)?,
            year: row.get(12)?,
        })
    }

    /// 按 ID 查询选课记录
    pub fn find_by_id(&self, enrollment_id: i64) -> RepositoryResult<Option<Enrollment>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"SELECT {} FROM enrollments e
               JOIN sections s ON s.section_id = e.section_id
               WHERE e.enrollment_id = ?1"#,
            Self::SELECT_COLUMNS
        );
        let enrollment = conn
            .query_row(&sql, params![enrollment_id], Self::map_row)
            .optional()?;
        Ok(enrollment)
    }

    /// 查询某学生在某班次的选课记录 (不论状态; 至多一条)
    pub fn find_by_student_and_section(
        &self,
        student_id: i64,
        section_id: i64,
    ) -> RepositoryResult<Option<Enrollment>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"SELECT {} FROM enrollments e
               JOIN sections s ON s.section_id = e.section_id
               WHERE e.student_id = ?1 AND e.section_id = ?2"#,
            Self::SELECT_COLUMNS
        );
        let enrollment = conn
            .query_row(&sql, params![student_id, section_id], Self::map_row)
            .optional()?;
        Ok(enrollment)
    }

    /// 查询学生的选课记录列表, 可按状态过滤, 按记录顺序返回
    pub fn find_by_student(
        &self,
        student_id: i64,
        status: Option<EnrollmentStatus>,
    ) -> RepositoryResult<Vec<Enrollment>> {
        let conn = self.get_conn()?;
        let mut sql = format!(
            r#"SELECT {} FROM enrollments e
               JOIN sections s ON s.section_id = e.section_id
               WHERE e.student_id = ?1"#,
            Self::SELECT_COLUMNS
        );
        if status.is_some() {
            sql.push_str(" AND e.status = ?2");
        }
        sql.push_str(" ORDER BY e.enrollment_id");

        let mut stmt = conn.prepare(&sql)?;
        let mut enrollments = Vec::new();
        match status {
            Some(status) => {
                let rows =
                    stmt.query_map(params![student_id, status.to_db_str()], Self::map_row)?;
                for row in rows {
                    enrollments.push(row?);
                }
            }
            None => {
                let rows = stmt.query_map(params![student_id], Self::map_row)?;
                for row in rows {
                    enrollments.push(row?);
                }
            }
        }
        Ok(enrollments)
    }

    /// 查询学生的在读选课记录 (课表比对顺序以此为准)
    pub fn find_active_by_student(&self, student_id: i64) -> RepositoryResult<Vec<Enrollment>> {
        self.find_by_student(student_id, Some(EnrollmentStatus::Active))
    }

    /// 查询班次的选课名册, 可按状态过滤
    pub fn find_by_section(
        &self,
        section_id: i64,
        status: Option<EnrollmentStatus>,
    ) -> RepositoryResult<Vec<Enrollment>> {
        let conn = self.get_conn()?;
        let mut sql = format!(
            r#"SELECT {} FROM enrollments e
               JOIN sections s ON s.section_id = e.section_id
               WHERE e.section_id = ?1"#,
            Self::SELECT_COLUMNS
        );
        if status.is_some() {
            sql.push_str(" AND e.status = ?2");
        }
        sql.push_str(" ORDER BY e.enrollment_id");

        let mut stmt = conn.prepare(&sql)?;
        let mut enrollments = Vec::new();
        match status {
            Some(status) => {
                let rows =
                    stmt.query_map(params![section_id, status.to_db_str()], Self::map_row)?;
                for row in rows {
                    enrollments.push(row?);
                }
            }
            None => {
                let rows = stmt.query_map(params![section_id], Self::map_row)?;
                for row in rows {
                    enrollments.push(row?);
                }
            }
        }
        Ok(enrollments)
    }

    /// 注册写入事务: 条件占位 + 建档/复活
    ///
    /// # 语义
    /// 1. 条件更新 `enrolled_count < capacity` 占一个座位;
    ///    改动 0 行说明座位已满 (并发竞争失败), 整个事务回滚
    /// 2. 已存在 (student, section) 记录 -> 复活: 置 ACTIVE,
    ///    刷新选课时间, 清空退课时间与历史定稿成绩
    /// 3. 否则插入新 ACTIVE 记录
    ///
    /// 引擎层的容量检查只用于提示文案, 最终裁决以这里的条件更新为准
    pub fn enroll_transactional(
        &self,
        student_id: i64,
        section_id: i64,
    ) -> RepositoryResult<EnrollmentWrite> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let seated = tx.execute(
            r#"
            UPDATE sections
            SET enrolled_count = enrolled_count + 1,
                updated_at = datetime('now', 'localtime')
            WHERE section_id = ?1 AND enrolled_count < capacity
            "#,
            params![section_id],
        )?;
        if seated == 0 {
            // 事务随 drop 回滚
            return Ok(EnrollmentWrite::SectionFull);
        }

        let existing: Option<i64> = tx
            .query_row(
                "SELECT enrollment_id FROM enrollments WHERE student_id = ?1 AND section_id = ?2",
                params![student_id, section_id],
                |row| row.get(0),
            )
            .optional()?;

        let write = match existing {
            Some(enrollment_id) => {
                tx.execute(
                    r#"
                    UPDATE enrollments
                    SET status = 'ACTIVE',
                        enrolled_at = datetime('now', 'localtime'),
                        drop_date = NULL,
                        final_grade = NULL
                    WHERE enrollment_id = ?1
                    "#,
                    params![enrollment_id],
                )?;
                EnrollmentWrite::Reactivated(enrollment_id)
            }
            None => {
                tx.execute(
                    r#"
                    INSERT INTO enrollments (student_id, section_id, status, enrolled_at)
                    VALUES (?1, ?2, 'ACTIVE', datetime('now', 'localtime'))
                    "#,
                    params![student_id, section_id],
                )?;
                EnrollmentWrite::Created(tx.last_insert_rowid())
            }
        };

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(write)
    }

    /// 退课写入事务: 置 DROPPED + 打退课时间戳 + 释放座位
    pub fn drop_transactional(
        &self,
        enrollment_id: i64,
        section_id: i64,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let changed = tx.execute(
            r#"
            UPDATE enrollments
            SET status = 'DROPPED', drop_date = datetime('now', 'localtime')
            WHERE enrollment_id = ?1 AND status = 'ACTIVE'
            "#,
            params![enrollment_id],
        )?;
        if changed == 0 {
            return Err(RepositoryError::InvalidStateTransition {
                from: "NON-ACTIVE".to_string(),
                to: "DROPPED".to_string(),
            });
        }

        tx.execute(
            r#"
            UPDATE sections
            SET enrolled_count = enrolled_count - 1,
                updated_at = datetime('now', 'localtime')
            WHERE section_id = ?1 AND enrolled_count > 0
            "#,
            params![section_id],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 成绩定稿: 写入等级并置 COMPLETED (终态)
    pub fn finalize_grade(
        &self,
        enrollment_id: i64,
        letter: LetterGrade,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE enrollments
            SET final_grade = ?1, status = 'COMPLETED'
            WHERE enrollment_id = ?2
            "#,
            params![letter.to_db_str(), enrollment_id],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Enrollment".to_string(),
                id: enrollment_id.to_string(),
            });
        }
        Ok(())
    }
}
