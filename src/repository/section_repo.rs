// ==========================================
// 高校教务系统 - 开课班次仓储
// ==========================================
// 职责: sections 表的 CRUD 与座位计数的条件更新
// 红线: Repository 不含业务逻辑; enrolled_count 只走条件更新
// ==========================================

use crate::domain::section::{NewSection, Section};
use crate::domain::types::SectionStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SectionRepository - 班次仓储
// ==========================================
pub struct SectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SectionRepository {
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
        section_id, course_code, course_title, credits, section_name,
        instructor_id, day_time, room, capacity, enrolled_count,
        status, drop_deadline, semester, year, created_at, updated_at
    "#;

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Section> {
        Ok(Section {
            section_id: row.get(0)?,
            course_code: row.get(1)?,
            course_title: row.get(2)?,
            credits: row.get(3)?,
            section_name: row.get(4)?,
            instructor_id: row.get(5)?,
            day_time: row.get(6)?,
            room: row.get(7)?,
            capacity: row.get(8)?,
            enrolled_count: row.get(9)?,
            status: SectionStatus::from_str(&row.get::<_, String>(10)?),
            drop_deadline: row.get(11)?,
            semester: row.get(12)?,
            year: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }

    /// 新建班次, 返回 section_id
    pub fn insert(&self, section: &NewSection) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO sections (
                course_code, course_title, credits, section_name,
                instructor_id, day_time, room, capacity,
                status, drop_deadline, semester, year
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'OPEN', ?9, ?10, ?11)
            "#,
            params![
                section.course_code,
                section.course_title,
                section.credits,
                section.section_name,
                section.instructor_id,
                section.day_time,
                section.room,
                section.capacity,
                section.drop_deadline,
                section.semester,
                section.year,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 ID 查询班次
    pub fn find_by_id(&self, section_id: i64) -> RepositoryResult<Option<Section>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM sections WHERE section_id = ?1",
            Self::SELECT_COLUMNS
        );
        let section = conn
            .query_row(&sql, params![section_id], Self::map_row)
            .optional()?;
        Ok(section)
    }

    /// 按学期查询班次列表
    pub fn list_by_term(&self, semester: &str, year: i32) -> RepositoryResult<Vec<Section>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM sections WHERE semester = ?1 AND year = ?2 ORDER BY course_code, section_name",
            Self::SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![semester, year], Self::map_row)?;
        let mut sections = Vec::new();
        for row in rows {
            sections.push(row?);
        }
        Ok(sections)
    }

    /// 按教师查询所授班次
    pub fn list_by_instructor(
        &self,
        instructor_id: i64,
        semester: &str,
        year: i32,
    ) -> RepositoryResult<Vec<Section>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"SELECT {} FROM sections
               WHERE instructor_id = ?1 AND semester = ?2 AND year = ?3
               ORDER BY course_code, section_name"#,
            Self::SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![instructor_id, semester, year], Self::map_row)?;
        let mut sections = Vec::new();
        for row in rows {
            sections.push(row?);
        }
        Ok(sections)
    }

    /// 更新班次开放状态
    pub fn set_status(&self, section_id: i64, status: SectionStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE sections
            SET status = ?1, updated_at = datetime('now', 'localtime')
            WHERE section_id = ?2
            "#,
            params![status.to_db_str(), section_id],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Section".to_string(),
                id: section_id.to_string(),
            });
        }
        Ok(())
    }

    /// 设置退课截止时间 (None 表示清除)
    pub fn set_drop_deadline(
        &self,
        section_id: i64,
        deadline: Option<NaiveDateTime>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE sections
            SET drop_deadline = ?1, updated_at = datetime('now', 'localtime')
            WHERE section_id = ?2
            "#,
            params![deadline, section_id],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Section".to_string(),
                id: section_id.to_string(),
            });
        }
        Ok(())
    }

    /// 指派授课教师
    pub fn assign_instructor(&self, section_id: i64, instructor_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE sections
            SET instructor_id = ?1, updated_at = datetime('now', 'localtime')
            WHERE section_id = ?2
            "#,
            params![instructor_id, section_id],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Section".to_string(),
                id: section_id.to_string(),
            });
        }
        Ok(())
    }
}
