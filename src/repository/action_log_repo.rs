// ==========================================
// 高校教务系统 - 操作日志仓储
// ==========================================
// 职责: action_log 表的写入与查询
// 红线: 日志写入失败按存储错误上抛, 不静默吞掉
// ==========================================

use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ActionLog> {
        let action_type: String = row.get(2)?;
        let payload_text: Option<String> = row.get(6)?;
        Ok(ActionLog {
            action_id: row.get(0)?,
            actor: row.get(1)?,
            // 写入端受枚举约束, 解析失败只可能是库被外部改写
            action_type: ActionType::from_str(&action_type).unwrap_or(ActionType::SectionUpdate),
            student_id: row.get(3)?,
            section_id: row.get(4)?,
            detail: row.get(5)?,
            payload_json: payload_text.and_then(|t| serde_json::from_str(&t).ok()),
            action_ts: row.get(7)?,
        })
    }

    /// 写入一条操作日志
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let payload_text = log.payload_json.as_ref().map(|p| p.to_string());
        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, actor, action_type, student_id, section_id,
                detail, payload_json, action_ts
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.action_id,
                log.actor,
                log.action_type.to_db_str(),
                log.student_id,
                log.section_id,
                log.detail,
                payload_text,
                log.action_ts,
            ],
        )?;
        Ok(())
    }

    /// 查询最近的操作日志
    pub fn list_recent(&self, limit: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, actor, action_type, student_id, section_id,
                   detail, payload_json, action_ts
            FROM action_log
            ORDER BY action_ts DESC, action_id
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit], Self::map_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }

    /// 查询某班次的操作日志
    pub fn list_by_section(&self, section_id: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, actor, action_type, student_id, section_id,
                   detail, payload_json, action_ts
            FROM action_log
            WHERE section_id = ?1
            ORDER BY action_ts DESC, action_id
            "#,
        )?;
        let rows = stmt.query_map(params![section_id], Self::map_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }
}
