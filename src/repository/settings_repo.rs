// ==========================================
// 高校教务系统 - 系统配置仓储
// ==========================================
// 职责: settings 表的键值读写 (维护模式开关存于此)
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 维护模式配置键
pub const MAINTENANCE_MODE_KEY: &str = "maintenance_mode";

// ==========================================
// SettingsRepository - 系统配置仓储
// ==========================================
pub struct SettingsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SettingsRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置值
    pub fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值 (不存在则插入)
    pub fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, datetime('now', 'localtime'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 维护模式是否开启 (键缺失按关闭处理)
    pub fn is_maintenance_mode(&self) -> RepositoryResult<bool> {
        Ok(self
            .get(MAINTENANCE_MODE_KEY)?
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false))
    }

    /// 设置维护模式
    pub fn set_maintenance_mode(&self, enabled: bool) -> RepositoryResult<()> {
        self.set(MAINTENANCE_MODE_KEY, if enabled { "true" } else { "false" })
    }
}
