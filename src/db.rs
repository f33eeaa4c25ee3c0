// ==========================================
// 高校教务系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 内嵌 schema，保证测试库与正式库建表一致
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径（用户数据目录下）
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("campus-erp")
        .join("campus_erp.db")
}

/// 初始化数据库 schema（幂等）
///
/// 表说明：
/// - sections: 开课班次（课程标识冗余在行上，容量计数与状态由本系统维护）
/// - enrollments: 选课记录，(student_id, section_id) 唯一
/// - assessments: 平时成绩分量，(student_id, section_id) 唯一
/// - settings: 系统级键值配置（维护模式开关）
/// - action_log: 写操作审计日志
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sections (
            section_id      INTEGER PRIMARY KEY AUTOINCREMENT,
            course_code     TEXT NOT NULL,
            course_title    TEXT NOT NULL,
            credits         INTEGER NOT NULL DEFAULT 3,
            section_name    TEXT NOT NULL,
            instructor_id   INTEGER,
            day_time        TEXT NOT NULL DEFAULT 'TBA',
            room            TEXT,
            capacity        INTEGER NOT NULL,
            enrolled_count  INTEGER NOT NULL DEFAULT 0,
            status          TEXT NOT NULL DEFAULT 'OPEN',
            drop_deadline   TEXT,
            semester        TEXT NOT NULL,
            year            INTEGER NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            CHECK (enrolled_count >= 0 AND enrolled_count <= capacity)
        );

        CREATE TABLE IF NOT EXISTS enrollments (
            enrollment_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id      INTEGER NOT NULL,
            section_id      INTEGER NOT NULL REFERENCES sections(section_id),
            status          TEXT NOT NULL DEFAULT 'ACTIVE',
            enrolled_at     TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            drop_date       TEXT,
            final_grade     TEXT,
            UNIQUE (student_id, section_id)
        );

        CREATE INDEX IF NOT EXISTS idx_enrollments_student
            ON enrollments(student_id, status);
        CREATE INDEX IF NOT EXISTS idx_enrollments_section
            ON enrollments(section_id, status);

        CREATE TABLE IF NOT EXISTS assessments (
            record_id       INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id      INTEGER NOT NULL,
            section_id      INTEGER NOT NULL REFERENCES sections(section_id),
            quiz            REAL,
            midterm         REAL,
            final_exam      REAL,
            updated_at      TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            UNIQUE (student_id, section_id)
        );

        CREATE TABLE IF NOT EXISTS settings (
            key             TEXT PRIMARY KEY,
            value           TEXT NOT NULL,
            description     TEXT,
            updated_at      TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        INSERT OR IGNORE INTO settings (key, value, description)
            VALUES ('maintenance_mode', 'false', 'System maintenance mode flag');

        CREATE TABLE IF NOT EXISTS action_log (
            action_id       TEXT PRIMARY KEY,
            actor           TEXT NOT NULL,
            action_type     TEXT NOT NULL,
            student_id      INTEGER,
            section_id      INTEGER,
            detail          TEXT,
            payload_json    TEXT,
            action_ts       TEXT NOT NULL
        );
        "#,
    )
}
