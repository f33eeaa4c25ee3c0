// ==========================================
// 高校教务系统 - 操作日志领域模型
// ==========================================
// 红线: 所有成功写入必须记录
// 用途: 审计追踪
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Register,          // 选课
    Drop,              // 退课
    GradeEntry,        // 录入分量成绩
    GradeFinalize,     // 成绩定稿
    SectionUpdate,     // 班次维护 (建课/状态/截止时间/指派教师)
    MaintenanceToggle, // 维护模式开关
}

impl ActionType {
    /// 从字符串解析操作类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "REGISTER" => Some(ActionType::Register),
            "DROP" => Some(ActionType::Drop),
            "GRADE_ENTRY" => Some(ActionType::GradeEntry),
            "GRADE_FINALIZE" => Some(ActionType::GradeFinalize),
            "SECTION_UPDATE" => Some(ActionType::SectionUpdate),
            "MAINTENANCE_TOGGLE" => Some(ActionType::MaintenanceToggle),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::Register => "REGISTER",
            ActionType::Drop => "DROP",
            ActionType::GradeEntry => "GRADE_ENTRY",
            ActionType::GradeFinalize => "GRADE_FINALIZE",
            ActionType::SectionUpdate => "SECTION_UPDATE",
            ActionType::MaintenanceToggle => "MAINTENANCE_TOGGLE",
        }
    }
}

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub actor: String,
    pub action_type: ActionType,
    pub student_id: Option<i64>,
    pub section_id: Option<i64>,
    pub detail: Option<String>,
    pub payload_json: Option<JsonValue>,
    pub action_ts: NaiveDateTime,
}

impl ActionLog {
    /// 构造一条新日志 (生成 UUID 与当前时间戳)
    pub fn new(actor: impl Into<String>, action_type: ActionType) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            actor: actor.into(),
            action_type,
            student_id: None,
            section_id: None,
            detail: None,
            payload_json: None,
            action_ts: chrono::Local::now().naive_local(),
        }
    }

    /// 关联学生
    pub fn with_student(mut self, student_id: i64) -> Self {
        self.student_id = Some(student_id);
        self
    }

    /// 关联班次
    pub fn with_section(mut self, section_id: i64) -> Self {
        self.section_id = Some(section_id);
        self
    }

    /// 详细描述
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 附加 JSON 负载
    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_round_trip() {
        let all = [
            ActionType::Register,
            ActionType::Drop,
            ActionType::GradeEntry,
            ActionType::GradeFinalize,
            ActionType::SectionUpdate,
            ActionType::MaintenanceToggle,
        ];
        for t in all {
            assert_eq!(ActionType::from_str(t.to_db_str()), Some(t));
        }
        assert_eq!(ActionType::from_str("UNKNOWN"), None);
    }

    #[test]
    fn test_builder_fields() {
        let log = ActionLog::new("student:5", ActionType::Register)
            .with_student(5)
            .with_section(3)
            .with_detail("registered");
        assert_eq!(log.student_id, Some(5));
        assert_eq!(log.section_id, Some(3));
        assert!(!log.action_id.is_empty());
    }
}
