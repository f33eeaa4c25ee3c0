// ==========================================
// 高校教务系统 - API 层
// ==========================================
// 职责: 面向调用方的业务接口, 编排引擎与仓储
// 约定: 策略性拒绝放在 ServiceOutcome 里返回,
//       只有存储/内部故障才走 ApiError
// ==========================================

pub mod admin_api;
pub mod error;
pub mod instructor_api;
pub mod student_api;

pub use admin_api::AdminApi;
pub use error::{ApiError, ApiResult};
pub use instructor_api::{InstructorApi, StudentGradeRecord};
pub use student_api::{StudentApi, StudentGradeInfo, TranscriptRecord};

use serde::Serialize;

// ==========================================
// ServiceOutcome - 业务操作结果
// ==========================================
// success=false 表示策略性拒绝 (message 为拒绝原因原文)
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOutcome<T = ()> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ServiceOutcome<T> {
    /// 成功 (无数据)
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// 成功 (附数据)
    pub fn success_with(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 策略性拒绝 (附原因)
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
