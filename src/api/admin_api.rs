// ==========================================
// 高校教务系统 - 管理端接口
// ==========================================
// 职责: 班次维护与维护模式开关
// 说明: 管理员写操作不受维护模式限制 (门禁规则)
// ==========================================

use crate::api::error::ApiResult;
use crate::api::ServiceOutcome;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::section::{NewSection, Section};
use crate::domain::types::SectionStatus;
use crate::engine::MaintenanceState;
use crate::repository::{ActionLogRepository, SectionRepository};
use chrono::NaiveDateTime;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

// ==========================================
// AdminApi - 管理端接口
// ==========================================
pub struct AdminApi {
    section_repo: Arc<SectionRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    maintenance: Arc<MaintenanceState>,
}

impl AdminApi {
    /// 创建管理端接口
    pub fn new(
        section_repo: Arc<SectionRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        maintenance: Arc<MaintenanceState>,
    ) -> Self {
        Self {
            section_repo,
            action_log_repo,
            maintenance,
        }
    }

    /// 建课
    ///
    /// 字段校验失败按策略性拒绝返回, 不走错误通道
    pub fn create_section(&self, section: &NewSection) -> ApiResult<ServiceOutcome<i64>> {
        if let Err(message) = section.validate() {
            return Ok(ServiceOutcome::rejected(message));
        }

        let section_id = self.section_repo.insert(section)?;
        self.action_log_repo.insert(
            &ActionLog::new("admin", ActionType::SectionUpdate)
                .with_section(section_id)
                .with_detail("created")
                .with_payload(json!({
                    "course_code": section.course_code,
                    "section_name": section.section_name,
                    "capacity": section.capacity,
                })),
        )?;
        info!(section_id, course_code = %section.course_code, "section created");
        Ok(ServiceOutcome::success_with(
            format!(
                "Section {} {} created",
                section.course_code, section.section_name
            ),
            section_id,
        ))
    }

    /// 开放/关闭班次选课
    pub fn set_section_status(
        &self,
        section_id: i64,
        status: SectionStatus,
    ) -> ApiResult<ServiceOutcome> {
        self.section_repo.set_status(section_id, status)?;
        self.action_log_repo.insert(
            &ActionLog::new("admin", ActionType::SectionUpdate)
                .with_section(section_id)
                .with_detail(format!("status={}", status)),
        )?;
        Ok(ServiceOutcome::success(format!(
            "Section status set to {}",
            status
        )))
    }

    /// 设置/清除退课截止时间
    pub fn set_drop_deadline(
        &self,
        section_id: i64,
        deadline: Option<NaiveDateTime>,
    ) -> ApiResult<ServiceOutcome> {
        self.section_repo.set_drop_deadline(section_id, deadline)?;
        let detail = match deadline {
            Some(d) => format!("drop_deadline={}", d.format("%Y-%m-%d %H:%M")),
            None => "drop_deadline cleared".to_string(),
        };
        self.action_log_repo.insert(
            &ActionLog::new("admin", ActionType::SectionUpdate)
                .with_section(section_id)
                .with_detail(detail),
        )?;
        Ok(ServiceOutcome::success("Drop deadline updated"))
    }

    /// 指派授课教师
    pub fn assign_instructor(
        &self,
        section_id: i64,
        instructor_id: i64,
    ) -> ApiResult<ServiceOutcome> {
        self.section_repo.assign_instructor(section_id, instructor_id)?;
        self.action_log_repo.insert(
            &ActionLog::new("admin", ActionType::SectionUpdate)
                .with_section(section_id)
                .with_detail(format!("instructor={}", instructor_id)),
        )?;
        Ok(ServiceOutcome::success("Instructor assigned"))
    }

    /// 开关维护模式 (写穿缓存, 立即生效)
    pub fn set_maintenance_mode(&self, enabled: bool) -> ApiResult<ServiceOutcome> {
        self.maintenance.set_active(enabled)?;
        self.action_log_repo.insert(
            &ActionLog::new("admin", ActionType::MaintenanceToggle)
                .with_detail(if enabled { "enabled" } else { "disabled" }),
        )?;
        info!(enabled, "maintenance mode toggled");
        Ok(ServiceOutcome::success(if enabled {
            "Maintenance mode enabled"
        } else {
            "Maintenance mode disabled"
        }))
    }

    /// 查询维护模式
    pub fn is_maintenance_mode(&self) -> ApiResult<bool> {
        Ok(self.maintenance.is_active()?)
    }

    /// 按学期列出班次
    pub fn sections_by_term(&self, semester: &str, year: i32) -> ApiResult<Vec<Section>> {
        Ok(self.section_repo.list_by_term(semester, year)?)
    }
}
