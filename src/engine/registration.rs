// ==========================================
// 高校教务系统 - 注册引擎
// ==========================================
// 职责: 选课/退课的规则编排, 按固定顺序短路检查
// 红线: 任何检查失败都不得产生写入; 写入走仓储层事务原语
// ==========================================

use crate::domain::types::Role;
use crate::engine::access::AccessGate;
use crate::engine::conflict::ConflictDetector;
use crate::engine::repositories::RegistrationRepositories;
use crate::engine::MaintenanceState;
use crate::repository::enrollment_repo::EnrollmentWrite;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// RegistrationDecision - 选课判定结果
// ==========================================
// 策略性拒绝是正常返回值, 不走错误通道
#[derive(Debug, Clone, Serialize)]
pub enum RegistrationDecision {
    Accepted {
        enrollment_id: i64,
        /// 复用既有 DROPPED 记录
        reactivated: bool,
    },
    Rejected {
        reason: String,
    },
}

impl RegistrationDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RegistrationDecision::Accepted { .. })
    }
}

// ==========================================
// DropDecision - 退课判定结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub enum DropDecision {
    Dropped { enrollment_id: i64 },
    Rejected { reason: String },
}

impl DropDecision {
    pub fn is_dropped(&self) -> bool {
        matches!(self, DropDecision::Dropped { .. })
    }
}

// ==========================================
// RegistrationEngine - 注册引擎
// ==========================================
pub struct RegistrationEngine {
    repos: RegistrationRepositories,
    maintenance: Arc<MaintenanceState>,
}

impl RegistrationEngine {
    /// 创建注册引擎
    pub fn new(repos: RegistrationRepositories, maintenance: Arc<MaintenanceState>) -> Self {
        Self { repos, maintenance }
    }

    /// 学生选课
    ///
    /// # 检查顺序 (逐项短路)
    /// 1. 门禁: 学生角色写操作 (维护模式下拒绝)
    /// 2. 班次存在
    /// 3. 不存在同班次的在读记录
    /// 4. 班次状态为 OPEN
    /// 5. 有空位 (提示文案用; 最终裁决在事务内条件占位)
    /// 6. 目标班次已排课时, 按在读记录顺序逐一比对课表,
    ///    报出第一处冲突 (不聚合全部冲突)
    /// 7. 事务写入: 条件占位 + 复活 DROPPED 记录或新建记录
    pub fn register(
        &self,
        student_id: i64,
        section_id: i64,
    ) -> RepositoryResult<RegistrationDecision> {
        let gate = AccessGate::authorize(Role::Student, true, self.maintenance.is_active()?);
        if !gate.allowed {
            return Ok(RegistrationDecision::Rejected {
                reason: gate.reason.unwrap_or_default(),
            });
        }

        let Some(section) = self.repos.section_repo().find_by_id(section_id)? else {
            return Ok(RegistrationDecision::Rejected {
                reason: "Section not found".to_string(),
            });
        };

        if let Some(existing) = self
            .repos
            .enrollment_repo()
            .find_by_student_and_section(student_id, section_id)?
        {
            if existing.is_active() {
                return Ok(RegistrationDecision::Rejected {
                    reason: "You are already registered for this section".to_string(),
                });
            }
        }

        if section.is_closed() {
            return Ok(RegistrationDecision::Rejected {
                reason: "Section is closed. Registration not available.".to_string(),
            });
        }

        if !section.has_seats() {
            return Ok(RegistrationDecision::Rejected {
                reason: format!("Section is full (Capacity: {})", section.capacity),
            });
        }

        if !section.is_unscheduled() {
            let active_enrollments = self.repos.enrollment_repo().find_active_by_student(student_id)?;
            for enrollment in &active_enrollments {
                let Some(enrolled_section) =
                    self.repos.section_repo().find_by_id(enrollment.section_id)?
                else {
                    continue;
                };
                if enrolled_section.is_unscheduled() {
                    continue;
                }
                if ConflictDetector::conflicts(&section.day_time, &enrolled_section.day_time) {
                    debug!(
                        student_id,
                        section_id,
                        clashing_section_id = enrolled_section.section_id,
                        "registration rejected: time clash"
                    );
                    return Ok(RegistrationDecision::Rejected {
                        reason: format!(
                            "Time clash detected! You already have {} at {}. Cannot register for course {}",
                            enrolled_section.course_code,
                            enrolled_section.day_time,
                            section.course_code
                        ),
                    });
                }
            }
        }

        match self
            .repos
            .enrollment_repo()
            .enroll_transactional(student_id, section_id)?
        {
            EnrollmentWrite::Created(enrollment_id) => {
                info!(student_id, section_id, enrollment_id, "enrollment created");
                Ok(RegistrationDecision::Accepted {
                    enrollment_id,
                    reactivated: false,
                })
            }
            EnrollmentWrite::Reactivated(enrollment_id) => {
                info!(student_id, section_id, enrollment_id, "enrollment reactivated");
                Ok(RegistrationDecision::Accepted {
                    enrollment_id,
                    reactivated: true,
                })
            }
            // 检查 5 之后被并发占完: 同一文案拒绝, 无任何写入残留
            EnrollmentWrite::SectionFull => Ok(RegistrationDecision::Rejected {
                reason: format!("Section is full (Capacity: {})", section.capacity),
            }),
        }
    }

    /// 学生退课
    ///
    /// # 检查顺序 (逐项短路)
    /// 1. 门禁: 学生角色写操作
    /// 2. 存在在读记录
    /// 3. 班次设有退课截止时间的, now 不得晚于截止时间
    /// 4. 事务写入: 置 DROPPED + 打时间戳 + 释放座位
    pub fn drop_section(
        &self,
        student_id: i64,
        section_id: i64,
        now: NaiveDateTime,
    ) -> RepositoryResult<DropDecision> {
        let gate = AccessGate::authorize(Role::Student, true, self.maintenance.is_active()?);
        if !gate.allowed {
            return Ok(DropDecision::Rejected {
                reason: gate.reason.unwrap_or_default(),
            });
        }

        let enrollment = self
            .repos
            .enrollment_repo()
            .find_by_student_and_section(student_id, section_id)?
            .filter(|e| e.is_active());
        let Some(enrollment) = enrollment else {
            return Ok(DropDecision::Rejected {
                reason: "You are not enrolled in this section".to_string(),
            });
        };

        if let Some(section) = self.repos.section_repo().find_by_id(section_id)? {
            if !section.can_drop(now) {
                let deadline = section
                    .drop_deadline
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                return Ok(DropDecision::Rejected {
                    reason: format!(
                        "Cannot drop this section. Drop deadline has passed ({})",
                        deadline
                    ),
                });
            }
        }

        self.repos
            .enrollment_repo()
            .drop_transactional(enrollment.enrollment_id, section_id)?;
        info!(
            student_id,
            section_id,
            enrollment_id = enrollment.enrollment_id,
            "enrollment dropped"
        );
        Ok(DropDecision::Dropped {
            enrollment_id: enrollment.enrollment_id,
        })
    }
}
