// ==========================================
// 高校教务系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合注册引擎所需的 Repository, 简化依赖注入
// ==========================================

use std::sync::Arc;

use crate::repository::{EnrollmentRepository, SectionRepository};

/// 注册引擎仓储集合
///
/// 把引擎依赖的仓储合并为一个结构体参数, 便于测试时整体替换
#[derive(Clone)]
pub struct RegistrationRepositories {
    /// 班次仓储
    pub section_repo: Arc<SectionRepository>,
    /// 选课记录仓储
    pub enrollment_repo: Arc<EnrollmentRepository>,
}

impl RegistrationRepositories {
    /// 创建新的仓储集合
    pub fn new(
        section_repo: Arc<SectionRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
    ) -> Self {
        Self {
            section_repo,
            enrollment_repo,
        }
    }

    /// 获取班次仓储
    pub fn section_repo(&self) -> &Arc<SectionRepository> {
        &self.section_repo
    }

    /// 获取选课记录仓储
    pub fn enrollment_repo(&self) -> &Arc<EnrollmentRepository> {
        &self.enrollment_repo
    }
}
