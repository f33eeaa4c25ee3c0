// ==========================================
// 高校教务系统 - 访问门禁
// ==========================================
// 职责: 写操作门禁判定 (角色 × 维护模式) 与班次归属检查
// 红线: 判定函数保持纯函数, 维护模式缓存单独封装
// ==========================================

use crate::domain::types::Role;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::SettingsRepository;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// 维护模式拒绝写操作的固定文案
pub const MAINTENANCE_DENIED_REASON: &str =
    "Operation blocked: System is in maintenance mode. Only viewing is allowed.";

// ==========================================
// AccessDecision - 门禁判定结果
// ==========================================
// 瞬时值, 不落库
#[derive(Debug, Clone, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl AccessDecision {
    /// 放行
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// 拒绝 (附原因)
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

// ==========================================
// AccessGate - 门禁判定纯函数
// ==========================================
pub struct AccessGate;

impl AccessGate {
    /// 写操作门禁判定
    ///
    /// # 规则
    /// 1. 读操作一律放行
    /// 2. 管理员一律放行 (维护模式对其无效)
    /// 3. 其余角色在维护模式下的写操作拒绝, 附固定文案
    pub fn authorize(role: Role, is_write: bool, maintenance_active: bool) -> AccessDecision {
        if !is_write {
            return AccessDecision::allow();
        }
        if role == Role::Admin {
            return AccessDecision::allow();
        }
        if maintenance_active {
            return AccessDecision::deny(MAINTENANCE_DENIED_REASON);
        }
        AccessDecision::allow()
    }

    /// 班次归属检查
    ///
    /// # 规则
    /// - 管理员可管理任何班次
    /// - 教师只能管理指派给自己的班次
    /// - 学生不可管理班次
    pub fn can_manage_section(
        role: Role,
        caller_instructor_id: Option<i64>,
        section_instructor_id: Option<i64>,
    ) -> bool {
        match role {
            Role::Admin => true,
            Role::Instructor => {
                caller_instructor_id.is_some() && caller_instructor_id == section_instructor_id
            }
            Role::Student => false,
        }
    }
}

// ==========================================
// MaintenanceState - 维护模式缓存
// ==========================================
// 维护标志存于 settings 表, 读路径走缓存;
// 管理端开关写穿缓存, 其余场景显式 refresh 后才可见 (last-writer-wins)
pub struct MaintenanceState {
    settings_repo: Arc<SettingsRepository>,
    cache: Mutex<Option<bool>>,
}

impl MaintenanceState {
    /// 创建缓存实例 (惰性加载, 首次读取时回源)
    pub fn new(settings_repo: Arc<SettingsRepository>) -> Self {
        Self {
            settings_repo,
            cache: Mutex::new(None),
        }
    }

    /// 当前是否处于维护模式 (缓存命中则不回源)
    pub fn is_active(&self) -> RepositoryResult<bool> {
        let mut cache = self.lock_cache()?;
        if let Some(value) = *cache {
            return Ok(value);
        }
        let value = self.settings_repo.is_maintenance_mode()?;
        *cache = Some(value);
        Ok(value)
    }

    /// 强制回源刷新缓存
    pub fn refresh(&self) -> RepositoryResult<bool> {
        let value = self.settings_repo.is_maintenance_mode()?;
        let mut cache = self.lock_cache()?;
        *cache = Some(value);
        Ok(value)
    }

    /// 设置维护模式 (管理端专用, 写穿缓存)
    pub fn set_active(&self, enabled: bool) -> RepositoryResult<()> {
        self.settings_repo.set_maintenance_mode(enabled)?;
        let mut cache = self.lock_cache()?;
        *cache = Some(enabled);
        Ok(())
    }

    fn lock_cache(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Option<bool>>> {
        self.cache
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}
