// ==========================================
// 高校教务系统 - 课表解析纯函数库
// ==========================================
// 职责: 把紧凑课表文本解析为结构化的日次/时间段
// 红线: 解析失败不抛错, 统一返回 None, 由调用方按"无信息"处理
// ==========================================

use crate::domain::section::UNSCHEDULED_TEXT;
use crate::domain::types::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// ScheduleSlot - 解析后的课表时段
// ==========================================
// 派生值, 不落库; 每次比较前从课表文本重新构建
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// 上课日次 (非空)
    pub days: BTreeSet<Weekday>,
    /// 开始时刻 (自零点起的分钟数)
    pub start_minute: u16,
    /// 结束时刻 (自零点起的分钟数), 恒大于 start_minute
    pub end_minute: u16,
}

/// 课表文本是否表示"未排课"
///
/// 空串/纯空白/"TBA" (大小写不敏感) 视为未排课;
/// 调用方应在解析前短路, 未排课的班次永不冲突
pub fn is_unscheduled(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNSCHEDULED_TEXT)
}

/// 解析课表文本
///
/// # 格式
/// - "<days> <start>-<end>", 例如 "Mon/Wed/Fri 10:00-11:30"
/// - days: 一个或多个日次 token, 以 "/" 分隔
/// - start/end: 24 小时制 H:MM 或 HH:MM
///
/// # 规则
/// 1. trim 后按空白切分; 最后一个 token 是时间段, 其余 token
///    以单空格重新拼接后再按 "/" 切分得到日次列表
///    (容忍日次列表内部含空格的历史数据)
/// 2. 无法识别的日次 token 静默丢弃; 有效日次为零 -> 解析失败
/// 3. 时间段按 "-" 切分, 必须恰好两段, 每段严格匹配 H{1,2}:MM
///    且时在 [0,23]、分在 [0,59]
/// 4. 退化区间 (start >= end) 视为解析失败
///
/// # 返回
/// - Some(ScheduleSlot): 解析成功
/// - None: 任何一处不符合格式 (调用方按"无冲突信息"处理)
pub fn parse_schedule(text: &str) -> Option<ScheduleSlot> {
    let parts: Vec<&str> = text.trim().split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    // 最后一段是时间范围, 其余重新拼为日次串
    let time_range = parts[parts.len() - 1];
    let days_text = parts[..parts.len() - 1].join(" ");

    let mut days = BTreeSet::new();
    for token in days_text.split('/') {
        if let Some(day) = Weekday::parse_token(token) {
            days.insert(day);
        }
    }
    if days.is_empty() {
        return None;
    }

    let time_parts: Vec<&str> = time_range.split('-').collect();
    if time_parts.len() != 2 {
        return None;
    }
    let start_minute = parse_minutes(time_parts[0].trim())?;
    let end_minute = parse_minutes(time_parts[1].trim())?;
    if start_minute >= end_minute {
        return None;
    }

    Some(ScheduleSlot {
        days,
        start_minute,
        end_minute,
    })
}

/// 解析 "H:MM" / "HH:MM" 为自零点起的分钟数
fn parse_minutes(text: &str) -> Option<u16> {
    let (hour_text, minute_text) = text.split_once(':')?;
    if hour_text.is_empty() || hour_text.len() > 2 || minute_text.len() != 2 {
        return None;
    }
    if !hour_text.chars().all(|c| c.is_ascii_digit())
        || !minute_text.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let hour: u16 = hour_text.parse().ok()?;
    let minute: u16 = minute_text.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}
