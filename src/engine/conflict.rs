// ==========================================
// 高校教务系统 - 课表冲突判定纯函数库
// ==========================================
// 职责: 判定两份课表是否时间冲突
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::engine::schedule::{is_unscheduled, parse_schedule, ScheduleSlot};

// ==========================================
// ConflictDetector - 冲突判定
// ==========================================
pub struct ConflictDetector;

impl ConflictDetector {
    /// 判定两个已解析时段是否冲突
    ///
    /// # 规则
    /// 1. 日次交集为空 -> 不冲突
    /// 2. 时间段按半开区间 [s, e) 判定重叠: s1 < e2 且 s2 < e1
    /// 3. 首尾相接 (e1 == s2 或 e2 == s1) 明确不算冲突,
    ///    例如 11:00-12:00 与 12:00-13:00 可以共存
    pub fn slots_conflict(a: &ScheduleSlot, b: &ScheduleSlot) -> bool {
        if a.days.is_disjoint(&b.days) {
            return false;
        }
        Self::ranges_overlap_excluding_edges(
            a.start_minute,
            a.end_minute,
            b.start_minute,
            b.end_minute,
        )
    }

    /// 判定两份课表文本是否冲突
    ///
    /// # 规则
    /// - 任一侧未排课 (空/TBA) -> 不冲突
    /// - 任一侧解析失败 -> 不冲突 (宽松默认: 不因数据含糊拦选课)
    pub fn conflicts(text_a: &str, text_b: &str) -> bool {
        if is_unscheduled(text_a) || is_unscheduled(text_b) {
            return false;
        }
        match (parse_schedule(text_a), parse_schedule(text_b)) {
            (Some(a), Some(b)) => Self::slots_conflict(&a, &b),
            _ => false,
        }
    }

    /// 半开区间重叠判定, 首尾相接除外
    fn ranges_overlap_excluding_edges(s1: u16, e1: u16, s2: u16, e2: u16) -> bool {
        let overlaps = s1 < e2 && s2 < e1;
        let touching = e1 == s2 || e2 == s1;
        overlaps && !touching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_conflict() {
        // 同一课表与自身必冲突
        let text = "Mon/Wed 10:00-11:00";
        assert!(ConflictDetector::conflicts(text, text));
    }

    #[test]
    fn test_boundary_touch_is_not_conflict() {
        assert!(!ConflictDetector::conflicts(
            "Mon 11:00-12:00",
            "Mon 12:00-13:00"
        ));
        // 反向也成立
        assert!(!ConflictDetector::conflicts(
            "Mon 12:00-13:00",
            "Mon 11:00-12:00"
        ));
    }

    #[test]
    fn test_true_overlap_is_conflict() {
        assert!(ConflictDetector::conflicts(
            "Mon 11:00-12:30",
            "Mon 12:00-13:00"
        ));
    }

    #[test]
    fn test_containment_is_conflict() {
        assert!(ConflictDetector::conflicts(
            "Mon 9:00-17:00",
            "Mon 10:00-11:00"
        ));
    }

    #[test]
    fn test_different_days_no_conflict() {
        assert!(!ConflictDetector::conflicts(
            "Mon 10:00-11:00",
            "Tue 10:00-11:00"
        ));
    }

    #[test]
    fn test_shared_day_among_many() {
        // 只要有一个共同日次且时间重叠即冲突
        assert!(ConflictDetector::conflicts(
            "Mon/Wed 10:00-11:00",
            "Wed/Fri 10:30-11:30"
        ));
    }

    #[test]
    fn test_unscheduled_never_conflicts() {
        assert!(!ConflictDetector::conflicts("TBA", "Mon 10:00-11:00"));
        assert!(!ConflictDetector::conflicts("Mon 10:00-11:00", ""));
        assert!(!ConflictDetector::conflicts("TBA", "TBA"));
    }

    #[test]
    fn test_unparseable_never_conflicts() {
        assert!(!ConflictDetector::conflicts(
            "garbage",
            "Mon 10:00-11:00"
        ));
        assert!(!ConflictDetector::conflicts(
            "Mon 25:00-26:00",
            "Mon 10:00-11:00"
        ));
    }
}
