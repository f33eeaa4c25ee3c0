// ==========================================
// 注册流程集成测试
// ==========================================
// 职责: 验证选课/退课的检查顺序、拒绝文案与座位计数
// 场景: 经 StudentApi/AdminApi 走完整链路
// ==========================================

mod test_helpers;

use campus_erp::domain::types::SectionStatus;
use campus_erp::engine::MAINTENANCE_DENIED_REASON;
use chrono::Duration;
use rusqlite::params;
use test_helpers::{new_section, TestContext};

#[test]
fn test_register_success_updates_seat_count() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon/Wed 10:00-11:00", 2))
        .unwrap()
        .data
        .unwrap();

    let outcome = student.register_for_section(1, section_id).unwrap();
    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.message.contains("CS101"));
    assert!(outcome.data.is_some());

    let section = ctx.section_repo.find_by_id(section_id).unwrap().unwrap();
    assert_eq!(section.enrolled_count, 1);
}

#[test]
fn test_register_missing_section() {
    let ctx = TestContext::new();
    let student = ctx.student_api();

    let outcome = student.register_for_section(1, 9999).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Section not found");
}

#[test]
fn test_register_duplicate_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();

    assert!(student.register_for_section(1, section_id).unwrap().success);
    let outcome = student.register_for_section(1, section_id).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "You are already registered for this section");

    let section = ctx.section_repo.find_by_id(section_id).unwrap().unwrap();
    assert_eq!(section.enrolled_count, 1, "重复选课不得再占座位");
}

#[test]
fn test_register_closed_section_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();
    admin
        .set_section_status(section_id, SectionStatus::Closed)
        .unwrap();

    let outcome = student.register_for_section(1, section_id).unwrap();
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Section is closed. Registration not available."
    );
}

#[test]
fn test_register_full_section_rejected_without_mutation() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 1))
        .unwrap()
        .data
        .unwrap();

    assert!(student.register_for_section(1, section_id).unwrap().success);

    let outcome = student.register_for_section(2, section_id).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Section is full (Capacity: 1)");

    // 拒绝不产生任何写入
    let section = ctx.section_repo.find_by_id(section_id).unwrap().unwrap();
    assert_eq!(section.enrolled_count, 1);
    assert!(ctx
        .enrollment_repo
        .find_by_student_and_section(2, section_id)
        .unwrap()
        .is_none());
}

#[test]
fn test_register_time_clash_names_existing_course() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let first = admin
        .create_section(&new_section("CS101", "Mon/Wed 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();
    let second = admin
        .create_section(&new_section("MA202", "Wed/Fri 10:30-11:30", 5))
        .unwrap()
        .data
        .unwrap();

    assert!(student.register_for_section(1, first).unwrap().success);

    let outcome = student.register_for_section(1, second).unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Time clash detected!"));
    assert!(outcome.message.contains("CS101"), "{}", outcome.message);
    assert!(outcome.message.contains("MA202"), "{}", outcome.message);

    let section = ctx.section_repo.find_by_id(second).unwrap().unwrap();
    assert_eq!(section.enrolled_count, 0);
}

#[test]
fn test_adjacent_times_do_not_clash() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let first = admin
        .create_section(&new_section("CS101", "Mon 11:00-12:00", 5))
        .unwrap()
        .data
        .unwrap();
    let second = admin
        .create_section(&new_section("MA202", "Mon 12:00-13:00", 5))
        .unwrap()
        .data
        .unwrap();

    assert!(student.register_for_section(1, first).unwrap().success);
    let outcome = student.register_for_section(1, second).unwrap();
    assert!(outcome.success, "首尾相接不算冲突: {}", outcome.message);
}

#[test]
fn test_unscheduled_section_never_clashes() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let first = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();
    let second = admin
        .create_section(&new_section("MA202", "TBA", 5))
        .unwrap()
        .data
        .unwrap();

    assert!(student.register_for_section(1, first).unwrap().success);
    assert!(student.register_for_section(1, second).unwrap().success);
}

#[test]
fn test_maintenance_mode_blocks_student_writes() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();

    admin.set_maintenance_mode(true).unwrap();
    let outcome = student.register_for_section(1, section_id).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, MAINTENANCE_DENIED_REASON);

    // 学生读操作不受影响
    assert!(student.timetable(1).unwrap().is_empty());

    admin.set_maintenance_mode(false).unwrap();
    assert!(student.register_for_section(1, section_id).unwrap().success);
}

#[test]
fn test_drop_and_reregister_reuses_enrollment_id() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();

    let first_id = student
        .register_for_section(1, section_id)
        .unwrap()
        .data
        .unwrap();

    let drop_outcome = student.drop_section(1, section_id).unwrap();
    assert!(drop_outcome.success);
    assert!(drop_outcome.message.contains("CS101"));

    let section = ctx.section_repo.find_by_id(section_id).unwrap().unwrap();
    assert_eq!(section.enrolled_count, 0, "退课应释放座位");

    // 模拟历史残留的定稿成绩, 复活时必须清掉
    {
        let conn = ctx.conn.lock().unwrap();
        conn.execute(
            "UPDATE enrollments SET final_grade = 'B' WHERE enrollment_id = ?1",
            params![first_id],
        )
        .unwrap();
    }

    let second_id = student
        .register_for_section(1, section_id)
        .unwrap()
        .data
        .unwrap();
    assert_eq!(first_id, second_id, "复活必须复用原记录");

    let enrollment = ctx
        .enrollment_repo
        .find_by_id(first_id)
        .unwrap()
        .unwrap();
    assert!(enrollment.is_active());
    assert!(enrollment.drop_date.is_none());
    assert!(enrollment.final_grade.is_none(), "历史定稿成绩必须清空");
}

#[test]
fn test_drop_not_enrolled() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();

    let outcome = student.drop_section(1, section_id).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "You are not enrolled in this section");
}

#[test]
fn test_drop_after_deadline_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();
    assert!(student.register_for_section(1, section_id).unwrap().success);

    // 截止时间设为昨天
    let yesterday = chrono::Local::now().naive_local() - Duration::days(1);
    admin.set_drop_deadline(section_id, Some(yesterday)).unwrap();

    let outcome = student.drop_section(1, section_id).unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.contains("Drop deadline has passed"));

    // 拒绝不改变状态
    let enrollment = ctx
        .enrollment_repo
        .find_by_student_and_section(1, section_id)
        .unwrap()
        .unwrap();
    assert!(enrollment.is_active());
    let section = ctx.section_repo.find_by_id(section_id).unwrap().unwrap();
    assert_eq!(section.enrolled_count, 1);
}

#[test]
fn test_drop_before_deadline_allowed() {
    let ctx = TestContext::new();
    let admin = ctx.admin_api();
    let student = ctx.student_api();

    let section_id = admin
        .create_section(&new_section("CS101", "Mon 10:00-11:00", 5))
        .unwrap()
        .data
        .unwrap();
    assert!(student.register_for_section(1, section_id).unwrap().success);

    let tomorrow = chrono::Local::now().naive_local() + Duration::days(1);
    admin.set_drop_deadline(section_id, Some(tomorrow)).unwrap();

    assert!(student.drop_section(1, section_id).unwrap().success);
}
