//! Marks page: concurrent loads, name resolution, create and delete

use pretty_assertions::assert_eq;
use registry_client::Method;
use registry_model::{Mark, MarkBand, MarkId, StudentId, SubjectId};
use registry_pages::{LoadState, MarksPage, Severity};
use registry_test_utils::{client_for, seeded_registry, Failure, ANN, BORIS, HISTORY, MATH, VERA};
use std::time::Duration;

#[tokio::test]
async fn rows_carry_names_and_bands() {
    let registry = seeded_registry();
    let mut page = MarksPage::new(client_for(&registry));
    page.load().await;

    assert_eq!(page.state(), LoadState::Ready);
    let rows = page.rows();
    let summary: Vec<(&str, &str, i32, MarkBand)> = rows
        .iter()
        .map(|r| (r.student_name.as_str(), r.subject_name.as_str(), r.mark.value, r.band))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Ann", "Математика", 95, MarkBand::Excellent),
            ("Ann", "Физика", 72, MarkBand::Good),
            ("Boris", "Математика", 55, MarkBand::Warning),
            ("Vera", "История", 40, MarkBand::Poor),
        ]
    );
    // every name came from the lists
    assert_eq!(registry.count_prefix(Method::Get, "/marks/students/"), 0);
    assert_eq!(registry.count_prefix(Method::Get, "/marks/subjects/"), 0);
}

#[tokio::test]
async fn lists_are_fetched_concurrently() {
    let registry = seeded_registry();
    registry.set_latency(Duration::from_millis(20));
    let mut page = MarksPage::new(client_for(&registry));
    page.load().await;
    assert!(registry.max_in_flight() >= 3);
}

#[tokio::test]
async fn unknown_references_are_resolved_once() {
    let registry = seeded_registry();
    let orphan = StudentId::new(77);
    for i in 0..5 {
        registry.insert_mark(Mark::new(MarkId::new(200 + i), orphan, MATH, 80));
    }
    let mut page = MarksPage::new(client_for(&registry));
    page.load().await;

    assert_eq!(registry.count(Method::Get, "/marks/students/77"), 1);
    assert_eq!(page.student_name(orphan), "Студент #77");
    assert_eq!(page.rows().len(), 9);
}

#[tokio::test]
async fn failed_student_list_falls_back_to_single_lookups() {
    let registry = seeded_registry();
    registry.fail(Method::Get, "/students", Failure::Status(503, None));
    let mut page = MarksPage::new(client_for(&registry));
    page.load().await;

    assert_eq!(page.state(), LoadState::Ready);
    assert_eq!(page.student_name(VERA), "Vera");
    assert_eq!(registry.count_prefix(Method::Get, "/marks/students/"), 3);
    let messages: Vec<String> = page
        .notices()
        .active()
        .iter()
        .map(|n| n.message.clone())
        .collect();
    assert_eq!(messages, vec!["Ошибка при загрузке студентов"]);
}

#[tokio::test]
async fn failed_mark_list_keeps_previous_rows() {
    let registry = seeded_registry();
    let mut page = MarksPage::new(client_for(&registry));
    page.load().await;
    registry.fail_once(Method::Get, "/marks", Failure::Transport);

    page.load().await;

    assert_eq!(page.state(), LoadState::Failed);
    assert_eq!(page.rows().len(), 4);
    assert_eq!(page.notices().latest().unwrap().message, "Ошибка при загрузке оценок");
}

#[tokio::test]
async fn create_requires_every_field_then_reloads() {
    let registry = seeded_registry();
    let mut page = MarksPage::new(client_for(&registry));
    page.load().await;

    assert!(!page.create(Some(BORIS), None, Some(80)).await);
    assert_eq!(page.notices().latest().unwrap().message, "Заполните все поля");
    assert_eq!(registry.count(Method::Post, "/marks"), 0);

    registry.clear_calls();
    assert!(page.create(Some(BORIS), Some(HISTORY), Some(88)).await);
    assert_eq!(registry.count(Method::Get, "/marks"), 1);
    let last = page.rows().into_iter().last().unwrap();
    assert_eq!((last.student_name.as_str(), last.subject_name.as_str()), ("Boris", "История"));
    assert_eq!(page.notices().latest().unwrap().severity, Severity::Success);
}

#[tokio::test]
async fn delete_removes_locally() {
    let registry = seeded_registry();
    let mut page = MarksPage::new(client_for(&registry));
    page.load().await;
    registry.clear_calls();

    assert!(page.delete(MarkId::new(30)).await);
    assert_eq!(page.marks().len(), 3);
    assert_eq!(registry.count(Method::Get, "/marks"), 0);

    assert!(!page.delete(MarkId::new(999)).await);
    assert_eq!(page.notices().latest().unwrap().severity, Severity::Error);
}

#[tokio::test]
async fn averages() {
    let registry = seeded_registry();
    let mut page = MarksPage::new(client_for(&registry));

    let ann = page.average_for_student(ANN).await.unwrap();
    assert!((ann - 83.5).abs() < f64::EPSILON);
    let math = page.average_for_subject(MATH).await.unwrap();
    assert!((math - 75.0).abs() < f64::EPSILON);

    registry.fail(Method::Get, "/marks/average/subject/99", Failure::Transport);
    assert_eq!(page.average_for_subject(SubjectId::new(99)).await, None);
}

#[tokio::test]
async fn reload_retries_a_failed_name_lookup() {
    let registry = seeded_registry();
    let orphan = StudentId::new(77);
    registry.insert_mark(Mark::new(MarkId::new(200), orphan, MATH, 80));
    registry.fail_once(Method::Get, "/marks/students/77", Failure::Transport);
    let mut page = MarksPage::new(client_for(&registry));

    page.load().await;
    assert_eq!(page.student_name(orphan), "Студент #77");

    page.load().await;
    assert_eq!(registry.count(Method::Get, "/marks/students/77"), 2);
}

#[tokio::test]
async fn reload_shows_placeholder_for_deleted_student() {
    let registry = seeded_registry();
    let client = client_for(&registry);
    let mut page = MarksPage::new(client.clone());
    page.load().await;
    assert_eq!(page.student_name(ANN), "Ann");

    client.students().delete(ANN).await.unwrap();
    page.load().await;

    assert_eq!(page.student_name(ANN), "Студент #10");
    assert_eq!(registry.count(Method::Get, "/marks/students/10"), 1);
}
