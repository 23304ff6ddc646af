//! Link toggling with mandatory re-fetch

use pretty_assertions::assert_eq;
use registry_client::Method;
use registry_model::SubjectId;
use registry_pages::{LinksPage, Severity};
use registry_test_utils::{client_for, seeded_registry, Failure, ANN, BORIS, HISTORY, MATH, PHYSICS};

fn names(page: &LinksPage) -> Vec<String> {
    page.subjects().iter().map(|s| s.name.clone()).collect()
}

#[tokio::test]
async fn link_then_unlink_leaves_list_unchanged() {
    let registry = seeded_registry();
    let mut page = LinksPage::new(client_for(&registry));
    page.select(ANN).await;
    let before = page.subjects().to_vec();

    assert!(page.link(HISTORY).await);
    assert!(names(&page).contains(&"История".to_string()));
    assert!(page.unlink(HISTORY).await);

    assert_eq!(page.subjects(), before.as_slice());
    assert!(!registry.has_link(ANN, HISTORY));
}

#[tokio::test]
async fn every_change_is_followed_by_a_fetch() {
    let registry = seeded_registry();
    let mut page = LinksPage::new(client_for(&registry));
    page.select(BORIS).await;
    registry.clear_calls();

    page.link(MATH).await;
    page.unlink(MATH).await;

    let paths: Vec<(Method, String)> = registry
        .calls()
        .into_iter()
        .map(|c| (c.method, c.path))
        .collect();
    assert_eq!(
        paths,
        vec![
            (Method::Post, "/student-subjects".to_string()),
            (Method::Get, "/student-subjects/11/subjects".to_string()),
            (Method::Delete, "/student-subjects".to_string()),
            (Method::Get, "/student-subjects/11/subjects".to_string()),
        ]
    );
}

#[tokio::test]
async fn server_message_is_shown_unmasked() {
    let registry = seeded_registry();
    let mut page = LinksPage::new(client_for(&registry));
    page.select(ANN).await;
    registry.clear_calls();

    assert!(!page.link(MATH).await);

    let notice = page.notices().latest().unwrap().clone();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.message, "Связь уже существует");
    assert_eq!(registry.count(Method::Get, "/student-subjects/10/subjects"), 0);
    assert_eq!(names(&page), vec!["Математика", "Физика"]);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_subjects() {
    let registry = seeded_registry();
    let mut page = LinksPage::new(client_for(&registry));
    page.select(ANN).await;
    registry.fail_once(Method::Get, "/student-subjects/10/subjects", Failure::Transport);

    page.refresh().await;

    assert_eq!(names(&page), vec!["Математика", "Физика"]);
    assert_eq!(page.notices().latest().unwrap().message, "Ошибка загрузки предметов");
}

#[tokio::test]
async fn link_many_uses_bulk_endpoint() {
    let registry = seeded_registry();
    let mut page = LinksPage::new(client_for(&registry));
    page.select(BORIS).await;

    assert!(page.link_many(&[MATH, PHYSICS]).await);

    assert_eq!(registry.count(Method::Post, "/student-subjects/bulk"), 1);
    assert_eq!(names(&page), vec!["Математика", "Физика"]);
}

#[tokio::test]
async fn nothing_selected_is_a_warning() {
    let registry = seeded_registry();
    let mut page = LinksPage::new(client_for(&registry));

    assert!(!page.link(SubjectId::new(1)).await);
    assert_eq!(page.notices().latest().unwrap().severity, Severity::Warning);
    assert!(registry.calls().is_empty());
}
