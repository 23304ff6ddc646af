//! Results of loads started before leaving a page are dropped

use registry_client::Method;
use registry_pages::{LinksPage, LoadState, MarksPage, StudentsPage};
use registry_test_utils::{client_for, seeded_registry, Failure, ANN};
use std::time::Duration;

#[tokio::test]
async fn leaving_discards_students_load() {
    let registry = seeded_registry();
    registry.set_latency(Duration::from_millis(30));
    let mut page = StudentsPage::new(client_for(&registry));
    let leave = page.guard().handle();

    tokio::join!(page.load(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        leave.leave();
    });

    assert!(page.students().is_empty());
    assert_eq!(page.state(), LoadState::Idle);
}

#[tokio::test]
async fn leaving_discards_failure_notifications() {
    let registry = seeded_registry();
    registry.set_latency(Duration::from_millis(30));
    registry.fail(Method::Get, "/marks", Failure::Transport);
    let mut page = MarksPage::new(client_for(&registry));
    let leave = page.guard().handle();

    tokio::join!(page.load(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        leave.leave();
    });

    assert!(page.notices().active().is_empty());
    assert!(page.rows().is_empty());
    assert_eq!(page.state(), LoadState::Idle);
}

#[tokio::test]
async fn discarded_reload_keeps_previous_state() {
    let registry = seeded_registry();
    let mut page = StudentsPage::new(client_for(&registry));
    page.load().await;
    registry.set_latency(Duration::from_millis(30));
    let leave = page.guard().handle();

    tokio::join!(page.load(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        leave.leave();
    });

    assert_eq!(page.state(), LoadState::Ready);
    assert_eq!(page.students().len(), 3);
}

#[tokio::test]
async fn later_load_applies_after_leave() {
    let registry = seeded_registry();
    let mut page = LinksPage::new(client_for(&registry));
    page.guard().leave();

    page.select(ANN).await;

    assert_eq!(page.state(), LoadState::Ready);
    assert_eq!(page.subjects().len(), 2);
}
