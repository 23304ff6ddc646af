//! Groups and subjects pages

use pretty_assertions::assert_eq;
use registry_client::Method;
use registry_model::{GroupId, SubjectId};
use registry_pages::{GroupsPage, Severity, SubjectsPage};
use registry_test_utils::{client_for, seeded_registry, Failure, ANN, GROUP_A, VERA};
use serde_json::json;

#[tokio::test]
async fn group_created_from_member_list() {
    let registry = seeded_registry();
    let mut page = GroupsPage::new(client_for(&registry));
    page.load().await;

    let group = page.create("ИВТ-12", "12, ,10").await.unwrap();

    let call = registry
        .calls()
        .into_iter()
        .find(|c| c.method == Method::Post)
        .unwrap();
    assert_eq!(call.body, Some(json!({ "name": "ИВТ-12", "studentIds": [12, 10] })));
    assert_eq!(page.groups().len(), 3);
    let vera = registry.students().into_iter().find(|s| s.id == VERA).unwrap();
    assert_eq!(vera.group_id(), Some(group.id));
    assert_eq!(page.notices().latest().unwrap().message, "Группа успешно создана");
}

#[tokio::test]
async fn invalid_member_list_is_rejected_locally() {
    let registry = seeded_registry();
    let mut page = GroupsPage::new(client_for(&registry));

    assert!(page.create("ИВТ-12", "1, два").await.is_none());
    assert!(page.create(" ", "").await.is_none());
    assert_eq!(registry.count(Method::Post, "/groups"), 0);
    assert_eq!(page.notices().active().len(), 2);
}

#[tokio::test]
async fn server_rejection_message_is_shown() {
    let registry = seeded_registry();
    registry.fail(
        Method::Post,
        "/groups",
        Failure::Status(400, Some("Группа уже существует".to_string())),
    );
    let mut page = GroupsPage::new(client_for(&registry));

    assert!(page.create("ИВТ-11", "").await.is_none());
    assert_eq!(page.notices().latest().unwrap().message, "Группа уже существует");
}

#[tokio::test]
async fn search_ignores_case() {
    let registry = seeded_registry();
    let mut page = GroupsPage::new(client_for(&registry));
    page.load().await;

    page.set_search("ивт-1");
    let names: Vec<&str> = page.visible().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["ИВТ-11"]);

    page.set_search("");
    assert_eq!(page.visible().len(), 2);
}

#[tokio::test]
async fn view_and_delete_group() {
    let registry = seeded_registry();
    let mut page = GroupsPage::new(client_for(&registry));
    page.load().await;

    assert_eq!(page.view(GROUP_A).await.map(|g| g.name.clone()), Some("ИВТ-11".to_string()));
    assert!(page.delete(GROUP_A).await);
    assert!(page.selected().is_none());
    assert!(registry
        .students()
        .into_iter()
        .find(|s| s.id == ANN)
        .unwrap()
        .group
        .is_none());

    assert!(page.view(GroupId::new(404)).await.is_none());
    assert_eq!(page.notices().latest().unwrap().severity, Severity::Error);
}

#[tokio::test]
async fn subject_lifecycle() {
    let registry = seeded_registry();
    let mut page = SubjectsPage::new(client_for(&registry));
    page.load().await;

    assert!(page.create("   ").await.is_none());
    assert_eq!(page.notices().latest().unwrap().message, "Введите название предмета");

    let id = page.create("Химия").await.map(|s| s.id).unwrap();
    assert_eq!(page.find_by_name("Химия").unwrap().id, id);
    assert!(page.find_by_name("химия").is_err());

    assert!(page.delete(id).await);
    assert_eq!(page.subjects().len(), 3);

    registry.fail_once(Method::Delete, "/subjects/20", Failure::Transport);
    assert!(!page.delete(SubjectId::new(20)).await);
    assert_eq!(page.subjects().len(), 3);
    assert_eq!(page.notices().latest().unwrap().message, "Ошибка при удалении предмета");
}
