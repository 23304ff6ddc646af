//! Seed data shared by tests

use crate::server::FakeRegistry;
use registry_client::RegistryClient;
use registry_model::{
    Group, GroupId, GroupRef, Mark, MarkId, Student, StudentId, Subject, SubjectId,
};
use std::sync::Arc;

pub const GROUP_A: GroupId = GroupId::new(1);
pub const GROUP_B: GroupId = GroupId::new(2);
pub const ANN: StudentId = StudentId::new(10);
pub const BORIS: StudentId = StudentId::new(11);
pub const VERA: StudentId = StudentId::new(12);
pub const MATH: SubjectId = SubjectId::new(20);
pub const PHYSICS: SubjectId = SubjectId::new(21);
pub const HISTORY: SubjectId = SubjectId::new(22);

/// Registry with two groups, three students, three subjects, four marks and
/// two links
#[must_use]
pub fn seeded_registry() -> Arc<FakeRegistry> {
    let registry = FakeRegistry::new();

    registry.insert_group(Group::new(GROUP_A, "ИВТ-11"));
    let mut archived = Group::new(GROUP_B, "ИВТ-09");
    archived.status = registry_model::ARCHIVED_GROUP_STATUS.to_string();
    registry.insert_group(archived);

    registry.insert_student(Student::new(ANN, "Ann", 20).with_group(GroupRef {
        id: GROUP_A,
        name: Some("ИВТ-11".to_string()),
    }));
    registry.insert_student(Student::new(BORIS, "Boris", 21).with_group(GroupRef::id(GROUP_A)));
    registry.insert_student(Student::new(VERA, "Vera", 19));

    registry.insert_subject(Subject::new(MATH, "Математика"));
    registry.insert_subject(Subject::new(PHYSICS, "Физика"));
    registry.insert_subject(Subject::new(HISTORY, "История"));

    registry.insert_mark(Mark::new(MarkId::new(30), ANN, MATH, 95));
    registry.insert_mark(Mark::new(MarkId::new(31), ANN, PHYSICS, 72));
    registry.insert_mark(Mark::new(MarkId::new(32), BORIS, MATH, 55));
    registry.insert_mark(Mark::new(MarkId::new(33), VERA, HISTORY, 40));

    registry.insert_link(ANN, MATH);
    registry.insert_link(ANN, PHYSICS);

    Arc::new(registry)
}

/// Client talking to an in-memory registry
#[must_use]
pub fn client_for(registry: &Arc<FakeRegistry>) -> RegistryClient {
    RegistryClient::with_transport(registry.clone())
}
