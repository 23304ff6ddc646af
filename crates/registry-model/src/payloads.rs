//! Request payloads for create and update operations
//!
//! None of these carry a client-side id: ids are always server-assigned.

use crate::entities::GroupRef;
use crate::ids::{GroupId, StudentId, SubjectId};
use serde::{Deserialize, Serialize};

/// Body of `POST /students`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Display name
    pub name: String,
    /// Age in years
    pub age: i32,
    /// Optional group membership
    pub group: Option<GroupRef>,
}

impl NewStudent {
    /// Student draft without group
    #[must_use]
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
            group: None,
        }
    }

    /// Place the student into a group
    #[must_use]
    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group = Some(GroupRef::id(group));
        self
    }
}

/// Fields sent as query parameters by `PUT /students/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    /// New name
    pub name: String,
    /// New age
    pub age: i32,
}

impl StudentUpdate {
    /// Query pairs in wire order
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("age".to_string(), self.age.to_string()),
        ]
    }
}

/// Body of `POST /groups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    /// Group name
    pub name: String,
    /// Students placed into the group on creation
    #[serde(default)]
    pub student_ids: Vec<StudentId>,
}

impl NewGroup {
    /// Group draft without members
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            student_ids: Vec::new(),
        }
    }

    /// With initial members
    #[must_use]
    pub fn with_students(mut self, ids: Vec<StudentId>) -> Self {
        self.student_ids = ids;
        self
    }
}

/// Body of `POST /subjects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    /// Subject name
    pub name: String,
}

impl NewSubject {
    /// Subject draft
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Body of `POST /marks`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMark {
    /// Graded student
    pub student_id: StudentId,
    /// Graded subject
    pub subject_id: SubjectId,
    /// Mark value
    pub value: i32,
}

impl NewMark {
    /// Mark draft
    #[inline]
    #[must_use]
    pub fn new(student_id: StudentId, subject_id: SubjectId, value: i32) -> Self {
        Self {
            student_id,
            subject_id,
            value,
        }
    }
}

/// Query of `DELETE /marks/delete-specific`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSelector {
    /// Graded student
    pub student_id: StudentId,
    /// Graded subject
    pub subject_id: SubjectId,
    /// Narrow to a single value, all marks of the pair otherwise
    pub value: Option<i32>,
}

impl MarkSelector {
    /// Query pairs in wire order
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("studentId".to_string(), self.student_id.to_string()),
            ("subjectId".to_string(), self.subject_id.to_string()),
        ];
        if let Some(value) = self.value {
            query.push(("value".to_string(), value.to_string()));
        }
        query
    }
}
