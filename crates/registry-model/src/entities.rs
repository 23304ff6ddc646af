//! Registry entities as returned by the REST API
//!
//! Persistence is server-side; these are decoded views. Field names follow
//! the API's camelCase wire format.

use crate::band::MarkBand;
use crate::ids::{GroupId, MarkId, StudentId, SubjectId};
use serde::{Deserialize, Serialize};

/// Status assigned to groups that do not report one
pub const DEFAULT_GROUP_STATUS: &str = "active";

/// Status string the API uses for archived groups
pub const ARCHIVED_GROUP_STATUS: &str = "archived";

fn default_group_status() -> String {
    DEFAULT_GROUP_STATUS.to_string()
}

/// A student record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Server-assigned id
    pub id: StudentId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Age in years
    #[serde(default)]
    pub age: i32,
    /// Group membership; `None` is a valid "no group" state
    #[serde(default)]
    pub group: Option<GroupRef>,
    /// Marks embedded in the record, empty when the API omits them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl Student {
    /// Create a student without group or marks
    #[must_use]
    pub fn new(id: StudentId, name: impl Into<String>, age: i32) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            group: None,
            marks: Vec::new(),
        }
    }

    /// With group membership
    #[must_use]
    pub fn with_group(mut self, group: GroupRef) -> Self {
        self.group = Some(group);
        self
    }

    /// Id of the student's group, if any
    #[inline]
    #[must_use]
    pub fn group_id(&self) -> Option<GroupId> {
        self.group.as_ref().map(|g| g.id)
    }
}

/// Reference from a student to its group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    /// Group id
    pub id: GroupId,
    /// Group name, when the API embeds it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GroupRef {
    /// Reference by id only
    #[inline]
    #[must_use]
    pub fn id(id: GroupId) -> Self {
        Self { id, name: None }
    }
}

/// A study group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Server-assigned id
    pub id: GroupId,
    /// Group name
    #[serde(default)]
    pub name: String,
    /// Lifecycle status, `"active"` when absent
    #[serde(default = "default_group_status")]
    pub status: String,
}

impl Group {
    /// Create an active group
    #[must_use]
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: default_group_status(),
        }
    }

    /// Whether the group is archived
    #[inline]
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.status.eq_ignore_ascii_case(ARCHIVED_GROUP_STATUS)
    }
}

/// A subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Server-assigned id
    pub id: SubjectId,
    /// Subject name, also usable as a natural key
    #[serde(default)]
    pub name: String,
}

impl Subject {
    /// Create a subject
    #[must_use]
    pub fn new(id: SubjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A mark given to a student for a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    /// Server-assigned id
    pub id: MarkId,
    /// Graded student
    pub student_id: StudentId,
    /// Graded subject
    pub subject_id: SubjectId,
    /// Mark value, 0..=100 expected but not enforced
    pub value: i32,
}

impl Mark {
    /// Create a mark
    #[inline]
    #[must_use]
    pub fn new(id: MarkId, student_id: StudentId, subject_id: SubjectId, value: i32) -> Self {
        Self {
            id,
            student_id,
            subject_id,
            value,
        }
    }

    /// Severity band of the value
    #[inline]
    #[must_use]
    pub fn band(&self) -> MarkBand {
        MarkBand::classify(self.value)
    }
}

/// Enrollment of a student in a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubjectLink {
    /// Enrolled student
    pub student_id: StudentId,
    /// Subject enrolled in
    pub subject_id: SubjectId,
}

impl StudentSubjectLink {
    /// Create a link
    #[inline]
    #[must_use]
    pub fn new(student_id: StudentId, subject_id: SubjectId) -> Self {
        Self {
            student_id,
            subject_id,
        }
    }
}

/// A student together with the subjects it is linked to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWithSubjects {
    /// Student id
    pub id: StudentId,
    /// Student name
    #[serde(default)]
    pub name: String,
    /// Linked subjects
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

/// A subject together with the students linked to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectWithStudents {
    /// Subject id
    pub id: SubjectId,
    /// Subject name
    #[serde(default)]
    pub name: String,
    /// Linked students
    #[serde(default)]
    pub students: Vec<Student>,
}
