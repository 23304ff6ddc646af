//! Students page with optimistic creation
//!
//! Creating a student shows a provisional row at once, under a temporary id
//! taken from the clock. The row is swapped in place for the server's record
//! on success and removed on failure:
//!
//! ```text
//! begin_create ──► Pending ──► confirm   ──► Confirmed (row carries server id)
//!                          └─► roll_back ──► RolledBack (row removed)
//! ```
//!
//! The temporary id never leaves the client; the create request carries the
//! draft only. Several creations may be pending at once.

use crate::load::{LoadGuard, LoadState};
use crate::messages;
use crate::notify::NotificationCenter;
use registry_client::{RegistryClient, RegistryResult};
use registry_model::{NewStudent, Student, StudentId, StudentUpdate};
use std::time::Duration;

/// A provisional row awaiting the server's answer
///
/// Consumed by [`StudentsPage::confirm`] or [`StudentsPage::roll_back`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending creation must be confirmed or rolled back"]
pub struct PendingCreate {
    temp_id: StudentId,
    draft: NewStudent,
}

impl PendingCreate {
    /// Temporary id of the provisional row
    #[inline]
    #[must_use]
    pub fn temp_id(&self) -> StudentId {
        self.temp_id
    }

    /// Draft sent to the server
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &NewStudent {
        &self.draft
    }
}

/// How a creation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Server accepted; the row now carries the server id
    Confirmed(Student),
    /// Server refused or was unreachable; the row is gone
    RolledBack,
}

/// State of the students page
#[derive(Debug)]
pub struct StudentsPage {
    client: RegistryClient,
    students: Vec<Student>,
    state: LoadState,
    guard: LoadGuard,
    notices: NotificationCenter,
}

impl StudentsPage {
    /// Create page
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            students: Vec::new(),
            state: LoadState::Idle,
            guard: LoadGuard::new(),
            notices: NotificationCenter::default(),
        }
    }

    /// With notification TTL
    #[inline]
    #[must_use]
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notices = NotificationCenter::new(ttl);
        self
    }

    /// Load all students
    pub async fn load(&mut self) {
        let ticket = self.guard.begin();
        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        let result = self.client.students().list().await;
        if !self.guard.is_current(ticket) {
            tracing::debug!("discarding stale students load");
            self.state = previous;
            return;
        }
        match result {
            Ok(students) => {
                tracing::info!(count = students.len(), "students loaded");
                self.students = students;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                self.notices.failure(&e, messages::STUDENTS_LOAD_FAILED);
                self.state = LoadState::Failed;
            }
        }
    }

    fn temp_id(&self) -> StudentId {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self.students.iter().any(|s| s.id.get() == candidate) {
            candidate += 1;
        }
        StudentId::new(candidate)
    }

    /// Show a provisional row for `draft`
    pub fn begin_create(&mut self, draft: NewStudent) -> PendingCreate {
        let temp_id = self.temp_id();
        let mut row = Student::new(temp_id, draft.name.clone(), draft.age);
        row.group = draft.group.clone();
        self.students.push(row);
        tracing::debug!(%temp_id, "provisional student row added");
        PendingCreate { temp_id, draft }
    }

    /// Replace the provisional row with the server's record
    pub fn confirm(&mut self, pending: PendingCreate, created: Student) -> CreateOutcome {
        let already_listed = self.students.iter().any(|s| s.id == created.id);
        match self.students.iter().position(|s| s.id == pending.temp_id) {
            Some(idx) if already_listed => {
                self.students.remove(idx);
            }
            Some(idx) => self.students[idx] = created.clone(),
            None if !already_listed => self.students.push(created.clone()),
            None => {}
        }
        CreateOutcome::Confirmed(created)
    }

    /// Remove the provisional row
    pub fn roll_back(&mut self, pending: PendingCreate) -> CreateOutcome {
        self.students.retain(|s| s.id != pending.temp_id);
        CreateOutcome::RolledBack
    }

    /// Create a student optimistically
    ///
    /// Returns `None` when the draft is rejected before any request.
    pub async fn create(&mut self, draft: NewStudent) -> Option<CreateOutcome> {
        if draft.name.trim().is_empty() || draft.age <= 0 {
            self.notices.warning(messages::STUDENT_FIELDS_REQUIRED);
            return None;
        }

        let pending = self.begin_create(draft);
        let result = self.client.students().create(pending.draft()).await;
        let outcome = match result {
            Ok(student) => {
                tracing::info!(id = %student.id, temp_id = %pending.temp_id, "student created");
                self.notices.success(messages::STUDENT_CREATED);
                self.confirm(pending, student)
            }
            Err(e) => {
                tracing::warn!(temp_id = %pending.temp_id, error = %e, "student creation rolled back");
                self.notices.failure(&e, messages::STUDENT_CREATE_FAILED);
                self.roll_back(pending)
            }
        };
        Some(outcome)
    }

    /// Edit a row's name locally; `save` sends it
    pub fn edit_name(&mut self, id: StudentId, name: impl Into<String>) -> bool {
        self.row_mut(id).map(|s| s.name = name.into()).is_some()
    }

    /// Edit a row's age locally; `save` sends it
    pub fn edit_age(&mut self, id: StudentId, age: i32) -> bool {
        self.row_mut(id).map(|s| s.age = age).is_some()
    }

    /// Send a row's current name and age to the server
    pub async fn save(&mut self, id: StudentId) -> Option<&Student> {
        let update = {
            let row = self.students.iter().find(|s| s.id == id)?;
            StudentUpdate {
                name: row.name.clone(),
                age: row.age,
            }
        };
        match self.client.students().update(id, &update).await {
            Ok(student) => {
                self.notices.success(messages::STUDENT_UPDATED);
                let row = self.row_mut(id)?;
                *row = student;
                Some(&*row)
            }
            Err(e) => {
                self.notices.failure(&e, messages::STUDENT_UPDATE_FAILED);
                None
            }
        }
    }

    /// Delete a student
    pub async fn delete(&mut self, id: StudentId) -> bool {
        match self.client.students().delete(id).await {
            Ok(()) => {
                self.students.retain(|s| s.id != id);
                self.notices.success(messages::STUDENT_DELETED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::STUDENT_DELETE_FAILED);
                false
            }
        }
    }

    /// First loaded student with exactly this name
    ///
    /// # Errors
    /// `RegistryError::NotFoundByName` when none matches
    pub fn find_by_name(&self, name: &str) -> RegistryResult<&Student> {
        registry_xref::find_student_by_name(&self.students, name)
    }

    fn row_mut(&mut self, id: StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    /// Visible rows, provisional ones included
    #[inline]
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Load progress
    #[inline]
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Notifications
    #[inline]
    pub fn notices(&mut self) -> &mut NotificationCenter {
        &mut self.notices
    }

    /// Generation guard; `leave` discards loads in flight
    #[inline]
    #[must_use]
    pub fn guard(&self) -> &LoadGuard {
        &self.guard
    }
}
