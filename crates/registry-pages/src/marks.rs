//! Marks page
//!
//! Marks carry ids only. A load fetches the marks, students and subjects lists
//! concurrently, then resolves whatever names the lists did not cover through
//! the page's [`CrossReference`]. Resolution starts only after all three lists
//! have settled.
//!
//! Every [`MarksPage::load`] starts with empty name caches, so a student
//! deleted on the server shows its placeholder and a failed lookup is tried
//! again. [`MarksPage::reload_marks`] after a create keeps the names it has.

use crate::load::{LoadGuard, LoadState, LoadTicket};
use crate::messages;
use crate::notify::NotificationCenter;
use registry_client::{RegistryClient, RegistryResult};
use registry_model::{Mark, MarkId, NewMark, Student, StudentId, Subject, SubjectId};
use registry_xref::{CrossReference, MarkRow, NameIndex, Rebuilt};
use std::time::Duration;

/// State of the marks page
#[derive(Debug)]
pub struct MarksPage {
    client: RegistryClient,
    xref: CrossReference,
    view: Rebuilt,
    state: LoadState,
    guard: LoadGuard,
    notices: NotificationCenter,
}

impl MarksPage {
    /// Create page with its own name caches
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        let xref = CrossReference::for_client(&client);
        Self::with_xref(client, xref)
    }

    /// Create page over explicit name caches
    #[must_use]
    pub fn with_xref(client: RegistryClient, xref: CrossReference) -> Self {
        Self {
            client,
            xref,
            view: Rebuilt::default(),
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

    /// Load marks together with the student and subject lists
    pub async fn load(&mut self) {
        let ticket = self.guard.begin();
        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        self.xref.clear();

        let (marks, students, subjects) = tokio::join!(
            self.client.marks().list(),
            self.client.students().list(),
            self.client.subjects().list(),
        );
        if !self.guard.is_current(ticket) {
            tracing::debug!("discarding stale marks load");
            self.state = previous;
            return;
        }

        let known_students = self.student_index(students);
        let known_subjects = self.subject_index(subjects);
        match marks {
            Ok(marks) => {
                if !self.apply(ticket, marks, known_students, known_subjects).await {
                    self.state = previous;
                }
            }
            Err(e) => {
                self.notices.failure(&e, messages::MARKS_LOAD_FAILED);
                self.state = LoadState::Failed;
            }
        }
    }

    /// Reload marks only, keeping the names already known
    pub async fn reload_marks(&mut self) {
        let ticket = self.guard.begin();
        match self.client.marks().list().await {
            Ok(marks) => {
                let students = self.view.students.clone();
                let subjects = self.view.subjects.clone();
                self.apply(ticket, marks, students, subjects).await;
            }
            Err(e) if self.guard.is_current(ticket) => {
                self.notices.failure(&e, messages::MARKS_LOAD_FAILED);
            }
            Err(_) => {}
        }
    }

    fn student_index(&mut self, result: RegistryResult<Vec<Student>>) -> NameIndex<StudentId> {
        match result {
            Ok(students) => NameIndex::from_students(&students),
            Err(e) => {
                self.notices.failure(&e, messages::STUDENTS_LOAD_FAILED);
                NameIndex::new()
            }
        }
    }

    fn subject_index(&mut self, result: RegistryResult<Vec<Subject>>) -> NameIndex<SubjectId> {
        match result {
            Ok(subjects) => NameIndex::from_subjects(&subjects),
            Err(e) => {
                self.notices.failure(&e, messages::SUBJECTS_LOAD_FAILED);
                NameIndex::new()
            }
        }
    }

    async fn apply(
        &mut self,
        ticket: LoadTicket,
        marks: Vec<Mark>,
        students: NameIndex<StudentId>,
        subjects: NameIndex<SubjectId>,
    ) -> bool {
        let rebuilt = self.xref.rebuild(marks, students, subjects).await;
        if !self.guard.is_current(ticket) {
            tracing::debug!("discarding stale mark names");
            return false;
        }
        tracing::info!(
            marks = rebuilt.marks.len(),
            fetched = rebuilt.fetched,
            "marks loaded"
        );
        self.view = rebuilt;
        self.state = LoadState::Ready;
        true
    }

    /// Create a mark from form input, then reload the list
    ///
    /// Every field is required; a missing one is rejected before any request.
    pub async fn create(
        &mut self,
        student: Option<StudentId>,
        subject: Option<SubjectId>,
        value: Option<i32>,
    ) -> bool {
        let (Some(student), Some(subject), Some(value)) = (student, subject, value) else {
            self.notices.warning(messages::MARK_FIELDS_REQUIRED);
            return false;
        };

        match self
            .client
            .marks()
            .create(&NewMark::new(student, subject, value))
            .await
        {
            Ok(mark) => {
                tracing::info!(id = %mark.id, "mark created");
                self.reload_marks().await;
                self.notices.success(messages::MARK_CREATED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::MARK_CREATE_FAILED);
                false
            }
        }
    }

    /// Delete a mark; the row is removed locally on success
    pub async fn delete(&mut self, id: MarkId) -> bool {
        match self.client.marks().delete(id).await {
            Ok(()) => {
                self.view.marks.retain(|m| m.id != id);
                self.notices.success(messages::MARK_DELETED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::MARK_DELETE_FAILED);
                false
            }
        }
    }

    /// Server-computed average of a student's marks
    pub async fn average_for_student(&mut self, id: StudentId) -> Option<f64> {
        match self.client.marks().average_for_student(id).await {
            Ok(avg) => Some(avg),
            Err(e) => {
                self.notices.failure(&e, messages::AVERAGE_FAILED);
                None
            }
        }
    }

    /// Server-computed average of a subject's marks
    pub async fn average_for_subject(&mut self, id: SubjectId) -> Option<f64> {
        match self.client.marks().average_for_subject(id).await {
            Ok(avg) => Some(avg),
            Err(e) => {
                self.notices.failure(&e, messages::AVERAGE_FAILED);
                None
            }
        }
    }

    /// Display rows, one per mark
    #[must_use]
    pub fn rows(&self) -> Vec<MarkRow> {
        self.view.rows()
    }

    /// Loaded marks
    #[inline]
    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        &self.view.marks
    }

    /// Student display name
    #[must_use]
    pub fn student_name(&self, id: StudentId) -> String {
        self.view.student_name(id)
    }

    /// Subject display name
    #[must_use]
    pub fn subject_name(&self, id: SubjectId) -> String {
        self.view.subject_name(id)
    }

    /// Name caches of this page
    #[inline]
    #[must_use]
    pub fn xref(&self) -> &CrossReference {
        &self.xref
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
