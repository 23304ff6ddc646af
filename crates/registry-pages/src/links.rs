//! Student-subject links page
//!
//! Shows the subjects of one selected student. Every link or unlink is
//! followed by a fresh fetch of that student's subjects; the list is never
//! patched locally. Server error messages are shown as sent.

use crate::load::{LoadGuard, LoadState};
use crate::messages;
use crate::notify::NotificationCenter;
use registry_client::RegistryClient;
use registry_model::{StudentId, Subject, SubjectId};
use std::time::Duration;

/// State of the links page
#[derive(Debug)]
pub struct LinksPage {
    client: RegistryClient,
    student: Option<StudentId>,
    subjects: Vec<Subject>,
    state: LoadState,
    guard: LoadGuard,
    notices: NotificationCenter,
}

impl LinksPage {
    /// Create page with no student selected
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            student: None,
            subjects: Vec::new(),
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

    /// Select a student and load their subjects
    pub async fn select(&mut self, student: StudentId) {
        if self.student != Some(student) {
            self.subjects.clear();
        }
        self.student = Some(student);
        self.refresh().await;
    }

    /// Re-fetch the selected student's subjects
    pub async fn refresh(&mut self) {
        let Some(student) = self.student else {
            self.notices.warning(messages::LINK_STUDENT_REQUIRED);
            return;
        };
        let ticket = self.guard.begin();
        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        let result = self.client.links().subjects_of(student).await;
        if !self.guard.is_current(ticket) {
            tracing::debug!(%student, "discarding stale subjects of student");
            self.state = previous;
            return;
        }
        match result {
            Ok(subjects) => {
                tracing::debug!(%student, count = subjects.len(), "linked subjects loaded");
                self.subjects = subjects;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                self.notices.failure(&e, messages::LINKS_LOAD_FAILED);
                self.state = LoadState::Failed;
            }
        }
    }

    /// Link a subject to the selected student
    pub async fn link(&mut self, subject: SubjectId) -> bool {
        let Some(student) = self.student else {
            self.notices.warning(messages::LINK_FIELDS_REQUIRED);
            return false;
        };
        match self.client.links().link(student, subject).await {
            Ok(()) => {
                tracing::info!(%student, %subject, "subject linked");
                self.refresh().await;
                self.notices.success(messages::LINK_CREATED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::LINK_CREATE_FAILED);
                false
            }
        }
    }

    /// Link several subjects to the selected student at once
    pub async fn link_many(&mut self, subjects: &[SubjectId]) -> bool {
        let Some(student) = self.student else {
            self.notices.warning(messages::LINK_FIELDS_REQUIRED);
            return false;
        };
        if subjects.is_empty() {
            self.notices.warning(messages::LINK_FIELDS_REQUIRED);
            return false;
        }
        match self.client.links().link_bulk(student, subjects).await {
            Ok(()) => {
                tracing::info!(%student, count = subjects.len(), "subjects linked");
                self.refresh().await;
                self.notices.success(messages::LINK_CREATED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::LINK_CREATE_FAILED);
                false
            }
        }
    }

    /// Remove a subject from the selected student
    pub async fn unlink(&mut self, subject: SubjectId) -> bool {
        let Some(student) = self.student else {
            self.notices.warning(messages::LINK_FIELDS_REQUIRED);
            return false;
        };
        match self.client.links().unlink(student, subject).await {
            Ok(()) => {
                tracing::info!(%student, %subject, "subject unlinked");
                self.refresh().await;
                self.notices.success(messages::LINK_REMOVED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::LINK_REMOVE_FAILED);
                false
            }
        }
    }

    /// Selected student
    #[inline]
    #[must_use]
    pub fn student(&self) -> Option<StudentId> {
        self.student
    }

    /// Subjects of the selected student as last fetched
    #[inline]
    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
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
