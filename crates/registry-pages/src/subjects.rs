//! Subjects page

use crate::load::{LoadGuard, LoadState};
use crate::messages;
use crate::notify::NotificationCenter;
use registry_client::{RegistryClient, RegistryResult};
use registry_model::{NewSubject, Subject, SubjectId};
use std::time::Duration;

/// State of the subjects page
#[derive(Debug)]
pub struct SubjectsPage {
    client: RegistryClient,
    subjects: Vec<Subject>,
    state: LoadState,
    guard: LoadGuard,
    notices: NotificationCenter,
}

impl SubjectsPage {
    /// Create page
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
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

    /// Load all subjects
    pub async fn load(&mut self) {
        let ticket = self.guard.begin();
        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        let result = self.client.subjects().list().await;
        if !self.guard.is_current(ticket) {
            tracing::debug!("discarding stale subjects load");
            self.state = previous;
            return;
        }
        match result {
            Ok(subjects) => {
                tracing::info!(count = subjects.len(), "subjects loaded");
                self.subjects = subjects;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                self.notices.failure(&e, messages::SUBJECTS_LOAD_FAILED);
                self.state = LoadState::Failed;
            }
        }
    }

    /// Create a subject; blank names are rejected locally
    pub async fn create(&mut self, name: &str) -> Option<&Subject> {
        if name.trim().is_empty() {
            self.notices.warning(messages::SUBJECT_NAME_REQUIRED);
            return None;
        }
        match self.client.subjects().create(&NewSubject::new(name)).await {
            Ok(subject) => {
                tracing::info!(id = %subject.id, "subject created");
                self.notices.success(messages::SUBJECT_CREATED);
                self.subjects.push(subject);
                self.subjects.last()
            }
            Err(e) => {
                self.notices.failure(&e, messages::SUBJECT_CREATE_FAILED);
                None
            }
        }
    }

    /// Delete a subject
    pub async fn delete(&mut self, id: SubjectId) -> bool {
        match self.client.subjects().delete(id).await {
            Ok(()) => {
                self.subjects.retain(|s| s.id != id);
                self.notices.success(messages::SUBJECT_DELETED);
                true
            }
            Err(e) => {
                self.notices.failure(&e, messages::SUBJECT_DELETE_FAILED);
                false
            }
        }
    }

    /// First loaded subject with exactly this name
    ///
    /// # Errors
    /// `RegistryError::NotFoundByName` when none matches
    pub fn find_by_name(&self, name: &str) -> RegistryResult<&Subject> {
        registry_xref::find_subject_by_name(&self.subjects, name)
    }

    /// Loaded subjects
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
