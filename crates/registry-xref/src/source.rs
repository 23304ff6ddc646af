//! Name sources used to resolve ids missing from an index

use async_trait::async_trait;
use registry_client::{MarkService, RegistryResult};
use registry_model::{EntityId, StudentId, SubjectId};

/// Fetches the display name of a single entity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NameSource<K: EntityId>: Send + Sync {
    /// Fetch the current name of `id`
    ///
    /// # Errors
    /// Any registry error; callers fall back to the placeholder label.
    async fn fetch_name(&self, id: K) -> RegistryResult<String>;
}

/// Student names through `GET /marks/students/{id}`
#[derive(Debug, Clone)]
pub struct StudentNames {
    marks: MarkService,
}

impl StudentNames {
    /// Create source
    #[inline]
    #[must_use]
    pub fn new(marks: MarkService) -> Self {
        Self { marks }
    }
}

#[async_trait]
impl NameSource<StudentId> for StudentNames {
    async fn fetch_name(&self, id: StudentId) -> RegistryResult<String> {
        self.marks.student(id).await.map(|s| s.name)
    }
}

/// Subject names through `GET /marks/subjects/{id}`
#[derive(Debug, Clone)]
pub struct SubjectNames {
    marks: MarkService,
}

impl SubjectNames {
    /// Create source
    #[inline]
    #[must_use]
    pub fn new(marks: MarkService) -> Self {
        Self { marks }
    }
}

#[async_trait]
impl NameSource<SubjectId> for SubjectNames {
    async fn fetch_name(&self, id: SubjectId) -> RegistryResult<String> {
        self.marks.subject(id).await.map(|s| s.name)
    }
}
