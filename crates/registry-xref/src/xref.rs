//! Cross-reference facade
//!
//! [`CrossReference`] owns one name cache per entity kind together with the
//! sources used to fill them. Each page controller owns one. Names stay cached
//! until [`CrossReference::clear`], and every lookup of a missing id, whether
//! from a single resolve or a rebuild, goes through the cache so overlapping
//! requests for one id share a single fetch.

use crate::cache::{CacheStats, NameCache};
use crate::index::NameIndex;
use crate::rebuild::{rebuild, Rebuilt};
use crate::source::{NameSource, StudentNames, SubjectNames};
use async_trait::async_trait;
use registry_client::{RegistryClient, RegistryResult};
use registry_model::{EntityId, Mark, StudentId, SubjectId};
use std::fmt;
use std::sync::Arc;

/// Entry counts of both caches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XrefStats {
    /// Student cache
    pub students: CacheStats,
    /// Subject cache
    pub subjects: CacheStats,
}

/// Student and subject name resolution with shared caches
#[derive(Clone)]
pub struct CrossReference {
    students: NameCache<StudentId>,
    subjects: NameCache<SubjectId>,
    student_source: Arc<dyn NameSource<StudentId>>,
    subject_source: Arc<dyn NameSource<SubjectId>>,
}

impl CrossReference {
    /// Create over explicit name sources
    #[must_use]
    pub fn new(
        student_source: Arc<dyn NameSource<StudentId>>,
        subject_source: Arc<dyn NameSource<SubjectId>>,
    ) -> Self {
        Self {
            students: NameCache::new(),
            subjects: NameCache::new(),
            student_source,
            subject_source,
        }
    }

    /// Create over the registry's mark endpoints
    #[must_use]
    pub fn for_client(client: &RegistryClient) -> Self {
        Self::new(
            Arc::new(StudentNames::new(client.marks().clone())),
            Arc::new(SubjectNames::new(client.marks().clone())),
        )
    }

    /// Display name of a student, fetched on first use
    pub async fn resolve_student_name(&self, id: StudentId) -> String {
        self.students.resolve(id, self.student_source.as_ref()).await
    }

    /// Display name of a subject, fetched on first use
    pub async fn resolve_subject_name(&self, id: SubjectId) -> String {
        self.subjects.resolve(id, self.subject_source.as_ref()).await
    }

    /// Rebuild names for a working set of marks
    ///
    /// Names already cached count as known; entries passed in take precedence
    /// over cached ones. Missing ids are fetched through the caches, so a
    /// concurrent resolve of the same id waits for the rebuild's fetch.
    pub async fn rebuild(
        &self,
        marks: Vec<Mark>,
        known_students: NameIndex<StudentId>,
        known_subjects: NameIndex<SubjectId>,
    ) -> Rebuilt {
        let mut students = known_students;
        students.absorb(&self.students.snapshot());
        let mut subjects = known_subjects;
        subjects.absorb(&self.subjects.snapshot());

        let student_source = Coalesced {
            cache: &self.students,
            source: self.student_source.as_ref(),
        };
        let subject_source = Coalesced {
            cache: &self.subjects,
            source: self.subject_source.as_ref(),
        };
        let rebuilt = rebuild(marks, students, subjects, &student_source, &subject_source).await;

        self.students.insert_all(&rebuilt.students).await;
        self.subjects.insert_all(&rebuilt.subjects).await;
        rebuilt
    }

    /// Record a student name learned elsewhere, e.g. after a rename
    pub async fn record_student_name(&self, id: StudentId, name: impl Into<String>) {
        self.students.insert(id, name).await;
    }

    /// Record a subject name learned elsewhere
    pub async fn record_subject_name(&self, id: SubjectId, name: impl Into<String>) {
        self.subjects.insert(id, name).await;
    }

    /// Forget a deleted student
    pub async fn forget_student(&self, id: StudentId) {
        self.students.invalidate(id).await;
    }

    /// Forget a deleted subject
    pub async fn forget_subject(&self, id: SubjectId) {
        self.subjects.invalidate(id).await;
    }

    /// Drop every cached name
    ///
    /// Swaps in empty caches, so nothing cached before the call is visible
    /// after it.
    pub fn clear(&mut self) {
        self.students = NameCache::new();
        self.subjects = NameCache::new();
    }

    /// Cached student names
    #[must_use]
    pub fn student_names(&self) -> NameIndex<StudentId> {
        self.students.snapshot()
    }

    /// Cached subject names
    #[must_use]
    pub fn subject_names(&self) -> NameIndex<SubjectId> {
        self.subjects.snapshot()
    }

    /// Cache statistics
    pub async fn stats(&self) -> XrefStats {
        XrefStats {
            students: self.students.stats().await,
            subjects: self.subjects.stats().await,
        }
    }
}

/// Source that fetches through a cache, coalescing with other lookups
struct Coalesced<'a, K: EntityId> {
    cache: &'a NameCache<K>,
    source: &'a dyn NameSource<K>,
}

#[async_trait]
impl<K: EntityId> NameSource<K> for Coalesced<'_, K> {
    async fn fetch_name(&self, id: K) -> RegistryResult<String> {
        Ok(self.cache.resolve(id, self.source).await)
    }
}

impl fmt::Debug for CrossReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossReference")
            .field("students", &self.students)
            .field("subjects", &self.subjects)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockNameSource;
    use mockall::predicate::eq;
    use registry_model::MarkId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingStudents {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NameSource<StudentId> for CountingStudents {
        async fn fetch_name(&self, id: StudentId) -> RegistryResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(format!("student {id}"))
        }
    }

    fn xref(
        students: MockNameSource<StudentId>,
        subjects: MockNameSource<SubjectId>,
    ) -> CrossReference {
        CrossReference::new(Arc::new(students), Arc::new(subjects))
    }

    #[tokio::test]
    async fn second_rebuild_reuses_cached_names() {
        let mut students = MockNameSource::new();
        students
            .expect_fetch_name()
            .with(eq(StudentId::new(1)))
            .times(1)
            .returning(|_| Ok("Ann".to_string()));
        let mut subjects = MockNameSource::new();
        subjects
            .expect_fetch_name()
            .with(eq(SubjectId::new(2)))
            .times(1)
            .returning(|_| Ok("Физика".to_string()));
        let xref = xref(students, subjects);
        let marks = vec![Mark::new(MarkId::new(1), StudentId::new(1), SubjectId::new(2), 80)];

        let first = xref.rebuild(marks.clone(), NameIndex::new(), NameIndex::new()).await;
        let second = xref.rebuild(marks, NameIndex::new(), NameIndex::new()).await;

        assert_eq!(first.fetched, 2);
        assert_eq!(second.fetched, 0);
        assert_eq!(second.rows()[0].student_name, "Ann");
        assert_eq!(xref.resolve_subject_name(SubjectId::new(2)).await, "Физика");
    }

    #[tokio::test]
    async fn given_names_override_cached_ones() {
        let mut students = MockNameSource::new();
        students.expect_fetch_name().never();
        let mut subjects = MockNameSource::new();
        subjects.expect_fetch_name().never();
        let xref = xref(students, subjects);
        xref.record_student_name(StudentId::new(1), "Old").await;

        let known: NameIndex<StudentId> = [(StudentId::new(1), "New")].into_iter().collect();
        let subjects: NameIndex<SubjectId> = [(SubjectId::new(1), "x")].into_iter().collect();
        let marks = vec![Mark::new(MarkId::new(1), StudentId::new(1), SubjectId::new(1), 50)];
        let rebuilt = xref.rebuild(marks, known, subjects).await;

        assert_eq!(rebuilt.student_name(StudentId::new(1)), "New");
        assert_eq!(xref.student_names().get(&StudentId::new(1)), Some("New"));
    }

    #[tokio::test]
    async fn forget_and_clear() {
        let mut xref = xref(MockNameSource::new(), MockNameSource::new());
        xref.record_student_name(StudentId::new(1), "Ann").await;
        xref.record_subject_name(SubjectId::new(1), "Математика").await;
        xref.forget_student(StudentId::new(1)).await;

        let stats = xref.stats().await;
        assert_eq!(stats.students.entry_count, 0);
        assert_eq!(stats.subjects.entry_count, 1);

        xref.clear();
        assert_eq!(xref.stats().await.subjects.entry_count, 0);
    }

    #[tokio::test]
    async fn resolve_during_rebuild_shares_the_fetch() {
        let students = Arc::new(CountingStudents::default());
        let mut subjects = MockNameSource::new();
        subjects
            .expect_fetch_name()
            .times(1)
            .returning(|_| Ok("Математика".to_string()));
        let xref = CrossReference::new(students.clone(), Arc::new(subjects));
        let marks = vec![Mark::new(MarkId::new(1), StudentId::new(5), SubjectId::new(2), 90)];

        let (name, rebuilt) = tokio::join!(
            xref.resolve_student_name(StudentId::new(5)),
            xref.rebuild(marks, NameIndex::new(), NameIndex::new()),
        );

        assert_eq!(name, "student 5");
        assert_eq!(rebuilt.student_name(StudentId::new(5)), "student 5");
        assert_eq!(students.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cleared_names_are_fetched_again() {
        let mut students = MockNameSource::new();
        students
            .expect_fetch_name()
            .times(2)
            .returning(|id| Ok(format!("student {id}")));
        let mut subjects = MockNameSource::new();
        subjects.expect_fetch_name().never();
        let mut xref = xref(students, subjects);
        let known: NameIndex<SubjectId> = [(SubjectId::new(2), "Физика")].into_iter().collect();
        let marks = vec![Mark::new(MarkId::new(1), StudentId::new(5), SubjectId::new(2), 90)];

        xref.rebuild(marks.clone(), NameIndex::new(), known.clone()).await;
        xref.clear();
        let rebuilt = xref.rebuild(marks, NameIndex::new(), known).await;

        assert_eq!(rebuilt.fetched, 1);
    }
}
