//! Batch rebuild of the mark name indexes
//!
//! Given a working set of marks and partially-known name indexes, fetches
//! every referenced id missing from the indexes and merges the results:
//!
//! - each distinct unknown id is fetched at most once, however many marks
//!   reference it
//! - all fetches of one rebuild run concurrently
//! - a failed fetch yields the placeholder label; it never aborts the rebuild
//! - known entries are kept as given, so the output is a superset of the input
//! - the merge happens once, after every fetch has settled

use crate::index::NameIndex;
use crate::source::NameSource;
use futures::future::join_all;
use indexmap::IndexSet;
use registry_model::{EntityId, Mark, MarkBand, StudentId, SubjectId};

/// Result of a rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rebuilt {
    /// Student names covering every mark's student
    pub students: NameIndex<StudentId>,
    /// Subject names covering every mark's subject
    pub subjects: NameIndex<SubjectId>,
    /// Marks in their original order
    pub marks: Vec<Mark>,
    /// Number of lookups issued
    pub fetched: usize,
}

/// Display row of the marks table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkRow {
    /// The mark itself
    pub mark: Mark,
    /// Student display name
    pub student_name: String,
    /// Subject display name
    pub subject_name: String,
    /// Colour band of the value
    pub band: MarkBand,
}

impl Rebuilt {
    /// Student display name for an id
    #[must_use]
    pub fn student_name(&self, id: StudentId) -> String {
        self.students.display(id)
    }

    /// Subject display name for an id
    #[must_use]
    pub fn subject_name(&self, id: SubjectId) -> String {
        self.subjects.display(id)
    }

    /// Display rows, one per mark
    #[must_use]
    pub fn rows(&self) -> Vec<MarkRow> {
        self.marks
            .iter()
            .map(|mark| MarkRow {
                mark: *mark,
                student_name: self.student_name(mark.student_id),
                subject_name: self.subject_name(mark.subject_id),
                band: mark.band(),
            })
            .collect()
    }
}

/// Fill `known` with names for every referenced id it lacks
///
/// Returns the merged index and the number of lookups issued.
pub async fn fill_index<K, S>(
    known: NameIndex<K>,
    referenced: impl IntoIterator<Item = K>,
    source: &S,
) -> (NameIndex<K>, usize)
where
    K: EntityId,
    S: NameSource<K> + ?Sized,
{
    let unresolved: IndexSet<K> = referenced
        .into_iter()
        .filter(|id| !known.contains(id))
        .collect();
    if unresolved.is_empty() {
        return (known, 0);
    }

    tracing::debug!(kind = %K::KIND, count = unresolved.len(), "resolving unknown references");
    let lookups = unresolved
        .iter()
        .map(|&id| async move { (id, source.fetch_name(id).await) });
    let results = join_all(lookups).await;

    let mut merged = known;
    for (id, result) in results {
        let name = result.unwrap_or_else(|e| {
            tracing::warn!(kind = %K::KIND, %id, error = %e, "name lookup failed");
            id.placeholder()
        });
        merged.insert(id, name);
    }
    (merged, unresolved.len())
}

/// Rebuild both name indexes for a working set of marks
///
/// Student and subject lookups run concurrently with each other.
pub async fn rebuild<SS, SJ>(
    marks: Vec<Mark>,
    known_students: NameIndex<StudentId>,
    known_subjects: NameIndex<SubjectId>,
    student_source: &SS,
    subject_source: &SJ,
) -> Rebuilt
where
    SS: NameSource<StudentId> + ?Sized,
    SJ: NameSource<SubjectId> + ?Sized,
{
    let student_ids: Vec<StudentId> = marks.iter().map(|m| m.student_id).collect();
    let subject_ids: Vec<SubjectId> = marks.iter().map(|m| m.subject_id).collect();

    let ((students, fetched_students), (subjects, fetched_subjects)) = futures::join!(
        fill_index(known_students, student_ids, student_source),
        fill_index(known_subjects, subject_ids, subject_source),
    );

    tracing::debug!(
        marks = marks.len(),
        fetched = fetched_students + fetched_subjects,
        "mark names rebuilt"
    );

    Rebuilt {
        students,
        subjects,
        marks,
        fetched: fetched_students + fetched_subjects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockNameSource;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use registry_client::RegistryError;
    use registry_model::MarkId;

    fn mark(id: i64, student: i64, subject: i64, value: i32) -> Mark {
        Mark::new(
            MarkId::new(id),
            StudentId::new(student),
            SubjectId::new(subject),
            value,
        )
    }

    fn no_subject_lookups() -> MockNameSource<SubjectId> {
        let mut source = MockNameSource::new();
        source.expect_fetch_name().never();
        source
    }

    #[tokio::test]
    async fn each_unknown_student_fetched_once() {
        let marks: Vec<Mark> = (0..50)
            .map(|i| mark(i, 7 + i % 3, 1, 60))
            .collect();
        let mut students = MockNameSource::<StudentId>::new();
        for id in 7..10 {
            students
                .expect_fetch_name()
                .with(eq(StudentId::new(id)))
                .times(1)
                .returning(|id| Ok(format!("S{id}")));
        }
        let known_subjects: NameIndex<SubjectId> = [(SubjectId::new(1), "Математика")].into_iter().collect();

        let rebuilt = rebuild(
            marks,
            NameIndex::new(),
            known_subjects,
            &students,
            &no_subject_lookups(),
        )
        .await;

        assert_eq!(rebuilt.fetched, 3);
        assert_eq!(rebuilt.students.len(), 3);
        assert_eq!(rebuilt.student_name(StudentId::new(8)), "S8");
    }

    #[tokio::test]
    async fn failed_lookup_uses_placeholder() {
        let marks = vec![mark(1, 1, 5, 90), mark(2, 2, 5, 40)];
        let known: NameIndex<StudentId> = [(StudentId::new(1), "Ann")].into_iter().collect();
        let mut students = MockNameSource::<StudentId>::new();
        students.expect_fetch_name().never();
        let mut subjects = MockNameSource::<SubjectId>::new();
        subjects
            .expect_fetch_name()
            .with(eq(SubjectId::new(5)))
            .times(1)
            .returning(|_| Err(RegistryError::transport("timeout")));

        let known_with_boris = {
            let mut k = known.clone();
            k.insert(StudentId::new(2), "Boris");
            k
        };
        let rebuilt = rebuild(marks, known_with_boris, NameIndex::new(), &students, &subjects).await;

        assert!(rebuilt.students.is_superset_of(&known));
        let rows = rebuilt.rows();
        assert_eq!(rows[0].subject_name, "Предмет #5");
        assert_eq!(rows[1].student_name, "Boris");
        assert_eq!(rows[0].band, MarkBand::Excellent);
        assert_eq!(rows[1].band, MarkBand::Poor);
    }

    #[tokio::test]
    async fn empty_marks_need_no_lookups() {
        let mut students = MockNameSource::<StudentId>::new();
        students.expect_fetch_name().never();
        let rebuilt = rebuild(
            Vec::new(),
            NameIndex::new(),
            NameIndex::new(),
            &students,
            &no_subject_lookups(),
        )
        .await;
        assert_eq!(rebuilt.fetched, 0);
        assert!(rebuilt.rows().is_empty());
    }

    #[tokio::test]
    async fn empty_known_name_is_not_refetched() {
        let marks = vec![mark(1, 3, 1, 70)];
        let known: NameIndex<StudentId> = [(StudentId::new(3), "")].into_iter().collect();
        let subjects: NameIndex<SubjectId> = [(SubjectId::new(1), "x")].into_iter().collect();
        let mut students = MockNameSource::<StudentId>::new();
        students.expect_fetch_name().never();

        let rebuilt = rebuild(marks, known, subjects, &students, &no_subject_lookups()).await;
        assert_eq!(rebuilt.student_name(StudentId::new(3)), "");
    }

    proptest! {
        #[test]
        fn output_covers_every_mark_and_keeps_known(
            refs in proptest::collection::vec((0i64..12, 0i64..6), 0..40),
            known_ids in proptest::collection::hash_set(0i64..12, 0..6),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let marks: Vec<Mark> = refs
                .iter()
                .enumerate()
                .map(|(i, (s, j))| mark(i as i64, *s, *j, 50))
                .collect();
            let known: NameIndex<StudentId> = known_ids
                .iter()
                .map(|id| (StudentId::new(*id), format!("known {id}")))
                .collect();

            let mut students = MockNameSource::<StudentId>::new();
            students.expect_fetch_name().returning(|id| Ok(format!("fetched {id}")));
            let mut subjects = MockNameSource::<SubjectId>::new();
            subjects.expect_fetch_name().returning(|id| Ok(format!("subject {id}")));

            let rebuilt = runtime.block_on(rebuild(
                marks.clone(),
                known.clone(),
                NameIndex::new(),
                &students,
                &subjects,
            ));

            prop_assert!(rebuilt.students.is_superset_of(&known));
            for m in &marks {
                prop_assert!(rebuilt.students.contains(&m.student_id));
                prop_assert!(rebuilt.subjects.contains(&m.subject_id));
            }
            let distinct_unknown: IndexSet<StudentId> = marks
                .iter()
                .map(|m| m.student_id)
                .filter(|id| !known.contains(id))
                .collect();
            let distinct_subjects: IndexSet<SubjectId> = marks.iter().map(|m| m.subject_id).collect();
            prop_assert_eq!(rebuilt.fetched, distinct_unknown.len() + distinct_subjects.len());
        }
    }
}
