//! Id → display-name index
//!
//! Keys are typed ids, so a numeric id and its string wire form always land on
//! the same entry.

use registry_model::{EntityId, Student, StudentId, Subject, SubjectId};
use std::collections::HashMap;

/// Mapping from entity id to display name
///
/// Transient: built per page load, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndex<K: EntityId> {
    entries: HashMap<K, String>,
}

impl<K: EntityId> NameIndex<K> {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Whether the id has an entry
    ///
    /// An entry with an empty name still counts.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }

    /// Name recorded for the id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &K) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Name for display: the recorded name, else the placeholder label
    #[must_use]
    pub fn display(&self, id: K) -> String {
        self.get(&id)
            .map_or_else(|| id.placeholder(), str::to_string)
    }

    /// Record a name, returning the previous one
    pub fn insert(&mut self, id: K, name: impl Into<String>) -> Option<String> {
        self.entries.insert(id, name.into())
    }

    /// Drop an entry
    pub fn remove(&mut self, id: &K) -> Option<String> {
        self.entries.remove(id)
    }

    /// Add entries of `other` whose ids are not yet present
    pub fn absorb(&mut self, other: &Self) {
        for (id, name) in &other.entries {
            self.entries
                .entry(*id)
                .or_insert_with(|| name.clone());
        }
    }

    /// Whether every entry of `other` is present here with the same name
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        other
            .entries
            .iter()
            .all(|(id, name)| self.get(id) == Some(name.as_str()))
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl<K: EntityId> Default for NameIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityId, S: Into<String>> FromIterator<(K, S)> for NameIndex<K> {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

fn name_or_placeholder<K: EntityId>(id: K, name: &str) -> String {
    if name.is_empty() {
        id.placeholder()
    } else {
        name.to_string()
    }
}

impl NameIndex<StudentId> {
    /// Index a loaded student list; blank names get the placeholder label
    #[must_use]
    pub fn from_students(students: &[Student]) -> Self {
        students
            .iter()
            .map(|s| (s.id, name_or_placeholder(s.id, &s.name)))
            .collect()
    }
}

impl NameIndex<SubjectId> {
    /// Index a loaded subject list; blank names get the placeholder label
    #[must_use]
    pub fn from_subjects(subjects: &[Subject]) -> Self {
        subjects
            .iter()
            .map(|s| (s.id, name_or_placeholder(s.id, &s.name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_falls_back_to_placeholder() {
        let index: NameIndex<StudentId> = [(StudentId::new(1), "Ann")].into_iter().collect();
        assert_eq!(index.display(StudentId::new(1)), "Ann");
        assert_eq!(index.display(StudentId::new(2)), "Студент #2");
    }

    #[test]
    fn empty_name_counts_as_resolved() {
        let mut index = NameIndex::new();
        index.insert(SubjectId::new(3), "");
        assert!(index.contains(&SubjectId::new(3)));
        assert_eq!(index.display(SubjectId::new(3)), "");
    }

    #[test]
    fn from_students_fills_blank_names() {
        let students = vec![
            Student::new(StudentId::new(1), "Ann", 20),
            Student::new(StudentId::new(2), "", 21),
        ];
        let index = NameIndex::from_students(&students);
        assert_eq!(index.get(&StudentId::new(2)), Some("Студент #2"));
    }

    #[test]
    fn absorb_keeps_existing_entries() {
        let mut a: NameIndex<SubjectId> = [(SubjectId::new(1), "Математика")].into_iter().collect();
        let b: NameIndex<SubjectId> = [(SubjectId::new(1), "Other"), (SubjectId::new(2), "Физика")]
            .into_iter()
            .collect();
        a.absorb(&b);
        assert_eq!(a.get(&SubjectId::new(1)), Some("Математика"));
        assert_eq!(a.get(&SubjectId::new(2)), Some("Физика"));
        assert!(!a.is_superset_of(&b));
    }
}
