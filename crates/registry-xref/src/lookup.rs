//! Name-based lookups over loaded lists
//!
//! Matching is exact and case-sensitive; the first match wins.

use registry_client::{RegistryError, RegistryResult};
use registry_model::{EntityKind, Student, Subject};

/// Find a student by exact name
///
/// # Errors
/// `RegistryError::NotFoundByName` if no student carries that name
pub fn find_student_by_name<'a>(students: &'a [Student], name: &str) -> RegistryResult<&'a Student> {
    students
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| RegistryError::not_found_by_name(EntityKind::Student, name))
}

/// Find a subject by exact name
///
/// # Errors
/// `RegistryError::NotFoundByName` if no subject carries that name
pub fn find_subject_by_name<'a>(subjects: &'a [Subject], name: &str) -> RegistryResult<&'a Subject> {
    subjects
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| RegistryError::not_found_by_name(EntityKind::Subject, name))
}
