//! Registry Model
//!
//! Typed entities of the school registry API:
//! - Canonical ids that accept both numeric and string wire forms
//! - Students, groups, subjects, marks and student-subject links
//! - Create/update payloads
//! - Mark severity classification
//!
//! # Example
//!
//! ```rust
//! use registry_model::{MarkBand, StudentId, EntityId};
//!
//! assert_eq!(MarkBand::classify(95), MarkBand::Excellent);
//! assert_eq!(StudentId::new(4).placeholder(), "Студент #4");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod band;
pub mod entities;
pub mod ids;
pub mod payloads;

pub use band::MarkBand;
pub use entities::{
    Group, GroupRef, Mark, Student, StudentSubjectLink, StudentWithSubjects, Subject,
    SubjectWithStudents, ARCHIVED_GROUP_STATUS, DEFAULT_GROUP_STATUS,
};
pub use ids::{EntityId, EntityKind, GroupId, IdParseError, MarkId, StudentId, SubjectId};
pub use payloads::{MarkSelector, NewGroup, NewMark, NewStudent, NewSubject, StudentUpdate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with registry entities
    pub use crate::{
        EntityId, EntityKind, Group, GroupId, Mark, MarkBand, MarkId, Student, StudentId,
        Subject, SubjectId,
    };
}
