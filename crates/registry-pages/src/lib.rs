//! Page controllers for the school registry
//!
//! Each page is an owned state container driven through `&mut self`:
//!
//! - [`GroupsPage`]: list, search, details, create from an id list, delete
//! - [`StudentsPage`]: list, optimistic create, inline edit and save, delete
//! - [`SubjectsPage`]: list, create, delete
//! - [`MarksPage`]: list with resolved names and colour bands, create, delete, averages
//! - [`LinksPage`]: subjects of one student, link and unlink with re-fetch
//!
//! Failures never propagate out of a page. They become auto-dismissing
//! [`Notification`]s and the previous list stays in place. Every list load
//! carries a [`LoadTicket`]; leaving the page makes loads in flight stale so
//! their results are dropped.

#![warn(missing_docs, unreachable_pub)]

pub mod app;
pub mod groups;
pub mod links;
pub mod load;
pub mod marks;
#[allow(missing_docs)]
pub mod messages;
pub mod notify;
pub mod students;
pub mod subjects;

pub use app::App;
pub use groups::{parse_student_ids, GroupsPage};
pub use links::LinksPage;
pub use load::{LeaveHandle, LoadGuard, LoadState, LoadTicket};
pub use marks::MarksPage;
pub use notify::{Notification, NotificationCenter, Severity, DEFAULT_NOTIFICATION_TTL};
pub use students::{CreateOutcome, PendingCreate, StudentsPage};
pub use subjects::SubjectsPage;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        App, GroupsPage, LinksPage, LoadState, MarksPage, Notification, Severity, StudentsPage,
        SubjectsPage,
    };
}
