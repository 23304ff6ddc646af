//! Resource services
//!
//! One service per REST resource. Each method maps to exactly one endpoint,
//! makes a single attempt and returns the decoded body.

pub mod groups;
pub mod links;
pub mod marks;
pub mod students;
pub mod subjects;

pub use groups::GroupService;
pub use links::LinkService;
pub use marks::MarkService;
pub use students::StudentService;
pub use subjects::SubjectService;
