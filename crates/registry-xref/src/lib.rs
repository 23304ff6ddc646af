//! Cross-reference name resolution for the school registry
//!
//! Marks reference students and subjects by id only. This crate turns those
//! ids into display names with as few lookups as possible:
//!
//! - [`NameIndex`]: transient id → name map for one page load
//! - [`NameSource`]: single-entity name lookup, backed by the registry API
//! - [`NameCache`]: concurrent cache; overlapping lookups of one id share a fetch
//! - [`rebuild()`]: batch fill of both indexes for a set of marks
//! - [`CrossReference`]: caches plus sources, shared by page controllers
//!
//! # Example
//!
//! ```rust,no_run
//! use registry_client::{ClientConfig, RegistryClient};
//! use registry_xref::{CrossReference, NameIndex};
//!
//! # async fn example() -> registry_client::RegistryResult<()> {
//! let client = RegistryClient::from_config(&ClientConfig::default())?;
//! let xref = CrossReference::for_client(&client);
//!
//! let marks = client.marks().list().await?;
//! let rebuilt = xref.rebuild(marks, NameIndex::new(), NameIndex::new()).await;
//! for row in rebuilt.rows() {
//!     println!("{} / {}: {} ({})", row.student_name, row.subject_name, row.mark.value, row.band);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, unreachable_pub)]

pub mod cache;
pub mod index;
pub mod lookup;
pub mod rebuild;
pub mod source;
pub mod xref;

pub use cache::{CacheStats, NameCache};
pub use index::NameIndex;
pub use lookup::{find_student_by_name, find_subject_by_name};
pub use rebuild::{fill_index, rebuild, MarkRow, Rebuilt};
pub use source::{NameSource, StudentNames, SubjectNames};
pub use xref::{CrossReference, XrefStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::{CrossReference, MarkRow, NameIndex, NameSource, Rebuilt};
}
