//! Registry Client
//!
//! REST access to the school registry API.
//!
//! # Architecture
//!
//! ```text
//! GroupService ─┐
//! StudentService ┤
//! SubjectService ┼→ ApiClient → dyn Transport → HttpTransport (reqwest)
//! MarkService ───┤                          └→ in-memory server (tests)
//! LinkService ───┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use registry_client::{ClientConfig, RegistryClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new().with_env_overrides()?;
//! let client = RegistryClient::from_config(&config)?;
//!
//! for group in client.groups().list().await? {
//!     println!("{} {}", group.id, group.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod transport;

pub use api::ApiClient;
pub use client::RegistryClient;
pub use config::ClientConfig;
pub use error::{RegistryError, RegistryResult, GENERIC_ERROR_MESSAGE};
pub use services::{GroupService, LinkService, MarkService, StudentService, SubjectService};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the registry client
    pub use crate::{ClientConfig, RegistryClient, RegistryError, RegistryResult};
    pub use registry_model::prelude::*;
}
