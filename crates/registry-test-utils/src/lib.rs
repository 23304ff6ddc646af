//! Testing utilities for the registry workspace
//!
//! An in-memory registry server behind the client's transport seam, plus
//! seed fixtures.

#![allow(missing_docs)]

pub mod fixtures;
pub mod server;

pub use fixtures::{
    client_for, seeded_registry, ANN, BORIS, GROUP_A, GROUP_B, HISTORY, MATH, PHYSICS, VERA,
};
pub use server::{Failure, FakeRegistry, RecordedCall};
