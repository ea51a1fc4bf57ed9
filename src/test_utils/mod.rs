//! Test utilities shared by the unit tests.
//!
//! This module provides:
//! - In-memory doubles for every application port
//! - Fixture factories for identities, statuses and responses

mod factories;
mod mocks;

pub use factories::*;
pub use mocks::*;
