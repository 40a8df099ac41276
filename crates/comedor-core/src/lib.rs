//! Core types and trait definitions for the Comedor check-in system.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod attendance;
pub mod error;
pub mod guest;
pub mod service_date;
pub mod store;

pub use error::{Error, Result};
