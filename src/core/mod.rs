//! Core components of the `livedash` crate.
//!
//! This module contains the foundational building blocks:
//! - The HTTP [`DashClient`] and its builder.
//! - The primary [`DashError`] type.
//! - Internal response reading.

/// The HTTP client (`DashClient`), builder, and endpoint defaults.
pub mod client;
/// The primary error type (`DashError`) for the crate.
pub mod error;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::DashClient`
pub use client::{DashClient, DashClientBuilder};
pub use error::DashError;
