//! Patient records dashboard.
//!
//! The core (table, query state, session and validation) is target-agnostic
//! and shared by the `pcare` command-line client and the browser dashboard.

pub mod endpoints;
pub mod models;
pub mod notice;
pub mod query;
pub mod serde_utils;
pub mod session;
pub mod table;
pub mod validation;

#[cfg(feature = "backend")]
pub mod cli;
