//! Reusable hooks for common UI patterns

mod use_patients;
mod use_search;

pub use use_patients::*;
pub use use_search::*;
