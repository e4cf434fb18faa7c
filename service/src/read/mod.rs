//! Read entities definitions.

pub mod cache;
pub mod employee;

pub use self::cache::Cache;
