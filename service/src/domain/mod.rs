//! Domain definitions.

pub mod employee;

pub use self::employee::Employee;
