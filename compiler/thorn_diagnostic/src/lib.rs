//! Diagnostic and error reporting types for the Thorn compiler.
//!
//! This crate defines the structured diagnostic record that analysis
//! passes emit and an external printer renders with source positions.
//! It carries no rendering or I/O of its own.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
