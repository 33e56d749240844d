//! Diagnostics for cxx-syntax.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels (why it's wrong)
//!
//! The parser never aborts on malformed input; diagnostics accumulate
//! alongside the best-effort tree, each pointing into the source.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
