//! Error types and error handling for the compiler.
//!
//! This module defines the diagnostics produced by every phase:
//!
//! - Error structures carrying the offending line and lexeme
//! - Concrete failure variants, grouped into the user-facing error classes
//! - Error formatting and optional suggestions

pub mod errors;
