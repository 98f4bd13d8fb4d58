//! Type checking and semantic analysis module.
//!
//! This module walks the parser's tree and produces the typed AST while:
//!
//! - Assigning a static type to every expression
//! - Checking operator, call, assignment and condition typing
//! - Checking that function bodies return their declared type
//! - Re-checking scoping and control-flow context rules
//!
//! Unlike the parser, the checker stops at the first violation.

pub mod type_checker;
pub mod typed_ast;

#[cfg(test)]
mod tests;
