//! Code generation module for the compiler.
//!
//! This module lowers the typed AST into textual three-address code. It handles:
//!
//! - Expressions, one temporary per intermediate value
//! - Declarations and assignments as copies
//! - Structured control flow as labels and conditional jumps
//! - Function bodies delimited by `function` / `end function`

pub mod compiler;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
