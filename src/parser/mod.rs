//! Parser module for building the syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens into
//! a syntax tree. It uses a Pratt parser for expressions with the tiers
//! equality < comparison < term < factor < unary, and handles:
//!
//! - Statement parsing (declarations, control flow, assignment, printing)
//! - Name declaration and resolution through the shared symbol table
//! - `break`/`continue`/`return` context rules
//! - Error recording and statement-level resynchronization

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
