//! Scope resolution.
//!
//! A stack of lexical scopes mapping identifiers to variable or function
//! symbols. The parser declares and resolves names through it while building
//! the tree, and the type checker rebuilds the same stack over the finished
//! tree, so both passes share one set of visibility rules.

pub mod scope;
