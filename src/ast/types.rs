//! Static types.
//!
//! `Int` and `Bool` are the only value types. `Unit` is the implicit return
//! type of a function declared without one and never describes a value.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Bool,
    Unit,
}

impl Type {
    /// Maps a type-name token to its type.
    pub fn from_token_kind(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::IntType => Some(Type::Int),
            TokenKind::BoolType => Some(Type::Bool),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        !matches!(self, Type::Unit)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Bool => write!(f, "Bool"),
            Type::Unit => write!(f, "Unit"),
        }
    }
}
