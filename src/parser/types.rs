//! Type annotation parsing.
//!
//! Only the two value types can be written in source; `Unit` is implied by
//! omitting a function's return annotation.

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
};

use super::parser::Parser;

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    match Type::from_token_kind(parser.current_token_kind()) {
        Some(ty) => {
            parser.advance();
            Ok(ty)
        }
        None => Err(parser.error_at_current(ErrorImpl::UnexpectedToken {
            expected: String::from("type 'Int' or 'Bool'"),
        })),
    }
}
