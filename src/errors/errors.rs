use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A located diagnostic.
///
/// Wraps the concrete failure (`ErrorImpl`) together with the line it was
/// detected on and, when known, the lexeme of the offending token.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    lexeme: Option<String>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            lexeme: None,
        }
    }

    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = Some(lexeme.into());
        self
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_line(&self) -> u32 {
        self.position.0
    }

    pub fn get_lexeme(&self) -> Option<&str> {
        self.lexeme.as_deref()
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_class(&self) -> ErrorClass {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorClass::Syntax,
            ErrorImpl::AlreadyDeclared { .. } => ErrorClass::Redeclaration,
            ErrorImpl::NotDeclared { .. } => ErrorClass::UndeclaredIdentifier,
            ErrorImpl::NotAFunction { .. }
            | ErrorImpl::FunctionUsedAsValue { .. }
            | ErrorImpl::AssignToConstant { .. } => ErrorClass::InvalidUse,
            ErrorImpl::BreakOutsideLoop
            | ErrorImpl::ContinueOutsideLoop
            | ErrorImpl::ReturnOutsideFunction => ErrorClass::InvalidContext,
            ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::OperandMismatch { .. }
            | ErrorImpl::UnitValue { .. } => ErrorClass::TypeMismatch,
            ErrorImpl::ArityMismatch { .. } => ErrorClass::ArityMismatch,
        }
    }

    pub fn get_error_name(&self) -> &str {
        self.get_class().name()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { expected, .. } if expected.starts_with("';'") => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::NumberParseError { .. } => {
                ErrorTip::Suggestion(String::from("integer literals must fit in 64 bits"))
            }
            ErrorImpl::AlreadyDeclared { .. } => ErrorTip::Suggestion(String::from(
                "shadowing is only allowed in a nested block",
            )),
            ErrorImpl::NotDeclared { .. } => ErrorTip::Suggestion(String::from(
                "names must be declared before they are used",
            )),
            ErrorImpl::AssignToConstant { identifier } => ErrorTip::Suggestion(format!(
                "declare `{}` with `val` to make it assignable",
                identifier
            )),
            ErrorImpl::BreakOutsideLoop | ErrorImpl::ContinueOutsideLoop => {
                ErrorTip::Suggestion(String::from("only valid inside a `while` body"))
            }
            ErrorImpl::ReturnOutsideFunction => {
                ErrorTip::Suggestion(String::from("only valid inside a `fun` body"))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Line {}] Error: {}", self.position.0, self.internal_error)?;
        if let Some(lexeme) = &self.lexeme {
            write!(f, " (token: '{}')", lexeme)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// The diagnostic taxonomy reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Syntax,
    Redeclaration,
    UndeclaredIdentifier,
    InvalidContext,
    InvalidUse,
    TypeMismatch,
    ArityMismatch,
}

impl ErrorClass {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorClass::Syntax => "SyntaxError",
            ErrorClass::Redeclaration => "RedeclarationError",
            ErrorClass::UndeclaredIdentifier => "UndeclaredIdentifierError",
            ErrorClass::InvalidContext => "InvalidContextError",
            ErrorClass::InvalidUse => "InvalidUseError",
            ErrorClass::TypeMismatch => "TypeMismatchError",
            ErrorClass::ArityMismatch => "ArityMismatchError",
        }
    }
}

impl Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("unrecognised character {token:?}")]
    UnrecognisedToken { token: String },
    #[error("expected {expected}")]
    UnexpectedToken { expected: String },
    #[error("invalid integer literal {token:?}")]
    NumberParseError { token: String },
    #[error("identifier '{identifier}' already declared in this scope")]
    AlreadyDeclared { identifier: String },
    #[error("identifier '{identifier}' not declared")]
    NotDeclared { identifier: String },
    #[error("'{identifier}' is not a function")]
    NotAFunction { identifier: String },
    #[error("'{identifier}' is a function, cannot be used as a value")]
    FunctionUsedAsValue { identifier: String },
    #[error("cannot assign to constant '{identifier}'")]
    AssignToConstant { identifier: String },
    #[error("'break' used outside of a loop")]
    BreakOutsideLoop,
    #[error("'continue' used outside of a loop")]
    ContinueOutsideLoop,
    #[error("'return' used outside of a function")]
    ReturnOutsideFunction,
    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },
    #[error("operator '{operator}' requires operands of the same type, found {left} and {right}")]
    OperandMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("{context} produces no value")]
    UnitValue { context: String },
    #[error("function '{function}' expects {expected} argument(s), received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
}
