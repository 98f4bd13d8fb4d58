//! Typed Abstract Syntax Tree definitions.
//!
//! This module contains the typed variants of AST nodes produced by
//! the type checker. The typed AST mirrors the structure of the untyped AST
//! but every node has passed scope, type and context checks:
//! - Every expression carries its resolved type
//! - Function declarations carry their validated signature
//! - Every block records the type of the last `return` found inside it
//!
//! This typed AST is consumed by the code emitter, which does not need to
//! re-validate anything.

use std::slice::Iter;

use crate::{
    ast::{
        expressions::{BinaryOperator, LiteralValue, UnaryOperator},
        types::Type,
    },
    Position,
};

/// A checked expression together with its static type.
///
/// `ty` is `Int` or `Bool` for every expression used as a value. Only a call
/// to a `Unit` function standing alone as a statement has type `Unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    Binary {
        left: Box<TypedExpr>,
        operator: BinaryOperator,
        right: Box<TypedExpr>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<TypedExpr>,
    },
    Literal(LiteralValue),
    Symbol(String),
    Call {
        callee: String,
        arguments: Vec<TypedExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedBlockStmt {
    pub body: Vec<TypedStmt>,
    /// Type of the last `return` encountered in this block, nested statements included
    pub returns: Option<Type>,
    pub position: Position,
}

impl TypedBlockStmt {
    pub fn iter(&self) -> Iter<'_, TypedStmt> {
        self.body.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedVarDeclStmt {
    pub identifier: String,
    pub is_constant: bool,
    pub var_type: Type,
    pub assigned_value: TypedExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedFnDeclStmt {
    pub identifier: String,
    pub parameters: Vec<(String, Type)>,
    pub return_type: Type,
    pub body: TypedBlockStmt,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedAssignmentStmt {
    pub identifier: String,
    pub value: TypedExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedIfStmt {
    pub condition: TypedExpr,
    pub then_body: TypedBlockStmt,
    pub else_body: Option<TypedBlockStmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedWhileStmt {
    pub condition: TypedExpr,
    pub body: TypedBlockStmt,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedReturnStmt {
    pub value: TypedExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedPrintStmt {
    pub value: TypedExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpressionStmt {
    pub expression: TypedExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    VarDecl(TypedVarDeclStmt),
    FnDecl(TypedFnDeclStmt),
    Assignment(TypedAssignmentStmt),
    If(TypedIfStmt),
    While(TypedWhileStmt),
    Return(TypedReturnStmt),
    Print(TypedPrintStmt),
    Break(Position),
    Continue(Position),
    Expression(TypedExpressionStmt),
}

/// The verified program handed to the code emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    pub body: Vec<TypedStmt>,
    pub position: Position,
}

impl TypedProgram {
    pub fn iter(&self) -> Iter<'_, TypedStmt> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
