use log::{debug, info};

use crate::{
    ast::{
        ast::Program,
        expressions::{Expr, LiteralValue, UnaryOperator},
        statements::{BlockStmt, FnDeclStmt, Stmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    scope::scope::{Symbol, SymbolTable},
    Position,
};

use super::typed_ast::{
    TypedAssignmentStmt, TypedBlockStmt, TypedExpr, TypedExprKind, TypedExpressionStmt,
    TypedFnDeclStmt, TypedIfStmt, TypedPrintStmt, TypedProgram, TypedReturnStmt, TypedStmt,
    TypedVarDeclStmt, TypedWhileStmt,
};

/// State carried through the checking walk.
///
/// The symbol table is rebuilt from the tree, entering and leaving scopes at
/// the same points the parser did.
#[derive(Debug, Default)]
pub struct TypeChecker {
    pub symbols: SymbolTable,
    /// Number of enclosing `while` bodies within the current function
    loop_depth: u32,
    /// Declared return types of the enclosing functions, innermost last
    functions: Vec<Type>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker::default()
    }

    pub fn current_function(&self) -> Option<Type> {
        self.functions.last().copied()
    }

    fn lookup(&self, name: &str, position: &Position) -> Result<Symbol, Error> {
        self.symbols.lookup(name, position.clone()).cloned()
    }
}

fn mismatch(context: impl Into<String>, expected: Type, found: Type, position: &Position) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        },
        position.clone(),
    )
}

fn expect_type(
    value: &TypedExpr,
    expected: Type,
    context: impl Into<String>,
) -> Result<(), Error> {
    if value.ty != expected {
        return Err(mismatch(context, expected, value.ty, &value.position));
    }
    Ok(())
}

/// Checks an expression whose result is consumed as a value, so `Unit` is rejected.
pub fn type_check_value(
    type_checker: &mut TypeChecker,
    ast: &Expr,
    context: &str,
) -> Result<TypedExpr, Error> {
    let value = type_check_expr(type_checker, ast)?;
    if !value.ty.is_value() {
        let error = Error::new(
            ErrorImpl::UnitValue {
                context: context.to_string(),
            },
            value.position.clone(),
        );
        return Err(match &value.kind {
            TypedExprKind::Call { callee, .. } => error.with_lexeme(callee.clone()),
            _ => error,
        });
    }
    Ok(value)
}

pub fn type_check_expr(type_checker: &mut TypeChecker, ast: &Expr) -> Result<TypedExpr, Error> {
    match ast {
        Expr::Literal(literal) => {
            let ty = match literal.value {
                LiteralValue::Int(_) => Type::Int,
                LiteralValue::Bool(_) => Type::Bool,
            };
            Ok(TypedExpr {
                kind: TypedExprKind::Literal(literal.value),
                ty,
                position: literal.position.clone(),
            })
        }
        Expr::Symbol(symbol) => match type_checker.lookup(&symbol.name, &symbol.position)? {
            Symbol::Variable { var_type, .. } => Ok(TypedExpr {
                kind: TypedExprKind::Symbol(symbol.name.clone()),
                ty: var_type,
                position: symbol.position.clone(),
            }),
            Symbol::Function { .. } => Err(Error::new(
                ErrorImpl::FunctionUsedAsValue {
                    identifier: symbol.name.clone(),
                },
                symbol.position.clone(),
            )
            .with_lexeme(symbol.name.clone())),
        },
        Expr::Binary(binary) => {
            let context = format!("operand of '{}'", binary.operator);
            let left = type_check_value(type_checker, &binary.left, &context)?;
            let right = type_check_value(type_checker, &binary.right, &context)?;

            let ty = if binary.operator.is_arithmetic() {
                expect_type(&left, Type::Int, context.as_str())?;
                expect_type(&right, Type::Int, context)?;
                Type::Int
            } else {
                if left.ty != right.ty {
                    return Err(Error::new(
                        ErrorImpl::OperandMismatch {
                            operator: binary.operator.to_string(),
                            left: left.ty.to_string(),
                            right: right.ty.to_string(),
                        },
                        binary.position.clone(),
                    )
                    .with_lexeme(binary.operator.to_string()));
                }
                Type::Bool
            };

            Ok(TypedExpr {
                kind: TypedExprKind::Binary {
                    left: Box::new(left),
                    operator: binary.operator,
                    right: Box::new(right),
                },
                ty,
                position: binary.position.clone(),
            })
        }
        Expr::Unary(unary) => {
            let context = format!("operand of '{}'", unary.operator);
            let operand = type_check_value(type_checker, &unary.operand, &context)?;
            let ty = match unary.operator {
                UnaryOperator::Negate => Type::Int,
                UnaryOperator::Not => Type::Bool,
            };
            expect_type(&operand, ty, context)?;

            Ok(TypedExpr {
                kind: TypedExprKind::Unary {
                    operator: unary.operator,
                    operand: Box::new(operand),
                },
                ty,
                position: unary.position.clone(),
            })
        }
        Expr::Call(call) => {
            let (parameters, return_type) =
                match type_checker.lookup(&call.callee, &call.position)? {
                    Symbol::Function {
                        parameters,
                        return_type,
                    } => (parameters, return_type),
                    Symbol::Variable { .. } => {
                        return Err(Error::new(
                            ErrorImpl::NotAFunction {
                                identifier: call.callee.clone(),
                            },
                            call.position.clone(),
                        )
                        .with_lexeme(call.callee.clone()))
                    }
                };

            if parameters.len() != call.arguments.len() {
                return Err(Error::new(
                    ErrorImpl::ArityMismatch {
                        function: call.callee.clone(),
                        expected: parameters.len(),
                        received: call.arguments.len(),
                    },
                    call.position.clone(),
                )
                .with_lexeme(call.callee.clone()));
            }

            let mut arguments = Vec::with_capacity(call.arguments.len());
            for (index, (argument, (name, param_type))) in
                call.arguments.iter().zip(parameters.iter()).enumerate()
            {
                let context = format!(
                    "argument {} ('{}') of '{}'",
                    index + 1,
                    name,
                    call.callee
                );
                let argument = type_check_value(type_checker, argument, &context)?;
                expect_type(&argument, *param_type, context)?;
                arguments.push(argument);
            }

            Ok(TypedExpr {
                kind: TypedExprKind::Call {
                    callee: call.callee.clone(),
                    arguments,
                },
                ty: return_type,
                position: call.position.clone(),
            })
        }
    }
}

fn type_check_fn_decl(
    type_checker: &mut TypeChecker,
    function: &FnDeclStmt,
) -> Result<TypedFnDeclStmt, Error> {
    let parameters: Vec<(String, Type)> = function
        .parameters
        .iter()
        .map(|param| (param.name.clone(), param.param_type))
        .collect();

    // Visible inside its own body, so recursion resolves
    type_checker.symbols.declare(
        &function.identifier,
        Symbol::Function {
            parameters: parameters.clone(),
            return_type: function.return_type,
        },
        function.position.clone(),
    )?;

    debug!(
        "checking function `{}` ({} parameter(s), returns {})",
        function.identifier,
        parameters.len(),
        function.return_type
    );

    type_checker.symbols.enter_scope();
    type_checker.functions.push(function.return_type);
    let previous_loop_depth = std::mem::replace(&mut type_checker.loop_depth, 0);

    let body = type_check_params_and_body(type_checker, function);

    type_checker.loop_depth = previous_loop_depth;
    type_checker.functions.pop();
    type_checker.symbols.exit_scope();

    let body = body?;

    // A body without any `return` yields Unit.
    let returned = body.returns.unwrap_or(Type::Unit);
    if function.return_type != Type::Unit && returned != function.return_type {
        return Err(mismatch(
            format!("return type of '{}'", function.identifier),
            function.return_type,
            returned,
            &function.position,
        )
        .with_lexeme(function.identifier.clone()));
    }

    Ok(TypedFnDeclStmt {
        identifier: function.identifier.clone(),
        parameters,
        return_type: function.return_type,
        body,
        position: function.position.clone(),
    })
}

fn type_check_params_and_body(
    type_checker: &mut TypeChecker,
    function: &FnDeclStmt,
) -> Result<TypedBlockStmt, Error> {
    for param in function.parameters.iter() {
        type_checker.symbols.declare(
            &param.name,
            Symbol::Variable {
                var_type: param.param_type,
                is_constant: false,
            },
            param.position.clone(),
        )?;
    }

    type_check_block(type_checker, &function.body)
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, ast: &Stmt) -> Result<TypedStmt, Error> {
    match ast {
        Stmt::VarDecl(var_decl) => {
            let assigned_value = type_check_value(
                type_checker,
                &var_decl.assigned_value,
                "variable initializer",
            )?;
            expect_type(
                &assigned_value,
                var_decl.var_type,
                format!("initializer of '{}'", var_decl.identifier),
            )?;

            type_checker.symbols.declare(
                &var_decl.identifier,
                Symbol::Variable {
                    var_type: var_decl.var_type,
                    is_constant: var_decl.is_constant,
                },
                var_decl.position.clone(),
            )?;

            Ok(TypedStmt::VarDecl(TypedVarDeclStmt {
                identifier: var_decl.identifier.clone(),
                is_constant: var_decl.is_constant,
                var_type: var_decl.var_type,
                assigned_value,
                position: var_decl.position.clone(),
            }))
        }
        Stmt::FnDecl(function) => Ok(TypedStmt::FnDecl(type_check_fn_decl(
            type_checker,
            function,
        )?)),
        Stmt::Assignment(assignment) => {
            let var_type = match type_checker.lookup(&assignment.identifier, &assignment.position)? {
                Symbol::Function { .. } => {
                    return Err(Error::new(
                        ErrorImpl::FunctionUsedAsValue {
                            identifier: assignment.identifier.clone(),
                        },
                        assignment.position.clone(),
                    )
                    .with_lexeme(assignment.identifier.clone()))
                }
                Symbol::Variable {
                    is_constant: true, ..
                } => {
                    return Err(Error::new(
                        ErrorImpl::AssignToConstant {
                            identifier: assignment.identifier.clone(),
                        },
                        assignment.position.clone(),
                    )
                    .with_lexeme(assignment.identifier.clone()))
                }
                Symbol::Variable { var_type, .. } => var_type,
            };

            let value = type_check_value(type_checker, &assignment.value, "assigned value")?;
            expect_type(
                &value,
                var_type,
                format!("assignment to '{}'", assignment.identifier),
            )?;

            Ok(TypedStmt::Assignment(TypedAssignmentStmt {
                identifier: assignment.identifier.clone(),
                value,
                position: assignment.position.clone(),
            }))
        }
        Stmt::If(if_stmt) => {
            let condition = type_check_value(type_checker, &if_stmt.condition, "if condition")?;
            expect_type(&condition, Type::Bool, "if condition")?;

            let then_body = type_check_block(type_checker, &if_stmt.then_body)?;
            let else_body = match &if_stmt.else_body {
                Some(else_body) => Some(type_check_block(type_checker, else_body)?),
                None => None,
            };

            Ok(TypedStmt::If(TypedIfStmt {
                condition,
                then_body,
                else_body,
                position: if_stmt.position.clone(),
            }))
        }
        Stmt::While(while_stmt) => {
            let condition =
                type_check_value(type_checker, &while_stmt.condition, "while condition")?;
            expect_type(&condition, Type::Bool, "while condition")?;

            type_checker.loop_depth += 1;
            let body = type_check_block(type_checker, &while_stmt.body);
            type_checker.loop_depth -= 1;

            Ok(TypedStmt::While(TypedWhileStmt {
                condition,
                body: body?,
                position: while_stmt.position.clone(),
            }))
        }
        Stmt::Return(return_stmt) => {
            let Some(return_type) = type_checker.current_function() else {
                return Err(
                    Error::new(ErrorImpl::ReturnOutsideFunction, return_stmt.position.clone())
                        .with_lexeme("return"),
                );
            };

            let value = type_check_value(type_checker, &return_stmt.value, "return value")?;
            if return_type != Type::Unit {
                expect_type(&value, return_type, "return value")?;
            }

            Ok(TypedStmt::Return(TypedReturnStmt {
                value,
                position: return_stmt.position.clone(),
            }))
        }
        Stmt::Print(print) => {
            let value = type_check_value(type_checker, &print.value, "print argument")?;

            Ok(TypedStmt::Print(TypedPrintStmt {
                value,
                position: print.position.clone(),
            }))
        }
        Stmt::Break(position) => {
            if type_checker.loop_depth == 0 {
                return Err(
                    Error::new(ErrorImpl::BreakOutsideLoop, position.clone()).with_lexeme("break")
                );
            }
            Ok(TypedStmt::Break(position.clone()))
        }
        Stmt::Continue(position) => {
            if type_checker.loop_depth == 0 {
                return Err(Error::new(ErrorImpl::ContinueOutsideLoop, position.clone())
                    .with_lexeme("continue"));
            }
            Ok(TypedStmt::Continue(position.clone()))
        }
        Stmt::Expression(expression_stmt) => {
            // The one place a Unit call is allowed
            let expression = type_check_expr(type_checker, &expression_stmt.expression)?;

            Ok(TypedStmt::Expression(TypedExpressionStmt {
                expression,
                position: expression_stmt.position.clone(),
            }))
        }
    }
}

/// Type of the last `return` inside `stmt`, looking through nested blocks but
/// not into nested function declarations.
fn last_return(stmt: &TypedStmt) -> Option<Type> {
    match stmt {
        TypedStmt::Return(return_stmt) => Some(return_stmt.value.ty),
        TypedStmt::If(if_stmt) => if_stmt
            .else_body
            .as_ref()
            .and_then(|else_body| else_body.returns)
            .or(if_stmt.then_body.returns),
        TypedStmt::While(while_stmt) => while_stmt.body.returns,
        _ => None,
    }
}

pub fn type_check_block(
    type_checker: &mut TypeChecker,
    ast: &BlockStmt,
) -> Result<TypedBlockStmt, Error> {
    type_checker.symbols.enter_scope();
    let body = type_check_body(type_checker, ast.iter());
    type_checker.symbols.exit_scope();
    let body = body?;

    let returns = body.iter().rev().find_map(last_return);

    Ok(TypedBlockStmt {
        body,
        returns,
        position: ast.position.clone(),
    })
}

fn type_check_body<'a>(
    type_checker: &mut TypeChecker,
    stmts: impl Iterator<Item = &'a Stmt>,
) -> Result<Vec<TypedStmt>, Error> {
    stmts.map(|stmt| type_check_stmt(type_checker, stmt)).collect()
}

/// Checks a whole program, stopping at the first violation.
pub fn type_check(ast: &Program) -> Result<TypedProgram, Error> {
    let mut type_checker = TypeChecker::new();

    let body = type_check_body(&mut type_checker, ast.iter())?;

    info!("type checked {} top-level declaration(s)", body.len());

    Ok(TypedProgram {
        body,
        position: ast.position.clone(),
    })
}
