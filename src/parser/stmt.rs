use crate::{
    ast::{
        statements::{
            AssignmentStmt, BlockStmt, ExpressionStmt, FnDeclStmt, IfStmt, Parameter, PrintStmt,
            ReturnStmt, Stmt, VarDeclStmt, WhileStmt,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    scope::scope::Symbol,
};

use super::{parser::Parser, types::parse_type};

/// Parses one declaration, recording the error and resynchronizing on failure.
pub fn parse_declaration(parser: &mut Parser) -> Option<Stmt> {
    let start = parser.get_cursor();

    match parse_stmt(parser) {
        Ok(stmt) => Some(stmt),
        Err(error) => {
            parser.record_error(error);
            parser.synchronize(start);
            None
        }
    }
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    if kind == TokenKind::Identifier {
        if parser.peek_kind(1) == TokenKind::Assignment {
            return parse_assignment_stmt(parser);
        }
        return parse_expression_stmt(parser);
    }

    Err(parser.error_at_current(ErrorImpl::UnexpectedToken {
        expected: String::from("declaration or statement"),
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let is_constant = parser.advance().kind == TokenKind::Const;

    let name = parser.expect(TokenKind::Identifier, "variable name")?;
    parser.expect(TokenKind::Colon, "':' after variable name")?;
    let var_type = parse_type(parser)?;
    parser.expect(TokenKind::Assignment, "'=' in variable declaration")?;
    let assigned_value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon, "';' after variable declaration")?;

    parser.declare(
        &name.value,
        Symbol::Variable {
            var_type,
            is_constant,
        },
        name.position.clone(),
    )?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        identifier: name.value,
        is_constant,
        var_type,
        assigned_value,
        position: name.position,
    }))
}

fn parse_parameter(parser: &mut Parser) -> Result<Parameter, Error> {
    let name = parser.expect(TokenKind::Identifier, "parameter name")?;
    parser.expect(TokenKind::Colon, "':' after parameter name")?;
    let param_type = parse_type(parser)?;

    Ok(Parameter {
        name: name.value,
        param_type,
        position: name.position,
    })
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier, "function name")?;
    parser.expect(TokenKind::OpenParen, "'(' after function name")?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        parameters.push(parse_parameter(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            parameters.push(parse_parameter(parser)?);
        }
    }

    parser.expect(TokenKind::CloseParen, "')' after function parameters")?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        parse_type(parser)?
    } else {
        Type::Unit
    };

    // Declared before the body so the function can call itself. The header
    // is complete at this point, so a clash is recorded and the body is still
    // parsed rather than resynchronized into.
    if let Err(error) = parser.declare(
        &name.value,
        Symbol::Function {
            parameters: parameters
                .iter()
                .map(|param| (param.name.clone(), param.param_type))
                .collect(),
            return_type,
        },
        name.position.clone(),
    ) {
        parser.record_error(error);
    }

    let body = parser.in_scope(|parser| {
        for param in parameters.iter() {
            let declared = parser.declare(
                &param.name,
                Symbol::Variable {
                    var_type: param.param_type,
                    is_constant: false,
                },
                param.position.clone(),
            );
            if let Err(error) = declared {
                parser.record_error(error);
            }
        }

        parser.in_function_body(parse_block_stmt)
    })?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        identifier: name.value,
        parameters,
        return_type,
        body,
        position: name.position,
    }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let position = parser
        .expect(TokenKind::OpenCurly, "'{' to open a block")?
        .position;

    parser.in_scope(|parser| {
        let mut body = Vec::new();
        while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
            if let Some(stmt) = parse_declaration(parser) {
                body.push(stmt);
            }
        }

        parser.expect(TokenKind::CloseCurly, "'}' to close the block")?;

        Ok(BlockStmt { body, position })
    })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position.clone();

    parser.expect(TokenKind::OpenParen, "'(' after 'if'")?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen, "')' after if condition")?;

    let then_body = parse_block_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block_stmt(parser)?)
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
        position,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position.clone();

    parser.expect(TokenKind::OpenParen, "'(' after 'while'")?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen, "')' after while condition")?;

    let body = parser.in_loop_body(parse_block_stmt)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        position,
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    if parser.loop_depth() == 0 {
        return Err(Error::new(ErrorImpl::BreakOutsideLoop, token.position).with_lexeme(token.value));
    }

    parser.expect(TokenKind::Semicolon, "';' after 'break'")?;
    Ok(Stmt::Break(token.position))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    if parser.loop_depth() == 0 {
        return Err(
            Error::new(ErrorImpl::ContinueOutsideLoop, token.position).with_lexeme(token.value)
        );
    }

    parser.expect(TokenKind::Semicolon, "';' after 'continue'")?;
    Ok(Stmt::Continue(token.position))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    if !parser.in_function() {
        return Err(
            Error::new(ErrorImpl::ReturnOutsideFunction, token.position).with_lexeme(token.value)
        );
    }

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon, "';' after return value")?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        position: token.position,
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position.clone();

    parser.expect(TokenKind::OpenParen, "'(' after 'print'")?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen, "')' after print argument")?;
    parser.expect(TokenKind::Semicolon, "';' after print statement")?;

    Ok(Stmt::Print(PrintStmt { value, position }))
}

pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name = parser.advance().clone();

    match parser.resolve(&name.value, name.position.clone())? {
        Symbol::Function { .. } => {
            return Err(Error::new(
                ErrorImpl::FunctionUsedAsValue {
                    identifier: name.value.clone(),
                },
                name.position,
            )
            .with_lexeme(name.value))
        }
        Symbol::Variable {
            is_constant: true, ..
        } => {
            return Err(Error::new(
                ErrorImpl::AssignToConstant {
                    identifier: name.value.clone(),
                },
                name.position,
            )
            .with_lexeme(name.value))
        }
        Symbol::Variable { .. } => {}
    }

    parser.expect(TokenKind::Assignment, "'=' in assignment")?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon, "';' after assignment")?;

    Ok(Stmt::Assignment(AssignmentStmt {
        identifier: name.value,
        value,
        position: name.position,
    }))
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon, "';' after expression")?;

    Ok(Stmt::Expression(ExpressionStmt {
        position: expression.get_position().clone(),
        expression,
    }))
}
