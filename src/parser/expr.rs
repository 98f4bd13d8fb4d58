use crate::{
    ast::expressions::{
        BinaryExpr, BinaryOperator, CallExpr, Expr, LiteralExpr, LiteralValue, SymbolExpr,
        UnaryExpr, UnaryOperator,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.error_at_current(ErrorImpl::UnexpectedToken {
            expected: String::from("expression"),
        }));
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the current tier, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser
            .get_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();
    let value = match token.kind {
        TokenKind::Number => match token.value.parse::<i64>() {
            Ok(value) => LiteralValue::Int(value),
            Err(_) => {
                return Err(parser.error_at_current(ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                }))
            }
        },
        TokenKind::True => LiteralValue::Bool(true),
        TokenKind::False => LiteralValue::Bool(false),
        _ => {
            return Err(parser.error_at_current(ErrorImpl::UnexpectedToken {
                expected: String::from("literal"),
            }))
        }
    };

    parser.advance();
    Ok(Expr::Literal(LiteralExpr {
        value,
        position: token.position,
    }))
}

/// Parses an identifier used as a value or as a call target.
///
/// The name is resolved immediately: a call target must be a function and a
/// bare value must be a variable.
pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let symbol = parser.resolve(&token.value, token.position.clone())?;

    if parser.current_token_kind() != TokenKind::OpenParen {
        if symbol.is_function() {
            return Err(Error::new(
                ErrorImpl::FunctionUsedAsValue {
                    identifier: token.value.clone(),
                },
                token.position,
            )
            .with_lexeme(token.value));
        }

        return Ok(Expr::Symbol(SymbolExpr {
            name: token.value,
            position: token.position,
        }));
    }

    if !symbol.is_function() {
        return Err(Error::new(
            ErrorImpl::NotAFunction {
                identifier: token.value.clone(),
            },
            token.position,
        )
        .with_lexeme(token.value));
    }

    parser.advance();

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen, "')' after function arguments")?;

    Ok(Expr::Call(CallExpr {
        callee: token.value,
        arguments,
        position: token.position,
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let Some(operator) = BinaryOperator::from_token_kind(parser.current_token_kind()) else {
        return Err(parser.error_at_current(ErrorImpl::UnexpectedToken {
            expected: String::from("binary operator"),
        }));
    };
    let position = parser.advance().position.clone();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        position,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let Some(operator) = UnaryOperator::from_token_kind(parser.current_token_kind()) else {
        return Err(parser.error_at_current(ErrorImpl::UnexpectedToken {
            expected: String::from("unary operator"),
        }));
    };
    let position = parser.advance().position.clone();

    // `-9223372036854775808` only fits once the sign is attached.
    if operator == UnaryOperator::Negate && parser.current_token_kind() == TokenKind::Number {
        let digits = &parser.current_token().value;
        if digits.parse::<i64>().is_err() {
            if let Ok(value) = format!("-{}", digits).parse::<i64>() {
                parser.advance();
                return Ok(Expr::Literal(LiteralExpr {
                    value: LiteralValue::Int(value),
                    position,
                }));
            }
        }
    }

    // Only another prefix or a primary can follow, so `-a * b` is `(-a) * b`.
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        operator,
        operand: Box::new(operand),
        position,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen, "')' after expression")?;

    Ok(expr)
}
