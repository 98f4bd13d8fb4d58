use crate::{
    ast::expressions::LiteralValue,
    type_checker::typed_ast::{TypedExpr, TypedExprKind},
};

use super::compiler::{Compiler, Instruction, Operand};

/// Generates code for the given expression and returns the operand holding its value.
///
/// Literals and variables are used in place; every operator and call result
/// lands in a fresh temporary.
pub fn gen_expression(compiler: &mut Compiler, expression: &TypedExpr) -> Operand {
    match &expression.kind {
        TypedExprKind::Literal(LiteralValue::Int(value)) => Operand::Int(*value),
        TypedExprKind::Literal(LiteralValue::Bool(value)) => Operand::Bool(*value),
        TypedExprKind::Symbol(name) => Operand::Variable(name.clone()),
        TypedExprKind::Binary {
            left,
            operator,
            right,
        } => {
            let left = gen_expression(compiler, left);
            let right = gen_expression(compiler, right);
            let target = compiler.new_temp();
            compiler.emit(Instruction::Binary {
                target: target.clone(),
                left,
                operator: *operator,
                right,
            });
            target
        }
        TypedExprKind::Unary { operator, operand } => {
            let operand = gen_expression(compiler, operand);
            let target = compiler.new_temp();
            compiler.emit(Instruction::Unary {
                target: target.clone(),
                operator: *operator,
                operand,
            });
            target
        }
        TypedExprKind::Call { callee, arguments } => {
            let arguments = gen_arguments(compiler, arguments);
            let target = compiler.new_temp();
            compiler.emit(Instruction::Call {
                target: Some(target.clone()),
                callee: callee.clone(),
                arguments,
            });
            target
        }
    }
}

/// Evaluates call arguments left to right.
pub fn gen_arguments(compiler: &mut Compiler, arguments: &[TypedExpr]) -> Vec<Operand> {
    arguments
        .iter()
        .map(|argument| gen_expression(compiler, argument))
        .collect()
}
