use log::debug;

use crate::{
    ast::types::Type,
    type_checker::typed_ast::{
        TypedBlockStmt, TypedExprKind, TypedFnDeclStmt, TypedIfStmt, TypedStmt, TypedWhileStmt,
    },
};

use super::{
    compiler::{Compiler, Instruction},
    expr::{gen_arguments, gen_expression},
};

pub fn gen_statement(compiler: &mut Compiler, statement: &TypedStmt) {
    match statement {
        TypedStmt::VarDecl(var_decl) => {
            let value = gen_expression(compiler, &var_decl.assigned_value);
            compiler.emit(Instruction::Copy {
                target: var_decl.identifier.clone(),
                value,
            });
        }
        TypedStmt::Assignment(assignment) => {
            let value = gen_expression(compiler, &assignment.value);
            compiler.emit(Instruction::Copy {
                target: assignment.identifier.clone(),
                value,
            });
        }
        TypedStmt::FnDecl(function) => gen_function(compiler, function),
        TypedStmt::If(if_stmt) => gen_if(compiler, if_stmt),
        TypedStmt::While(while_stmt) => gen_while(compiler, while_stmt),
        TypedStmt::Return(return_stmt) => {
            let value = gen_expression(compiler, &return_stmt.value);
            compiler.emit(Instruction::Return(value));
        }
        TypedStmt::Print(print) => {
            let value = gen_expression(compiler, &print.value);
            compiler.emit(Instruction::Print(value));
        }
        // The checker only lets these through inside a loop
        TypedStmt::Break(_) => {
            if let Some(exit) = compiler.break_label() {
                compiler.emit(Instruction::Goto(exit));
            }
        }
        TypedStmt::Continue(_) => {
            if let Some(head) = compiler.continue_label() {
                compiler.emit(Instruction::Goto(head));
            }
        }
        TypedStmt::Expression(expression_stmt) => match &expression_stmt.expression.kind {
            TypedExprKind::Call { callee, arguments }
                if expression_stmt.expression.ty == Type::Unit =>
            {
                let arguments = gen_arguments(compiler, arguments);
                compiler.emit(Instruction::Call {
                    target: None,
                    callee: callee.clone(),
                    arguments,
                });
            }
            _ => {
                gen_expression(compiler, &expression_stmt.expression);
            }
        },
    }
}

pub fn gen_block(compiler: &mut Compiler, block: &TypedBlockStmt) {
    for statement in block.iter() {
        gen_statement(compiler, statement);
    }
}

fn gen_function(compiler: &mut Compiler, function: &TypedFnDeclStmt) {
    debug!("emitting function `{}`", function.identifier);

    compiler.emit(Instruction::Function {
        name: function.identifier.clone(),
        parameters: function.parameters.clone(),
        return_type: function.return_type,
    });

    let enclosing_loops = compiler.take_loops();
    gen_block(compiler, &function.body);
    compiler.restore_loops(enclosing_loops);

    compiler.emit(Instruction::EndFunction(function.identifier.clone()));
}

/// ```text
///     if_false <cond> goto L_else
///     <then>
///     goto L_end
/// L_else:
///     <else>
/// L_end:
/// ```
/// Without an else branch the false edge goes straight to `L_end`.
fn gen_if(compiler: &mut Compiler, if_stmt: &TypedIfStmt) {
    let condition = gen_expression(compiler, &if_stmt.condition);

    match &if_stmt.else_body {
        Some(else_body) => {
            let else_label = compiler.new_label();
            let end_label = compiler.new_label();

            compiler.emit(Instruction::IfFalse {
                condition,
                label: else_label,
            });
            gen_block(compiler, &if_stmt.then_body);
            compiler.emit(Instruction::Goto(end_label));
            compiler.emit(Instruction::Label(else_label));
            gen_block(compiler, else_body);
            compiler.emit(Instruction::Label(end_label));
        }
        None => {
            let end_label = compiler.new_label();

            compiler.emit(Instruction::IfFalse {
                condition,
                label: end_label,
            });
            gen_block(compiler, &if_stmt.then_body);
            compiler.emit(Instruction::Label(end_label));
        }
    }
}

fn gen_while(compiler: &mut Compiler, while_stmt: &TypedWhileStmt) {
    let head = compiler.new_label();
    let exit = compiler.new_label();

    compiler.emit(Instruction::Label(head));
    let condition = gen_expression(compiler, &while_stmt.condition);
    compiler.emit(Instruction::IfFalse {
        condition,
        label: exit,
    });

    compiler.push_loop(head, exit);
    gen_block(compiler, &while_stmt.body);
    compiler.pop_loop();

    compiler.emit(Instruction::Goto(head));
    compiler.emit(Instruction::Label(exit));
}
