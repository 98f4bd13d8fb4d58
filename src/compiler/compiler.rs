//! Main compiler module.
//!
//! This module contains the core Compiler structure and the instruction set
//! it emits. The typed AST is lowered to a flat list of three-address
//! instructions: every intermediate value gets a fresh temporary and every
//! jump target a fresh label.

use std::fmt::Display;

use log::info;

use crate::{
    ast::{
        expressions::{BinaryOperator, UnaryOperator},
        types::Type,
    },
    type_checker::typed_ast::TypedProgram,
};

use super::stmt::gen_statement;

/// A jump target, rendered as `L<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(pub u32);

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Anything an instruction can read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Temp(u32),
    Variable(String),
    Int(i64),
    Bool(bool),
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Temp(id) => write!(f, "t{}", id),
            Operand::Variable(name) => write!(f, "{}", name),
            Operand::Int(value) => write!(f, "{}", value),
            Operand::Bool(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `x = t1`
    Copy { target: String, value: Operand },
    /// `t1 = a + b`
    Binary {
        target: Operand,
        left: Operand,
        operator: BinaryOperator,
        right: Operand,
    },
    /// `t1 = -a`, `t2 = not a`
    Unary {
        target: Operand,
        operator: UnaryOperator,
        operand: Operand,
    },
    /// `t3 = call f(a, b)`, or `call f()` when the result is discarded
    Call {
        target: Option<Operand>,
        callee: String,
        arguments: Vec<Operand>,
    },
    Print(Operand),
    Return(Operand),
    Goto(Label),
    IfFalse { condition: Operand, label: Label },
    Label(Label),
    Function {
        name: String,
        parameters: Vec<(String, Type)>,
        return_type: Type,
    },
    EndFunction(String),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Copy { target, value } => write!(f, "{} = {}", target, value),
            Instruction::Binary {
                target,
                left,
                operator,
                right,
            } => write!(f, "{} = {} {} {}", target, left, operator, right),
            Instruction::Unary {
                target,
                operator: UnaryOperator::Negate,
                operand,
            } => write!(f, "{} = -{}", target, operand),
            Instruction::Unary {
                target,
                operator: UnaryOperator::Not,
                operand,
            } => write!(f, "{} = not {}", target, operand),
            Instruction::Call {
                target,
                callee,
                arguments,
            } => {
                if let Some(target) = target {
                    write!(f, "{} = ", target)?;
                }
                let arguments = arguments
                    .iter()
                    .map(|argument| argument.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "call {}({})", callee, arguments)
            }
            Instruction::Print(value) => write!(f, "print {}", value),
            Instruction::Return(value) => write!(f, "return {}", value),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::IfFalse { condition, label } => {
                write!(f, "if_false {} goto {}", condition, label)
            }
            Instruction::Label(label) => write!(f, "{}:", label),
            Instruction::Function {
                name,
                parameters,
                return_type,
            } => {
                let parameters = parameters
                    .iter()
                    .map(|(name, ty)| format!("{}: {}", name, ty))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "function {}({}): {}", name, parameters, return_type)
            }
            Instruction::EndFunction(name) => write!(f, "end function {}", name),
        }
    }
}

/// The main compiler structure that holds the state of the emission.
pub struct Compiler {
    /// Instructions emitted so far, in program order
    pub instructions: Vec<Instruction>,
    temp_counter: u32,
    label_counter: u32,
    /// `(continue target, break target)` of each enclosing loop, innermost last
    loops: Vec<(Label, Label)>,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            instructions: vec![],
            temp_counter: 0,
            label_counter: 0,
            loops: vec![],
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Allocates the next temporary, `t1` first.
    pub fn new_temp(&mut self) -> Operand {
        self.temp_counter += 1;
        Operand::Temp(self.temp_counter)
    }

    /// Allocates the next label, `L1` first.
    pub fn new_label(&mut self) -> Label {
        self.label_counter += 1;
        Label(self.label_counter)
    }

    pub fn push_loop(&mut self, head: Label, exit: Label) {
        self.loops.push((head, exit));
    }

    pub fn pop_loop(&mut self) {
        self.loops.pop();
    }

    /// Jump target of `continue` in the innermost loop.
    pub fn continue_label(&self) -> Option<Label> {
        self.loops.last().map(|(head, _)| *head)
    }

    /// Jump target of `break` in the innermost loop.
    pub fn break_label(&self) -> Option<Label> {
        self.loops.last().map(|(_, exit)| *exit)
    }

    /// Saves and clears the loop stack so a nested function body starts
    /// outside of any loop.
    pub fn take_loops(&mut self) -> Vec<(Label, Label)> {
        std::mem::take(&mut self.loops)
    }

    pub fn restore_loops(&mut self, loops: Vec<(Label, Label)>) {
        self.loops = loops;
    }
}

/// Lowers a verified program to three-address code.
pub fn compile(program: &TypedProgram) -> Vec<Instruction> {
    let mut compiler = Compiler::new();

    for statement in program.iter() {
        gen_statement(&mut compiler, statement);
    }

    info!(
        "emitted {} instruction(s) using {} temporaries and {} labels",
        compiler.instructions.len(),
        compiler.temp_counter,
        compiler.label_counter
    );

    compiler.instructions
}
