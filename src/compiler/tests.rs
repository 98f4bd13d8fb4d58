//! Unit tests for the three-address code emitter.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    lexer::lexer::tokenize, parser::parser::parse, type_checker::type_checker::type_check,
};

use super::compiler::{compile, Instruction, Label, Operand};

fn emit(source: &str) -> Vec<String> {
    let tokens = tokenize(source.to_string(), None).unwrap();
    let (program, errors) = parse(tokens, Rc::new(String::from("test.val")));
    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
    let program = type_check(&program).unwrap();

    compile(&program)
        .iter()
        .map(|instruction| instruction.to_string())
        .collect()
}

#[test]
fn test_instruction_display() {
    assert_eq!(Operand::Temp(3).to_string(), "t3");
    assert_eq!(Label(2).to_string(), "L2");
    assert_eq!(
        Instruction::IfFalse {
            condition: Operand::Variable(String::from("done")),
            label: Label(4),
        }
        .to_string(),
        "if_false done goto L4"
    );
    assert_eq!(
        Instruction::Call {
            target: None,
            callee: String::from("f"),
            arguments: vec![],
        }
        .to_string(),
        "call f()"
    );
}

#[test]
fn test_literal_declaration() {
    assert_eq!(emit("val x : Int = 10;"), vec!["x = 10"]);
}

#[test]
fn test_expression_temporaries() {
    assert_eq!(
        emit("val a : Int = 2; val b : Int = a + 3 * a; val c : Bool = not (b > a); val d : Int = -b;"),
        vec![
            "a = 2",
            "t1 = 3 * a",
            "t2 = a + t1",
            "b = t2",
            "t3 = b > a",
            "t4 = not t3",
            "c = t4",
            "t5 = -b",
            "d = t5",
        ]
    );
}

#[test]
fn test_function_and_calls() {
    assert_eq!(
        emit(
            "fun add(a: Int, b: Int): Int { return a + b; }
             fun show(n: Int) { print(n); }
             print(add(1, 2));
             show(4);
             add(5, 6);"
        ),
        vec![
            "function add(a: Int, b: Int): Int",
            "t1 = a + b",
            "return t1",
            "end function add",
            "function show(n: Int): Unit",
            "print n",
            "end function show",
            "t2 = call add(1, 2)",
            "print t2",
            "call show(4)",
            "t3 = call add(5, 6)",
        ]
    );
}

#[test]
fn test_if_else() {
    assert_eq!(
        emit("val x : Int = 1; if (x == 1) { print(1); } else { print(0); } if (true) { x = 2; }"),
        vec![
            "x = 1",
            "t1 = x == 1",
            "if_false t1 goto L1",
            "print 1",
            "goto L2",
            "L1:",
            "print 0",
            "L2:",
            "if_false true goto L3",
            "x = 2",
            "L3:",
        ]
    );
}

#[test]
fn test_while_with_break_and_continue() {
    assert_eq!(
        emit(
            "val i : Int = 0;
             while (i < 10) {
                 i = i + 1;
                 if (i == 3) { continue; }
                 if (i == 7) { break; }
                 print(i);
             }"
        ),
        vec![
            "i = 0",
            "L1:",
            "t1 = i < 10",
            "if_false t1 goto L2",
            "t2 = i + 1",
            "i = t2",
            "t3 = i == 3",
            "if_false t3 goto L3",
            "goto L1",
            "L3:",
            "t4 = i == 7",
            "if_false t4 goto L4",
            "goto L2",
            "L4:",
            "print i",
            "goto L1",
            "L2:",
        ]
    );
}

#[test]
fn test_nested_loops_target_innermost() {
    let output = emit("while (true) { while (false) { break; } continue; }");

    assert_eq!(
        output,
        vec![
            "L1:",
            "if_false true goto L2",
            "L3:",
            "if_false false goto L4",
            "goto L4",
            "goto L3",
            "L4:",
            "goto L1",
            "goto L1",
            "L2:",
        ]
    );
}

#[test]
fn test_empty_program() {
    assert!(emit("").is_empty());
}
