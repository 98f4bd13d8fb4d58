//! Unit tests for the type checker.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::Program,
        expressions::{BinaryExpr, BinaryOperator, Expr, LiteralExpr, LiteralValue, SymbolExpr},
        statements::{
            AssignmentStmt, BlockStmt, IfStmt, PrintStmt, ReturnStmt, Stmt, VarDeclStmt,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorClass, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};

use super::{
    type_checker::type_check,
    typed_ast::{TypedExprKind, TypedProgram, TypedStmt},
};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), None).unwrap();
    let (program, errors) = parse(tokens, Rc::new(String::from("test.val")));
    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
    program
}

fn check_ok(source: &str) -> TypedProgram {
    match type_check(&parse_source(source)) {
        Ok(program) => program,
        Err(error) => panic!("unexpected type error: {}", error),
    }
}

fn check_err(source: &str) -> Error {
    match type_check(&parse_source(source)) {
        Ok(_) => panic!("expected a type error for {:?}", source),
        Err(error) => error,
    }
}

fn position(line: u32) -> Position {
    Position(line, Rc::new(String::from("test.val")))
}

fn initializer_type(program: &TypedProgram, index: usize) -> Type {
    match &program.body[index] {
        TypedStmt::VarDecl(decl) => decl.assigned_value.ty,
        other => panic!("expected a variable declaration, found {:?}", other),
    }
}

#[test]
fn test_variable_declaration() {
    let program = check_ok("val x : Int = 10;");

    assert_eq!(program.len(), 1);
    match &program.body[0] {
        TypedStmt::VarDecl(decl) => {
            assert_eq!(decl.identifier, "x");
            assert_eq!(decl.var_type, Type::Int);
            assert_eq!(decl.assigned_value.ty, Type::Int);
            assert_eq!(
                decl.assigned_value.kind,
                TypedExprKind::Literal(LiteralValue::Int(10))
            );
        }
        other => panic!("expected a variable declaration, found {:?}", other),
    }
}

#[test]
fn test_initializer_mismatch() {
    let error = check_err("val x : Int = true;");

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert!(error.to_string().contains("expected Int, found Bool"));
}

#[test]
fn test_operator_typing() {
    let program = check_ok(
        "val a : Int = 6;
         val b : Int = 3;
         val sum : Int = a + b - a * b / 2;
         val eq : Bool = a == b;
         val lt : Bool = a < b;
         val ge : Bool = a >= b;
         val beq : Bool = true != false;
         val neg : Int = -a;
         val inv : Bool = not (a > b);",
    );

    let types: Vec<Type> = (2..9).map(|i| initializer_type(&program, i)).collect();
    assert_eq!(
        types,
        vec![
            Type::Int,
            Type::Bool,
            Type::Bool,
            Type::Bool,
            Type::Bool,
            Type::Int,
            Type::Bool
        ]
    );
}

#[test]
fn test_relational_mixed_types() {
    let error = check_err("val a : Int = 1; val b : Bool = a < true;");

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::OperandMismatch {
            operator: String::from("<"),
            left: String::from("Int"),
            right: String::from("Bool"),
        }
    );
}

#[test]
fn test_arithmetic_on_bool() {
    let error = check_err("val a : Int = true + 1;");

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert!(error.to_string().contains("operand of '+'"));
}

#[test]
fn test_unary_operand_types() {
    assert_eq!(
        check_err("val a : Int = -true;").get_class(),
        ErrorClass::TypeMismatch
    );
    assert_eq!(
        check_err("val a : Bool = not 1;").get_class(),
        ErrorClass::TypeMismatch
    );
}

#[test]
fn test_call_typing() {
    let program = check_ok(
        "fun add(a: Int, b: Int): Int { return a + b; }
         val three : Int = add(1, 2);",
    );

    match &program.body[1] {
        TypedStmt::VarDecl(decl) => {
            assert_eq!(decl.assigned_value.ty, Type::Int);
            match &decl.assigned_value.kind {
                TypedExprKind::Call { callee, arguments } => {
                    assert_eq!(callee, "add");
                    assert_eq!(arguments.len(), 2);
                }
                other => panic!("expected a call, found {:?}", other),
            }
        }
        other => panic!("expected a variable declaration, found {:?}", other),
    }
}

#[test]
fn test_call_arity_mismatch() {
    let error = check_err(
        "fun add(a: Int, b: Int): Int { return a + b; }
         val x : Int = add(1);",
    );

    assert_eq!(error.get_class(), ErrorClass::ArityMismatch);
    assert_eq!(error.get_line(), 2);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::ArityMismatch {
            function: String::from("add"),
            expected: 2,
            received: 1,
        }
    );
}

#[test]
fn test_call_argument_mismatch() {
    let error = check_err(
        "fun add(a: Int, b: Int): Int { return a + b; }
         val x : Int = add(true, 2);",
    );

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert!(error.to_string().contains("argument 1 ('a') of 'add'"));
}

#[test]
fn test_call_statement_type() {
    let program = check_ok("fun f(): Int { return 1; } f();");

    match &program.body[1] {
        TypedStmt::Expression(stmt) => assert_eq!(stmt.expression.ty, Type::Int),
        other => panic!("expected an expression statement, found {:?}", other),
    }
}

#[test]
fn test_unit_call_as_statement() {
    let program = check_ok("fun hello() { print(1); } hello();");

    match &program.body[1] {
        TypedStmt::Expression(stmt) => assert_eq!(stmt.expression.ty, Type::Unit),
        other => panic!("expected an expression statement, found {:?}", other),
    }
}

#[test]
fn test_unit_call_as_value() {
    let error = check_err("fun hello() { print(1); } print(hello());");

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert_eq!(
        error.to_string(),
        "[Line 1] Error: print argument produces no value (token: 'hello')"
    );

    assert_eq!(
        check_err("fun hello() { print(1); } val x : Int = 1 + hello();").get_class(),
        ErrorClass::TypeMismatch
    );
}

#[test]
fn test_condition_must_be_bool() {
    let error = check_err("while (1) { break; }");

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert!(error.to_string().contains("while condition: expected Bool, found Int"));

    let error = check_err("if (0) { print(1); }");
    assert!(error.to_string().contains("if condition"));
}

#[test]
fn test_assignment_typing() {
    check_ok("val x : Int = 1; x = x + 1;");

    let error = check_err("val x : Int = 1; x = false;");
    assert!(error.to_string().contains("assignment to 'x': expected Int, found Bool"));
}

#[test]
fn test_return_type_mismatch() {
    let error = check_err("fun f(): Int { return true; }");

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert!(error.to_string().contains("expected Int, found Bool"));
}

#[test]
fn test_missing_return() {
    let error = check_err("fun f(): Int { print(1); }\nval x : Int = f();");

    assert_eq!(error.get_class(), ErrorClass::TypeMismatch);
    assert_eq!(error.get_line(), 1);
    assert_eq!(error.get_lexeme(), Some("f"));
    assert!(error
        .to_string()
        .contains("return type of 'f': expected Int, found Unit"));

    // A Unit function needs no return
    check_ok("fun g() { print(1); } g();");
}

#[test]
fn test_every_return_is_checked() {
    let error = check_err(
        "fun f(n: Int): Int {
             if (n > 0) { return false; }
             return n;
         }",
    );

    assert_eq!(error.get_line(), 2);
}

#[test]
fn test_block_returns() {
    let program = check_ok(
        "fun f(n: Int): Bool {
             while (n > 0) { if (n == 3) { return true; } n = n - 1; }
             return false;
         }
         fun g() { print(1); }",
    );

    match &program.body[0] {
        TypedStmt::FnDecl(function) => {
            assert_eq!(function.body.returns, Some(Type::Bool));
            match &function.body.body[0] {
                TypedStmt::While(while_stmt) => {
                    assert_eq!(while_stmt.body.returns, Some(Type::Bool))
                }
                other => panic!("expected while statement, found {:?}", other),
            }
        }
        other => panic!("expected a function declaration, found {:?}", other),
    }
    match &program.body[1] {
        TypedStmt::FnDecl(function) => assert_eq!(function.body.returns, None),
        other => panic!("expected a function declaration, found {:?}", other),
    }
}

#[test]
fn test_recursion() {
    let program = check_ok(
        "fun fact(n: Int): Int {
             if (n <= 1) { return 1; }
             return n * fact(n - 1);
         }
         print(fact(5));",
    );

    assert_eq!(program.len(), 2);
}

#[test]
fn test_shadowing_types() {
    let program = check_ok(
        "val x : Int = 1;
         if (true) { val x : Bool = false; print(x); }
         val y : Int = x + 1;",
    );

    match &program.body[1] {
        TypedStmt::If(if_stmt) => match &if_stmt.then_body.body[1] {
            TypedStmt::Print(print) => assert_eq!(print.value.ty, Type::Bool),
            other => panic!("expected print statement, found {:?}", other),
        },
        other => panic!("expected if statement, found {:?}", other),
    }
    assert_eq!(initializer_type(&program, 2), Type::Int);
}

#[test]
fn test_parameters_are_typed() {
    let program = check_ok("fun f(a: Int, b: Bool): Bool { return b == (a > 0); }");

    match &program.body[0] {
        TypedStmt::FnDecl(function) => {
            assert_eq!(
                function.parameters,
                vec![(String::from("a"), Type::Int), (String::from("b"), Type::Bool)]
            );
            assert_eq!(function.return_type, Type::Bool);
        }
        other => panic!("expected a function declaration, found {:?}", other),
    }
}

// Trees built by hand skip the parser, so the checker's own scope and
// context rules are the only line of defence here.

fn literal(value: i64, line: u32) -> Expr {
    Expr::Literal(LiteralExpr {
        value: LiteralValue::Int(value),
        position: position(line),
    })
}

fn program(body: Vec<Stmt>) -> Program {
    Program {
        body,
        position: position(1),
    }
}

fn var_decl(name: &str, is_constant: bool, line: u32) -> Stmt {
    Stmt::VarDecl(VarDeclStmt {
        identifier: name.to_string(),
        is_constant,
        var_type: Type::Int,
        assigned_value: literal(1, line),
        position: position(line),
    })
}

#[test]
fn test_checker_rejects_undeclared_symbol() {
    let tree = program(vec![Stmt::Print(PrintStmt {
        value: Expr::Symbol(SymbolExpr {
            name: String::from("ghost"),
            position: position(3),
        }),
        position: position(3),
    })]);

    let error = type_check(&tree).unwrap_err();
    assert_eq!(error.get_class(), ErrorClass::UndeclaredIdentifier);
    assert_eq!(error.get_line(), 3);
}

#[test]
fn test_checker_rejects_redeclaration() {
    let tree = program(vec![var_decl("x", false, 1), var_decl("x", false, 2)]);

    let error = type_check(&tree).unwrap_err();
    assert_eq!(error.get_class(), ErrorClass::Redeclaration);
    assert_eq!(error.get_line(), 2);
}

#[test]
fn test_checker_rejects_constant_assignment() {
    let tree = program(vec![
        var_decl("k", true, 1),
        Stmt::Assignment(AssignmentStmt {
            identifier: String::from("k"),
            value: Expr::Binary(BinaryExpr {
                left: Box::new(literal(1, 2)),
                operator: BinaryOperator::Add,
                right: Box::new(literal(2, 2)),
                position: position(2),
            }),
            position: position(2),
        }),
    ]);

    let error = type_check(&tree).unwrap_err();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::AssignToConstant {
            identifier: String::from("k")
        }
    );
}

#[test]
fn test_checker_rejects_misplaced_control_flow() {
    let tree = program(vec![Stmt::Break(position(1))]);
    assert_eq!(
        type_check(&tree).unwrap_err().get_impl(),
        &ErrorImpl::BreakOutsideLoop
    );

    let tree = program(vec![Stmt::Return(ReturnStmt {
        value: literal(0, 1),
        position: position(1),
    })]);
    assert_eq!(
        type_check(&tree).unwrap_err().get_impl(),
        &ErrorImpl::ReturnOutsideFunction
    );
}

#[test]
fn test_checker_scopes_blocks() {
    let tree = program(vec![
        Stmt::If(IfStmt {
            condition: Expr::Literal(LiteralExpr {
                value: LiteralValue::Bool(true),
                position: position(1),
            }),
            then_body: BlockStmt {
                body: vec![var_decl("inner", false, 1)],
                position: position(1),
            },
            else_body: None,
            position: position(1),
        }),
        var_decl("inner", false, 2),
    ]);

    assert!(type_check(&tree).is_ok());
}
