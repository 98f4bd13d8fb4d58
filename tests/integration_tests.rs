//! Integration tests for end-to-end compilation.
//!
//! These tests drive the public pipeline from source text through
//! tokenization, parsing, type checking and three-address code emission.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use valc::{
    analyze, compile_unit,
    errors::errors::ErrorClass,
    lexer::lexer::tokenize,
    parser::parser::parse,
    scope::scope::SymbolTable,
    type_checker::typed_ast::{TypedExprKind, TypedStmt},
    ast::types::Type,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn listing(source: &str) -> Vec<String> {
    compile_unit(source, "main.val")
        .unwrap_or_else(|errors| panic!("unexpected errors: {:?}", errors))
        .iter()
        .map(|instruction| instruction.to_string())
        .collect()
}

#[test]
fn test_single_declaration() {
    init();
    let program = analyze("val x : Int = 10;", "main.val").unwrap();

    assert_eq!(program.len(), 1);
    match &program.body[0] {
        TypedStmt::VarDecl(decl) => {
            assert_eq!(decl.identifier, "x");
            assert_eq!(decl.var_type, Type::Int);
        }
        other => panic!("expected a variable declaration, found {:?}", other),
    }
}

#[test]
fn test_initializer_type_mismatch() {
    init();
    let errors = analyze("val x : Int = true;", "main.val").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_class(), ErrorClass::TypeMismatch);
    assert_eq!(errors[0].get_error_name(), "TypeMismatchError");
    assert!(errors[0].to_string().contains("expected Int, found Bool"));
}

#[test]
fn test_call_statement() {
    init();
    let program = analyze("fun f(): Int { return 1; }\nf();", "main.val").unwrap();

    match &program.body[1] {
        TypedStmt::Expression(stmt) => {
            assert_eq!(stmt.expression.ty, Type::Int);
            assert!(matches!(
                &stmt.expression.kind,
                TypedExprKind::Call { callee, .. } if callee == "f"
            ));
        }
        other => panic!("expected an expression statement, found {:?}", other),
    }
}

#[test]
fn test_non_bool_loop_condition() {
    init();
    let errors = analyze("while (1) { break; }", "main.val").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_class(), ErrorClass::TypeMismatch);
}

#[test]
fn test_missing_semicolon_recovery() {
    init();
    let source = "val x : Int = 1 val y : Int = 2;";
    let tokens = tokenize(source.to_string(), None).unwrap();
    let (program, errors) = parse(tokens, Rc::new(String::from("main.val")));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_class(), ErrorClass::Syntax);
    assert_eq!(program.len(), 1);

    // The whole unit is still rejected
    let errors = analyze(source, "main.val").unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_all_syntax_errors_reported() {
    init();
    let errors = analyze(
        "val a : Int = 1;\n\
         break;\n\
         print(b);\n\
         val a : Bool = true;\n\
         return a;\n",
        "main.val",
    )
    .unwrap_err();

    let classes: Vec<(u32, ErrorClass)> = errors
        .iter()
        .map(|error| (error.get_line(), error.get_class()))
        .collect();
    assert_eq!(
        classes,
        vec![
            (2, ErrorClass::InvalidContext),
            (3, ErrorClass::UndeclaredIdentifier),
            (4, ErrorClass::Redeclaration),
            (5, ErrorClass::InvalidContext),
        ]
    );
}

#[test]
fn test_type_errors_stop_at_first() {
    init();
    let errors = analyze(
        "val a : Int = true;\nval b : Bool = 1;",
        "main.val",
    )
    .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_line(), 1);
}

#[test]
fn test_unrecognised_character() {
    init();
    let errors = analyze("val a : Int = 1;\nval b : Int = a # 2;", "main.val").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_class(), ErrorClass::Syntax);
    assert_eq!(errors[0].get_line(), 2);
}

#[test]
fn test_scope_lookup_properties() {
    use valc::scope::scope::Symbol;

    let position = valc::Position(1, Rc::new(String::from("main.val")));
    let mut symbols = SymbolTable::new();
    let outer = Symbol::Variable {
        var_type: Type::Int,
        is_constant: false,
    };
    let inner = Symbol::Variable {
        var_type: Type::Bool,
        is_constant: true,
    };

    symbols.declare("x", outer.clone(), position.clone()).unwrap();
    symbols.enter_scope();
    assert_eq!(symbols.lookup("x", position.clone()).unwrap(), &outer);
    symbols.declare("x", inner.clone(), position.clone()).unwrap();
    assert_eq!(symbols.lookup("x", position.clone()).unwrap(), &inner);
    symbols.exit_scope();
    assert_eq!(symbols.lookup("x", position.clone()).unwrap(), &outer);
}

#[test]
fn test_full_program() {
    init();
    assert_eq!(
        listing(
            "// greatest common divisor by subtraction
             fun gcd(a: Int, b: Int): Int {
                 while (a != b) {
                     if (a > b) { a = a - b; } else { b = b - a; }
                 }
                 return a;
             }
             const limit : Int = 3;
             val i : Int = 0;
             while (i < limit) {
                 print(gcd(12, 18 + i));
                 i = i + 1;
             }"
        ),
        vec![
            "function gcd(a: Int, b: Int): Int",
            "L1:",
            "t1 = a != b",
            "if_false t1 goto L2",
            "t2 = a > b",
            "if_false t2 goto L3",
            "t3 = a - b",
            "a = t3",
            "goto L4",
            "L3:",
            "t4 = b - a",
            "b = t4",
            "L4:",
            "goto L1",
            "L2:",
            "return a",
            "end function gcd",
            "limit = 3",
            "i = 0",
            "L5:",
            "t5 = i < limit",
            "if_false t5 goto L6",
            "t6 = 18 + i",
            "t7 = call gcd(12, t6)",
            "print t7",
            "t8 = i + 1",
            "i = t8",
            "goto L5",
            "L6:",
        ]
    );
}
