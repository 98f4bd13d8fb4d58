#![allow(clippy::module_inception)]

use std::rc::Rc;

use log::info;

use crate::{
    compiler::compiler::{compile, Instruction},
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{type_checker::type_check, typed_ast::TypedProgram},
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod scope;
pub mod type_checker;

extern crate regex;

/// A 1-based source line and the name of the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

/// Runs the front end: tokenize, parse, then type check.
///
/// Every syntax-tier error the parser recorded is returned together; the
/// checker only runs on an error-free tree and stops at its first error.
pub fn analyze(source: &str, file: &str) -> Result<TypedProgram, Vec<Error>> {
    let file = Rc::new(file.to_string());

    let tokens = tokenize(source.to_string(), Some(file.to_string())).map_err(|error| vec![error])?;
    let (program, errors) = parse(tokens, Rc::clone(&file));
    if !errors.is_empty() {
        info!("{} rejected with {} syntax error(s)", file, errors.len());
        return Err(errors);
    }

    type_check(&program).map_err(|error| vec![error])
}

/// Compiles one source file all the way to three-address code.
pub fn compile_unit(source: &str, file: &str) -> Result<Vec<Instruction>, Vec<Error>> {
    let program = analyze(source, file)?;
    Ok(compile(&program))
}

/// Returns the text of the 1-based `line` of `source`, if it exists.
pub fn get_source_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.lines().nth(line as usize - 1)
}

/// Renders a diagnostic with the offending source line.
///
/// The caret marks the first occurrence of the offending lexeme on that line.
///
/// ```text
/// Error: UndeclaredIdentifierError (names must be declared before they are used)
/// -> main.val
///   |
/// 1 | val x : Int = y;
///   | --------------^
/// [Line 1] Error: identifier 'y' not declared (token: 'y')
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let line_number = position.0.to_string();
    let padding = line_number.len() + 2;

    let mut rendered = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    rendered.push_str(&format!("-> {}\n", position.1));

    if let Some(line_text) = get_source_line(source, position.0) {
        let trimmed = line_text.trim_start();
        let removed_whitespace = line_text.len() - trimmed.len();

        rendered.push_str(&format!("{:>padding$}\n", "|"));
        rendered.push_str(&format!("{} | {}\n", line_number, trimmed.trim_end()));

        let column = error
            .get_lexeme()
            .and_then(|lexeme| line_text.find(lexeme))
            .filter(|column| *column >= removed_whitespace);
        if let Some(column) = column {
            let arrows = column - removed_whitespace + 1;
            rendered.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
        }
    }

    rendered.push_str(&error.to_string());
    rendered
}

pub fn display_error(error: &Error, source: &str) {
    eprintln!("{}\n", render_error(error, source));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_get_source_line() {
        let source = "val a : Int = 1;\n  print(a);\n";

        assert_eq!(get_source_line(source, 1), Some("val a : Int = 1;"));
        assert_eq!(get_source_line(source, 2), Some("  print(a);"));
        assert_eq!(get_source_line(source, 3), None);
        assert_eq!(get_source_line(source, 0), None);
    }

    #[test]
    fn test_render_error() {
        let source = "val x : Int = y;";
        let errors = analyze(source, "main.val").unwrap_err();

        assert_eq!(
            render_error(&errors[0], source),
            "Error: UndeclaredIdentifierError (names must be declared before they are used)\n\
             -> main.val\n  \
             |\n\
             1 | val x : Int = y;\n  \
             | --------------^\n\
             [Line 1] Error: identifier 'y' not declared (token: 'y')"
        );
    }

    #[test]
    fn test_compile_unit() {
        let instructions = compile_unit("val x : Int = 1 + 2; print(x);", "main.val").unwrap();
        let listing: Vec<String> = instructions.iter().map(|i| i.to_string()).collect();

        assert_eq!(listing, vec!["t1 = 1 + 2", "x = t1", "print x"]);
    }
}
