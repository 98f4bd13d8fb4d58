//! Parser implementation for building the syntax tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! Expressions are parsed with NUD/LED handler tables and binding powers;
//! statements are dispatched through a table keyed on their leading token.
//!
//! Besides the token cursor and lookup tables the parser owns:
//! - the symbol table, so declarations are visible to later siblings
//! - the loop-nesting counter and function-body flag for context checks
//! - the list of recorded errors, since a syntax error does not stop parsing

use std::{collections::HashMap, rc::Rc};

use log::{debug, info};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    scope::scope::{Symbol, SymbolTable},
    Position, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_declaration,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by an EOF token
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Names visible at the current point of the parse
    symbols: SymbolTable,
    /// Number of enclosing `while` bodies within the current function
    loop_depth: u32,
    /// Whether the parse is inside a function body
    in_function: bool,
    /// Errors recorded so far, in source order
    errors: Vec<Error>,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// An EOF token is appended when the stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map(|token| token.line()).unwrap_or(1);
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Position(line, Rc::clone(&file))
            ));
        }

        Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            symbols: SymbolTable::new(),
            loop_depth: 0,
            in_function: false,
            errors: vec![],
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead of the current one.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Returns the kind of the most recently consumed token.
    pub fn previous_token_kind(&self) -> Option<TokenKind> {
        if self.pos == 0 {
            None
        } else {
            Some(self.tokens[self.pos - 1].kind)
        }
    }

    /// Advances to the next token and returns the consumed one.
    ///
    /// The cursor never moves past EOF.
    pub fn advance(&mut self) -> &Token {
        if self.current_token_kind() == TokenKind::EOF {
            return &self.tokens[self.pos];
        }
        self.pos += 1;
        &self.tokens[self.pos - 1]
    }

    /// Consumes a token of the expected kind or fails with a syntax error.
    ///
    /// `expected` describes the missing construct, e.g. `"';' after print statement"`.
    pub fn expect(&mut self, expected_kind: TokenKind, expected: &str) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(self.error_at_current(ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
            }));
        }
        Ok(self.advance().clone())
    }

    /// Builds an error located at the current token.
    pub fn error_at_current(&self, error: ErrorImpl) -> Error {
        let token = self.current_token();
        Error::new(error, token.position.clone()).with_lexeme(token.value.clone())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_position(&self) -> Position {
        self.current_token().position.clone()
    }

    pub fn get_cursor(&self) -> usize {
        self.pos
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn declare(&mut self, name: &str, symbol: Symbol, position: Position) -> Result<(), Error> {
        self.symbols.declare(name, symbol, position)
    }

    pub fn resolve(&self, name: &str, position: Position) -> Result<Symbol, Error> {
        self.symbols.lookup(name, position).cloned()
    }

    /// Runs `f` inside a fresh scope, popping it again whatever `f` returns.
    pub fn in_scope<T>(&mut self, f: impl FnOnce(&mut Parser) -> T) -> T {
        self.symbols.enter_scope();
        let result = f(self);
        self.symbols.exit_scope();
        result
    }

    /// Runs `f` with the loop-nesting counter raised by one.
    pub fn in_loop_body<T>(&mut self, f: impl FnOnce(&mut Parser) -> T) -> T {
        self.loop_depth += 1;
        let result = f(self);
        self.loop_depth -= 1;
        result
    }

    /// Runs `f` as a function body: `return` becomes legal and enclosing
    /// loops are no longer visible to `break`/`continue`.
    pub fn in_function_body<T>(&mut self, f: impl FnOnce(&mut Parser) -> T) -> T {
        let previous_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        let previous_in_function = std::mem::replace(&mut self.in_function, true);
        let result = f(self);
        self.loop_depth = previous_loop_depth;
        self.in_function = previous_in_function;
        result
    }

    pub fn loop_depth(&self) -> u32 {
        self.loop_depth
    }

    pub fn in_function(&self) -> bool {
        self.in_function
    }

    pub fn record_error(&mut self, error: Error) {
        debug!("recorded parse error: {}", error);
        self.errors.push(error);
    }

    pub fn get_errors(&self) -> &[Error] {
        &self.errors
    }

    /// Skips to the next statement boundary after an error.
    ///
    /// Stops once a `;` has been consumed, or before a `}`, EOF, or a token
    /// that can only begin a statement. At least one token is consumed when
    /// the failed statement consumed none.
    pub fn synchronize(&mut self, statement_start: usize) {
        if self.pos == statement_start {
            self.advance();
        }

        while self.has_tokens() {
            if self.previous_token_kind() == Some(TokenKind::Semicolon) {
                break;
            }

            let kind = self.current_token_kind();
            if kind == TokenKind::CloseCurly || kind.starts_statement() {
                break;
            }

            self.advance();
        }

        debug!(
            "resynchronized at line {} before {:?}",
            self.current_token().line(),
            self.current_token().value
        );
    }
}

/// Parses a stream of tokens into a syntax tree.
///
/// Returns the (possibly partial) program together with every error that was
/// recorded. The program is only valid input for the type checker when the
/// error list is empty.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    let position = parser.get_position();
    let mut body = vec![];

    while parser.has_tokens() {
        if let Some(stmt) = parse_declaration(&mut parser) {
            body.push(stmt);
        }
    }

    info!(
        "parsed {} top-level declaration(s) with {} error(s)",
        body.len(),
        parser.errors.len()
    );

    (Program { body, position }, parser.errors)
}
