use std::collections::HashMap;

use log::trace;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// A single binding in the symbol table.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable {
        var_type: Type,
        is_constant: bool,
    },
    Function {
        parameters: Vec<(String, Type)>,
        return_type: Type,
    },
}

impl Symbol {
    pub fn is_function(&self) -> bool {
        matches!(self, Symbol::Function { .. })
    }
}

/// One lexical region: a name can be bound at most once per scope.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The scope stack shared by the parser and the type checker.
///
/// The outermost (global) scope is created with the table and is never
/// popped; `exit_scope` on the global scope is a no-op.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
        trace!("entered scope at depth {}", self.depth());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        trace!("exited to scope depth {}", self.depth());
    }

    /// Number of scopes above the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current_scope(&self) -> &Scope {
        &self.scopes[self.depth()]
    }

    /// Binds `name` in the innermost scope.
    ///
    /// Shadowing a binding from an enclosing scope is allowed; rebinding a name
    /// already present in the innermost scope is a redeclaration.
    pub fn declare(&mut self, name: &str, symbol: Symbol, position: Position) -> Result<(), Error> {
        let depth = self.depth();
        let scope = &mut self.scopes[depth];

        if scope.contains(name) {
            return Err(Error::new(
                ErrorImpl::AlreadyDeclared {
                    identifier: name.to_string(),
                },
                position,
            )
            .with_lexeme(name));
        }

        trace!("declared `{}` at depth {}", name, depth);
        scope.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Resolves `name` innermost-first.
    pub fn lookup(&self, name: &str, position: Position) -> Result<&Symbol, Error> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::NotDeclared {
                        identifier: name.to_string(),
                    },
                    position,
                )
                .with_lexeme(name)
            })
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }
}
