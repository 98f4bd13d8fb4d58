/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the untyped tree produced by the parser
///
/// Submodules:
/// - ast: The program root
/// - expressions: Expression nodes and operators
/// - statements: Statement and block nodes
/// - types: The static types of the language
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
