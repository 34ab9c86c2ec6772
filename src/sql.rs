// SQL module - WHERE-clause parsing and AST representation

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{parse_where, Parser};
pub use token::*;
