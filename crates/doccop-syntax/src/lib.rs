//! doccop-syntax: C# declaration parsing for doccop
//!
//! This crate provides:
//! - `tokenize()`: A lossless `logos` lexer that keeps comments and whitespace
//! - `parse()`: An error-tolerant parser recovering member declarations
//! - `documentation_trivia()`: Lookup of the doc comments attached to a declaration

pub mod lexer;
mod parser;
mod tree;
pub mod trivia;

pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, parse_with_file_id};
pub use tree::{Declaration, DeclarationKind, OtherKind, SyntaxTree, TypeRef};
pub use trivia::{documentation_trivia, DocTrivia};
