// src/lexer/mod.rs
pub mod scanner;
pub mod tables;

pub use scanner::{LexError, Lexer, Token, tokenize, tokenize_with};
