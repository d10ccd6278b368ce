// src/lib.rs
pub mod dev;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod type_checker;

pub use error::CompileError;
