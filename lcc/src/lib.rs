pub mod batch;
pub mod compile;
pub mod config;
pub mod diag;
pub mod driver;
pub mod dump;
pub mod error;
pub mod grammer;
pub mod symbols;

pub use compile::{Code, Line};
pub use config::Config;
pub use diag::{Diagnostic, Diagnostics, Kind};
pub use driver::{compile, Compilation};
pub use error::Error;
pub use grammer::ast::Program;
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::{Analysis, Parser};
pub use symbols::SymbolTable;
