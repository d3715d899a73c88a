pub mod ast;
pub mod lexer;
pub mod parser;
pub mod parsercore;
pub mod rules;
pub mod table;
pub mod token;
