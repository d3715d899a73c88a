use super::ast::Program;
use super::lexer::Lexer;
use super::rules::NonTerminal;
use super::table::{is_first, is_follow};
use super::token::{Pos, Terminal, Token};
use crate::config::LexerConfig;
use crate::diag::{Diagnostics, Kind};
use crate::dump::Hook;
use crate::symbols::SymbolTable;
use log::trace;
use std::collections::HashSet;

/// Result of one analysis pass
pub struct Analysis<H> {
    pub program: Program,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    pub hook: H,
}

pub struct Parser<'a, H: Hook> {
    lexer: Lexer<'a>,
    sigil: char,
    pub(super) current: Token,
    pub(super) previous: Token,
    pub(super) diags: Diagnostics,
    pub(super) symbols: SymbolTable,
    /// Function being analyzed
    pub(super) function: Option<String>,
    /// Names already reported undeclared in this function
    undeclared: HashSet<String>,
    /// Token the last syntax error was reported at
    error_pos: Option<Pos>,
    pub(super) hook: H,
}

impl<'a, H: Hook> Parser<'a, H> {
    pub fn new(file: &str, source: &'a str, config: &'a LexerConfig, hook: H) -> Self {
        let mut parser = Parser {
            lexer: Lexer::new(source, config),
            sigil: config.sigil,
            current: Token::end(Pos::default()),
            previous: Token::end(Pos::default()),
            diags: Diagnostics::new(file),
            symbols: SymbolTable::new(),
            function: None,
            undeclared: HashSet::new(),
            error_pos: None,
            hook,
        };
        parser.advance();
        parser
    }

    pub fn parse(mut self) -> Analysis<H> {
        let program = self.parse_pg();
        Analysis {
            program,
            symbols: self.symbols,
            diagnostics: self.diags,
            hook: self.hook,
        }
    }
}

// ----------------------------------------------------------------------------
// Token stream
// ----------------------------------------------------------------------------

impl<'a, H: Hook> Parser<'a, H> {
    /// Move to the next token, reporting any unrecognized text on the way
    pub(super) fn advance(&mut self) {
        loop {
            match self.lexer.next_token() {
                Ok(token) => {
                    self.hook.token(&token);
                    self.previous = std::mem::replace(&mut self.current, token);
                    return;
                }
                Err(garbage) => self.undeclared(&garbage.text, garbage.pos.row),
            }
        }
    }

    pub(super) fn check(&self, kind: Terminal) -> bool {
        self.current.kind == kind
    }

    /// Current token can start `nt`
    pub(super) fn first(&self, nt: NonTerminal) -> bool {
        is_first(nt, self.current.kind)
    }

    /// Current token can follow `nt`
    pub(super) fn follow(&self, nt: NonTerminal) -> bool {
        is_follow(nt, self.current.kind)
    }

    /// Consume a terminal, or report it missing and stay put
    pub(super) fn expect(&mut self, kind: Terminal) -> Option<Token> {
        if self.check(kind) {
            let token = self.current.clone();
            self.advance();
            Some(token)
        } else {
            self.syntax_error(Kind::ExpectedBefore(kind, self.current.quoted()));
            None
        }
    }

    /// Skip at least one token, then up to one that starts or follows `nt`
    pub(super) fn recover(&mut self, nt: NonTerminal) {
        loop {
            self.advance();
            if self.check(Terminal::End) || self.first(nt) || self.follow(nt) {
                trace!("recovered at {:?} for {}", self.current.kind, nt);
                return;
            }
        }
    }

    /// Identifier with the variable sigil removed
    pub(super) fn name(&self, token: &Token) -> String {
        let lexeme = token.lexeme.as_str();
        lexeme.strip_prefix(self.sigil).unwrap_or(lexeme).to_string()
    }

    /// Run one production, notifying the hook around it
    pub(super) fn rule<T, F: FnOnce(&mut Self) -> T>(&mut self, nt: NonTerminal, f: F) -> T {
        trace!("<{}> at {:?}", nt, self.current.kind);
        self.hook.enter(nt);
        let result = f(self);
        self.hook.exit(nt);
        result
    }
}

// ----------------------------------------------------------------------------
// Diagnostics
// ----------------------------------------------------------------------------

impl<'a, H: Hook> Parser<'a, H> {
    pub(super) fn report(&mut self, kind: Kind, line: usize) {
        self.diags.push(kind, self.function.as_deref(), line);
    }

    /// One syntax error per offending token; at END it always reads as unexpected end
    pub(super) fn syntax_error(&mut self, kind: Kind) {
        if self.error_pos == Some(self.current.pos) {
            return;
        }
        self.error_pos = Some(self.current.pos);
        let kind = match self.current.kind {
            Terminal::End => Kind::UnexpectedEnd,
            _ => kind,
        };
        let line = self.current.pos.row;
        self.report(kind, line);
    }

    /// Reported once per name per function
    pub(super) fn undeclared(&mut self, name: &str, line: usize) {
        if self.undeclared.insert(name.to_string()) {
            self.report(Kind::UndeclaredVariable(name.to_string()), line);
        }
    }

    /// Silence later undeclared reports for a name already diagnosed otherwise
    pub(super) fn forget(&mut self, name: &str) {
        self.undeclared.insert(name.to_string());
    }

    pub(super) fn begin_function(&mut self, name: &str) {
        self.function = Some(name.to_string());
        self.undeclared.clear();
        self.symbols.enter_function_scope();
    }

    pub(super) fn end_function(&mut self) {
        let table = self.symbols.exit_function_scope();
        if let Some(name) = self.function.take() {
            self.hook.scope(&name, &table);
        }
        self.undeclared.clear();
    }
}

/// `check!(parser, A | B)` : current token is one of the terminals
#[macro_export]
macro_rules! check {
    ($parser:expr, $($kind:ident)|+) => {
        matches!($parser.current.kind, $(Terminal::$kind)|+)
    };
}
