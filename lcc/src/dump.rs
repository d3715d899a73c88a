use crate::config::DumpConfig;
use crate::grammer::rules::NonTerminal;
use crate::grammer::token::Token;
use crate::symbols::{print_table, Table};

/// Observer of one analysis. Every method defaults to doing nothing.
pub trait Hook {
    fn token(&mut self, _token: &Token) {}
    fn enter(&mut self, _rule: NonTerminal) {}
    fn exit(&mut self, _rule: NonTerminal) {}
    /// Local table of a function, right before it is discarded
    fn scope(&mut self, _function: &str, _table: &Table) {}
    fn globals(&mut self, _table: &Table) {}
}

impl Hook for () {}

/// `row:col name lexeme`, one token per line
#[derive(Debug, Default)]
pub struct LexDump(pub String);

impl Hook for LexDump {
    fn token(&mut self, token: &Token) {
        self.0.push_str(&format!(
            "{}:{} {} {}\n",
            token.pos.row,
            token.pos.col,
            token.display_name(),
            token.lexeme
        ));
    }
}

/// Nested `<rule>` ... `</rule>` trace of the productions
#[derive(Debug, Default)]
pub struct SyntDump {
    pub text: String,
    depth: usize,
}

impl Hook for SyntDump {
    fn enter(&mut self, rule: NonTerminal) {
        self.text.push_str(&format!("{}<{}>\n", "  ".repeat(self.depth), rule));
        self.depth += 1;
    }

    fn exit(&mut self, rule: NonTerminal) {
        self.depth = self.depth.saturating_sub(1);
        self.text.push_str(&format!("{}</{}>\n", "  ".repeat(self.depth), rule));
    }
}

#[derive(Debug, Default)]
pub struct SymbDump(pub String);

impl Hook for SymbDump {
    fn scope(&mut self, function: &str, table: &Table) {
        self.0.push_str(&print_table(function, table));
    }

    fn globals(&mut self, table: &Table) {
        self.0.push_str(&print_table("global", table));
    }
}

/// The dumps enabled by the configuration
#[derive(Debug, Default)]
pub struct Dumps {
    pub lex: Option<LexDump>,
    pub synt: Option<SyntDump>,
    pub symb: Option<SymbDump>,
}

impl Dumps {
    pub fn new(config: &DumpConfig) -> Self {
        Self {
            lex: config.lex.then(LexDump::default),
            synt: config.synt.then(SyntDump::default),
            symb: config.symb.then(SymbDump::default),
        }
    }
}

impl Hook for Dumps {
    fn token(&mut self, token: &Token) {
        if let Some(lex) = &mut self.lex {
            lex.token(token);
        }
    }

    fn enter(&mut self, rule: NonTerminal) {
        if let Some(synt) = &mut self.synt {
            synt.enter(rule);
        }
    }

    fn exit(&mut self, rule: NonTerminal) {
        if let Some(synt) = &mut self.synt {
            synt.exit(rule);
        }
    }

    fn scope(&mut self, function: &str, table: &Table) {
        if let Some(symb) = &mut self.symb {
            symb.scope(function, table);
        }
    }

    fn globals(&mut self, table: &Table) {
        if let Some(symb) = &mut self.symb {
            symb.globals(table);
        }
    }
}

#[test]
fn test() {
    use crate::grammer::token::{Pos, Terminal};

    let mut dumps = Dumps::new(&DumpConfig {
        lex: true,
        synt: true,
        ..Default::default()
    });
    dumps.token(&Token::new(Terminal::VarId, "$x", Pos::new(2, 5)));
    dumps.enter(NonTerminal::Pg);
    dumps.enter(NonTerminal::Vdo);
    dumps.exit(NonTerminal::Vdo);
    dumps.exit(NonTerminal::Pg);

    assert!(dumps.symb.is_none());
    assert_eq!(dumps.lex.map(|d| d.0), Some("2:5 var_id $x\n".to_string()));
    assert_eq!(
        dumps.synt.map(|d| d.text),
        Some("<pg>\n  <vdo>\n  </vdo>\n</pg>\n".to_string())
    );
}
