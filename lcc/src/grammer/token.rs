use bimap::BiMap;
use once_cell::sync::Lazy;
use strum::{Display, EnumCount, EnumIter};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: Terminal,
    pub lexeme: String,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: Terminal, lexeme: impl Into<String>, pos: Pos) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            pos,
        }
    }

    pub fn end(pos: Pos) -> Self {
        Token::new(Terminal::End, "", pos)
    }

    /// Name of the token class, as written in diagnostics
    pub fn display_name(&self) -> String {
        self.kind.to_string()
    }

    /// Text quoted in "before 'T' token" messages
    pub fn quoted(&self) -> String {
        match self.kind {
            Terminal::End => self.display_name(),
            _ => self.lexeme.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter)]
pub enum Terminal {
    // Keywords
    #[strum(to_string = "if")]
    If,
    #[strum(to_string = "then")]
    Then,
    #[strum(to_string = "else")]
    Else,
    #[strum(to_string = "while")]
    While,
    #[strum(to_string = "do")]
    Do,
    #[strum(to_string = "return")]
    Return,
    #[strum(to_string = "read")]
    Read,
    #[strum(to_string = "write")]
    Write,
    #[strum(to_string = "main")]
    Main,

    // Identifiers and literals
    #[strum(to_string = "var_id")]
    VarId,
    #[strum(to_string = "function_id")]
    FctId,
    #[strum(to_string = "number")]
    Number,

    // Single character tokens
    #[strum(to_string = "(")]
    LParen,
    #[strum(to_string = ")")]
    RParen,
    #[strum(to_string = "{")]
    LCurly,
    #[strum(to_string = "}")]
    RCurly,
    #[strum(to_string = ";")]
    Semicolon,
    #[strum(to_string = "[")]
    LBracket,
    #[strum(to_string = "]")]
    RBracket,
    #[strum(to_string = ",")]
    Comma,
    #[strum(to_string = "=")]
    Equal,
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "*")]
    Star,
    #[strum(to_string = "/")]
    Slash,
    #[strum(to_string = "<")]
    LAngle,
    #[strum(to_string = ">")]
    RAngle,
    #[strum(to_string = "&")]
    Ampasand,
    #[strum(to_string = "|")]
    Pipe,
    #[strum(to_string = "!")]
    Excl,

    // Special
    #[strum(to_string = "END")]
    End,
    #[strum(to_string = "integer")]
    Integer,
    #[strum(to_string = "epsilon")]
    Epsilon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

pub static SYMBOLS: Lazy<BiMap<char, Terminal>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert('(', Terminal::LParen);
    map.insert(')', Terminal::RParen);
    map.insert('{', Terminal::LCurly);
    map.insert('}', Terminal::RCurly);
    map.insert(';', Terminal::Semicolon);
    map.insert('[', Terminal::LBracket);
    map.insert(']', Terminal::RBracket);
    map.insert(',', Terminal::Comma);
    map.insert('=', Terminal::Equal);
    map.insert('+', Terminal::Plus);
    map.insert('-', Terminal::Minus);
    map.insert('*', Terminal::Star);
    map.insert('/', Terminal::Slash);
    map.insert('<', Terminal::LAngle);
    map.insert('>', Terminal::RAngle);
    map.insert('&', Terminal::Ampasand);
    map.insert('|', Terminal::Pipe);
    map.insert('!', Terminal::Excl);
    map
});

pub static KEYWORDS: Lazy<BiMap<&'static str, Terminal>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert("if", Terminal::If);
    map.insert("then", Terminal::Then);
    map.insert("else", Terminal::Else);
    map.insert("while", Terminal::While);
    map.insert("do", Terminal::Do);
    map.insert("return", Terminal::Return);
    map.insert("integer", Terminal::Integer);
    map.insert("read", Terminal::Read);
    map.insert("write", Terminal::Write);
    map
});

pub fn symbol(ch: char) -> Option<Terminal> {
    SYMBOLS.get_by_left(&ch).copied()
}

pub fn keyword(word: &str) -> Option<Terminal> {
    KEYWORDS.get_by_left(word).copied()
}
