use super::token::{keyword, symbol, Pos, Terminal, Token};
use crate::config::LexerConfig;
use std::iter::Peekable;
use std::str::Chars;

/// Text that starts no token, reported as an undeclared variable
#[derive(Debug, Clone, PartialEq)]
pub struct Unrecognized {
    pub text: String,
    pub pos: Pos,
}

pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    config: &'a LexerConfig,
    row: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str, config: &'a LexerConfig) -> Self {
        Self {
            iter: code.chars().peekable(),
            config,
            row: 1,
            col: 1,
        }
    }

    /// Scan the whole input, END token included
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Unrecognized>) {
        let mut tokens = Vec::new();
        let mut garbage = Vec::new();
        loop {
            match self.next_token() {
                Ok(token) if token.kind == Terminal::End => {
                    tokens.push(token);
                    return (tokens, garbage);
                }
                Ok(token) => tokens.push(token),
                Err(text) => garbage.push(text),
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek(&mut self) -> Option<char> {
        self.iter.peek().copied()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn consume_if<F: Fn(char) -> bool>(&mut self, cond: F) -> Option<char> {
        match self.peek() {
            Some(ch) if cond(ch) => self.consume(),
            _ => None,
        }
    }

    fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }
}

// ----------------------------------------------------------------------------
// Scanner
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    pub fn next_token(&mut self) -> Result<Token, Unrecognized> {
        loop {
            // 0. Skip whitespaces
            while self.consume_if(char::is_whitespace).is_some() {}

            let pos = self.pos();

            // 1. End of input
            let Some(ch) = self.peek() else {
                return Ok(Token::end(pos));
            };

            // 2. Comment
            if ch == self.config.comment {
                while let Some(ch) = self.consume() {
                    if ch == '\n' {
                        break;
                    }
                }
                continue;
            }

            // 3. Single character token
            if let Some(kind) = symbol(ch) {
                self.consume();
                return Ok(Token::new(kind, ch.to_string(), pos));
            }

            // 4. Number literal
            if ch.is_ascii_digit() {
                let mut lexeme = String::new();
                while let Some(ch) = self.consume_if(|ch| ch.is_ascii_digit()) {
                    lexeme.push(ch);
                }
                return Ok(Token::new(Terminal::Number, lexeme, pos));
            }

            // 5. Identifier or keyword
            if ch == self.config.sigil || ch.is_ascii_alphabetic() || ch == '_' {
                return self.word(pos);
            }

            // 6. Anything else
            return Err(self.garbage(String::new(), pos));
        }
    }

    fn word(&mut self, pos: Pos) -> Result<Token, Unrecognized> {
        let sigil = self.config.sigil;
        let mut lexeme = String::new();
        if let Some(ch) = self.consume_if(|ch| ch == sigil) {
            lexeme.push(ch);
        }
        while let Some(ch) = self.consume_if(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            lexeme.push(ch);
        }

        let has_sigil = lexeme.starts_with(sigil);
        let name = lexeme.trim_start_matches(sigil);
        if !name.starts_with(|ch: char| ch.is_ascii_alphabetic() || ch == '_') {
            return Err(self.garbage(lexeme, pos));
        }

        if !has_sigil {
            if let Some(kind) = keyword(&lexeme) {
                return Ok(Token::new(kind, lexeme, pos));
            }
        }

        // 5.1 Input ends inside an identifier
        let Some(next) = self.peek() else {
            return Ok(Token::end(self.pos()));
        };

        if lexeme.chars().count() > self.config.max_ident_len {
            return Err(Unrecognized { text: lexeme, pos });
        }

        if !has_sigil && next == '(' {
            Ok(Token::new(Terminal::FctId, lexeme, pos))
        } else if has_sigil || !self.config.sigil_required {
            Ok(Token::new(Terminal::VarId, lexeme, pos))
        } else {
            Err(Unrecognized { text: lexeme, pos })
        }
    }

    /// Buffer text up to the next whitespace or symbol
    fn garbage(&mut self, mut text: String, pos: Pos) -> Unrecognized {
        if text.is_empty() {
            if let Some(ch) = self.consume() {
                text.push(ch);
            }
        }
        while let Some(ch) = self.consume_if(|ch| !ch.is_whitespace() && symbol(ch).is_none()) {
            text.push(ch);
        }
        Unrecognized { text, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let config = LexerConfig::default();
        let (tokens, garbage) = Lexer::new("main()\n{ write(1); }", &config).tokenize();
        assert!(garbage.is_empty());
        assert_eq!(tokens[0].pos, Pos::new(1, 1));
        assert_eq!(tokens[3].pos, Pos::new(2, 1));
        assert_eq!(tokens[4].kind, Terminal::Write);
        assert_eq!(tokens[4].pos, Pos::new(2, 3));
    }

    #[test]
    fn test_garbage() {
        let config = LexerConfig::default();
        let (tokens, garbage) = Lexer::new("x = @@y + 1;", &config).tokenize();
        assert_eq!(garbage.len(), 1);
        assert_eq!(garbage[0].text, "@@y");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        use Terminal::*;
        assert_eq!(kinds, vec![VarId, Equal, Plus, Number, Semicolon, End]);
    }
}
