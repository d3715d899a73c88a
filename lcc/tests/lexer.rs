use lcc::config::LexerConfig;
use lcc::grammer::token::Terminal;
use lcc::Lexer;

fn assert_with(config: &LexerConfig, code: &str, expects: Vec<Terminal>, garbage: Vec<&str>) {
    let (tokens, unrecognized) = Lexer::new(code, config).tokenize();

    println!(" {code}");
    for token in &tokens {
        print!("\r\x1b[{}C^", token.pos.col);
    }
    println!();
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:?} {:?}", idx, token.kind, token.lexeme);
    }
    for text in &unrecognized {
        println!(" ?: {:?}", text);
    }

    let kinds: Vec<Terminal> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(kinds, expects);
    let texts: Vec<&str> = unrecognized.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, garbage);
}

fn assert(code: &str, expects: Vec<Terminal>) {
    assert_with(&LexerConfig::default(), code, expects, vec![]);
}

macro_rules! case {
    ($name:ident, $code:expr, [$($kind:ident),* $(,)?]) => {
        #[test]
        fn $name() {
            use Terminal::*;
            assert($code, vec![$($kind),*]);
        }
    };
}

case!(
    program,
    "integer x; f(){ return 1; }",
    [Integer, VarId, Semicolon, FctId, LParen, RParen, LCurly, Return, Number, Semicolon, RCurly, End]
);
case!(comment, "$x <= 10 # x <= 10\n", [VarId, LAngle, Equal, Number, End]);
case!(io, "write(read());", [Write, LParen, Read, LParen, RParen, RParen, Semicolon, End]);
case!(control, "if a then {} else {}", [If, VarId, Then, LCurly, RCurly, Else, LCurly, RCurly, End]);
case!(loops, "while i < 3 do { }", [While, VarId, LAngle, Number, Do, LCurly, RCurly, End]);
case!(function_id, "f(x, y)", [FctId, LParen, VarId, Comma, VarId, RParen, End]);
case!(spaced_call, "f (x)", [VarId, LParen, VarId, RParen, End]);
case!(main_is_function, "main() { }", [FctId, LParen, RParen, LCurly, RCurly, End]);
case!(sigil_keyword, "$if = 1;", [VarId, Equal, Number, Semicolon, End]);
case!(symbols, "[]+-*/<>&|!", [LBracket, RBracket, Plus, Minus, Star, Slash, LAngle, RAngle, Ampasand, Pipe, Excl, End]);
case!(end_inside_identifier, "x = y", [VarId, Equal, End]);
case!(empty, "  \n\t ", [End]);

#[test]
fn unrecognized() {
    use Terminal::*;
    let config = LexerConfig::default();
    assert_with(&config, "x = 3 @ ;", vec![VarId, Equal, Number, Semicolon, End], vec!["@"]);
    assert_with(&config, "x = 9abc;", vec![VarId, Equal, Number, VarId, Semicolon, End], vec![]);
}

#[test]
fn strict_sigil() {
    use Terminal::*;
    let config = LexerConfig {
        sigil_required: true,
        ..Default::default()
    };
    assert_with(&config, "$x = y;", vec![VarId, Equal, Semicolon, End], vec!["y"]);
    assert_with(&config, "f($a);", vec![FctId, LParen, VarId, RParen, Semicolon, End], vec![]);
}

#[test]
fn identifier_length() {
    use Terminal::*;
    let config = LexerConfig {
        max_ident_len: 4,
        ..Default::default()
    };
    assert_with(&config, "abcd abcde;", vec![VarId, Semicolon, End], vec!["abcde"]);
}

#[test]
fn lexemes() {
    let config = LexerConfig::default();
    let (tokens, _) = Lexer::new("$count = 042;", &config).tokenize();
    assert_eq!(tokens[0].lexeme, "$count");
    assert_eq!(tokens[2].lexeme, "042");
    assert_eq!(tokens[4].quoted(), "END");
}
