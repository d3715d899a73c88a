use lcc::config::LexerConfig;
use lcc::dump::{LexDump, SyntDump};
use lcc::grammer::ast::{Call, Decl, Expr, Instr, Op, Program, Var};
use lcc::{Analysis, Parser};

fn parse(code: &str) -> Analysis<()> {
    let config = LexerConfig::default();
    Parser::new("test.l", code, &config, ()).parse()
}

fn assert(code: &str) -> Program {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    let analysis = parse(code);
    println!("{:#?}", analysis.program);
    print!("{}", analysis.diagnostics);
    assert!(analysis.diagnostics.is_empty(), "Diagnostics found");

    // Printing then parsing again gives the same tree
    let printed = analysis.program.to_string();
    println!("{}", printed);
    assert_eq!(parse(&printed).program, analysis.program);

    // YAML dump reads back
    let yaml = serde_yaml::to_string(&analysis.program).unwrap();
    let back: Program = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, analysis.program);

    analysis.program
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
}

case!(minimal, "main(){}");
case!(globals, "integer x, integer t[10]; main(){ x = t[3]; t[x] = x; }");
case!(
    functions,
    "integer x; f(){ return 1; } main(){ x = f() + 2; write(x); }"
);
case!(
    params_and_locals,
    "add(integer a, integer b) integer c; { c = a + b; return c; } main(){ write(add(1, 2)); }"
);
case!(
    control,
    "main() integer i; { i = 0; while i < 10 do { if i = 5 then { write(i); } else { ; } i = i + 1; } }"
);
case!(io, "main() integer x; { x = read(); write(x * 2); }");
case!(recursion, "fact(integer n) { if n <= 1 then { return 1; } return n * fact(n - 1); } main(){ write(fact(5)); }");
case!(logic, "main() integer a, integer b; { a = !(a | b) & !a; b = (a < b) = (b < a); }");
case!(comments, "# header\nmain() # entry\n{\n    write(1); # one\n}\n");
case!(sigils, "integer $x; main(){ $x = x + 1; }");
case!(sigil_keyword, "integer $if; main(){ $if = 1; }");
case!(sigil_keyword_array, "integer $while[2]; main() integer $do; { $do = $while[1]; write($do); }");

fn body(program: &Program) -> &[Instr] {
    match program.functions.last() {
        Some(Decl::Function(_, _, _, Instr::Block(body))) => body,
        other => panic!("no function body: {:?}", other),
    }
}

fn value(program: &Program) -> &Expr {
    match body(program).first() {
        Some(Instr::Assign(_, value)) => value,
        other => panic!("no assignment: {:?}", other),
    }
}

fn var(name: &str) -> Expr {
    Expr::Var(Var::Simple(name.to_string()))
}

#[test]
fn precedence() {
    let program = assert("main() integer x; { x = 1 + 2 * 3; }");
    assert_eq!(
        value(&program),
        &Expr::binop(Op::Add, Expr::Int(1), Expr::binop(Op::Mul, Expr::Int(2), Expr::Int(3)))
    );

    let program = assert("main() integer a, integer b, integer c; { a = a | b & c; }");
    assert_eq!(
        value(&program),
        &Expr::binop(Op::Or, var("a"), Expr::binop(Op::And, var("b"), var("c")))
    );
}

#[test]
fn left_associative() {
    let program = assert("main() integer x; { x = 1 - 2 - 3; }");
    assert_eq!(
        value(&program),
        &Expr::binop(Op::Sub, Expr::binop(Op::Sub, Expr::Int(1), Expr::Int(2)), Expr::Int(3))
    );

    let program = assert("main() integer x; { x = 8 / 4 * 2; }");
    assert_eq!(
        value(&program),
        &Expr::binop(Op::Mul, Expr::binop(Op::Div, Expr::Int(8), Expr::Int(4)), Expr::Int(2))
    );
}

#[test]
fn comparisons() {
    let program = assert("main() integer a, integer b; { a = a <= b; }");
    assert_eq!(value(&program), &Expr::binop(Op::LessEq, var("a"), var("b")));

    let program = assert("main() integer a, integer b, integer c; { a = a < b = c; }");
    assert_eq!(
        value(&program),
        &Expr::binop(Op::Equal, Expr::binop(Op::Less, var("a"), var("b")), var("c"))
    );
}

#[test]
fn negation() {
    let program = assert("main() integer a, integer b; { a = !a & b; }");
    assert_eq!(
        value(&program),
        &Expr::binop(Op::And, Expr::Not(Box::new(var("a"))), var("b"))
    );
}

#[test]
fn statements() {
    let program = assert(
        "f(integer a) { return a; } main() integer t; { if t then { f(t); } while t do { ; } write(read()); }",
    );
    let call = Call {
        function: "f".to_string(),
        args: vec![var("t")],
    };
    assert_eq!(
        body(&program),
        &[
            Instr::If(
                var("t"),
                Box::new(Instr::Block(vec![Instr::Call(call)])),
                None
            ),
            Instr::While(var("t"), Box::new(Instr::Block(vec![Instr::Empty]))),
            Instr::Write(Expr::Read),
        ]
    );
    assert_eq!(
        program.functions[0],
        Decl::Function(
            "f".to_string(),
            vec![Decl::Var("a".to_string())],
            vec![],
            Instr::Block(vec![Instr::Return(var("a"))])
        )
    );
}

#[test]
fn declarations() {
    let program = assert("integer x, integer $t[4]; main(){}");
    assert_eq!(
        program.variables,
        vec![Decl::Var("x".to_string()), Decl::Array("t".to_string(), 4)]
    );
}

#[test]
fn keyword_names() {
    let program = assert("integer $if, integer x; main(){ $if = x; }");
    let printed = program.to_string();
    assert!(printed.starts_with("integer $if, integer x;"));
    assert!(printed.contains("$if = x;"));
    assert_eq!(
        body(&program),
        &[Instr::Assign(Var::Simple("if".to_string()), var("x"))]
    );
}

#[test]
fn dumps() {
    let config = LexerConfig::default();
    let lex = Parser::new("test.l", "main(){}", &config, LexDump::default()).parse().hook;
    assert_eq!(
        lex.0,
        "1:1 function_id main\n1:5 ( (\n1:6 ) )\n1:7 { {\n1:8 } }\n1:9 END \n"
    );

    let synt = Parser::new("test.l", "main(){}", &config, SyntDump::default()).parse().hook;
    println!("{}", synt.text);
    assert!(synt.text.starts_with("<pg>\n  <vdo>\n  </vdo>\n  <fdl>\n    <fd>\n      <pl>\n"));
    assert!(synt.text.ends_with("  </fdl>\n</pg>\n"));
}
