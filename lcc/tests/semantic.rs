use lcc::grammer::token::Terminal;
use lcc::{Compilation, Config, Kind};

fn assert(code: &str, expects: Vec<Kind>) -> Compilation {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    let compilation = lcc::compile("test.l", code, &Config::default()).unwrap();
    print!("{}", compilation.diagnostics);

    let kinds: Vec<Kind> = compilation.diagnostics.iter().map(|d| d.kind.clone()).collect();
    assert_eq!(kinds, expects);
    assert_eq!(compilation.code.is_some(), !compilation.diagnostics.has_errors());
    compilation
}

macro_rules! case {
    ($name:ident, $code:expr, [$($kind:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            #[allow(unused_imports)]
            use Kind::*;
            assert($code, vec![$($kind),*]);
        }
    };
}

// Scopes
case!(clean, "integer x; f(){ return 1; } main(){ x = f() + 2; write(x); }", []);
case!(undeclared, "main(){ write(y); }", [UndeclaredVariable("y".into())]);
case!(undeclared_once, "main(){ write(y); write(y + 1); }", [UndeclaredVariable("y".into())]);
case!(
    undeclared_per_function,
    "f(){ write(y); } main(){ write(y); }",
    [UndeclaredVariable("y".into()), UndeclaredVariable("y".into())]
);
case!(function_as_variable, "f(){} main() integer x; { x = f; }", [UndeclaredVariable("f".into())]);
case!(locals_leave_scope, "f() integer a; { a = 1; } main(){ a = 2; }", [UndeclaredVariable("a".into())]);
case!(parameter, "f(integer a) { return a; } main(){ write(f(1)); }", []);

// Declarations
case!(redeclared_local, "main() integer a, integer a; { }", [RedeclaredVariable("a".into())]);
case!(redeclared_parameter, "f(integer a) integer a; { } main(){}", [RedeclaredVariable("a".into())]);
case!(redeclared_global, "integer x, integer x; main(){}", [RedeclaredVariable("x".into())]);
case!(shadow, "integer x; main() integer x; { x = 1; }", [VariableAlreadyInGlobalScope("x".into())]);
case!(shadow_parameter, "integer a; f(integer a) { return a; } main(){}", [VariableAlreadyInGlobalScope("a".into())]);
case!(redefinition, "f(){} f(){} main(){}", [FunctionRedefinition("f".into())]);
case!(redefinition_of_variable, "integer f; f(){} main(){}", [FunctionRedefinition("f".into())]);
case!(local_array, "main() integer t[3]; { t[0] = 1; }", [WrongArrayDeclaration]);
case!(parameter_array, "f(integer t[2]){} main(){}", [WrongArrayDeclaration]);
case!(unknown_type, "int x; main(){ x = 1; }", [UnknownTypeName("int".into())]);
case!(array_size, "integer t[n]; main(){}", [UndeclaredVariable("n".into())]);
case!(reserved_global, "integer __e0; main(){ __e0 = 1 < 2; }", [ReservedIdentifier("__e0".into())]);
case!(reserved_local, "main() integer __while0; { __while0 = 1; }", [ReservedIdentifier("__while0".into())]);
case!(reserved_parameter, "f(integer __a){ return __a; } main(){}", [ReservedIdentifier("__a".into())]);
case!(reserved_function, "__start(){} main(){}", [ReservedIdentifier("__start".into())]);
case!(single_underscore, "integer _e0; main(){ _e0 = 1 < 2; }", []);

// Main
case!(no_main, "f(){ }", [UndefinedMain]);
case!(empty_source, "", [UndefinedMain]);
case!(main_with_parameter, "main(integer a){ }", [TooManyArgs("main".into())]);

// Calls
case!(too_many_args, "f(integer a){ } main(){ f(1, 2); }", [TooManyArgs("f".into())]);
case!(too_few_args, "f(integer a, integer b){ } main(){ f(1); }", [TooFewArgs("f".into())]);
case!(undeclared_function, "main(){ g(); }", [UndeclaredFunction("g".into())]);
case!(declared_later, "main(){ g(); } g(){}", [UndeclaredFunction("g".into())]);
case!(recursive, "f(integer n){ return f(n - 1); } main(){ }", []);

// Arrays
case!(array_without_index, "integer t[4]; main(){ t = 1; }", [WrongArrayAssignment("t".into())]);
case!(scalar_with_index, "integer x; main(){ x[0] = 1; }", [WrongIntegerAssignment("x".into())]);
case!(
    operands,
    "integer x, integer t[2]; main(){ x = t + x[1]; }",
    [WrongArrayAssignment("t".into()), WrongIntegerAssignment("x".into())]
);

// Syntax
case!(missing_semicolon, "main(){ write(1) }", [ExpectedBefore(Terminal::Semicolon, "}".into())]);
case!(unexpected_end, "main(){ write(1);", [UnexpectedEnd]);
case!(bad_statement, "main(){ ) write(1); }", [ExpectedStatement(")".into())]);
case!(stray_do, "main(){ do write(1); }", [ExpectedWhileKeyword("do".into())]);
case!(missing_expression, "main() integer x; { x = ; }", [ExpectedExpression(";".into())]);
case!(missing_equal, "main() integer x; { x 1; }", [ExpectedAssignmentOrExpression("1".into())]);
case!(greater, "main() integer x; { x = 1 > 2; }", [ExpectedBefore(Terminal::Semicolon, ">".into())]);
case!(missing_paren, "main(){ write 1); }", [ExpectedBeforeExpression(Terminal::LParen)]);
case!(
    missing_comma,
    "f(integer a){} main(){ f(1 2); }",
    [ExpectedEitherBefore(Terminal::Comma, Terminal::RParen, "2".into())]
);
case!(top_level, "main(){} ; f(){}", [ExpectedBefore(Terminal::FctId, ";".into())]);
case!(overflow, "main(){ write(99999999999); }", [IntegerOverflow("99999999999".into())]);
case!(
    unrecognized,
    "main(){ write(@); }",
    [UndeclaredVariable("@".into()), ExpectedExpression(")".into())]
);

#[test]
fn shadow_still_compiles() {
    let compilation = assert(
        "integer x; main() integer x; { x = 1; }",
        vec![Kind::VariableAlreadyInGlobalScope("x".into())],
    );
    assert!(compilation.succeeded());
    assert!(compilation.code.is_some());
}

#[test]
fn rendering() {
    let compilation = assert(
        "main()\n{\n    write(y);\n}\n",
        vec![Kind::UndeclaredVariable("y".into())],
    );
    assert_eq!(
        compilation.diagnostics.to_string(),
        "test.l: In function 'main':\ntest.l:3: error: 'y' undeclared (first use in this function)\n"
    );

    let compilation = assert("f(){ }", vec![Kind::UndefinedMain]);
    assert_eq!(
        compilation.diagnostics.to_string(),
        "test.l:1: error: undefined reference to 'main'\n"
    );
}

#[test]
fn primary() {
    let compilation = assert(
        "f(){ write(a); write(b); } main(){ write(c); }",
        vec![
            Kind::UndeclaredVariable("a".into()),
            Kind::UndeclaredVariable("b".into()),
            Kind::UndeclaredVariable("c".into()),
        ],
    );
    let flags: Vec<bool> = compilation.diagnostics.iter().map(|d| d.is_primary).collect();
    assert_eq!(flags, vec![true, false, true]);
}

#[test]
fn idempotent() {
    let code = "integer t[3]; f(integer a){ t[a] = a; } main(){ f(1); write(t[1]); write(z); }";
    let first = lcc::compile("test.l", code, &Config::default()).unwrap();
    let second = lcc::compile("test.l", code, &Config::default()).unwrap();
    assert_eq!(first.diagnostics.to_string(), second.diagnostics.to_string());
    assert_eq!(first.program, second.program);
}
