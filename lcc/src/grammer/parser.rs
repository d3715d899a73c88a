use super::ast::{Call, Decl, Expr, Instr, Op, Program, Var};
use super::parsercore::Parser;
use super::rules::NonTerminal as N;
use super::token::{Terminal, Token};
use crate::check;
use crate::compile::RESERVED;
use crate::diag::Kind;
use crate::dump::Hook;
use crate::symbols::{Scope, SymbolKind};

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

impl<'a, H: Hook> Parser<'a, H> {
    /// pg = vdo fdl
    pub(super) fn parse_pg(&mut self) -> Program {
        self.rule(N::Pg, |p| {
            let variables = p.parse_vdo();
            let functions = p.parse_fdl();

            let main = Terminal::Main.to_string();
            let line = p.current.pos.row;
            match p.arity(&main) {
                Some(0) => {}
                Some(_) => p.report(Kind::TooManyArgs(main), line),
                None => p.report(Kind::UndefinedMain, line),
            }

            p.hook.globals(p.symbols.globals());
            Program {
                variables,
                functions,
            }
        })
    }

    /// vdo = vdl ";" | ε
    fn parse_vdo(&mut self) -> Vec<Decl> {
        self.rule(N::Vdo, |p| {
            if !check!(p, Integer | VarId) {
                return Vec::new();
            }
            let decls = p.parse_vdl();
            p.expect(Terminal::Semicolon);
            decls
        })
    }

    /// vdl = vd vdlb
    fn parse_vdl(&mut self) -> Vec<Decl> {
        self.rule(N::Vdl, |p| {
            let mut decls = Vec::new();
            decls.extend(p.parse_vd());
            p.parse_vdlb(&mut decls);
            decls
        })
    }

    /// vdlb = "," vd vdlb | ε
    fn parse_vdlb(&mut self, decls: &mut Vec<Decl>) {
        self.rule(N::Vdlb, |p| {
            if p.check(Terminal::Comma) {
                p.advance();
                decls.extend(p.parse_vd());
                p.parse_vdlb(decls);
            }
        })
    }

    /// vd = "integer" var_id oas
    fn parse_vd(&mut self) -> Option<Decl> {
        self.rule(N::Vd, |p| {
            if p.check(Terminal::VarId) {
                let line = p.current.pos.row;
                p.report(Kind::UnknownTypeName(p.current.lexeme.clone()), line);
                p.advance();
            } else {
                p.expect(Terminal::Integer);
            }
            let token = p.expect(Terminal::VarId)?;
            let size = p.parse_oas();
            p.declare(&token, size)
        })
    }

    /// oas = "[" number "]" | ε
    fn parse_oas(&mut self) -> Option<usize> {
        self.rule(N::Oas, |p| {
            if !p.check(Terminal::LBracket) {
                return None;
            }
            p.advance();
            let size = if p.check(Terminal::Number) {
                let size = p.number();
                p.advance();
                size.map(|n| n.max(0) as usize)
            } else {
                let line = p.current.pos.row;
                p.report(Kind::UndeclaredVariable(p.current.quoted()), line);
                if !check!(p, RBracket | Semicolon | Comma | End) {
                    p.advance();
                }
                None
            };
            p.expect(Terminal::RBracket);
            size
        })
    }

    /// Enter a variable in the active scope
    fn declare(&mut self, token: &Token, size: Option<usize>) -> Option<Decl> {
        let name = self.name(token);
        let line = token.pos.row;
        let scope = self.symbols.scope();
        self.reserved(&name, line);

        let (kind, decl) = match size {
            Some(size) => (SymbolKind::Array, Decl::Array(name.clone(), size)),
            None => (SymbolKind::Scalar, Decl::Var(name.clone())),
        };
        if scope != Scope::Global && kind == SymbolKind::Array {
            self.report(Kind::WrongArrayDeclaration, line);
            self.forget(&name);
            return None;
        }

        let shadows = scope != Scope::Global && self.symbols.search_global(&name).is_some();
        match self.symbols.declare(&name, kind, size.unwrap_or(0)) {
            Ok(_) => {
                if shadows {
                    self.report(Kind::VariableAlreadyInGlobalScope(name), line);
                }
                Some(decl)
            }
            Err(_) => {
                self.report(Kind::RedeclaredVariable(name), line);
                None
            }
        }
    }

    /// Names starting like generated labels would collide with them in the output
    fn reserved(&mut self, name: &str, line: usize) {
        if name.starts_with(RESERVED) {
            self.report(Kind::ReservedIdentifier(name.to_string()), line);
        }
    }

    /// fdl = fd fdl | ε
    fn parse_fdl(&mut self) -> Vec<Decl> {
        self.rule(N::Fdl, |p| {
            let mut functions = Vec::new();
            while !p.check(Terminal::End) {
                if p.first(N::Fd) {
                    functions.push(p.parse_fd());
                } else {
                    p.syntax_error(Kind::ExpectedBefore(Terminal::FctId, p.current.quoted()));
                    p.recover(N::Fdl);
                }
            }
            functions
        })
    }

    /// fd = function_id pl vdo bi
    fn parse_fd(&mut self) -> Decl {
        self.rule(N::Fd, |p| {
            p.advance();
            let token = p.previous.clone();
            let name = token.lexeme.clone();
            p.begin_function(&name);
            p.reserved(&name, token.pos.row);

            p.symbols.set_scope(Scope::Argument);
            let params = p.parse_pl();
            let fresh = p.symbols.search_global(&name).is_none()
                && p.symbols.declare_function(&name, params.len()).is_ok();
            if !fresh {
                p.report(Kind::FunctionRedefinition(name.clone()), token.pos.row);
            }

            p.symbols.set_scope(Scope::Local);
            let locals = p.parse_vdo();
            let body = p.parse_bi();
            p.end_function();
            Decl::Function(name, params, locals, body)
        })
    }

    /// pl = "(" vdlo ")"
    fn parse_pl(&mut self) -> Vec<Decl> {
        self.rule(N::Pl, |p| {
            p.expect(Terminal::LParen);
            let params = p.parse_vdlo();
            p.expect(Terminal::RParen);
            params
        })
    }

    /// vdlo = vdl | ε
    fn parse_vdlo(&mut self) -> Vec<Decl> {
        self.rule(N::Vdlo, |p| {
            if check!(p, Integer | VarId) {
                p.parse_vdl()
            } else {
                if !p.follow(N::Vdlo) {
                    p.syntax_error(Kind::ExpectedBefore(Terminal::RParen, p.current.quoted()));
                }
                Vec::new()
            }
        })
    }
}

// ----------------------------------------------------------------------------
// Instructions
// ----------------------------------------------------------------------------

impl<'a, H: Hook> Parser<'a, H> {
    /// i = assi | bi | ifi | whilei | calli | reti | writei | emptyi
    fn parse_i(&mut self) -> Instr {
        self.rule(N::I, |p| match p.current.kind {
            Terminal::VarId => p.parse_assi(),
            Terminal::LCurly => p.parse_bi(),
            Terminal::If => p.parse_ifi(),
            Terminal::While => p.parse_whilei(),
            Terminal::FctId => p.parse_calli(),
            Terminal::Return => p.parse_reti(),
            Terminal::Write => p.parse_writei(),
            Terminal::Semicolon => p.parse_emptyi(),
            _ => {
                p.syntax_error(Kind::ExpectedStatement(p.current.quoted()));
                Instr::Empty
            }
        })
    }

    /// assi = var "=" exp ";"
    fn parse_assi(&mut self) -> Instr {
        self.rule(N::Assi, |p| {
            let var = p.parse_var();
            if p.check(Terminal::Equal) {
                p.advance();
            } else {
                p.syntax_error(Kind::ExpectedAssignmentOrExpression(p.current.quoted()));
            }
            let value = p.parse_exp();
            p.expect(Terminal::Semicolon);
            Instr::Assign(var, value)
        })
    }

    /// bi = "{" il "}"
    fn parse_bi(&mut self) -> Instr {
        self.rule(N::Bi, |p| {
            p.expect(Terminal::LCurly);
            let body = p.parse_il();
            p.expect(Terminal::RCurly);
            Instr::Block(body)
        })
    }

    /// il = i il | ε
    fn parse_il(&mut self) -> Vec<Instr> {
        self.rule(N::Il, |p| {
            let mut body = Vec::new();
            loop {
                if p.first(N::I) {
                    body.push(p.parse_i());
                } else if p.follow(N::Il) || p.check(Terminal::End) {
                    return body;
                } else {
                    let kind = match p.current.kind {
                        Terminal::Do => Kind::ExpectedWhileKeyword(p.current.quoted()),
                        _ => Kind::ExpectedStatement(p.current.quoted()),
                    };
                    p.syntax_error(kind);
                    p.recover(N::Il);
                }
            }
        })
    }

    /// ifi = "if" exp "then" bi elseo
    fn parse_ifi(&mut self) -> Instr {
        self.rule(N::Ifi, |p| {
            p.advance();
            let cond = p.parse_exp();
            p.expect(Terminal::Then);
            let then = p.parse_bi();
            let otherwise = p.parse_elseo();
            Instr::If(cond, Box::new(then), otherwise)
        })
    }

    /// elseo = "else" bi | ε
    fn parse_elseo(&mut self) -> Option<Box<Instr>> {
        self.rule(N::Elseo, |p| {
            if p.check(Terminal::Else) {
                p.advance();
                Some(Box::new(p.parse_bi()))
            } else {
                None
            }
        })
    }

    /// whilei = "while" exp "do" bi
    fn parse_whilei(&mut self) -> Instr {
        self.rule(N::Whilei, |p| {
            p.advance();
            let cond = p.parse_exp();
            p.expect(Terminal::Do);
            let body = p.parse_bi();
            Instr::While(cond, Box::new(body))
        })
    }

    /// calli = fcall ";"
    fn parse_calli(&mut self) -> Instr {
        self.rule(N::Calli, |p| {
            let call = p.parse_fcall();
            p.expect(Terminal::Semicolon);
            Instr::Call(call)
        })
    }

    /// reti = "return" exp ";"
    fn parse_reti(&mut self) -> Instr {
        self.rule(N::Reti, |p| {
            p.advance();
            let value = p.parse_exp();
            p.expect(Terminal::Semicolon);
            Instr::Return(value)
        })
    }

    /// writei = "write" "(" exp ")" ";"
    fn parse_writei(&mut self) -> Instr {
        self.rule(N::Writei, |p| {
            p.advance();
            if !p.check(Terminal::LParen) && p.first(N::Exp) {
                p.syntax_error(Kind::ExpectedBeforeExpression(Terminal::LParen));
            } else {
                p.expect(Terminal::LParen);
            }
            let value = p.parse_exp();
            p.expect(Terminal::RParen);
            p.expect(Terminal::Semicolon);
            Instr::Write(value)
        })
    }

    /// emptyi = ";"
    fn parse_emptyi(&mut self) -> Instr {
        self.rule(N::Emptyi, |p| {
            p.advance();
            Instr::Empty
        })
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<'a, H: Hook> Parser<'a, H> {
    /// exp = conj expb
    fn parse_exp(&mut self) -> Expr {
        self.rule(N::Exp, |p| {
            if !p.first(N::Exp) {
                p.syntax_error(Kind::ExpectedExpression(p.current.quoted()));
                return Expr::Int(0);
            }
            let lhs = p.parse_conj();
            p.parse_expb(lhs)
        })
    }

    /// expb = "|" conj expb | ε
    fn parse_expb(&mut self, lhs: Expr) -> Expr {
        self.rule(N::Expb, |p| {
            if !p.check(Terminal::Pipe) {
                return lhs;
            }
            p.advance();
            let rhs = p.parse_conj();
            p.parse_expb(Expr::binop(Op::Or, lhs, rhs))
        })
    }

    /// conj = comp conjb
    fn parse_conj(&mut self) -> Expr {
        self.rule(N::Conj, |p| {
            let lhs = p.parse_comp();
            p.parse_conjb(lhs)
        })
    }

    /// conjb = "&" comp conjb | ε
    fn parse_conjb(&mut self, lhs: Expr) -> Expr {
        self.rule(N::Conjb, |p| {
            if !p.check(Terminal::Ampasand) {
                return lhs;
            }
            p.advance();
            let rhs = p.parse_comp();
            p.parse_conjb(Expr::binop(Op::And, lhs, rhs))
        })
    }

    /// comp = e compb
    fn parse_comp(&mut self) -> Expr {
        self.rule(N::Comp, |p| {
            let lhs = p.parse_e();
            p.parse_compb(lhs)
        })
    }

    /// compb = "=" e compb | "<" e compb | ε
    ///
    /// `<` directly followed by `=` reads as one `<=`.
    fn parse_compb(&mut self, lhs: Expr) -> Expr {
        self.rule(N::Compb, |p| {
            let op = match p.current.kind {
                Terminal::Equal => Op::Equal,
                Terminal::LAngle => Op::Less,
                _ => return lhs,
            };
            p.advance();
            let op = if op == Op::Less && p.check(Terminal::Equal) {
                p.advance();
                Op::LessEq
            } else {
                op
            };
            let rhs = p.parse_e();
            p.parse_compb(Expr::binop(op, lhs, rhs))
        })
    }

    /// e = t eb
    fn parse_e(&mut self) -> Expr {
        self.rule(N::E, |p| {
            let lhs = p.parse_t();
            p.parse_eb(lhs)
        })
    }

    /// eb = "+" t eb | "-" t eb | ε
    fn parse_eb(&mut self, lhs: Expr) -> Expr {
        self.rule(N::Eb, |p| {
            let op = match p.current.kind {
                Terminal::Plus => Op::Add,
                Terminal::Minus => Op::Sub,
                _ => return lhs,
            };
            p.advance();
            let rhs = p.parse_t();
            p.parse_eb(Expr::binop(op, lhs, rhs))
        })
    }

    /// t = neg tb
    fn parse_t(&mut self) -> Expr {
        self.rule(N::T, |p| {
            let lhs = p.parse_neg();
            p.parse_tb(lhs)
        })
    }

    /// tb = "*" neg tb | "/" neg tb | ε
    fn parse_tb(&mut self, lhs: Expr) -> Expr {
        self.rule(N::Tb, |p| {
            let op = match p.current.kind {
                Terminal::Star => Op::Mul,
                Terminal::Slash => Op::Div,
                _ => return lhs,
            };
            p.advance();
            let rhs = p.parse_neg();
            p.parse_tb(Expr::binop(op, lhs, rhs))
        })
    }

    /// neg = "!" neg | f
    fn parse_neg(&mut self) -> Expr {
        self.rule(N::Neg, |p| {
            if p.check(Terminal::Excl) {
                p.advance();
                Expr::Not(Box::new(p.parse_neg()))
            } else {
                p.parse_f()
            }
        })
    }

    /// f = "(" exp ")" | number | fcall | var | "read" "(" ")"
    fn parse_f(&mut self) -> Expr {
        self.rule(N::F, |p| match p.current.kind {
            Terminal::LParen => {
                p.advance();
                let expr = p.parse_exp();
                p.expect(Terminal::RParen);
                expr
            }
            Terminal::Number => {
                let value = p.number().unwrap_or(0);
                p.advance();
                Expr::Int(value)
            }
            Terminal::FctId => Expr::Call(p.parse_fcall()),
            Terminal::VarId => Expr::Var(p.parse_var()),
            Terminal::Read => {
                p.advance();
                p.expect(Terminal::LParen);
                p.expect(Terminal::RParen);
                Expr::Read
            }
            _ => {
                p.syntax_error(Kind::ExpectedExpression(p.current.quoted()));
                Expr::Int(0)
            }
        })
    }

    /// var = var_id indo
    fn parse_var(&mut self) -> Var {
        self.rule(N::Var, |p| {
            let token = p.current.clone();
            p.advance();
            let name = p.name(&token);
            let index = p.parse_indo();

            let line = token.pos.row;
            match p.symbols.lookup(&name).map(|symbol| symbol.kind) {
                None | Some(SymbolKind::Function) => p.undeclared(&name, line),
                Some(SymbolKind::Array) if index.is_none() => {
                    p.report(Kind::WrongArrayAssignment(name.clone()), line)
                }
                Some(SymbolKind::Scalar) if index.is_some() => {
                    p.report(Kind::WrongIntegerAssignment(name.clone()), line)
                }
                _ => {}
            }

            match index {
                Some(index) => Var::Indexed(name, Box::new(index)),
                None => Var::Simple(name),
            }
        })
    }

    /// indo = "[" exp "]" | ε
    fn parse_indo(&mut self) -> Option<Expr> {
        self.rule(N::Indo, |p| {
            if !p.check(Terminal::LBracket) {
                return None;
            }
            p.advance();
            let index = p.parse_exp();
            p.expect(Terminal::RBracket);
            Some(index)
        })
    }

    /// fcall = function_id "(" lexp ")"
    fn parse_fcall(&mut self) -> Call {
        self.rule(N::Fcall, |p| {
            p.advance();
            let token = p.previous.clone();
            p.expect(Terminal::LParen);
            let mut args = Vec::new();
            p.parse_lexp(&mut args);
            p.expect(Terminal::RParen);

            let function = token.lexeme;
            let line = token.pos.row;
            match p.arity(&function) {
                Some(arity) if args.len() > arity => {
                    p.report(Kind::TooManyArgs(function.clone()), line)
                }
                Some(arity) if args.len() < arity => {
                    p.report(Kind::TooFewArgs(function.clone()), line)
                }
                Some(_) => {}
                None => p.report(Kind::UndeclaredFunction(function.clone()), line),
            }
            Call { function, args }
        })
    }

    /// lexp = exp lexpb | ε
    fn parse_lexp(&mut self, args: &mut Vec<Expr>) {
        self.rule(N::Lexp, |p| {
            if p.first(N::Exp) {
                args.push(p.parse_exp());
                p.parse_lexpb(args);
            } else if !p.follow(N::Lexp) {
                p.syntax_error(Kind::ExpectedExpression(p.current.quoted()));
            }
        })
    }

    /// lexpb = "," exp lexpb | ε
    fn parse_lexpb(&mut self, args: &mut Vec<Expr>) {
        self.rule(N::Lexpb, |p| {
            if p.check(Terminal::Comma) {
                p.advance();
                args.push(p.parse_exp());
                p.parse_lexpb(args);
            } else if !p.follow(N::Lexpb) {
                p.syntax_error(Kind::ExpectedEitherBefore(
                    Terminal::Comma,
                    Terminal::RParen,
                    p.current.quoted(),
                ));
            }
        })
    }

    /// Parameter count of a declared function
    fn arity(&self, name: &str) -> Option<usize> {
        self.symbols
            .search_global(name)
            .filter(|symbol| symbol.kind == SymbolKind::Function)
            .map(|symbol| symbol.extra)
    }

    /// Value of the current number token
    fn number(&mut self) -> Option<i32> {
        match self.current.lexeme.parse::<i32>() {
            Ok(value) => Some(value),
            Err(_) => {
                let line = self.current.pos.row;
                self.report(Kind::IntegerOverflow(self.current.lexeme.clone()), line);
                None
            }
        }
    }
}
