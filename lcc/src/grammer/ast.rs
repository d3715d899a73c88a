use super::token::keyword;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    pub variables: Vec<Decl>,
    pub functions: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decl {
    Var(String),                                    // "integer" id
    Array(String, usize),                           // "integer" id "[" number "]"
    Function(String, Vec<Decl>, Vec<Decl>, Instr),  // id "(" params ")" locals block
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instr {
    Assign(Var, Expr),                             // var "=" exp ";"
    Block(Vec<Instr>),                             // "{" { instr } "}"
    If(Expr, Box<Instr>, Option<Box<Instr>>),      // "if" exp "then" block [ "else" block ]
    While(Expr, Box<Instr>),                       // "while" exp "do" block
    Call(Call),                                    // call ";"
    Return(Expr),                                  // "return" exp ";"
    Write(Expr),                                   // "write" "(" exp ")" ";"
    Empty,                                         // ";"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Var(Var),
    BinOp(Op, Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Int(i32),
    Call(Call),
    Read,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Var {
    Simple(String),
    Indexed(String, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub function: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Or,
    And,
    Equal,
    Less,
    LessEq,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Or => "|",
            Op::And => "&",
            Op::Equal => "=",
            Op::Less => "<",
            Op::LessEq => "<=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Op::Equal | Op::Less | Op::LessEq)
    }
}

impl Expr {
    pub fn binop(op: Op, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinOp(op, Box::new(lhs), Box::new(rhs))
    }
}

impl Var {
    pub fn name(&self) -> &str {
        match self {
            Var::Simple(name) | Var::Indexed(name, _) => name,
        }
    }
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Var(name) | Decl::Array(name, _) | Decl::Function(name, ..) => name,
        }
    }
}

impl Instr {
    /// Whether control never falls off the end of this instruction
    pub fn returns(&self) -> bool {
        match self {
            Instr::Return(_) => true,
            Instr::Block(body) => body.last().is_some_and(Instr::returns),
            Instr::If(_, then, Some(otherwise)) => then.returns() && otherwise.returns(),
            _ => false,
        }
    }
}

// ----------------------------------------------------------------------------
// Printer : renders the tree back as L source
// ----------------------------------------------------------------------------

const INDENT: &str = "    ";

/// Variable name as source, with the sigil when the bare word is a keyword
struct VarName<'a>(&'a str);

impl fmt::Display for VarName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match keyword(self.0) {
            Some(_) => write!(f, "${}", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

fn decls(f: &mut fmt::Formatter<'_>, decls: &[Decl], sep: &str) -> fmt::Result {
    for (idx, decl) in decls.iter().enumerate() {
        if idx > 0 {
            write!(f, "{}", sep)?;
        }
        match decl {
            Decl::Var(name) => write!(f, "integer {}", VarName(name))?,
            Decl::Array(name, size) => write!(f, "integer {}[{}]", VarName(name), size)?,
            Decl::Function(name, ..) => write!(f, "{}", name)?,
        }
    }
    Ok(())
}

fn args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl Instr {
    fn print(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = INDENT.repeat(depth);
        match self {
            Instr::Assign(var, expr) => writeln!(f, "{}{} = {};", pad, var, expr),
            Instr::Block(body) => {
                writeln!(f, "{}{{", pad)?;
                for instr in body {
                    instr.print(f, depth + 1)?;
                }
                writeln!(f, "{}}}", pad)
            }
            Instr::If(cond, then, otherwise) => {
                writeln!(f, "{}if {} then", pad, cond)?;
                then.print(f, depth)?;
                if let Some(otherwise) = otherwise {
                    writeln!(f, "{}else", pad)?;
                    otherwise.print(f, depth)?;
                }
                Ok(())
            }
            Instr::While(cond, body) => {
                writeln!(f, "{}while {} do", pad, cond)?;
                body.print(f, depth)
            }
            Instr::Call(call) => writeln!(f, "{}{};", pad, call),
            Instr::Return(expr) => writeln!(f, "{}return {};", pad, expr),
            Instr::Write(expr) => writeln!(f, "{}write({});", pad, expr),
            Instr::Empty => writeln!(f, "{};", pad),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.variables.is_empty() {
            decls(f, &self.variables, ", ")?;
            writeln!(f, ";")?;
        }
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{}", function)?;
        }
        Ok(())
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decl::Function(name, params, locals, body) => {
                write!(f, "{}(", name)?;
                decls(f, params, ", ")?;
                writeln!(f, ")")?;
                if !locals.is_empty() {
                    decls(f, locals, ", ")?;
                    writeln!(f, ";")?;
                }
                body.print(f, 0)
            }
            decl => decls(f, std::slice::from_ref(decl), ""),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f, 0)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(var) => write!(f, "{}", var),
            Expr::BinOp(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Not(expr) => write!(f, "!{}", expr),
            Expr::Int(value) => write!(f, "{}", value),
            Expr::Call(call) => write!(f, "{}", call),
            Expr::Read => write!(f, "read()"),
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Simple(name) => write!(f, "{}", VarName(name)),
            Var::Indexed(name, index) => write!(f, "{}[{}]", VarName(name), index),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        args(f, &self.args)?;
        write!(f, ")")
    }
}
