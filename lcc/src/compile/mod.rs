pub mod func;

use crate::config::CodegenConfig;
use crate::error::Error;
use crate::grammer::ast::{Decl, Program};
use crate::grammer::token::Terminal;
use crate::symbols::{SymbolKind, SymbolTable};
use arch::{Inst, Reg, WORD};
use color_print::cformat;
use itertools::chain;
use log::debug;
use std::collections::HashSet;
use std::fmt;

/// One line of the assembly listing
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Directive(String),
    Word(String),         // name: .word 0
    Space(String, usize), // name: .space bytes
    Label(String),
    Inst(Inst),
    Comment(String),
}

impl From<Inst> for Line {
    fn from(inst: Inst) -> Self {
        Line::Inst(inst)
    }
}

/// `lines![a, b, ...]` : instructions and lines into one `Vec<Line>`
#[macro_export]
macro_rules! lines {
    ($($line:expr),* $(,)?) => {
        vec![$($crate::compile::Line::from($line)),*]
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Code(pub Vec<Line>);

impl Code {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|line| match line {
            Line::Label(label) | Line::Word(label) | Line::Space(label, _) => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn insts(&self) -> impl Iterator<Item = &Inst> {
        self.0.iter().filter_map(|line| match line {
            Line::Inst(inst) => Some(inst),
            _ => None,
        })
    }

    /// Every branch and call lands on a label of the listing
    pub fn check_targets(&self) -> Result<(), Error> {
        let labels: HashSet<&str> = self.labels().collect();
        match self.insts().filter_map(Inst::target).find(|target| !labels.contains(target)) {
            Some(target) => Err(Error::UndefinedLabel(target.to_string())),
            None => Ok(()),
        }
    }

    pub fn cformat(&self) -> String {
        let mut out = String::new();
        for line in &self.0 {
            let text = match line {
                Line::Directive(text) => cformat!("<m>{}</>", text),
                Line::Word(name) => cformat!("<g>{}</>: <m>.word</> <y>0</>", name),
                Line::Space(name, bytes) => cformat!("<g>{}</>: <m>.space</> <y>{}</>", name, bytes),
                Line::Label(label) => cformat!("<g>{}</>:", label),
                Line::Inst(inst) => format!("    {}", inst.cformat()),
                Line::Comment(text) => cformat!("    <dim># {}</>", text),
            };
            out.push_str(&text);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Directive(text) => write!(f, "{}", text),
            Line::Word(name) => write!(f, "{}: .word 0", name),
            Line::Space(name, bytes) => write!(f, "{}: .space {}", name, bytes),
            Line::Label(label) => write!(f, "{}:", label),
            Line::Inst(inst) => write!(f, "\t{}", inst),
            Line::Comment(text) => write!(f, "\t# {}", text),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.0 {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Prefix of every label the generator makes up
pub const RESERVED: &str = "__";

/// Label counters, one per family
#[derive(Debug, Default)]
pub struct Labels {
    ifs: usize,
    whiles: usize,
    joins: usize,
}

impl Labels {
    /// (else, endif)
    pub fn next_if(&mut self) -> (String, String) {
        let n = self.ifs;
        self.ifs += 1;
        (format!("{RESERVED}else{n}"), format!("{RESERVED}endif{n}"))
    }

    /// (while, endwhile)
    pub fn next_while(&mut self) -> (String, String) {
        let n = self.whiles;
        self.whiles += 1;
        (format!("{RESERVED}while{n}"), format!("{RESERVED}endwhile{n}"))
    }

    pub fn next_join(&mut self) -> String {
        let n = self.joins;
        self.joins += 1;
        format!("{RESERVED}e{n}")
    }
}

/// Scratch registers handed out in rotation
#[derive(Debug)]
pub struct Pool {
    regs: Vec<Reg>,
    next: usize,
}

impl Pool {
    /// An instruction never holds more than this many scratch values at once
    pub const MIN: usize = 3;

    /// Registers the generated code uses for a fixed purpose
    pub const FIXED: [Reg; 6] = [Reg::ZERO, Reg::V0, Reg::A0, Reg::SP, Reg::FP, Reg::RA];

    pub fn new(regs: &[Reg]) -> Result<Self, Error> {
        if regs.len() < Self::MIN {
            return Err(Error::ScratchPool(regs.len(), Self::MIN));
        }
        if let Some(reg) = regs.iter().find(|reg| Self::FIXED.contains(*reg)) {
            return Err(Error::ScratchReserved(reg.to_string()));
        }
        Ok(Self {
            regs: regs.to_vec(),
            next: 0,
        })
    }

    pub fn fresh(&mut self) -> Reg {
        let reg = self.regs[self.next];
        self.next = (self.next + 1) % self.regs.len();
        reg
    }
}

/// Generate the whole program. `symbols` holds the globals from the analysis.
pub fn compile(
    program: &Program,
    symbols: &mut SymbolTable,
    config: &CodegenConfig,
) -> Result<Code, Error> {
    let mut pool = Pool::new(&config.scratch)?;
    let mut labels = Labels::default();

    // 1. Data segment
    let mut data = lines![Line::Directive(".data".to_string())];
    for symbol in symbols.globals().values() {
        match symbol.kind {
            SymbolKind::Scalar => data.push(Line::Word(symbol.name.clone())),
            SymbolKind::Array => {
                data.push(Line::Space(symbol.name.clone(), WORD as usize * symbol.extra))
            }
            SymbolKind::Function => {}
        }
    }

    // 2. Entry
    let main = Terminal::Main.to_string();
    let start = format!("{RESERVED}start");
    let start = lines![
        Line::Directive(".text".to_string()),
        Line::Directive(format!(".globl {start}")),
        Line::Label(start),
        Inst::SUBU(Reg::SP, Reg::SP, WORD),
        Inst::JAL(main.clone()),
        Inst::LI(Reg::V0, 10),
        Inst::SYSCALL(),
    ];

    // 3. Functions, main first
    let (entry, others): (Vec<&Decl>, Vec<&Decl>) = program
        .functions
        .iter()
        .partition(|decl| decl.name() == main);
    let mut text = Vec::new();
    for decl in chain!(entry, others) {
        if let Decl::Function(name, params, locals, body) = decl {
            debug!("compile function {} ({} params, {} locals)", name, params.len(), locals.len());
            text.extend(func::compile_function(
                symbols,
                &mut pool,
                &mut labels,
                name,
                params,
                locals,
                body,
            )?);
        }
    }

    let code = Code(chain!(data, start, text).collect());
    code.check_targets()?;
    Ok(code)
}

#[test]
fn test() {
    let mut labels = Labels::default();
    assert_eq!(labels.next_if(), ("__else0".to_string(), "__endif0".to_string()));
    assert_eq!(labels.next_join(), "__e0");
    assert_eq!(labels.next_if().1, "__endif1");
    assert_eq!(labels.next_while().0, "__while0");

    assert!(matches!(Pool::new(&[Reg::T0, Reg::T1]), Err(Error::ScratchPool(2, 3))));
    assert!(matches!(
        Pool::new(&[Reg::T0, Reg::SP, Reg::T2]),
        Err(Error::ScratchReserved(name)) if name == "$sp"
    ));

    let code = Code(lines![Line::Label("main".to_string()), Inst::JAL("f".to_string())]);
    assert!(matches!(code.check_targets(), Err(Error::UndefinedLabel(label)) if label == "f"));
    let code = Code(lines![Line::Label("f".to_string()), Inst::B("f".to_string())]);
    assert!(code.check_targets().is_ok());
    let mut pool = Pool::new(&[Reg::T0, Reg::T1, Reg::T2]).unwrap();
    let regs: Vec<Reg> = (0..4).map(|_| pool.fresh()).collect();
    assert_eq!(regs, vec![Reg::T0, Reg::T1, Reg::T2, Reg::T0]);
}
