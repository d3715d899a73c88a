use super::token::Terminal;
use strum::{Display, EnumCount, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum NonTerminal {
    Pg,    // program
    Vdo,   // optional variable declarations
    Vdl,   // variable declaration list
    Vdlb,  // ... continued
    Vd,    // variable declaration
    Oas,   // optional array size
    Fdl,   // function declaration list
    Fd,    // function declaration
    Pl,    // parameter list
    Vdlo,  // optional variable declaration list
    I,     // instruction
    Assi,  // assignment
    Bi,    // block
    Il,    // instruction list
    Ifi,   // if
    Elseo, // optional else
    Whilei,
    Calli,
    Reti,
    Writei,
    Emptyi,
    Exp,   // disjunction
    Expb,
    Conj,  // conjunction
    Conjb,
    Comp,  // comparison
    Compb,
    E,     // additive
    Eb,
    T,     // multiplicative
    Tb,
    Neg,   // negation
    F,     // factor
    Var,
    Indo,  // optional index
    Fcall,
    Lexp,  // argument list
    Lexpb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sym {
    T(Terminal),
    N(NonTerminal),
}

#[derive(Debug)]
pub struct Rule {
    pub lhs: NonTerminal,
    pub rhs: &'static [Sym],
}

macro_rules! sym {
    ([$t:ident]) => {
        Sym::T(Terminal::$t)
    };
    ($n:ident) => {
        Sym::N(NonTerminal::$n)
    };
}

/// `rule!(Lhs -> A [Term] B)` : bracketed names are terminals
macro_rules! rule {
    ($lhs:ident -> $($sym:tt)*) => {
        Rule {
            lhs: NonTerminal::$lhs,
            rhs: &[$(sym!($sym)),*],
        }
    };
}

pub static RULES: [Rule; 68] = [
    rule!(Pg -> Vdo Fdl),
    rule!(Vdo -> Vdl [Semicolon]),
    rule!(Vdo ->),
    rule!(Vdl -> Vd Vdlb),
    rule!(Vdlb -> [Comma] Vd Vdlb),
    rule!(Vdlb ->),
    rule!(Vd -> [Integer] [VarId] Oas),
    rule!(Oas -> [LBracket] [Number] [RBracket]),
    rule!(Oas ->),
    rule!(Fdl -> Fd Fdl),
    rule!(Fdl ->),
    rule!(Fd -> [FctId] Pl Vdo Bi),
    rule!(Pl -> [LParen] Vdlo [RParen]),
    rule!(Vdlo -> Vdl),
    rule!(Vdlo ->),
    rule!(I -> Assi),
    rule!(I -> Bi),
    rule!(I -> Ifi),
    rule!(I -> Whilei),
    rule!(I -> Calli),
    rule!(I -> Reti),
    rule!(I -> Writei),
    rule!(I -> Emptyi),
    rule!(Assi -> Var [Equal] Exp [Semicolon]),
    rule!(Bi -> [LCurly] Il [RCurly]),
    rule!(Il -> I Il),
    rule!(Il ->),
    rule!(Ifi -> [If] Exp [Then] Bi Elseo),
    rule!(Elseo -> [Else] Bi),
    rule!(Elseo ->),
    rule!(Whilei -> [While] Exp [Do] Bi),
    rule!(Calli -> Fcall [Semicolon]),
    rule!(Reti -> [Return] Exp [Semicolon]),
    rule!(Writei -> [Write] [LParen] Exp [RParen] [Semicolon]),
    rule!(Emptyi -> [Semicolon]),
    rule!(Exp -> Conj Expb),
    rule!(Expb -> [Pipe] Conj Expb),
    rule!(Expb ->),
    rule!(Conj -> Comp Conjb),
    rule!(Conjb -> [Ampasand] Comp Conjb),
    rule!(Conjb ->),
    rule!(Comp -> E Compb),
    rule!(Compb -> [Equal] E Compb),
    rule!(Compb -> [LAngle] E Compb),
    rule!(Compb ->),
    rule!(E -> T Eb),
    rule!(Eb -> [Plus] T Eb),
    rule!(Eb -> [Minus] T Eb),
    rule!(Eb ->),
    rule!(T -> Neg Tb),
    rule!(Tb -> [Star] Neg Tb),
    rule!(Tb -> [Slash] Neg Tb),
    rule!(Tb ->),
    rule!(Neg -> [Excl] Neg),
    rule!(Neg -> F),
    rule!(F -> [LParen] Exp [RParen]),
    rule!(F -> [Number]),
    rule!(F -> Fcall),
    rule!(F -> Var),
    rule!(F -> [Read] [LParen] [RParen]),
    rule!(Var -> [VarId] Indo),
    rule!(Indo -> [LBracket] Exp [RBracket]),
    rule!(Indo ->),
    rule!(Fcall -> [FctId] [LParen] Lexp [RParen]),
    rule!(Lexp -> Exp Lexpb),
    rule!(Lexp ->),
    rule!(Lexpb -> [Comma] Exp Lexpb),
    rule!(Lexpb ->),
];

pub fn rules_of(lhs: NonTerminal) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.lhs == lhs)
}
