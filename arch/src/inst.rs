use crate::reg::Reg;

use color_print::cformat;
use std::fmt;

/// Memory operand of `lw`/`sw`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addr {
    Base(i32, Reg),       // 8($fp)
    Label(String, i32),   // x+8
    Indexed(String, Reg), // x($t1)
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::Base(offset, base) => write!(f, "{}({})", offset, base),
            Addr::Label(label, 0) => write!(f, "{}", label),
            Addr::Label(label, offset) => write!(f, "{}+{}", label, offset),
            Addr::Indexed(label, index) => write!(f, "{}({})", label, index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    ADD(Reg, Reg, Reg),
    SUB(Reg, Reg, Reg),
    ADDU(Reg, Reg, i32),
    SUBU(Reg, Reg, i32),
    MULT(Reg, Reg),
    DIV(Reg, Reg),
    MFLO(Reg),

    SEQ(Reg, Reg, Reg),
    SNE(Reg, Reg, Reg),

    LI(Reg, i32),
    MOVE(Reg, Reg),
    LW(Reg, Addr),
    SW(Reg, Addr),

    B(String),
    BEQ(Reg, Reg, String),
    BNE(Reg, Reg, String),
    BLT(Reg, Reg, String),
    BLE(Reg, Reg, String),
    JAL(String),
    JR(Reg),
    SYSCALL(),
}

impl Inst {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Inst::ADD(..) => "add",
            Inst::SUB(..) => "sub",
            Inst::ADDU(..) => "addu",
            Inst::SUBU(..) => "subu",
            Inst::MULT(..) => "mult",
            Inst::DIV(..) => "div",
            Inst::MFLO(..) => "mflo",
            Inst::SEQ(..) => "seq",
            Inst::SNE(..) => "sne",
            Inst::LI(..) => "li",
            Inst::MOVE(..) => "move",
            Inst::LW(..) => "lw",
            Inst::SW(..) => "sw",
            Inst::B(..) => "b",
            Inst::BEQ(..) => "beq",
            Inst::BNE(..) => "bne",
            Inst::BLT(..) => "blt",
            Inst::BLE(..) => "ble",
            Inst::JAL(..) => "jal",
            Inst::JR(..) => "jr",
            Inst::SYSCALL() => "syscall",
        }
    }

    /// Branch or jump target, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Inst::B(label)
            | Inst::BEQ(_, _, label)
            | Inst::BNE(_, _, label)
            | Inst::BLT(_, _, label)
            | Inst::BLE(_, _, label)
            | Inst::JAL(label) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.mnemonic();
        match self {
            Inst::ADD(rd, rs, rt)
            | Inst::SUB(rd, rs, rt)
            | Inst::SEQ(rd, rs, rt)
            | Inst::SNE(rd, rs, rt) => write!(f, "{} {}, {}, {}", name, rd, rs, rt),
            Inst::ADDU(rd, rs, imm) | Inst::SUBU(rd, rs, imm) => {
                write!(f, "{} {}, {}, {}", name, rd, rs, imm)
            }
            Inst::MULT(rs, rt) | Inst::DIV(rs, rt) | Inst::MOVE(rs, rt) => {
                write!(f, "{} {}, {}", name, rs, rt)
            }
            Inst::MFLO(rd) | Inst::JR(rd) => write!(f, "{} {}", name, rd),
            Inst::LI(rd, imm) => write!(f, "{} {}, {}", name, rd, imm),
            Inst::LW(rt, addr) | Inst::SW(rt, addr) => write!(f, "{} {}, {}", name, rt, addr),
            Inst::B(label) | Inst::JAL(label) => write!(f, "{} {}", name, label),
            Inst::BEQ(rs, rt, label)
            | Inst::BNE(rs, rt, label)
            | Inst::BLT(rs, rt, label)
            | Inst::BLE(rs, rt, label) => write!(f, "{} {}, {}, {}", name, rs, rt, label),
            Inst::SYSCALL() => write!(f, "{}", name),
        }
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        macro_rules! rrr {
            ($name:expr, $rd:expr, $rs:expr, $rt:expr) => {
                cformat!("<r>{:<8}</><b>{:<6} {:<6} {:<6}</>", $name, $rd, $rs, $rt)
            };
        }

        macro_rules! rri {
            ($name:expr, $rd:expr, $rs:expr, $imm:expr) => {
                cformat!("<r>{:<8}</><b>{:<6} {:<6} <y>{}</></>", $name, $rd, $rs, $imm)
            };
        }

        macro_rules! rrl {
            ($name:expr, $rs:expr, $rt:expr, $label:expr) => {
                cformat!("<r>{:<8}</><b>{:<6} {:<6}</> <g>{}</>", $name, $rs, $rt, $label)
            };
        }

        let name = self.mnemonic();
        match self {
            Inst::ADD(rd, rs, rt)
            | Inst::SUB(rd, rs, rt)
            | Inst::SEQ(rd, rs, rt)
            | Inst::SNE(rd, rs, rt) => rrr!(name, rd, rs, rt),
            Inst::MULT(rs, rt) | Inst::DIV(rs, rt) | Inst::MOVE(rs, rt) => rrr!(name, rs, rt, ""),
            Inst::MFLO(rd) | Inst::JR(rd) => rrr!(name, rd, "", ""),
            Inst::SYSCALL() => rrr!(name, "", "", ""),
            Inst::ADDU(rd, rs, imm) | Inst::SUBU(rd, rs, imm) => rri!(name, rd, rs, imm),
            Inst::LI(rd, imm) => rri!(name, rd, "", imm),
            Inst::LW(rt, addr) | Inst::SW(rt, addr) => rri!(name, rt, "", addr),
            Inst::B(label) | Inst::JAL(label) => rrl!(name, "", "", label),
            Inst::BEQ(rs, rt, label)
            | Inst::BNE(rs, rt, label)
            | Inst::BLT(rs, rt, label)
            | Inst::BLE(rs, rt, label) => rrl!(name, rs, rt, label),
        }
    }
}

#[test]
fn test() {
    let inst = Inst::SUBU(Reg::SP, Reg::SP, 4);
    assert_eq!(inst.to_string(), "subu $sp, $sp, 4");
    let inst = Inst::LW(Reg::T0, Addr::Base(-8, Reg::FP));
    assert_eq!(inst.to_string(), "lw $t0, -8($fp)");
    let inst = Inst::SW(Reg::T1, Addr::Label("t".to_string(), 12));
    assert_eq!(inst.to_string(), "sw $t1, t+12");
    let inst = Inst::BNE(Reg::T0, Reg::ZERO, "e3".to_string());
    assert_eq!(inst.target(), Some("e3"));
    println!("{}", inst.cformat());
}
