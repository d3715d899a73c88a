use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
    Eq,
)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum Reg {
    #[default]
    #[strum(to_string = "$zero", serialize = "zero")]
    ZERO,
    #[strum(to_string = "$at", serialize = "at")]
    AT,
    #[strum(to_string = "$v0", serialize = "v0")]
    V0,
    #[strum(to_string = "$v1", serialize = "v1")]
    V1,
    #[strum(to_string = "$a0", serialize = "a0")]
    A0,
    #[strum(to_string = "$a1", serialize = "a1")]
    A1,
    #[strum(to_string = "$a2", serialize = "a2")]
    A2,
    #[strum(to_string = "$a3", serialize = "a3")]
    A3,
    #[strum(to_string = "$t0", serialize = "t0")]
    T0,
    #[strum(to_string = "$t1", serialize = "t1")]
    T1,
    #[strum(to_string = "$t2", serialize = "t2")]
    T2,
    #[strum(to_string = "$t3", serialize = "t3")]
    T3,
    #[strum(to_string = "$t4", serialize = "t4")]
    T4,
    #[strum(to_string = "$t5", serialize = "t5")]
    T5,
    #[strum(to_string = "$t6", serialize = "t6")]
    T6,
    #[strum(to_string = "$t7", serialize = "t7")]
    T7,
    #[strum(to_string = "$s0", serialize = "s0")]
    S0,
    #[strum(to_string = "$s1", serialize = "s1")]
    S1,
    #[strum(to_string = "$s2", serialize = "s2")]
    S2,
    #[strum(to_string = "$s3", serialize = "s3")]
    S3,
    #[strum(to_string = "$s4", serialize = "s4")]
    S4,
    #[strum(to_string = "$s5", serialize = "s5")]
    S5,
    #[strum(to_string = "$s6", serialize = "s6")]
    S6,
    #[strum(to_string = "$s7", serialize = "s7")]
    S7,
    #[strum(to_string = "$t8", serialize = "t8")]
    T8,
    #[strum(to_string = "$t9", serialize = "t9")]
    T9,
    #[strum(to_string = "$k0", serialize = "k0")]
    K0,
    #[strum(to_string = "$k1", serialize = "k1")]
    K1,
    #[strum(to_string = "$gp", serialize = "gp")]
    GP,
    #[strum(to_string = "$sp", serialize = "sp")]
    SP,
    #[strum(to_string = "$fp", serialize = "fp")]
    FP,
    #[strum(to_string = "$ra", serialize = "ra")]
    RA,
}

impl Reg {
    /// Accepts `$t0`, `t0`, `T0` and numeric `$8`
    pub fn parse(s: &str) -> Result<Self, String> {
        let name = s.trim().to_ascii_lowercase();
        if let Ok(reg) = name.parse::<Self>() {
            return Ok(reg);
        }
        match name.strip_prefix('$').map(|n| n.parse::<u8>()) {
            Some(Ok(num)) if num < 32 => Ok(Self::from(num)),
            _ => Err(format!("Unknown reg name: {s}")),
        }
    }

    /// Caller-saved temporaries, the default scratch pool of the code generator
    pub fn temporaries() -> Vec<Self> {
        use Reg::*;
        vec![T0, T1, T2, T3, T4, T5, T6, T7, T8, T9]
    }
}

#[test]
fn test() {
    println!("{}", Reg::ZERO);
    assert_eq!(Reg::parse("$t2"), Ok(Reg::T2));
    assert_eq!(Reg::parse("S2"), Ok(Reg::S2));
    assert_eq!(Reg::parse("$29"), Ok(Reg::SP));
    assert_eq!(u8::from(Reg::RA), 31);
    assert!(Reg::parse("$32").is_err());
    assert!(Reg::parse("hoge").is_err());
    assert_eq!(Reg::T9.to_string(), "$t9");
}
