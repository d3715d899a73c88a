pub mod inst;
pub mod reg;

pub use inst::{Addr, Inst};
pub use reg::Reg;

/// Size of a machine word in bytes
pub const WORD: i32 = 4;
