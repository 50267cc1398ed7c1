#![doc = include_str!("../../README.md")]
#![forbid(missing_docs)]

pub mod alu;
pub mod arith;
pub mod computer;
pub mod control;
pub mod gate;
pub mod isa;
pub mod latch;
pub mod logic;
pub mod mem;
pub mod signal;
