//! Octavo instruction set.
//!
//! Defines the opcode mnemonics, the typed decoded-instruction model,
//! and the text loader that turns program source into a [`Program`].
//! All operand parsing happens here, once, at load time; the execution
//! engine in `octavo-vm` works on typed data only.

pub mod instruction;
pub mod loader;
pub mod opcode;
pub mod program;

pub use instruction::{
    BinaryForm, BinaryOp, CmpForm, Instruction, JumpCond, JumpTarget, PushSource, Reg, UnaryTarget,
    REGISTER_COUNT,
};
pub use loader::{load_program, parse_source, LoadError};
pub use opcode::Opcode;
pub use program::Program;
