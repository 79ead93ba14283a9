//! Opcode mnemonics for the Octavo instruction set.
//!
//! Mnemonics are the raw, case-sensitive operation names recognized in
//! program source. They say nothing about operand forms; the loader
//! resolves a mnemonic plus its operand tokens into a typed
//! [`Instruction`](crate::instruction::Instruction) once, at decode time.

use serde::{Deserialize, Serialize};

/// Operation mnemonic as written in program source.
///
/// The set is closed and matching is exact: `Push` is `push`, never
/// `PUSH` or `Push`. Any token outside this set is rejected by the
/// loader before execution begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // === Stack/register transfer ===
    /// Push a literal, or retire register slot 0 onto the stack.
    Push,
    /// Pop the stack top back into register slot 0.
    Pop,

    // === Arithmetic / bitwise ===
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Increment a register or the stack top in place.
    Inc,
    /// Decrement a register or the stack top in place.
    Dec,
    /// Multiplication.
    Imul,
    /// Floor division.
    Idiv,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Arithmetic shift left.
    Shl,
    /// Arithmetic shift right.
    Shr,

    // === Comparison and control flow ===
    /// Compare two values and set the zero/positive flags.
    Cmp,
    /// Jump when the zero flag is set.
    Je,
    /// Jump when the zero flag is clear.
    Jma,
    /// Jump when the zero flag is clear (see `Jma`).
    Jne,
    /// No operation; placeholder for blank and comment lines.
    Skip,
}

impl Opcode {
    /// Resolve a source token into an opcode, or `None` for an
    /// unrecognized command.
    pub fn from_mnemonic(token: &str) -> Option<Self> {
        let opcode = match token {
            "push" => Self::Push,
            "pop" => Self::Pop,
            "add" => Self::Add,
            "sub" => Self::Sub,
            "inc" => Self::Inc,
            "dec" => Self::Dec,
            "imul" => Self::Imul,
            "idiv" => Self::Idiv,
            "and" => Self::And,
            "or" => Self::Or,
            "xor" => Self::Xor,
            "shl" => Self::Shl,
            "shr" => Self::Shr,
            "cmp" => Self::Cmp,
            "je" => Self::Je,
            "jma" => Self::Jma,
            "jne" => Self::Jne,
            "skip" => Self::Skip,
            _ => return None,
        };
        Some(opcode)
    }

    /// The source spelling of this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Imul => "imul",
            Self::Idiv => "idiv",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Cmp => "cmp",
            Self::Je => "je",
            Self::Jma => "jma",
            Self::Jne => "jne",
            Self::Skip => "skip",
        }
    }
}
