//! Decoded program container.

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;

/// A complete decoded program: an ordered, randomly-indexable sequence
/// of instructions.
///
/// Programs are the artifact produced by the loader and executed by the
/// machine engine. Instruction position matters: conditional jumps
/// address instructions by their 1-based source line, so the loader
/// keeps the sequence line-aligned with the source file (blank and
/// comment lines decode to `skip`). The driver owns the program; the
/// engine borrows it read-only for the duration of one run and never
/// mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Creates a new, empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a program from a pre-decoded instruction list.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Appends an instruction at the next line position.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Number of instructions (equals the source line count).
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// `true` when the program holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Retrieves the instruction at a 0-based index.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// All instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
