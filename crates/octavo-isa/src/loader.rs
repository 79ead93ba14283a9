//! Program loading.
//!
//! This module turns program source text into a decoded [`Program`].
//!
//! # Source Format
//!
//! One instruction per line, whitespace-delimited. The first token is
//! the opcode mnemonic; remaining tokens are positional operands. A
//! line that is empty, whitespace-only, or whose first non-blank
//! character is `;` decodes to `skip`, so the instruction sequence
//! stays line-aligned with the source (jump targets are 1-based source
//! line numbers).
//!
//! # Loading Process
//!
//! 1. Split the source into lines.
//! 2. Tokenize each line and resolve its mnemonic.
//! 3. Decode the operand tokens into a typed [`Instruction`] —
//!    register names, integer literals, and the register/stack form
//!    choice are all resolved here, exactly once.
//!
//! Every decode failure carries the 1-based line number where it
//! occurred.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::instruction::{
    BinaryForm, BinaryOp, CmpForm, Instruction, JumpCond, JumpTarget, PushSource, Reg, UnaryTarget,
};
use crate::opcode::Opcode;
use crate::program::Program;

/// Errors raised while decoding program source.
///
/// Loading is all-or-nothing: the first malformed line aborts the load
/// and nothing executes. Each variant preserves the 1-based source line
/// to aid debugging.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The first token of a line is not a recognized opcode mnemonic.
    ///
    /// Matching is exact and case-sensitive.
    #[error("line {line}: unknown command '{found}'")]
    UnknownCommand {
        /// 1-based source line.
        line: usize,
        /// The offending token.
        found: String,
    },

    /// An operand expected to be a signed integer literal is not one.
    ///
    /// Literals are an optional leading `-` followed by decimal digits;
    /// anything else (including values outside the 64-bit range) is
    /// rejected.
    #[error("line {line}: invalid operand '{token}' (expected a signed integer)")]
    InvalidOperand {
        /// 1-based source line.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A register-form instruction received some but not all of its
    /// register operands.
    ///
    /// Register and stack forms are selected by operand presence, so
    /// the operand list is all-or-nothing: three registers for the
    /// binary family, two for `cmp`.
    #[error("line {line}: {mnemonic} takes all of its register operands or none")]
    IncompleteOperands {
        /// 1-based source line.
        line: usize,
        /// The instruction's mnemonic.
        mnemonic: &'static str,
    },

    /// A line carries more operands than its mnemonic can accept.
    #[error("line {line}: {mnemonic} takes at most {max} operands, got {found}")]
    UnexpectedOperands {
        /// 1-based source line.
        line: usize,
        /// The instruction's mnemonic.
        mnemonic: &'static str,
        /// Maximum operand count for the mnemonic.
        max: usize,
        /// Operand count found on the line.
        found: usize,
    },

    /// An operand expected to name a register is not `reg_a`..`reg_h`.
    #[error("line {line}: unknown register '{found}'")]
    UnknownRegister {
        /// 1-based source line.
        line: usize,
        /// The offending token.
        found: String,
    },

    /// Failed to read the program file from disk.
    #[error("error reading {path}: {source}")]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Decode program source into a [`Program`].
pub fn parse_source(source: &str) -> Result<Program, LoadError> {
    let mut program = Program::new();
    for (index, raw) in source.lines().enumerate() {
        program.push(parse_line(raw, index + 1)?);
    }
    debug!(instructions = program.len(), "program decoded");
    Ok(program)
}

/// Load and decode a program file.
pub fn load_program(path: &Path) -> Result<Program, LoadError> {
    let source = fs::read_to_string(path).map_err(|e| LoadError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_source(&source)
}

fn parse_line(raw: &str, line: usize) -> Result<Instruction, LoadError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with(';') {
        return Ok(Instruction::Skip);
    }

    let mut tokens = trimmed.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(Instruction::Skip);
    };
    let operands: Vec<&str> = tokens.collect();

    let opcode = Opcode::from_mnemonic(first).ok_or_else(|| LoadError::UnknownCommand {
        line,
        found: first.to_string(),
    })?;
    decode(opcode, &operands, line)
}

fn decode(opcode: Opcode, operands: &[&str], line: usize) -> Result<Instruction, LoadError> {
    match opcode {
        Opcode::Push => match operands {
            [] => Ok(Instruction::Push(PushSource::Register)),
            [token] => Ok(Instruction::Push(PushSource::Literal(parse_literal(
                token, line,
            )?))),
            _ => Err(too_many(opcode, 1, operands.len(), line)),
        },

        Opcode::Pop => match operands {
            [] => Ok(Instruction::Pop),
            _ => Err(too_many(opcode, 0, operands.len(), line)),
        },

        Opcode::Add
        | Opcode::Sub
        | Opcode::Imul
        | Opcode::Idiv
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Shl
        | Opcode::Shr => decode_binary(opcode, operands, line),

        Opcode::Inc => decode_unary(opcode, operands, line).map(Instruction::Inc),
        Opcode::Dec => decode_unary(opcode, operands, line).map(Instruction::Dec),

        Opcode::Cmp => match operands {
            [] => Ok(Instruction::Cmp(CmpForm::Stack)),
            [first, second] => Ok(Instruction::Cmp(CmpForm::Registers {
                first: parse_register(first, line)?,
                second: parse_register(second, line)?,
            })),
            [_] => Err(LoadError::IncompleteOperands {
                line,
                mnemonic: opcode.mnemonic(),
            }),
            _ => Err(too_many(opcode, 2, operands.len(), line)),
        },

        Opcode::Je => decode_jump(opcode, JumpCond::Zero, operands, line),
        Opcode::Jma => decode_jump(opcode, JumpCond::NotZero, operands, line),
        Opcode::Jne => decode_jump(opcode, JumpCond::NotEqual, operands, line),

        Opcode::Skip => match operands {
            [] => Ok(Instruction::Skip),
            _ => Err(too_many(opcode, 0, operands.len(), line)),
        },
    }
}

fn decode_binary(opcode: Opcode, operands: &[&str], line: usize) -> Result<Instruction, LoadError> {
    let op = match opcode {
        Opcode::Add => BinaryOp::Add,
        Opcode::Sub => BinaryOp::Sub,
        Opcode::Imul => BinaryOp::Mul,
        Opcode::Idiv => BinaryOp::Div,
        Opcode::And => BinaryOp::And,
        Opcode::Or => BinaryOp::Or,
        Opcode::Xor => BinaryOp::Xor,
        Opcode::Shl => BinaryOp::Shl,
        Opcode::Shr => BinaryOp::Shr,
        _ => unreachable!("decode_binary called for non-binary opcode"),
    };
    match operands {
        [] => Ok(Instruction::Binary(op, BinaryForm::Stack)),
        [first, second, dest] => Ok(Instruction::Binary(
            op,
            BinaryForm::Registers {
                first: parse_register(first, line)?,
                second: parse_register(second, line)?,
                dest: parse_register(dest, line)?,
            },
        )),
        [_] | [_, _] => Err(LoadError::IncompleteOperands {
            line,
            mnemonic: opcode.mnemonic(),
        }),
        _ => Err(too_many(opcode, 3, operands.len(), line)),
    }
}

fn decode_unary(opcode: Opcode, operands: &[&str], line: usize) -> Result<UnaryTarget, LoadError> {
    match operands {
        [] => Ok(UnaryTarget::StackTop),
        [reg] => Ok(UnaryTarget::Register(parse_register(reg, line)?)),
        _ => Err(too_many(opcode, 1, operands.len(), line)),
    }
}

fn decode_jump(
    opcode: Opcode,
    cond: JumpCond,
    operands: &[&str],
    line: usize,
) -> Result<Instruction, LoadError> {
    match operands {
        [] => Ok(Instruction::Jump(cond, JumpTarget::StackOffset)),
        [token] => Ok(Instruction::Jump(
            cond,
            JumpTarget::Line(parse_literal(token, line)?),
        )),
        _ => Err(too_many(opcode, 1, operands.len(), line)),
    }
}

/// Strict signed-integer literal: optional leading `-`, then decimal
/// digits only.
fn parse_literal(token: &str, line: usize) -> Result<i64, LoadError> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LoadError::InvalidOperand {
            line,
            token: token.to_string(),
        });
    }
    token.parse().map_err(|_| LoadError::InvalidOperand {
        line,
        token: token.to_string(),
    })
}

fn parse_register(token: &str, line: usize) -> Result<Reg, LoadError> {
    Reg::from_name(token).ok_or_else(|| LoadError::UnknownRegister {
        line,
        found: token.to_string(),
    })
}

fn too_many(opcode: Opcode, max: usize, found: usize, line: usize) -> LoadError {
    LoadError::UnexpectedOperands {
        line,
        mnemonic: opcode.mnemonic(),
        max,
        found,
    }
}
