//! Fetch-execute engine for decoded programs.
//!
//! # Execution Model
//!
//! The engine runs a synchronous fetch-execute loop over a borrowed
//! [`Program`]: fetch the instruction at the program counter, dispatch
//! it through one exhaustive match, then advance the counter by
//! [`POST_STEP_INCREMENT`]. Jump instructions write the counter
//! directly and rely on that unconditional increment: a taken jump to
//! 1-based source line `n` sets the counter to
//! `n - 1 - POST_STEP_INCREMENT`, and the post-step increment lands
//! execution on the 0-based instruction for line `n`.
//!
//! The loop terminates when the counter reaches the program length.
//! There is no instruction limit or watchdog: a program that never
//! reaches the end runs until the host process is killed.

use octavo_isa::{
    BinaryForm, BinaryOp, CmpForm, Instruction, JumpCond, JumpTarget, Program, PushSource, Reg,
    UnaryTarget,
};
use tracing::{debug, trace};

use crate::error::{ExecError, Result};
use crate::machine::{Flags, MachineState, RegisterFile};

/// Program counter increment applied by the run loop after every
/// executed instruction. Taken literal jumps compensate for it when
/// computing their landing index.
pub const POST_STEP_INCREMENT: i64 = 1;

/// The machine engine: owns all mutable execution state and drives the
/// fetch-execute loop.
///
/// One engine instance runs one program at a time; `run` is synchronous
/// and not re-entrant. State persists across calls, so accessors can
/// inspect registers, stack, and flags after a run completes.
pub struct Machine {
    state: MachineState,
}

impl Machine {
    /// Creates a machine with zeroed state.
    pub fn new() -> Self {
        Self {
            state: MachineState::new(),
        }
    }

    /// Reads a single register.
    pub fn register(&self, reg: Reg) -> i64 {
        self.state.registers.get(reg)
    }

    /// The register file.
    pub fn registers(&self) -> &RegisterFile {
        &self.state.registers
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[i64] {
        &self.state.stack
    }

    /// The explicit stack pointer: index of the logical top, `-1` when
    /// the stack is empty.
    pub fn stack_pointer(&self) -> i64 {
        self.state.sp
    }

    /// The condition flags.
    pub fn flags(&self) -> Flags {
        self.state.flags
    }

    /// The program counter.
    pub fn pc(&self) -> i64 {
        self.state.pc
    }

    /// Executes `program` from the first instruction to completion or
    /// the first failure.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        self.state.pc = 0;
        while self.state.pc >= 0 && (self.state.pc as usize) < program.len() {
            let instruction = &program.instructions()[self.state.pc as usize];
            trace!(pc = self.state.pc, ?instruction, "step");
            self.step(instruction, program.len())?;
            self.state.pc += POST_STEP_INCREMENT;
        }
        debug!(
            pc = self.state.pc,
            stack_depth = self.state.stack.len(),
            "halted"
        );
        Ok(())
    }

    /// Executes a single decoded instruction against the current state.
    ///
    /// `program_len` bounds stack-sourced relative jumps. Only jump
    /// instructions touch the program counter here; the run loop owns
    /// the post-step increment.
    pub fn step(&mut self, instruction: &Instruction, program_len: usize) -> Result<()> {
        match instruction {
            Instruction::Push(source) => self.exec_push(*source),
            Instruction::Pop => self.exec_pop(),
            Instruction::Binary(op, form) => self.exec_binary(*op, *form),
            Instruction::Inc(target) => self.exec_step_by(*target, 1),
            Instruction::Dec(target) => self.exec_step_by(*target, -1),
            Instruction::Cmp(form) => self.exec_cmp(*form),
            Instruction::Jump(cond, target) => self.exec_jump(*cond, *target, program_len),
            Instruction::Skip => Ok(()),
        }
    }

    fn exec_push(&mut self, source: PushSource) -> Result<()> {
        let value = match source {
            PushSource::Literal(value) => value,
            PushSource::Register => self.state.registers.retire_first(),
        };
        self.state.push(value);
        Ok(())
    }

    fn exec_pop(&mut self) -> Result<()> {
        let value = self.state.remove_top()?;
        self.state.registers.refill_first(value);
        Ok(())
    }

    fn exec_binary(&mut self, op: BinaryOp, form: BinaryForm) -> Result<()> {
        match form {
            BinaryForm::Registers {
                first,
                second,
                dest,
            } => {
                let result = apply(
                    op,
                    self.state.registers.get(first),
                    self.state.registers.get(second),
                )?;
                self.state.registers.set(dest, result);
            }
            BinaryForm::Stack => {
                let (deeper, top) = self.state.top_pair()?;
                self.state.set_second(apply(op, deeper, top)?)?;
                self.state.remove_top()?;
            }
        }
        Ok(())
    }

    fn exec_step_by(&mut self, target: UnaryTarget, delta: i64) -> Result<()> {
        match target {
            UnaryTarget::Register(reg) => {
                let value = self.state.registers.get(reg);
                self.state.registers.set(reg, value.wrapping_add(delta));
            }
            UnaryTarget::StackTop => {
                let top = self.state.top_mut()?;
                *top = top.wrapping_add(delta);
            }
        }
        Ok(())
    }

    fn exec_cmp(&mut self, form: CmpForm) -> Result<()> {
        let (first, second) = match form {
            CmpForm::Registers { first, second } => (
                self.state.registers.get(first),
                self.state.registers.get(second),
            ),
            CmpForm::Stack => self.state.top_pair()?,
        };
        self.state.flags = Flags {
            zero: first == second,
            positive: first > second,
        };
        Ok(())
    }

    fn exec_jump(&mut self, cond: JumpCond, target: JumpTarget, program_len: usize) -> Result<()> {
        let taken = match cond {
            JumpCond::Zero => self.state.flags.zero,
            JumpCond::NotZero | JumpCond::NotEqual => !self.state.flags.zero,
        };
        match target {
            JumpTarget::Line(line) => {
                if taken {
                    // 1-based target; the post-step increment finishes
                    // the landing arithmetic.
                    self.state.pc = line - 1 - POST_STEP_INCREMENT;
                }
            }
            JumpTarget::StackOffset => {
                // jne skips the bounds check on an empty stack.
                if cond != JumpCond::NotEqual || self.state.sp >= 0 {
                    let offset = self.state.top()?;
                    let landing = self.state.pc + offset;
                    if landing < 0 || landing as usize >= program_len {
                        return Err(ExecError::JumpOutOfBounds {
                            pc: self.state.pc,
                            offset,
                            len: program_len,
                        });
                    }
                }
                if taken {
                    self.state.pc += self.state.top()?;
                }
                // The offset cell is consumed whether or not the branch
                // was taken.
                self.state.remove_top()?;
            }
        }
        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a binary ALU operation. Add, sub, and mul wrap on 64-bit
/// overflow; division is floor division; shifts are sign-preserving
/// with the count taken modulo the word width.
fn apply(op: BinaryOp, first: i64, second: i64) -> Result<i64> {
    let result = match op {
        BinaryOp::Add => first.wrapping_add(second),
        BinaryOp::Sub => first.wrapping_sub(second),
        BinaryOp::Mul => first.wrapping_mul(second),
        BinaryOp::Div => {
            if second == 0 {
                return Err(ExecError::DivisionByZero);
            }
            floor_div(first, second)
        }
        BinaryOp::And => first & second,
        BinaryOp::Or => first | second,
        BinaryOp::Xor => first ^ second,
        BinaryOp::Shl => first.wrapping_shl(second as u32),
        BinaryOp::Shr => first.wrapping_shr(second as u32),
    };
    Ok(result)
}

/// Integer division rounding toward negative infinity.
fn floor_div(dividend: i64, divisor: i64) -> i64 {
    let quotient = dividend.wrapping_div(divisor);
    if dividend.wrapping_rem(divisor) != 0 && (dividend < 0) != (divisor < 0) {
        quotient - 1
    } else {
        quotient
    }
}
