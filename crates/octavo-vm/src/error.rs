//! Execution errors.
//!
//! These errors represent fatal run-time violations during instruction
//! execution. All of them abort the run: nothing is caught or retried
//! internally, and the driver surfaces the failure to the caller.
//! Malformed source never reaches the engine — it is rejected by the
//! loader (`octavo_isa::LoadError`) before execution begins.

use thiserror::Error;

/// Execution result type alias.
pub type Result<T> = std::result::Result<T, ExecError>;

/// Errors raised by the machine engine while executing a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// A stack read or pop reached below the bottom of the operand
    /// stack.
    ///
    /// Raised by `pop` on an empty stack and by any stack-form
    /// operation that needs more cells than are present.
    #[error("stack underflow: operand stack too shallow")]
    StackUnderflow,

    /// Integer division by a zero divisor, in either register or stack
    /// form.
    #[error("division by zero")]
    DivisionByZero,

    /// A stack-sourced relative jump would land outside the program.
    ///
    /// Checked only for the stack-sourced form; literal line targets
    /// that fall outside the program simply halt the run loop.
    #[error("jump out of bounds: offset {offset} from pc {pc} leaves program of {len} instructions")]
    JumpOutOfBounds {
        /// Program counter at the jump instruction.
        pc: i64,
        /// The relative offset read from the stack top.
        offset: i64,
        /// Program length in instructions.
        len: usize,
    },
}
