//! Octavo virtual machine.
//!
//! Execution engine for decoded Octavo programs: an explicit machine
//! state (eight general-purpose registers, an operand stack with an
//! explicit stack pointer, two condition flags, a program counter) and
//! a synchronous fetch-execute loop dispatching on the typed
//! instruction enum from `octavo-isa`.
//!
//! ```
//! use octavo_isa::parse_source;
//! use octavo_vm::Machine;
//!
//! let program = parse_source("push 3\npush 4\nadd").unwrap();
//! let mut machine = Machine::new();
//! machine.run(&program).unwrap();
//! assert_eq!(machine.stack(), &[7]);
//! ```

pub mod error;
pub mod executor;
pub mod machine;

pub use error::{ExecError, Result};
pub use executor::{Machine, POST_STEP_INCREMENT};
pub use machine::{Flags, MachineState, RegisterFile};
