//! Execution fault types.

use crate::virtual_machine::Word;
use thiserror::Error;

/// Faults that terminate machine execution.
///
/// Every fault is terminal for the machine instance; there is no recovery
/// or retry inside the core. A zero divisor is not a fault: it stops the
/// machine through [`Halt::DivisionByZero`](super::vm::Halt) with no
/// diagnostic.
#[derive(Debug, Error)]
pub enum MachineError {
    /// An array allocation could not be satisfied.
    #[error("cannot allocate array of {requested} words")]
    ResourceExhausted { requested: Word },
    /// Resolve or release on a handle with no live array behind it.
    #[error("no live array for handle {handle}")]
    InvalidHandle { handle: Word },
    /// Array Index or Amendment past the end of the target array.
    #[error("offset {offset} out of range for array {handle} of {len} words")]
    IndexOutOfRange { handle: Word, offset: Word, len: usize },
    /// The execution finger moved past the end of the program array.
    #[error("execution finger {finger} ran off the program array ({len} words)")]
    EndOfProgram { finger: Word, len: usize },
    /// The opcode field names none of the 14 instructions.
    #[error("illegal opcode {opcode} at finger {finger}")]
    IllegalOpcode { opcode: u8, finger: Word },
    /// A console port failed.
    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
