//! The universal machine.
//!
//! A virtual machine executing the fixed 14-opcode, 32-bit-word universal
//! machine instruction set from a binary program image ("scroll"), with an
//! array heap addressed by reusable handles and byte-oriented console ports.

pub mod utils;
pub mod virtual_machine;
