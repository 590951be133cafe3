//! Instruction Set Architecture (ISA) definitions.
//!
//! Defines the machine's instruction set. The
//! [`for_each_opcode!`](crate::for_each_opcode) macro holds the canonical
//! opcode definitions and invokes a callback macro for code generation, so
//! other modules can generate opcode-related code without duplicating the
//! list.
//!
//! This module generates:
//! - The [`Opcode`] enum with opcode number mappings
//! - `TryFrom<u8>` for decoding the opcode field
//!
//! # Instruction Format
//!
//! One 32-bit word per instruction. The opcode occupies bits 28-31. The
//! thirteen three-register opcodes select registers A, B, and C from bits
//! 6-8, 3-5, and 0-2. Orthography ([`Opcode::Orthography`]) has its own
//! layout: the destination register in bits 25-27 and an unsigned 25-bit
//! immediate in bits 0-24.

use crate::virtual_machine::errors::MachineError;
use crate::virtual_machine::Word;

/// Invokes a callback macro with the complete opcode definition list.
///
/// This macro enables code generation for opcodes in multiple modules
/// without duplicating the opcode definitions.
#[macro_export]
macro_rules! for_each_opcode {
    ($callback:ident) => {
        $callback! {
            /// CMOV rA, rB, rC ; if rC != 0 then rA = rB
            ConditionalMove = 0, "CMOV",
            /// INDEX rA, rB, rC ; rA = array(rB)[rC]
            ArrayIndex = 1, "INDEX",
            /// AMEND rA, rB, rC ; array(rA)[rB] = rC
            ArrayAmendment = 2, "AMEND",
            /// ADD rA, rB, rC ; rA = rB + rC mod 2^32
            Addition = 3, "ADD",
            /// MUL rA, rB, rC ; rA = rB * rC mod 2^32
            Multiplication = 4, "MUL",
            /// DIV rA, rB, rC ; rA = rB / rC unsigned; rC = 0 stops the machine
            Division = 5, "DIV",
            /// NAND rA, rB, rC ; rA = !(rB & rC)
            NotAnd = 6, "NAND",
            /// HALT ; the machine stops computation
            Halt = 7, "HALT",
            /// ALLOC rB, rC ; rB = handle of a new zero-filled array of rC words
            Allocation = 8, "ALLOC",
            /// FREE rC ; the array identified by rC is abandoned
            Abandonment = 9, "FREE",
            /// OUT rC ; the low byte of rC is written to the output port
            Output = 10, "OUT",
            /// IN rC ; rC = next input byte, or all ones at end of input
            Input = 11, "IN",
            /// LOADPROG rB, rC ; array(rB) is duplicated into the program array, finger = rC
            LoadProgram = 12, "LOADPROG",
            /// ORTHO rA, value ; rA = 25-bit immediate (non-standard field layout)
            Orthography = 13, "ORTHO",
        }
    };
}

macro_rules! define_opcodes {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $opcode:literal, $mnemonic:literal
        ),* $(,)?
    ) => {
        /// Machine opcode, decoded from the top 4 bits of an instruction word.
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $name = $opcode,
            )*
        }

        impl TryFrom<u8> for Opcode {
            type Error = MachineError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $opcode => Ok(Opcode::$name), )*
                    _ => Err(MachineError::IllegalOpcode {
                        opcode: value,
                        finger: 0,
                    }),
                }
            }
        }

        impl Opcode {
            /// Returns the assembly mnemonic for this opcode.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }
        }
    };
}

for_each_opcode!(define_opcodes);

/// Bit position of the opcode field.
const OPCODE_SHIFT: u32 = 28;
/// Mask for a 3-bit register selector.
const REG_MASK: Word = 0b111;
/// Mask for the Orthography immediate (bits 0-24).
const ORTHO_IMM_MASK: Word = 0x01ff_ffff;

/// Extracts the opcode field of an instruction word.
pub const fn op(word: Word) -> u8 {
    (word >> OPCODE_SHIFT) as u8
}

/// Register selector A (bits 6-8).
pub const fn reg_a(word: Word) -> u8 {
    ((word >> 6) & REG_MASK) as u8
}

/// Register selector B (bits 3-5).
pub const fn reg_b(word: Word) -> u8 {
    ((word >> 3) & REG_MASK) as u8
}

/// Register selector C (bits 0-2).
pub const fn reg_c(word: Word) -> u8 {
    (word & REG_MASK) as u8
}

/// Destination register of an Orthography instruction (bits 25-27).
pub const fn ortho_reg(word: Word) -> u8 {
    ((word >> 25) & REG_MASK) as u8
}

/// Zero-extended 25-bit immediate of an Orthography instruction.
pub const fn ortho_imm(word: Word) -> Word {
    word & ORTHO_IMM_MASK
}

/// Packs a three-register instruction word.
pub const fn pack(opcode: Opcode, a: u8, b: u8, c: u8) -> Word {
    ((opcode as Word) << OPCODE_SHIFT)
        | ((a as Word & REG_MASK) << 6)
        | ((b as Word & REG_MASK) << 3)
        | (c as Word & REG_MASK)
}

/// Packs an Orthography instruction word.
pub const fn pack_ortho(a: u8, value: Word) -> Word {
    ((Opcode::Orthography as Word) << OPCODE_SHIFT)
        | ((a as Word & REG_MASK) << 25)
        | (value & ORTHO_IMM_MASK)
}
