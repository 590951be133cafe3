//! Core machine implementation.
//!
//! The machine executes 32-bit instruction words from the program array,
//! one per step: fetch at the execution finger, advance the finger, then
//! dispatch on the opcode. All register arithmetic wraps at 2^32.

mod heap;
mod registers;

use crate::virtual_machine::console::Console;
use crate::virtual_machine::errors::MachineError;
use crate::virtual_machine::isa::{self, Opcode};
use crate::virtual_machine::program::Scroll;
use crate::virtual_machine::Word;
use self::heap::Heap;
use self::registers::Registers;

/// Terminal state of a run that ended without a fault.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Halt {
    /// The program executed the Halt instruction.
    Requested,
    /// A Division instruction met a zero divisor. The machine stops with
    /// no diagnostic and no register mutation.
    DivisionByZero,
}

/// The universal machine: registers, execution finger, and array heap.
///
/// One value per machine instance; instances share nothing.
pub struct Machine {
    /// The eight general-purpose registers.
    registers: Registers,
    /// Word offset of the next instruction in the program array.
    finger: Word,
    /// Program array and heap arrays.
    heap: Heap,
}

impl Machine {
    /// Creates a machine whose program array holds the scroll's words.
    pub fn new(scroll: Scroll) -> Self {
        Self {
            registers: Registers::new(),
            finger: 0,
            heap: Heap::new(scroll.into_words()),
        }
    }

    /// Runs until the machine halts or faults.
    ///
    /// `Ok` is the Halted terminal state; `Err` is Faulted. The console is
    /// the only collaborator consulted during execution, and Input is the
    /// only operation that may block.
    pub fn run<C: Console>(&mut self, console: &mut C) -> Result<Halt, MachineError> {
        loop {
            let at = self.finger;
            let word = self.fetch()?;
            let op = isa::op(word);
            let opcode = Opcode::try_from(op)
                .map_err(|_| MachineError::IllegalOpcode { opcode: op, finger: at })?;
            if let Some(halt) = self.exec(opcode, word, console)? {
                return Ok(halt);
            }
        }
    }

    /// Reads the word at the finger, then advances the finger past it.
    fn fetch(&mut self) -> Result<Word, MachineError> {
        let program = self.heap.program();
        let word =
            program
                .get(self.finger as usize)
                .copied()
                .ok_or(MachineError::EndOfProgram {
                    finger: self.finger,
                    len: program.len(),
                })?;
        self.finger = self.finger.wrapping_add(1);
        Ok(word)
    }

    /// Executes one decoded instruction.
    ///
    /// Returns `Some(halt)` when the instruction ends the run. The finger
    /// has already advanced, so control transfers simply overwrite it.
    fn exec<C: Console>(
        &mut self,
        opcode: Opcode,
        word: Word,
        console: &mut C,
    ) -> Result<Option<Halt>, MachineError> {
        let (a, b, c) = (isa::reg_a(word), isa::reg_b(word), isa::reg_c(word));
        match opcode {
            Opcode::ConditionalMove => self.op_cmov(a, b, c),
            Opcode::ArrayIndex => self.op_index(a, b, c)?,
            Opcode::ArrayAmendment => self.op_amend(a, b, c)?,
            Opcode::Addition => self.op_add(a, b, c),
            Opcode::Multiplication => self.op_mul(a, b, c),
            Opcode::Division => return Ok(self.op_div(a, b, c)),
            Opcode::NotAnd => self.op_nand(a, b, c),
            Opcode::Halt => return Ok(Some(Halt::Requested)),
            Opcode::Allocation => self.op_alloc(b, c)?,
            Opcode::Abandonment => self.op_free(c)?,
            Opcode::Output => self.op_output(console, c)?,
            Opcode::Input => self.op_input(console, c)?,
            Opcode::LoadProgram => self.op_load_program(b, c)?,
            Opcode::Orthography => self.op_ortho(isa::ortho_reg(word), isa::ortho_imm(word)),
        }
        Ok(None)
    }

    fn op_cmov(&mut self, a: u8, b: u8, c: u8) {
        if self.registers.get(c) != 0 {
            self.registers.set(a, self.registers.get(b));
        }
    }

    fn op_index(&mut self, a: u8, b: u8, c: u8) -> Result<(), MachineError> {
        let value = self.heap.get(self.registers.get(b), self.registers.get(c))?;
        self.registers.set(a, value);
        Ok(())
    }

    fn op_amend(&mut self, a: u8, b: u8, c: u8) -> Result<(), MachineError> {
        self.heap.set(
            self.registers.get(a),
            self.registers.get(b),
            self.registers.get(c),
        )
    }

    fn op_add(&mut self, a: u8, b: u8, c: u8) {
        let value = self.registers.get(b).wrapping_add(self.registers.get(c));
        self.registers.set(a, value);
    }

    fn op_mul(&mut self, a: u8, b: u8, c: u8) {
        let value = self.registers.get(b).wrapping_mul(self.registers.get(c));
        self.registers.set(a, value);
    }

    fn op_div(&mut self, a: u8, b: u8, c: u8) -> Option<Halt> {
        let divisor = self.registers.get(c);
        if divisor == 0 {
            return Some(Halt::DivisionByZero);
        }
        self.registers.set(a, self.registers.get(b) / divisor);
        None
    }

    fn op_nand(&mut self, a: u8, b: u8, c: u8) {
        self.registers
            .set(a, !(self.registers.get(b) & self.registers.get(c)));
    }

    fn op_alloc(&mut self, b: u8, c: u8) -> Result<(), MachineError> {
        let handle = self.heap.alloc(self.registers.get(c))?;
        self.registers.set(b, handle);
        Ok(())
    }

    fn op_free(&mut self, c: u8) -> Result<(), MachineError> {
        self.heap.release(self.registers.get(c))
    }

    fn op_output<C: Console>(&mut self, console: &mut C, c: u8) -> Result<(), MachineError> {
        console.put((self.registers.get(c) & 0xff) as u8)?;
        Ok(())
    }

    fn op_input<C: Console>(&mut self, console: &mut C, c: u8) -> Result<(), MachineError> {
        let value = match console.get()? {
            Some(byte) => Word::from(byte),
            None => Word::MAX,
        };
        self.registers.set(c, value);
        Ok(())
    }

    fn op_load_program(&mut self, b: u8, c: u8) -> Result<(), MachineError> {
        let handle = self.registers.get(b);
        if handle != 0 {
            self.heap.load_program(handle)?;
        }
        self.finger = self.registers.get(c);
        Ok(())
    }

    fn op_ortho(&mut self, a: u8, value: Word) {
        self.registers.set(a, value);
    }
}
