//! Array heap and handle table.
//!
//! Owns every array the machine can address: the program array (always
//! reached through handle 0) and the heap arrays created by the Allocation
//! instruction. Released handles are reused by later allocations, lowest
//! free slot first.

use crate::virtual_machine::errors::MachineError;
use crate::virtual_machine::Word;

/// Slot count the handle table starts with.
const INITIAL_SLOTS: usize = 256;

/// Array heap and handle table.
///
/// Slot 0 is permanently empty: the program array lives in its own field
/// and is reached through handle 0, so the slot index of every heap array
/// is a valid, nonzero handle. `occupied` counts live slots with the
/// reserved slot 0 included.
pub(super) struct Heap {
    /// The array the execution finger runs in (handle 0).
    program: Vec<Word>,
    /// Live heap arrays indexed by handle.
    slots: Vec<Option<Vec<Word>>>,
    /// Occupied slot count, the reserved slot included.
    occupied: usize,
}

impl Heap {
    /// Creates a heap whose program array holds the given words.
    pub(super) fn new(program: Vec<Word>) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(INITIAL_SLOTS, || None);
        Self {
            program,
            slots,
            occupied: 1,
        }
    }

    /// Returns the current program array.
    pub(super) fn program(&self) -> &[Word] {
        &self.program
    }

    /// Creates a zero-filled array of `capacity` words and returns its
    /// handle: the lowest free slot index. Doubles the table when no slot
    /// is free. Never returns 0.
    pub(super) fn alloc(&mut self, capacity: Word) -> Result<Word, MachineError> {
        let array = zeroed(capacity)?;

        // Slot 0 belongs to the program array; scan from 1.
        let handle = match self.slots[1..].iter().position(Option::is_none) {
            Some(free) => free + 1,
            None => {
                let next = self.slots.len();
                self.slots.resize_with(next * 2, || None);
                next
            }
        };
        self.slots[handle] = Some(array);
        self.occupied += 1;
        Ok(handle as Word)
    }

    /// Destroys the array behind `handle` and makes the handle reusable.
    ///
    /// Handle 0 and handles with no live array fault with
    /// [`MachineError::InvalidHandle`].
    pub(super) fn release(&mut self, handle: Word) -> Result<(), MachineError> {
        let slot = self
            .slots
            .get_mut(handle as usize)
            .filter(|slot| slot.is_some())
            .ok_or(MachineError::InvalidHandle { handle })?;
        *slot = None;
        self.occupied -= 1;

        if self.occupied <= self.slots.len() / 4 {
            self.shrink();
        }
        Ok(())
    }

    /// Drops trailing free slots, never below the initial table size.
    fn shrink(&mut self) {
        let mut keep = self.slots.len();
        while keep > INITIAL_SLOTS && self.slots[keep - 1].is_none() {
            keep -= 1;
        }
        self.slots.truncate(keep);
    }

    /// Reads `array(handle)[offset]`.
    pub(super) fn get(&self, handle: Word, offset: Word) -> Result<Word, MachineError> {
        let array = self.resolve(handle)?;
        array
            .get(offset as usize)
            .copied()
            .ok_or(MachineError::IndexOutOfRange {
                handle,
                offset,
                len: array.len(),
            })
    }

    /// Writes `array(handle)[offset] = value`.
    pub(super) fn set(
        &mut self,
        handle: Word,
        offset: Word,
        value: Word,
    ) -> Result<(), MachineError> {
        let array = self.resolve_mut(handle)?;
        let len = array.len();
        let slot = array
            .get_mut(offset as usize)
            .ok_or(MachineError::IndexOutOfRange {
                handle,
                offset,
                len,
            })?;
        *slot = value;
        Ok(())
    }

    /// Replaces the program array with a full copy of `array(handle)`,
    /// discarding the old contents. The caller keeps handle 0 off this
    /// path: loading from the program array itself is a finger move only.
    pub(super) fn load_program(&mut self, handle: Word) -> Result<(), MachineError> {
        let source = self.resolve(handle)?;
        let mut copy = Vec::new();
        copy.try_reserve_exact(source.len())
            .map_err(|_| MachineError::ResourceExhausted {
                requested: source.len() as Word,
            })?;
        copy.extend_from_slice(source);
        self.program = copy;
        Ok(())
    }

    /// Resolves a handle to its array; handle 0 is the program array.
    fn resolve(&self, handle: Word) -> Result<&Vec<Word>, MachineError> {
        if handle == 0 {
            return Ok(&self.program);
        }
        self.slots
            .get(handle as usize)
            .and_then(Option::as_ref)
            .ok_or(MachineError::InvalidHandle { handle })
    }

    fn resolve_mut(&mut self, handle: Word) -> Result<&mut Vec<Word>, MachineError> {
        if handle == 0 {
            return Ok(&mut self.program);
        }
        self.slots
            .get_mut(handle as usize)
            .and_then(Option::as_mut)
            .ok_or(MachineError::InvalidHandle { handle })
    }

    /// Returns the slot capacity of the handle table.
    #[cfg(test)]
    pub(super) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// Allocates a zero-filled array, reporting failure instead of aborting.
fn zeroed(capacity: Word) -> Result<Vec<Word>, MachineError> {
    let len = capacity as usize;
    let mut words = Vec::new();
    words
        .try_reserve_exact(len)
        .map_err(|_| MachineError::ResourceExhausted {
            requested: capacity,
        })?;
    words.resize(len, 0);
    Ok(words)
}
