//! Program image ("scroll") loading and encoding.
//!
//! A scroll is a headerless sequence of 32-bit words packed big-endian,
//! back-to-back, with no length prefix, checksum, or magic number.
//! [`Scroll::from_bytes`] decodes one into the words of the machine's
//! initial program array, regardless of host byte order.

use crate::virtual_machine::errors::MachineError;
use crate::virtual_machine::Word;
use crate::warn;

/// Size of one machine word in the image, in bytes.
const WORD_BYTES: usize = 4;

/// A decoded program image: the contents of the initial program array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scroll {
    words: Vec<Word>,
}

impl Scroll {
    /// Decodes a raw image, most significant byte first.
    ///
    /// A byte length that is not a multiple of four keeps the original
    /// machine's behavior: the trailing partial word is dropped. The drop
    /// is logged so the quirk stays visible.
    ///
    /// Fails with [`MachineError::ResourceExhausted`] when the word buffer
    /// cannot be allocated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MachineError> {
        let count = bytes.len() / WORD_BYTES;
        let dropped = bytes.len() % WORD_BYTES;
        if dropped != 0 {
            warn!(
                "scroll length {} is not a multiple of {}; dropping {} trailing byte(s)",
                bytes.len(),
                WORD_BYTES,
                dropped
            );
        }

        let mut words = Vec::new();
        words
            .try_reserve_exact(count)
            .map_err(|_| MachineError::ResourceExhausted {
                requested: count as Word,
            })?;
        for chunk in bytes.chunks_exact(WORD_BYTES) {
            words.push(Word::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        Ok(Self { words })
    }

    /// Builds a scroll directly from words, bypassing the byte codec.
    pub fn from_words(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Encodes the scroll back into the raw image format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.words.len() * WORD_BYTES);
        for word in &self.words {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Returns the number of complete words in the image.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the image holds no complete word.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Consumes the scroll, yielding the program array contents.
    pub(crate) fn into_words(self) -> Vec<Word> {
        self.words
    }
}
