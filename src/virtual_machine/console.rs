//! Console ports: the byte streams behind the Output and Input opcodes.
//!
//! The [`Console`] trait is the machine's only external collaborator.
//! Output must become visible before the machine proceeds (interactive
//! programs prompt one byte at a time); input blocks for a single byte,
//! and end-of-stream is sticky.

use std::io::{self, Read, Stdin, Stdout, Write};

/// Byte-oriented console used by the Output and Input instructions.
pub trait Console {
    /// Writes one byte to the output port, visible before the call returns.
    fn put(&mut self, byte: u8) -> io::Result<()>;

    /// Blocks for one byte from the input port.
    ///
    /// Returns `None` at end of input, and must keep returning `None` for
    /// every later call.
    fn get(&mut self) -> io::Result<Option<u8>>;
}

/// Console backed by the process stdin and stdout.
pub struct StdConsole {
    stdout: Stdout,
    stdin: Stdin,
    eof: bool,
}

impl StdConsole {
    /// Creates a console over the process standard streams.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            stdin: io::stdin(),
            eof: false,
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn put(&mut self, byte: u8) -> io::Result<()> {
        self.stdout.write_all(&[byte])?;
        self.stdout.flush()
    }

    fn get(&mut self) -> io::Result<Option<u8>> {
        if self.eof {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.stdin.read(&mut buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(None);
                }
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
