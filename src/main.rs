//! A universal machine implementation in Rust.
//!
//! Runs a program image ("scroll") to completion, wiring the machine's
//! console ports to stdin and stdout.
//!
//! # Usage
//! ```text
//! um <scroll>
//! ```
//!
//! # Exit status
//! - `0`: the machine halted (Halt instruction or zero divisor)
//! - `1`: usage error, unreadable scroll, or machine fault

use std::{env, fs, process};
use um::virtual_machine::console::StdConsole;
use um::virtual_machine::program::Scroll;
use um::virtual_machine::vm::{Halt, Machine};
use um::{error, info};

const USAGE: &str = "\
Universal Machine

USAGE:
    {program} <scroll>

ARGS:
    <scroll>    Program image: 32-bit words packed big-endian, back-to-back

OPTIONS:
    -h, --help    Print this help message

The machine's output and input ports are wired to stdout and stdin;
diagnostics go to stderr.
";

/// Prints usage information to stderr.
fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }
    if args.len() > 2 {
        eprintln!("Unexpected argument: {}\n", args[2]);
        print_usage(&args[0]);
        process::exit(1);
    }

    let path = &args[1];
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("could not read scroll '{}': {}", path, e);
            process::exit(1);
        }
    };

    let scroll = match Scroll::from_bytes(&bytes) {
        Ok(scroll) => scroll,
        Err(e) => {
            error!("could not load scroll '{}': {}", path, e);
            process::exit(1);
        }
    };

    let mut machine = Machine::new(scroll);
    match machine.run(&mut StdConsole::new()) {
        Ok(Halt::Requested) => info!("machine halted"),
        // A zero divisor stops the machine with no diagnostic.
        Ok(Halt::DivisionByZero) => {}
        Err(e) => {
            error!("machine fault: {}", e);
            process::exit(1);
        }
    }
}
