//! UVM-27 assembler - CLI entry point.
//!
//! Assembles a JSON program description into a binary blob:
//! `uvm-asm <source> <binary> [--test]`

use clap::Parser;
use uvm27::{assemble, decode, load_source, to_binary, Instruction, WORD_BYTES};

#[derive(Parser)]
#[command(name = "uvm-asm")]
#[command(version = "0.1.0")]
#[command(about = "Assemble a UVM-27 program description into a binary blob")]
struct Cli {
    /// Path to the JSON program description
    source: String,
    /// Output path for the binary blob
    binary: String,
    /// After writing, decode the blob back and verify it matches
    #[arg(long)]
    test: bool,
}

fn main() {
    let cli = Cli::parse();

    let entries = match load_source(&cli.source) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Failed to load {}: {}", cli.source, e);
            std::process::exit(1);
        }
    };

    let program = match assemble(&entries) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Assembly error: {}", e);
            std::process::exit(1);
        }
    };

    // Assembly is all-or-nothing: encode fully before touching the output
    // file, so a failure never leaves a partial blob behind.
    let blob = match to_binary(&program) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Assembly error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(&cli.binary, &blob) {
        eprintln!("Failed to write {}: {}", cli.binary, e);
        std::process::exit(1);
    }

    println!(
        "Assembled {} instructions ({} bytes) to {}",
        program.len(),
        blob.len(),
        cli.binary
    );

    if cli.test {
        verify_blob(&blob, &program);
        println!("Self-test passed: blob decodes back to the source program");
    }
}

/// Decode every word of the blob and compare it to the assembled program.
fn verify_blob(blob: &[u8], program: &[Instruction]) {
    for (index, chunk) in blob.chunks_exact(WORD_BYTES).enumerate() {
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(chunk);

        match decode(&word) {
            Ok(instr) if instr == program[index] => {}
            Ok(instr) => {
                eprintln!(
                    "Self-test failed: instruction {} decodes to {} (expected {})",
                    index, instr, program[index]
                );
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Self-test failed: instruction {}: {}", index, e);
                std::process::exit(1);
            }
        }
    }
}
