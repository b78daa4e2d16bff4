//! UVM-27 executor - CLI entry point.
//!
//! Runs a binary blob and writes a JSON memory dump:
//! `uvm-exec <binary> <dump> <start> <end>`

use clap::Parser;
use uvm27::asm::disasm::disassemble_instruction;
use uvm27::{decode, Machine, DEFAULT_MEM_SIZE, WORD_BYTES};

#[derive(Parser)]
#[command(name = "uvm-exec")]
#[command(version = "0.1.0")]
#[command(about = "Execute a UVM-27 binary and dump a memory range as JSON")]
struct Cli {
    /// Path to the binary blob
    binary: String,
    /// Path for the JSON memory dump
    dump: String,
    /// First address of the dump range (inclusive)
    start: i64,
    /// Last address of the dump range (inclusive)
    end: i64,
    /// Memory size in cells
    #[arg(short, long, default_value_t = DEFAULT_MEM_SIZE)]
    mem_size: usize,
    /// Print each instruction as it executes
    #[arg(short, long)]
    trace: bool,
}

fn main() {
    let cli = Cli::parse();

    // Fail fast: reject a bad dump range before running anything.
    if cli.start > cli.end || cli.start < 0 {
        eprintln!("Error: invalid address range {}..={}", cli.start, cli.end);
        std::process::exit(1);
    }

    let blob = match std::fs::read(&cli.binary) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to read {}: {}", cli.binary, e);
            std::process::exit(1);
        }
    };

    let mut machine = Machine::with_mem_size(cli.mem_size);

    if cli.trace {
        run_traced(&mut machine, &blob);
    } else if let Err(e) = machine.execute(&blob) {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }

    let dump = match machine.mem.dump_range(cli.start, cli.end) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&dump) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Failed to serialize dump: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(&cli.dump, json) {
        eprintln!("Failed to write {}: {}", cli.dump, e);
        std::process::exit(1);
    }

    println!(
        "Memory dump saved to {} (addresses {}-{})",
        cli.dump, cli.start, cli.end
    );
}

/// Execute word by word, printing each instruction with the stack depth.
fn run_traced(machine: &mut Machine, blob: &[u8]) {
    if let Err(e) = Machine::validate(blob) {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }

    for (index, chunk) in blob.chunks_exact(WORD_BYTES).enumerate() {
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(chunk);

        let instr = match decode(&word) {
            Ok(i) => i,
            Err(e) => {
                eprintln!("Runtime error: instruction {}: {}", index, e);
                std::process::exit(1);
            }
        };

        if let Err(e) = machine.step(index, instr) {
            eprintln!("Runtime error: {}", e);
            std::process::exit(1);
        }

        println!(
            "{:03}: {}  depth={}",
            index,
            disassemble_instruction(&word),
            machine.stack_depth()
        );
    }

    println!("Executed {} instructions", machine.executed());
}
