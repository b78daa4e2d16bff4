//! Assembler side of UVM-27.
//!
//! This module provides:
//! - The JSON program-description format (source file → typed entries)
//! - The assembler (entries → instructions → binary blob)
//! - A disassembler (binary blob → readable listing)

pub mod source;
pub mod assembler;
pub mod disasm;

pub use source::{SourceEntry, load_source, SourceError};
pub use assembler::{assemble, to_binary, AssemblerError};
pub use disasm::{disassemble, disassemble_instruction};
