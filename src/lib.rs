//! # UVM-27
//!
//! Assembler and virtual machine for the UVM-27 stack architecture.
//!
//! UVM-27 is a four-operation stack machine: programs are sequences of
//! 40-bit instruction words executed strictly in order against an
//! operand stack and a flat zero-initialized memory. The memory is the
//! only observable output of a run.

pub mod isa;
pub mod vm;
pub mod asm;

// Re-export commonly used types
pub use isa::{Instruction, Opcode, CodecError, encode, decode, WORD_BYTES};
pub use vm::{Machine, Memory, VmError, MemoryError, DEFAULT_MEM_SIZE};
pub use asm::{assemble, to_binary, disassemble, AssemblerError, SourceEntry, load_source, SourceError};
