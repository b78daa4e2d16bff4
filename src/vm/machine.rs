//! The UVM-27 execution engine.
//!
//! Interprets a binary blob strictly sequentially, 5 bytes at a time.
//! There is no control flow: the program counter only ever advances, so
//! execution is bounded by blob length. Any error aborts the run; memory
//! mutated before the failing instruction is kept, like a crash dump.

use crate::isa::codec::{self, CodecError, WORD_BYTES};
use crate::isa::instruction::{Instruction, Opcode};
use crate::vm::memory::{Memory, MemoryError};
use thiserror::Error;

/// The UVM-27 stack machine.
///
/// The stack is internal scratch space; the memory is the only
/// externally observable output of a run.
#[derive(Debug, Clone)]
pub struct Machine {
    /// Main memory, the sole observable result of execution.
    pub mem: Memory,
    /// Operand stack. Never inspected by callers, only by tests.
    stack: Vec<i64>,
    /// Instructions executed so far.
    executed: u64,
}

impl Machine {
    /// Create a machine with the default memory size.
    pub fn new() -> Self {
        Self::with_mem_size(crate::vm::memory::DEFAULT_MEM_SIZE)
    }

    /// Create a machine with `mem_size` cells of memory.
    pub fn with_mem_size(mem_size: usize) -> Self {
        Self {
            mem: Memory::with_size(mem_size),
            stack: Vec::new(),
            executed: 0,
        }
    }

    /// Check the structural invariant of a blob: its length must be a
    /// whole number of instruction words. Rejected before any
    /// instruction executes.
    pub fn validate(blob: &[u8]) -> Result<(), VmError> {
        if blob.len() % WORD_BYTES != 0 {
            return Err(VmError::Structural { len: blob.len() });
        }
        Ok(())
    }

    /// Execute an entire blob against this machine.
    ///
    /// Returns the number of instructions executed.
    pub fn execute(&mut self, blob: &[u8]) -> Result<u64, VmError> {
        Self::validate(blob)?;

        let start = self.executed;
        for (index, chunk) in blob.chunks_exact(WORD_BYTES).enumerate() {
            let mut word = [0u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            let instr = codec::decode(&word)
                .map_err(|source| VmError::Codec { index, source })?;
            self.step(index, instr)?;
        }
        Ok(self.executed - start)
    }

    /// Execute a single decoded instruction.
    ///
    /// `index` is the instruction's position in the blob, carried into
    /// any error for attribution.
    pub fn step(&mut self, index: usize, instr: Instruction) -> Result<(), VmError> {
        match instr {
            Instruction::Load(value) => {
                self.stack.push(i64::from(value));
            }

            Instruction::Read(offset) => {
                // The base address stays on the stack; READ only grows it.
                let base = self.peek(index, Opcode::Read)?;
                let addr = base + i64::from(offset);
                let value = self.mem.read(addr)
                    .map_err(|source| VmError::Memory { index, source })?;
                self.stack.push(value);
            }

            Instruction::Write => {
                // Value was pushed after the address, so it pops first.
                let value = self.pop(index, Opcode::Write)?;
                let addr = self.pop(index, Opcode::Write)?;
                self.mem.write(addr, value)
                    .map_err(|source| VmError::Memory { index, source })?;
            }

            Instruction::Eq(addr) => {
                // The target address comes from the operand field, not
                // the stack. Deliberate ISA quirk.
                let b = self.pop(index, Opcode::Eq)?;
                let a = self.pop(index, Opcode::Eq)?;
                self.mem.write(i64::from(addr), i64::from(a == b))
                    .map_err(|source| VmError::Memory { index, source })?;
            }
        }

        self.executed += 1;
        Ok(())
    }

    /// Number of instructions executed so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Current stack depth (for tracing).
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn peek(&self, index: usize, opcode: Opcode) -> Result<i64, VmError> {
        self.stack
            .last()
            .copied()
            .ok_or(VmError::StackUnderflow { index, opcode })
    }

    fn pop(&mut self, index: usize, opcode: Opcode) -> Result<i64, VmError> {
        self.stack
            .pop()
            .ok_or(VmError::StackUnderflow { index, opcode })
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during execution.
///
/// Every variant that happens mid-run carries the index of the failing
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("bytecode length {len} is not a multiple of {WORD_BYTES}")]
    Structural { len: usize },

    #[error("instruction {index}: {source}")]
    Codec { index: usize, source: CodecError },

    #[error("instruction {index}: stack underflow in {opcode}")]
    StackUnderflow { index: usize, opcode: Opcode },

    #[error("instruction {index}: {source}")]
    Memory { index: usize, source: MemoryError },
}
