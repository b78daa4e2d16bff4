//! Execution engine for UVM-27.
//!
//! This module implements the runtime half of the system:
//! - A flat, fixed-size, zero-initialized memory with bounds-checked access
//! - The stack machine that interprets binary blobs 5 bytes at a time

pub mod memory;
pub mod machine;

pub use memory::{Memory, MemoryError, DEFAULT_MEM_SIZE};
pub use machine::{Machine, VmError};
