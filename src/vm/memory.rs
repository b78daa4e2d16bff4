//! UVM-27 memory subsystem.
//!
//! A single linear region of integer cells, zero-initialized at creation.
//! There is no paging or protection; the only rule is that every access
//! must land inside `[0, size)`, enforced in one place.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Default number of memory cells.
pub const DEFAULT_MEM_SIZE: usize = 2048;

/// Flat UVM-27 memory.
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<i64>,
}

impl Memory {
    /// Create a memory of the default size, all cells zeroed.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_MEM_SIZE)
    }

    /// Create a memory with `size` zeroed cells.
    pub fn with_size(size: usize) -> Self {
        Self { cells: vec![0; size] }
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Convert a signed address to a cell index.
    ///
    /// Every read and write goes through here; it is the single bounds
    /// check for the whole machine.
    fn index(&self, addr: i64) -> Result<usize, MemoryError> {
        if addr < 0 || addr as usize >= self.cells.len() {
            return Err(MemoryError::OutOfBounds {
                addr,
                size: self.cells.len(),
            });
        }
        Ok(addr as usize)
    }

    /// Read the cell at `addr`.
    pub fn read(&self, addr: i64) -> Result<i64, MemoryError> {
        let index = self.index(addr)?;
        Ok(self.cells[index])
    }

    /// Write `value` to the cell at `addr`.
    pub fn write(&mut self, addr: i64, value: i64) -> Result<(), MemoryError> {
        let index = self.index(addr)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Extract the inclusive address range `[start, end]`, clipped to the
    /// top of memory.
    ///
    /// Returns an ordered address -> value map. The range is validated
    /// eagerly: `start > end` or a negative `start` is an error even if
    /// no cell would be touched.
    pub fn dump_range(&self, start: i64, end: i64) -> Result<BTreeMap<usize, i64>, MemoryError> {
        if start > end || start < 0 {
            return Err(MemoryError::InvalidRange { start, end });
        }

        let last = end.min(self.cells.len() as i64 - 1);
        let mut dump = BTreeMap::new();
        let mut addr = start;
        while addr <= last {
            dump.insert(addr as usize, self.cells[addr as usize]);
            addr += 1;
        }
        Ok(dump)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only summarize; 2048 cells of mostly zeros are not useful output.
        let non_zero = self.cells.iter().filter(|&&c| c != 0).count();
        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &self.cells.len())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("memory address out of bounds: {addr} (memory size {size})")]
    OutOfBounds { addr: i64, size: usize },

    #[error("invalid address range: {start}..={end}")]
    InvalidRange { start: i64, end: i64 },
}
