//! UVM-27 instruction set and binary codec.
//!
//! This module provides:
//! - [`Instruction`] - the four-operation tagged instruction type
//! - [`codec`] - the symmetric 40-bit word encoder/decoder

pub mod instruction;
pub mod codec;

pub use instruction::{Instruction, Opcode};
pub use codec::{encode, decode, CodecError, WORD_BYTES};
