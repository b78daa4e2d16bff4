//! The UVM-27 instruction set.
//!
//! Four operations, each a 6-bit opcode with an operand field whose
//! meaningful width depends on the opcode.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A UVM-27 opcode.
///
/// The numeric values are fixed by the binary format and must not change:
/// they are what appears in the low 6 bits of every instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// Push a constant onto the stack.
    Load = 33,
    /// Push `mem[top + offset]` without consuming the top.
    Read = 24,
    /// Pop value then address, store value at address.
    Write = 13,
    /// Pop two values, store their equality at the operand address.
    Eq = 54,
}

impl Opcode {
    /// All opcodes, in mnemonic-table order.
    pub const ALL: [Opcode; 4] = [Opcode::Load, Opcode::Read, Opcode::Write, Opcode::Eq];

    /// Look up an opcode by its 6-bit field value.
    pub fn from_u8(op: u8) -> Option<Self> {
        match op {
            33 => Some(Opcode::Load),
            24 => Some(Opcode::Read),
            13 => Some(Opcode::Write),
            54 => Some(Opcode::Eq),
            _ => None,
        }
    }

    /// Look up an opcode by mnemonic (case-insensitive).
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Opcode::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(mnemonic))
    }

    /// The lowercase mnemonic used in program descriptions.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Load => "load",
            Opcode::Read => "read",
            Opcode::Write => "write",
            Opcode::Eq => "eq",
        }
    }

    /// Number of meaningful operand bits for this opcode.
    ///
    /// The word format reserves 34 bits for the operand, but each opcode
    /// only defines the low N of them. WRITE takes no operand at all.
    pub const fn operand_width(self) -> u32 {
        match self {
            Opcode::Load => 27,
            Opcode::Read => 11,
            Opcode::Write => 0,
            Opcode::Eq => 32,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Uppercase form, as used in listings and error messages.
        f.write_str(&self.mnemonic().to_ascii_uppercase())
    }
}

/// A decoded UVM-27 instruction.
///
/// The operand type of each variant matches the opcode's declared bit
/// width, so a value that survived [`decode`](crate::isa::decode) cannot
/// carry out-of-range bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Push a 27-bit constant onto the stack.
    Load(u32),
    /// Push `mem[top + offset]` (11-bit offset); the top is not popped.
    Read(u16),
    /// Pop a value, pop an address, store the value at the address.
    Write,
    /// Pop two values, write 1 or 0 to the 32-bit operand address.
    Eq(u32),
}

impl Instruction {
    /// The opcode of this instruction.
    pub const fn opcode(&self) -> Opcode {
        match self {
            Instruction::Load(_) => Opcode::Load,
            Instruction::Read(_) => Opcode::Read,
            Instruction::Write => Opcode::Write,
            Instruction::Eq(_) => Opcode::Eq,
        }
    }

    /// The operand as it appears in the encoded word (0 for WRITE).
    pub const fn operand(&self) -> u64 {
        match self {
            Instruction::Load(value) => *value as u64,
            Instruction::Read(offset) => *offset as u64,
            Instruction::Write => 0,
            Instruction::Eq(addr) => *addr as u64,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Write => write!(f, "{}", Opcode::Write),
            _ => write!(f, "{} {}", self.opcode(), self.operand()),
        }
    }
}
