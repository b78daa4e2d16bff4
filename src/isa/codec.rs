//! Binary codec for UVM-27 instruction words.
//!
//! Every instruction is a 40-bit little-endian word:
//! - bits 0-5: opcode
//! - bits 6-39: operand (only the low N bits are meaningful, per opcode)
//!
//! `encode` and `decode` are exact inverses for every valid instruction.

use crate::isa::instruction::{Instruction, Opcode};
use thiserror::Error;

/// Size of one encoded instruction word in bytes.
pub const WORD_BYTES: usize = 5;

/// Width of the opcode field in bits.
const OPCODE_BITS: u32 = 6;

/// A bitmask covering the low `bits` bits.
#[inline]
const fn mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// Encode an instruction into a 5-byte little-endian word.
///
/// The operand is range-checked against the opcode's declared width
/// *before* shifting; an oversized operand shifted into place would
/// silently corrupt the opcode field otherwise.
pub fn encode(instr: &Instruction) -> Result<[u8; WORD_BYTES], CodecError> {
    let opcode = instr.opcode();
    let operand = instr.operand();

    if operand > mask(opcode.operand_width()) {
        return Err(CodecError::OperandRange {
            opcode,
            operand,
            width: opcode.operand_width(),
        });
    }

    let word = (operand << OPCODE_BITS) | opcode as u64;
    let bytes = word.to_le_bytes();
    let mut out = [0u8; WORD_BYTES];
    out.copy_from_slice(&bytes[..WORD_BYTES]);
    Ok(out)
}

/// Decode a 5-byte little-endian word into an instruction.
///
/// The operand is masked to the opcode's declared width, so garbage in
/// the high bits of the operand field never reaches the caller. This
/// matters for standalone use (disassembly of untrusted blobs); the
/// engine gets the same guarantee for free.
pub fn decode(word: &[u8; WORD_BYTES]) -> Result<Instruction, CodecError> {
    let mut buf = [0u8; 8];
    buf[..WORD_BYTES].copy_from_slice(word);
    let raw = u64::from_le_bytes(buf);

    let op = (raw & mask(OPCODE_BITS)) as u8;
    let opcode = Opcode::from_u8(op).ok_or(CodecError::UnknownOpcode(op))?;
    let operand = (raw >> OPCODE_BITS) & mask(opcode.operand_width());

    Ok(match opcode {
        Opcode::Load => Instruction::Load(operand as u32),
        Opcode::Read => Instruction::Read(operand as u16),
        Opcode::Write => Instruction::Write,
        Opcode::Eq => Instruction::Eq(operand as u32),
    })
}

/// Errors that can occur while encoding or decoding instruction words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("operand {operand} does not fit the {width}-bit field of {opcode}")]
    OperandRange {
        opcode: Opcode,
        operand: u64,
        width: u32,
    },

    #[error("unknown opcode: {0}")]
    UnknownOpcode(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_load_layout() {
        // (1 << 6) | 33 = 97 = 0x61, little-endian
        let word = encode(&Instruction::Load(1)).unwrap();
        assert_eq!(word, [0x61, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_write_is_bare_opcode() {
        let word = encode(&Instruction::Write).unwrap();
        assert_eq!(word, [13, 0, 0, 0, 0]);
    }

    #[test]
    fn test_load_width_boundary() {
        assert!(encode(&Instruction::Load((1 << 27) - 1)).is_ok());
        assert_eq!(
            encode(&Instruction::Load(1 << 27)),
            Err(CodecError::OperandRange {
                opcode: Opcode::Load,
                operand: 1 << 27,
                width: 27,
            })
        );
    }

    #[test]
    fn test_read_width_boundary() {
        assert!(encode(&Instruction::Read((1 << 11) - 1)).is_ok());
        assert!(matches!(
            encode(&Instruction::Read(1 << 11)),
            Err(CodecError::OperandRange { opcode: Opcode::Read, .. })
        ));
    }

    #[test]
    fn test_eq_full_32_bits() {
        let word = encode(&Instruction::Eq(u32::MAX)).unwrap();
        assert_eq!(decode(&word).unwrap(), Instruction::Eq(u32::MAX));
    }

    #[test]
    fn test_decode_unknown_opcode() {
        let word = [0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(decode(&word), Err(CodecError::UnknownOpcode(0)));
        let word = [0x3F, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(decode(&word), Err(CodecError::UnknownOpcode(63)));
    }

    #[test]
    fn test_decode_masks_high_garbage() {
        // READ word with all 34 operand bits set: only the low 11 survive.
        let raw: u64 = (mask_all_operand() << 6) | 24;
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(&raw.to_le_bytes()[..WORD_BYTES]);
        assert_eq!(decode(&word).unwrap(), Instruction::Read((1 << 11) - 1));
    }

    #[test]
    fn test_decode_write_ignores_operand_bits() {
        // WRITE's operand field is don't-care; nonzero bits decode fine.
        let raw: u64 = (0x1234u64 << 6) | 13;
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(&raw.to_le_bytes()[..WORD_BYTES]);
        assert_eq!(decode(&word).unwrap(), Instruction::Write);
    }

    fn mask_all_operand() -> u64 {
        (1u64 << 34) - 1
    }

    fn instruction_strategy() -> impl Strategy<Value = Instruction> {
        prop_oneof![
            (0u32..1 << 27).prop_map(Instruction::Load),
            (0u16..1 << 11).prop_map(Instruction::Read),
            Just(Instruction::Write),
            any::<u32>().prop_map(Instruction::Eq),
        ]
    }

    proptest! {
        #[test]
        fn prop_roundtrip(instr in instruction_strategy()) {
            let word = encode(&instr).unwrap();
            prop_assert_eq!(decode(&word).unwrap(), instr);
        }

        #[test]
        fn prop_opcode_survives_in_low_bits(instr in instruction_strategy()) {
            let word = encode(&instr).unwrap();
            prop_assert_eq!(word[0] & 0x3F, instr.opcode() as u8);
        }
    }
}
