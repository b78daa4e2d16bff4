//! Assembler for UVM-27 programs.
//!
//! Lowers a program description to typed instructions, then to the
//! binary blob via the codec. Assembly is all-or-nothing: the first bad
//! entry aborts the whole run with its index, and no partial output is
//! ever produced.

use crate::asm::source::SourceEntry;
use crate::isa::codec::{self, CodecError, WORD_BYTES};
use crate::isa::instruction::{Instruction, Opcode};
use thiserror::Error;

/// Lower a program description to typed instructions.
///
/// Mnemonics are matched case-insensitively; a missing `arg` defaults
/// to 0. WRITE accepts and discards any supplied operand.
pub fn assemble(entries: &[SourceEntry]) -> Result<Vec<Instruction>, AssemblerError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| lower_entry(index, entry))
        .collect()
}

/// Encode a sequence of instructions into a contiguous binary blob.
pub fn to_binary(program: &[Instruction]) -> Result<Vec<u8>, AssemblerError> {
    let mut blob = Vec::with_capacity(program.len() * WORD_BYTES);
    for (index, instr) in program.iter().enumerate() {
        let word = codec::encode(instr)
            .map_err(|source| AssemblerError::Encode { index, source })?;
        blob.extend_from_slice(&word);
    }
    Ok(blob)
}

fn lower_entry(index: usize, entry: &SourceEntry) -> Result<Instruction, AssemblerError> {
    let opcode = Opcode::from_mnemonic(&entry.op).ok_or_else(|| {
        AssemblerError::UnknownMnemonic {
            index,
            mnemonic: entry.op.clone(),
        }
    })?;
    let arg = entry.arg.unwrap_or(0);

    let instr = match opcode {
        Opcode::Load => Instruction::Load(fit(index, opcode, arg)? as u32),
        Opcode::Read => Instruction::Read(fit(index, opcode, arg)? as u16),
        // WRITE's operand field is don't-care: accepted, never encoded.
        Opcode::Write => Instruction::Write,
        Opcode::Eq => Instruction::Eq(fit(index, opcode, arg)? as u32),
    };
    Ok(instr)
}

/// Check that `arg` fits the opcode's operand field.
fn fit(index: usize, opcode: Opcode, arg: u64) -> Result<u64, AssemblerError> {
    let width = opcode.operand_width();
    if arg >> width != 0 {
        return Err(AssemblerError::Encode {
            index,
            source: CodecError::OperandRange {
                opcode,
                operand: arg,
                width,
            },
        });
    }
    Ok(arg)
}

/// Errors that can occur during assembly, attributed to the entry index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("entry {index}: unknown mnemonic: {mnemonic:?}")]
    UnknownMnemonic { index: usize, mnemonic: String },

    #[error("entry {index}: {source}")]
    Encode { index: usize, source: CodecError },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(op: &str, arg: Option<u64>) -> SourceEntry {
        SourceEntry::new(op, arg)
    }

    #[test]
    fn test_assemble_simple() {
        let program = assemble(&[
            entry("load", Some(3)),
            entry("load", Some(9)),
            entry("write", None),
        ])
        .unwrap();

        assert_eq!(
            program,
            vec![Instruction::Load(3), Instruction::Load(9), Instruction::Write]
        );
    }

    #[test]
    fn test_assemble_case_insensitive() {
        let program = assemble(&[entry("LOAD", Some(1)), entry("Eq", Some(2))]).unwrap();
        assert_eq!(program, vec![Instruction::Load(1), Instruction::Eq(2)]);
    }

    #[test]
    fn test_missing_arg_defaults_to_zero() {
        let program = assemble(&[entry("read", None)]).unwrap();
        assert_eq!(program, vec![Instruction::Read(0)]);
    }

    #[test]
    fn test_write_ignores_arg() {
        let program = assemble(&[entry("write", Some(12345))]).unwrap();
        assert_eq!(program, vec![Instruction::Write]);
    }

    #[test]
    fn test_unknown_mnemonic_names_token_and_index() {
        let err = assemble(&[entry("load", None), entry("jmp", None)]).unwrap_err();
        assert_eq!(
            err,
            AssemblerError::UnknownMnemonic {
                index: 1,
                mnemonic: "jmp".to_string(),
            }
        );
    }

    #[test]
    fn test_operand_range_attributed_to_entry() {
        let err = assemble(&[entry("load", Some(1)), entry("read", Some(1 << 11))]).unwrap_err();
        assert_eq!(
            err,
            AssemblerError::Encode {
                index: 1,
                source: CodecError::OperandRange {
                    opcode: Opcode::Read,
                    operand: 1 << 11,
                    width: 11,
                },
            }
        );
    }

    #[test]
    fn test_load_width_boundary() {
        assert!(assemble(&[entry("load", Some((1 << 27) - 1))]).is_ok());
        assert!(assemble(&[entry("load", Some(1 << 27))]).is_err());
    }

    #[test]
    fn test_to_binary_concatenates_words() {
        let program = vec![Instruction::Load(1), Instruction::Write];
        let blob = to_binary(&program).unwrap();
        assert_eq!(blob.len(), 2 * WORD_BYTES);
        assert_eq!(&blob[..WORD_BYTES], &[0x61, 0, 0, 0, 0]);
        assert_eq!(&blob[WORD_BYTES..], &[13, 0, 0, 0, 0]);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let entries = vec![
            entry("load", Some(3)),
            entry("read", Some(4)),
            entry("eq", Some(10)),
            entry("write", None),
        ];

        let a = to_binary(&assemble(&entries).unwrap()).unwrap();
        let b = to_binary(&assemble(&entries).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
