//! Disassembler for UVM-27 blobs.
//!
//! Converts binary instruction words back to readable text. Works on
//! untrusted input: undecodable words are shown as `???` rather than
//! aborting the listing.

use crate::isa::codec::{decode, WORD_BYTES};

/// Disassemble a single instruction word to text.
pub fn disassemble_instruction(word: &[u8; WORD_BYTES]) -> String {
    match decode(word) {
        Ok(instr) => instr.to_string(),
        Err(_) => format!("??? ; {:02x?}", word),
    }
}

/// Disassemble a whole blob to a listing, one instruction per line.
///
/// Trailing bytes that do not form a full word are reported at the end
/// of the listing instead of being dropped silently.
pub fn disassemble(blob: &[u8]) -> String {
    let mut output = String::new();

    let mut chunks = blob.chunks_exact(WORD_BYTES);
    for (index, chunk) in chunks.by_ref().enumerate() {
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(chunk);
        output.push_str(&format!("{:03}: {}\n", index, disassemble_instruction(&word)));
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        output.push_str(&format!("; {} trailing byte(s), not a full word\n", rest.len()));
    }

    output
}
