//! # Script Tokenizer
//!
//! Splits raw script bytes into push and opcode chunks. Push payloads borrow
//! from the input, so tokenizing a non-token output allocates only the chunk
//! vector.

use super::errors::CodecError;
use super::opcodes::{OP_PUSHBYTES_75, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};
use byteorder::{ByteOrder, LittleEndian};

/// One script element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// Data pushed by a direct push (0x01-0x4b) or `OP_PUSHDATA1/2/4`.
    Push(&'a [u8]),
    /// Any other opcode, including `OP_0` and `OP_1`..`OP_16`.
    Op(u8),
}

/// A tokenized script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script<'a> {
    chunks: Vec<Chunk<'a>>,
}

impl<'a> Script<'a> {
    /// Tokenize `bytes`.
    ///
    /// # Errors
    /// * `CodecError::Truncated` - a push runs past the end of the script
    pub fn parse(bytes: &'a [u8]) -> Result<Self, CodecError> {
        let mut chunks = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let op = bytes[pos];
            pos += 1;

            let len = match op {
                0x01..=OP_PUSHBYTES_75 => usize::from(op),
                OP_PUSHDATA1 => read_len(bytes, &mut pos, 1)?,
                OP_PUSHDATA2 => read_len(bytes, &mut pos, 2)?,
                OP_PUSHDATA4 => read_len(bytes, &mut pos, 4)?,
                _ => {
                    chunks.push(Chunk::Op(op));
                    continue;
                }
            };

            let data = take(bytes, &mut pos, len)?;
            chunks.push(Chunk::Push(data));
        }

        Ok(Self { chunks })
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk<'a>] {
        &self.chunks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Append the smallest non-opcode push of `data` to `out`.
///
/// # Errors
/// * `CodecError::FieldTooLarge` - `data` does not fit a 4-byte length
pub fn write_push(out: &mut Vec<u8>, data: &[u8]) -> Result<(), CodecError> {
    let len = data.len();
    if len <= usize::from(OP_PUSHBYTES_75) {
        out.push(len as u8);
    } else if len <= usize::from(u8::MAX) {
        out.push(OP_PUSHDATA1);
        out.push(len as u8);
    } else if len <= usize::from(u16::MAX) {
        out.push(OP_PUSHDATA2);
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, len as u16);
        out.extend_from_slice(&buf);
    } else {
        let len32 = u32::try_from(len).map_err(|_| CodecError::FieldTooLarge(len))?;
        out.push(OP_PUSHDATA4);
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, len32);
        out.extend_from_slice(&buf);
    }
    out.extend_from_slice(data);
    Ok(())
}

fn read_len(bytes: &[u8], pos: &mut usize, width: usize) -> Result<usize, CodecError> {
    let raw = take(bytes, pos, width)?;
    let len = match width {
        1 => u64::from(raw[0]),
        2 => u64::from(LittleEndian::read_u16(raw)),
        _ => u64::from(LittleEndian::read_u32(raw)),
    };
    // A length that overflows usize can never be satisfied by the input.
    usize::try_from(len).map_err(|_| CodecError::Truncated {
        offset: *pos,
        needed: usize::MAX,
        available: bytes.len() - *pos,
    })
}

fn take<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8], CodecError> {
    let available = bytes.len() - *pos;
    if len > available {
        return Err(CodecError::Truncated {
            offset: *pos,
            needed: len,
            available,
        });
    }
    let data = &bytes[*pos..*pos + len];
    *pos += len;
    Ok(data)
}
