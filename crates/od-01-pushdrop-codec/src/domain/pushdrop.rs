//! # PushDrop Token Layout
//!
//! ```text
//! <push pubkey (33 or 65 bytes)> OP_CHECKSIG
//! <push field_1> ... <push field_N>          N >= 1
//! OP_2DROP x floor(N/2) [OP_DROP if N odd]   nothing after
//! ```
//!
//! The drops clean the fields off the stack so that only the signature check
//! against the locking key decides spendability.

use super::errors::CodecError;
use super::opcodes::{
    minimal_push_opcode, minimal_push_value, OP_2DROP, OP_CHECKSIG, OP_DROP,
};
use super::script::{write_push, Chunk, Script};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;

/// A decoded token: the key that can spend it and its data fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDropToken {
    pub locking_key: PublicKey,
    pub fields: Vec<Vec<u8>>,
}

impl PushDropToken {
    /// Compressed SEC1 encoding of the locking key.
    #[must_use]
    pub fn locking_key_bytes(&self) -> [u8; 33] {
        compressed(&self.locking_key)
    }
}

/// Decode a token from a locking script.
///
/// Returns `None` whenever the script does not have the exact token shape,
/// including an invalid locking key or a drop run that does not account for
/// every field.
#[must_use]
pub fn decode(script: &[u8]) -> Option<PushDropToken> {
    let script = Script::parse(script).ok()?;
    let chunks = script.chunks();

    let locking_key = match chunks {
        [Chunk::Push(key), Chunk::Op(OP_CHECKSIG), ..] if matches!(key.len(), 33 | 65) => {
            PublicKey::from_sec1_bytes(key).ok()?
        }
        _ => return None,
    };

    let mut fields = Vec::new();
    let mut rest = &chunks[2..];
    while let Some((chunk, tail)) = rest.split_first() {
        let Some(field) = field_value(chunk) else {
            break;
        };
        fields.push(field);
        rest = tail;
    }

    if fields.is_empty() || !is_drop_run(rest, fields.len()) {
        return None;
    }

    Some(PushDropToken {
        locking_key,
        fields,
    })
}

/// Encode a token locked to `locking_key`.
///
/// The key is written compressed; each field uses its minimal push.
///
/// # Errors
/// * `CodecError::NoFields` - `fields` is empty
/// * `CodecError::FieldTooLarge` - a field cannot be pushed
pub fn encode(locking_key: &PublicKey, fields: &[Vec<u8>]) -> Result<Vec<u8>, CodecError> {
    if fields.is_empty() {
        return Err(CodecError::NoFields);
    }

    let mut out = Vec::with_capacity(35 + fields.iter().map(|f| f.len() + 5).sum::<usize>());
    write_push(&mut out, &compressed(locking_key))?;
    out.push(OP_CHECKSIG);

    for field in fields {
        match minimal_push_opcode(field) {
            Some(op) => out.push(op),
            None => write_push(&mut out, field)?,
        }
    }

    out.extend(std::iter::repeat(OP_2DROP).take(fields.len() / 2));
    if fields.len() % 2 == 1 {
        out.push(OP_DROP);
    }
    Ok(out)
}

fn field_value(chunk: &Chunk<'_>) -> Option<Vec<u8>> {
    match *chunk {
        Chunk::Push(data) => Some(data.to_vec()),
        Chunk::Op(op) => minimal_push_value(op),
    }
}

/// `floor(n/2)` × `OP_2DROP`, then one `OP_DROP` iff `n` is odd, and nothing else.
fn is_drop_run(chunks: &[Chunk<'_>], n: usize) -> bool {
    let pairs = n / 2;
    let expected_len = pairs + n % 2;
    if chunks.len() != expected_len {
        return false;
    }
    let (two_drops, single) = chunks.split_at(pairs);
    two_drops.iter().all(|c| *c == Chunk::Op(OP_2DROP))
        && single.iter().all(|c| *c == Chunk::Op(OP_DROP))
}

fn compressed(key: &PublicKey) -> [u8; 33] {
    let point = key.to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(point.as_bytes());
    out
}
