//! # Opcodes
//!
//! The subset of script opcodes the token format uses.

/// Push an empty byte string.
pub const OP_0: u8 = 0x00;
/// Largest direct-push opcode (pushes 75 bytes).
pub const OP_PUSHBYTES_75: u8 = 0x4b;
/// Next byte holds the push length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Next two bytes (LE) hold the push length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Next four bytes (LE) hold the push length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the byte `0x81` (-1).
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the byte `0x01`.
pub const OP_1: u8 = 0x51;
/// Push the byte `0x10`.
pub const OP_16: u8 = 0x60;
/// Remove the top two stack items.
pub const OP_2DROP: u8 = 0x6d;
/// Remove the top stack item.
pub const OP_DROP: u8 = 0x75;
pub const OP_CHECKSIG: u8 = 0xac;

/// Value pushed by a minimal-encoding opcode, if `op` is one.
#[must_use]
pub fn minimal_push_value(op: u8) -> Option<Vec<u8>> {
    match op {
        OP_0 => Some(Vec::new()),
        OP_1NEGATE => Some(vec![0x81]),
        OP_1..=OP_16 => Some(vec![op - OP_1 + 1]),
        _ => None,
    }
}

/// Minimal-encoding opcode for a field, if one exists.
#[must_use]
pub fn minimal_push_opcode(data: &[u8]) -> Option<u8> {
    match data {
        [] => Some(OP_0),
        [0x81] => Some(OP_1NEGATE),
        [n @ 1..=16] => Some(OP_1 + *n - 1),
        _ => None,
    }
}
