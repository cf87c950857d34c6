//! # Raw Transaction Adapter
//!
//! ```text
//! version     u32 LE
//! inputs      varint n, then n × (prev txid 32, prev index u32 LE, varint script, sequence u32 LE)
//! outputs     varint n, then n × (satoshis u64 LE, varint script)
//! lock_time   u32 LE
//! ```

use crate::domain::entities::{Transaction, TxInput, TxOutput};
use crate::ports::outbound::{DecodeError, TransactionDecoder};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use sha2::{Digest, Sha256};
use shared_types::{Outpoint, Txid};
use std::io::{Cursor, Read};

/// Smallest possible serialized input (32 + 4 + 1 + 4).
const MIN_INPUT_LEN: u64 = 41;
/// Smallest possible serialized output (8 + 1).
const MIN_OUTPUT_LEN: u64 = 9;

/// Decoder for raw serialized transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTransactionDecoder;

impl TransactionDecoder for RawTransactionDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Transaction, DecodeError> {
        let mut reader = Cursor::new(bytes);

        let version = reader.read_u32::<LittleEndian>().map_err(truncated)?;

        let input_count = read_count(&mut reader, MIN_INPUT_LEN)?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            let mut hash = [0u8; 32];
            reader.read_exact(&mut hash).map_err(truncated)?;
            let index = reader.read_u32::<LittleEndian>().map_err(truncated)?;
            let unlocking_script = read_script(&mut reader)?;
            let sequence = reader.read_u32::<LittleEndian>().map_err(truncated)?;
            inputs.push(TxInput {
                previous_output: Outpoint::new(Txid::from_hash(hash), index),
                unlocking_script,
                sequence,
            });
        }

        let output_count = read_count(&mut reader, MIN_OUTPUT_LEN)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            let satoshis = reader.read_u64::<LittleEndian>().map_err(truncated)?;
            let locking_script = read_script(&mut reader)?;
            outputs.push(TxOutput {
                satoshis,
                locking_script,
            });
        }

        let lock_time = reader.read_u32::<LittleEndian>().map_err(truncated)?;

        let trailing = remaining(&reader);
        if trailing != 0 {
            return Err(DecodeError::TrailingBytes(trailing as usize));
        }

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }
}

/// Serialize `tx` in the raw format.
#[must_use]
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::new();
    write_transaction(&mut out, tx);
    out
}

/// Transaction id of raw transaction bytes (double SHA-256, display order).
#[must_use]
pub fn txid_of(bytes: &[u8]) -> Txid {
    let digest = Sha256::digest(Sha256::digest(bytes));
    Txid::from_hash(digest.into())
}

fn write_transaction(out: &mut Vec<u8>, tx: &Transaction) {
    put_u32(out, tx.version);

    write_varint(out, tx.inputs.len() as u64);
    for input in &tx.inputs {
        let mut hash = input.previous_output.txid.0;
        hash.reverse();
        out.extend_from_slice(&hash);
        put_u32(out, input.previous_output.output_index);
        write_varint(out, input.unlocking_script.len() as u64);
        out.extend_from_slice(&input.unlocking_script);
        put_u32(out, input.sequence);
    }

    write_varint(out, tx.outputs.len() as u64);
    for output in &tx.outputs {
        let mut satoshis = [0u8; 8];
        LittleEndian::write_u64(&mut satoshis, output.satoshis);
        out.extend_from_slice(&satoshis);
        write_varint(out, output.locking_script.len() as u64);
        out.extend_from_slice(&output.locking_script);
    }

    put_u32(out, tx.lock_time);
}

fn put_u32(out: &mut Vec<u8>, n: u32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, n);
    out.extend_from_slice(&buf);
}

fn read_varint(reader: &mut Cursor<&[u8]>) -> Result<u64, DecodeError> {
    let n = reader.read_u8().map_err(truncated)?;
    match n {
        0..=0xfc => Ok(u64::from(n)),
        0xfd => reader
            .read_u16::<LittleEndian>()
            .map(u64::from)
            .map_err(truncated),
        0xfe => reader
            .read_u32::<LittleEndian>()
            .map(u64::from)
            .map_err(truncated),
        0xff => reader.read_u64::<LittleEndian>().map_err(truncated),
    }
}

fn write_varint(out: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, n as u16);
        out.extend_from_slice(&buf);
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        put_u32(out, n as u32);
    } else {
        out.push(0xff);
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, n);
        out.extend_from_slice(&buf);
    }
}

/// Element count, bounded by what the remaining input could hold.
fn read_count(reader: &mut Cursor<&[u8]>, min_element_len: u64) -> Result<usize, DecodeError> {
    let count = read_varint(reader)?;
    if count.saturating_mul(min_element_len) > remaining(reader) {
        return Err(DecodeError::LengthOverflow(count));
    }
    usize::try_from(count).map_err(|_| DecodeError::LengthOverflow(count))
}

fn read_script(reader: &mut Cursor<&[u8]>) -> Result<Vec<u8>, DecodeError> {
    let len = read_varint(reader)?;
    if len > remaining(reader) {
        return Err(DecodeError::LengthOverflow(len));
    }
    let mut script = vec![0u8; len as usize];
    reader.read_exact(&mut script).map_err(truncated)?;
    Ok(script)
}

fn remaining(reader: &Cursor<&[u8]>) -> u64 {
    (reader.get_ref().len() as u64).saturating_sub(reader.position())
}

fn truncated(_: std::io::Error) -> DecodeError {
    DecodeError::Truncated
}
