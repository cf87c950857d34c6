//! # Admitted Output Ingestion
//!
//! Reads an already admitted output back into index fields. The output was
//! validated on admission, so this path only needs the first four fields
//! and does not verify the signature again.

use super::errors::LookupError;
use od_01_pushdrop_codec::decode;
use shared_types::ProtocolConfig;

/// Fewest fields an ingested output may carry.
pub const INGESTION_MIN_FIELDS: usize = 4;

/// Index fields read from an admitted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedAnnouncement {
    /// Lowercase hex of field 1.
    pub identity_key: String,
    /// Field 2.
    pub domain: String,
    /// Field 3.
    pub name: String,
}

/// Read `locking_script` as an announcement of `config`'s variant.
///
/// Returns `Ok(None)` when field 0 names the other variant.
///
/// # Errors
/// * `LookupError::MalformedOutput` - not a token, too few fields, or a
///   text field that is not UTF-8
pub fn read_announcement(
    config: &ProtocolConfig,
    locking_script: &[u8],
) -> Result<Option<IngestedAnnouncement>, LookupError> {
    let token = decode(locking_script)
        .ok_or_else(|| LookupError::MalformedOutput("not a pushdrop token".into()))?;
    let fields = token.fields;

    if fields.len() < INGESTION_MIN_FIELDS {
        return Err(LookupError::MalformedOutput(format!(
            "expected at least {INGESTION_MIN_FIELDS} fields, found {}",
            fields.len()
        )));
    }
    if fields[0] != config.identifier.as_bytes() {
        return Ok(None);
    }

    Ok(Some(IngestedAnnouncement {
        identity_key: hex::encode(&fields[1]),
        domain: utf8_field(&fields, 2)?,
        name: utf8_field(&fields, 3)?,
    }))
}

fn utf8_field(fields: &[Vec<u8>], index: usize) -> Result<String, LookupError> {
    String::from_utf8(fields[index].clone())
        .map_err(|_| LookupError::MalformedOutput(format!("field {index} is not UTF-8")))
}
