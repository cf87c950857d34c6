//! # Admission Validator
//!
//! One generic validator; the variant is selected by the `ProtocolConfig`
//! passed in. Rules run in order and stop at the first failure:
//!
//! 1. the script decodes as a pushdrop token
//! 2. exactly 5 fields
//! 3. field 0 is this variant's identifier
//! 4. field 2 is an advertisable URI
//! 5. field 3 is a valid, correctly prefixed name
//! 6. the signature is linked to the identity key and the locking key

use super::errors::Rejection;
use super::name_policy::check_advertised_name;
use super::token::AnnouncementToken;
use super::uri_policy::check_uri;
use od_01_pushdrop_codec::decode;
use od_02_signature_linkage::SignatureLinkageApi;
use shared_types::ProtocolConfig;

/// Field count of an admissible token.
pub const ADMISSION_FIELD_COUNT: usize = 5;

/// Validate one locking script for `config`'s variant.
///
/// # Errors
/// The first [`Rejection`] hit.
pub fn validate_output<L>(
    config: &ProtocolConfig,
    linkage: &L,
    locking_script: &[u8],
) -> Result<AnnouncementToken, Rejection>
where
    L: SignatureLinkageApi + ?Sized,
{
    let token = decode(locking_script).ok_or(Rejection::NotAToken)?;
    let fields = &token.fields;

    if fields.len() != ADMISSION_FIELD_COUNT {
        return Err(Rejection::FieldCount(fields.len()));
    }
    if fields[0] != config.identifier.as_bytes() {
        return Err(Rejection::WrongIdentifier);
    }

    let uri = std::str::from_utf8(&fields[2]).map_err(|_| Rejection::NotUtf8(2))?;
    check_uri(uri)?;

    let name = std::str::from_utf8(&fields[3]).map_err(|_| Rejection::NotUtf8(3))?;
    check_advertised_name(config, name)?;

    if !linkage.is_linked(&token.locking_key, fields) {
        return Err(Rejection::NotLinked);
    }

    Ok(AnnouncementToken {
        protocol: config.protocol,
        identity_key: fields[1].clone(),
        advertised_uri: uri.to_string(),
        name: name.to_string(),
        signature: fields[4].clone(),
        locking_key: token.locking_key,
    })
}

/// Whether `locking_script` is an admissible output for `config`'s variant.
///
/// Total: malformed input is `false`.
#[must_use]
pub fn is_valid_output<L>(config: &ProtocolConfig, linkage: &L, locking_script: &[u8]) -> bool
where
    L: SignatureLinkageApi + ?Sized,
{
    validate_output(config, linkage, locking_script).is_ok()
}
