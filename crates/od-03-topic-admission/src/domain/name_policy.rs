//! # Name Policy
//!
//! Topic and service names are lowercase ASCII segments joined by single
//! underscores, at most 50 characters, carrying the protocol prefix
//! (`tm_` for SHIP topics, `ls_` for SLAP services).

use super::errors::NameError;
use regex::Regex;
use shared_types::ProtocolConfig;
use std::sync::LazyLock;

/// Longest acceptable name.
pub const MAX_NAME_LEN: usize = 50;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+(_[a-z]+)*$").expect("valid regex"));

/// Check `name` against the shared pattern only.
///
/// # Errors
/// * `NameError::Length` - empty or longer than [`MAX_NAME_LEN`]
/// * `NameError::Pattern` - anything other than `[a-z]` segments joined by `_`
pub fn check_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(NameError::Length(name.len()));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(NameError::Pattern);
    }
    Ok(())
}

/// Check `name` against the shared pattern and the variant prefix.
///
/// # Errors
/// See [`check_name`]; additionally `NameError::MissingPrefix`.
pub fn check_advertised_name(config: &ProtocolConfig, name: &str) -> Result<(), NameError> {
    check_name(name)?;
    if !name.starts_with(config.name_prefix) {
        return Err(NameError::MissingPrefix(config.name_prefix));
    }
    Ok(())
}
