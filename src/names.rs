//! XML name validation
//!
//! Schema field names double as element tags and attribute keys, so they
//! have to be valid XML names. Namespace prefixes are accepted but are
//! matched as plain text: `gml:pos` is the tag `gml:pos`.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$",
    )
    .unwrap()
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid tag name: `local` or `prefix:local`
pub fn is_valid_tag(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_valid_ncname(prefix) && is_valid_ncname(local),
        None => is_valid_ncname(name),
    }
}

/// Validate a tag name and return an error if invalid
pub fn validate_tag(name: &str) -> Result<()> {
    if is_valid_tag(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid XML name: '{}'", name)))
    }
}
