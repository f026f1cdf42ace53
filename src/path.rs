//! Hardened-only derivation paths as accepted by ed25519 SLIP-10 derivation.
//!
//! A path is the literal `m` followed by one or more hardened segments, e.g. `m/44'/883'/0'`.
//! Each segment value must fit in 31 bits, the hardened offset `2^31` is added when the path is
//! turned into [`ChildNumber`]s.
//!
//! ```rust
//! use zoobc_slip10::path::{is_valid_path, parse_path};
//!
//! assert!(is_valid_path("m/44'/883'/0'"));
//! assert!(!is_valid_path("m/44'/883'/0"));
//!
//! let path = parse_path("m/44'/883'/0'").unwrap();
//! assert_eq!(path.as_ref().len(), 3);
//! ```

use std::num::ParseIntError;

use bitcoin::util::bip32;
use log::trace;
use thiserror::Error;

pub use bitcoin::util::bip32::{ChildNumber, DerivationPath};

/// Largest segment value accepted in a path, before the hardened offset is applied.
pub const MAX_SEGMENT_INDEX: u32 = 0x7fff_ffff;

/// Possible errors when parsing a derivation path.
#[derive(Error, Debug)]
pub enum Error {
    /// The path does not match `m(/<index>')+` or one of its segments is out of range.
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),
    /// A segment could not be parsed as an unsigned 32-bits integer.
    #[error("Invalid path segment: {0}")]
    ParseSegment(#[from] ParseIntError),
    /// A segment value cannot be turned into a hardened child number.
    #[error("Invalid child number: {0}")]
    ChildNumber(#[from] bip32::Error),
}

/// Returns the digit groups of the path if it is syntactically valid, `None` otherwise.
fn segments(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('m')?.strip_prefix('/')?;
    rest.split('/')
        .map(|segment| {
            let digits = segment.strip_suffix('\'')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some(digits)
        })
        .collect()
}

/// Validate a hardened-only derivation path. Every segment must be written with a trailing `'`
/// and its value must be at most [`MAX_SEGMENT_INDEX`].
pub fn is_valid_path(path: &str) -> bool {
    match segments(path) {
        Some(digits) => digits.iter().all(|d| match d.parse::<u32>() {
            Ok(index) => index <= MAX_SEGMENT_INDEX,
            Err(_) => false,
        }),
        None => false,
    }
}

/// Parse a hardened-only derivation path into its list of hardened child numbers.
///
/// ## Error
/// Returns [`Error::InvalidPath`] when the path does not match the grammar or a segment is above
/// [`MAX_SEGMENT_INDEX`], and [`Error::ParseSegment`] when a segment does not fit in 32 bits.
pub fn parse_path(path: &str) -> Result<DerivationPath, Error> {
    let digits = segments(path).ok_or_else(|| Error::InvalidPath(path.to_string()))?;

    let mut child_numbers = Vec::with_capacity(digits.len());
    for segment in digits {
        let index: u32 = segment.parse()?;
        if index > MAX_SEGMENT_INDEX {
            return Err(Error::InvalidPath(path.to_string()));
        }
        child_numbers.push(ChildNumber::from_hardened_idx(index)?);
    }
    trace!("parsed derivation path {} into {} segments", path, child_numbers.len());

    Ok(DerivationPath::from(child_numbers))
}
