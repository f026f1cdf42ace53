//! Checksummed account address derived from an ed25519 public key.
//!
//! An address is formatted as (base64 with the URL-safe alphabet):
//!
//! ```text
//! base64url(public_key | checksum)
//! ```
//!
//! where `checksum` is the wrapping sum of the 32 public key bytes.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use curve25519_dalek::edwards::CompressedEdwardsY;
use ed25519_dalek::{PublicKey, PUBLIC_KEY_LENGTH};
use serde::ser::{Serialize, Serializer};
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

/// Length of a decoded address, the public key followed by the checksum byte.
pub const ADDRESS_SIZE: usize = PUBLIC_KEY_LENGTH + 1;

/// Errors when parsing an account address.
#[derive(Error, Debug)]
pub enum Error {
    /// The address is not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The decoded address does not have the expected length.
    #[error("Invalid address length: expected 33 bytes, got {0}")]
    InvalidLength(usize),
    /// The checksum byte does not match the public key.
    #[error("Checksum mismatch: expected {expected:#04x}, found {found:#04x}")]
    ChecksumMismatch { expected: u8, found: u8 },
    /// The public key is not a valid compressed ed25519 point.
    #[error("Public key is not a valid ed25519 point")]
    InvalidPoint,
    /// The public key is rejected by the ed25519 implementation.
    #[error("Invalid public key: {0}")]
    PublicKey(#[from] ed25519_dalek::SignatureError),
}

/// Wrapping sum of all bytes.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// An account address, the ed25519 public key protected with a one byte checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; PUBLIC_KEY_LENGTH]);

impl AccountAddress {
    /// Returns the public key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Returns the checksum byte of the public key.
    pub fn checksum(&self) -> u8 {
        checksum(&self.0)
    }

    /// Returns the public key followed by its checksum.
    pub fn to_bytes(&self) -> [u8; ADDRESS_SIZE] {
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[..PUBLIC_KEY_LENGTH].copy_from_slice(&self.0);
        bytes[PUBLIC_KEY_LENGTH] = self.checksum();
        bytes
    }

    /// Returns the ed25519 public key of the account.
    pub fn public_key(&self) -> Result<PublicKey, Error> {
        Ok(PublicKey::from_bytes(&self.0)?)
    }
}

impl From<PublicKey> for AccountAddress {
    fn from(public_key: PublicKey) -> Self {
        AccountAddress(public_key.to_bytes())
    }
}

impl TryFrom<&[u8]> for AccountAddress {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != ADDRESS_SIZE {
            return Err(Error::InvalidLength(bytes.len()));
        }
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(&bytes[..PUBLIC_KEY_LENGTH]);

        let expected = checksum(&key);
        let found = bytes[PUBLIC_KEY_LENGTH];
        if expected != found {
            return Err(Error::ChecksumMismatch { expected, found });
        }
        if CompressedEdwardsY(key).decompress().is_none() {
            return Err(Error::InvalidPoint);
        }
        Ok(AccountAddress(key))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", URL_SAFE.encode(self.to_bytes()))
    }
}

impl FromStr for AccountAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = URL_SAFE.decode(s)?;
        AccountAddress::try_from(&decoded[..])
    }
}

impl Serialize for AccountAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D>(deserializer: D) -> Result<AccountAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        AccountAddress::from_str(&String::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}
