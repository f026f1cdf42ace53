// Copyright 2021-2022 Farcaster Devs
//
// This library is free software; you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public
// License as published by the Free Software Foundation; either
// version 3 of the License, or (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this library; if not, write to the Free Software
// Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301, USA

//! Typed signatures. An ed25519 signature is serialized with its signature type as a 4-bytes
//! little-endian prefix:
//!
//! ```text
//! le32(signature_type) | ed25519_signature
//! ```

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{PublicKey, Verifier, SIGNATURE_LENGTH};
use serde::ser::{Serialize, Serializer};
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

/// Size of the signature type prefix.
pub const SIGNATURE_TYPE_SIZE: usize = 4;

/// Size of a serialized signature, type prefix included.
pub const SIGNATURE_SIZE: usize = SIGNATURE_TYPE_SIZE + SIGNATURE_LENGTH;

/// Errors when parsing or verifying a signature.
#[derive(Error, Debug)]
pub enum Error {
    /// The serialized signature does not have the expected length.
    #[error("Invalid signature length: expected 68 bytes, got {0}")]
    InvalidLength(usize),
    /// The signature type prefix is unknown.
    #[error("Unsupported signature type {0}")]
    UnsupportedType(u32),
    /// The ed25519 signature is malformed or does not pass the validation.
    #[error("Ed25519 signature error: {0}")]
    Ed25519(#[from] ed25519_dalek::SignatureError),
    /// The signature is not valid hex.
    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// The list of supported signature types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureType {
    /// An ed25519 signature over the raw payload.
    Ed25519,
}

impl From<SignatureType> for u32 {
    fn from(signature_type: SignatureType) -> Self {
        match signature_type {
            SignatureType::Ed25519 => 0,
        }
    }
}

impl TryFrom<u32> for SignatureType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SignatureType::Ed25519),
            _ => Err(Error::UnsupportedType(value)),
        }
    }
}

/// An ed25519 signature tagged with its signature type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    signature_type: SignatureType,
    signature: ed25519_dalek::Signature,
}

impl Signature {
    /// Wrap an ed25519 signature.
    pub fn new(signature: ed25519_dalek::Signature) -> Self {
        Self {
            signature_type: SignatureType::Ed25519,
            signature,
        }
    }

    /// The signature type.
    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    /// The inner ed25519 signature.
    pub fn as_ed25519(&self) -> &ed25519_dalek::Signature {
        &self.signature
    }

    /// Serialize the signature with its type prefix.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..SIGNATURE_TYPE_SIZE].copy_from_slice(&u32::from(self.signature_type).to_le_bytes());
        bytes[SIGNATURE_TYPE_SIZE..].copy_from_slice(&self.signature.to_bytes());
        bytes
    }

    /// Verify the signature over the payload with the public key.
    pub fn verify(&self, public_key: &PublicKey, payload: &[u8]) -> Result<(), Error> {
        Ok(public_key.verify(payload, &self.signature)?)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(Error::InvalidLength(bytes.len()));
        }
        let mut prefix = [0u8; SIGNATURE_TYPE_SIZE];
        prefix.copy_from_slice(&bytes[..SIGNATURE_TYPE_SIZE]);
        let signature_type = SignatureType::try_from(u32::from_le_bytes(prefix))?;
        let signature = ed25519_dalek::Signature::try_from(&bytes[SIGNATURE_TYPE_SIZE..])?;
        Ok(Self {
            signature_type,
            signature,
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Signature::try_from(&bytes[..])
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Signature, D::Error>
    where
        D: Deserializer<'de>,
    {
        Signature::from_str(&String::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}
