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

//! ZooBC key derivation library
//!
//! Derive ed25519 account keys from a BIP-39 mnemonic with SLIP-10 hardened derivation, sign
//! payloads and produce checksummed account addresses.
//!
//! ```rust
//! use zoobc_slip10::{account_path, derive_for_path, seed_from_mnemonic, DEFAULT_PASSPHRASE};
//!
//! let seed = seed_from_mnemonic(
//!     "stand cheap entire summer claw subject victory supreme top divide tooth park change \
//!      excite legend category motor text zebra bottom mystery off garage energy",
//!     DEFAULT_PASSPHRASE,
//! );
//! let key = derive_for_path(&account_path(0), &seed).unwrap();
//!
//! assert_eq!(key.serialize().unwrap(), "L3FMDuOxRpkCvVbx_URMMuD96uiA63cYw0_EaUpK7VXw");
//! assert_eq!(key.sign([1u8, 1, 1, 1, 1]).unwrap().to_bytes().len(), 68);
//! ```

use thiserror::Error;

pub mod account;
pub mod address;
pub mod mnemonic;
pub mod path;
pub mod signature;
pub mod slip10;

pub use account::{
    account_path, Account, Derivation, ZOOBC_ACCOUNT_PREFIX, ZOOBC_COIN_TYPE,
    ZOOBC_PRIMARY_ACCOUNT_PATH,
};
pub use address::AccountAddress;
pub use mnemonic::{seed_from_mnemonic, Seed, DEFAULT_PASSPHRASE};
pub use path::{is_valid_path, parse_path};
pub use signature::Signature;
pub use slip10::{derive_for, derive_for_path, ExtendedSecretKey};

/// A list of possible errors when deriving, signing, or parsing with the library. Each error
/// wraps the error of the module where it occurred.
#[derive(Error, Debug)]
pub enum Error {
    /// An invalid derivation path.
    #[error("Path error: {0}")]
    Path(#[from] path::Error),
    /// A key derivation or key usage error.
    #[error("Key derivation error: {0}")]
    Slip10(#[from] slip10::Error),
    /// An account address parsing error.
    #[error("Address error: {0}")]
    Address(#[from] address::Error),
    /// A signature parsing or validation error.
    #[error("Signature error: {0}")]
    Signature(#[from] signature::Error),
}
