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

//! Well-known account derivation paths. ZooBC accounts are derived under
//! `m/44'/883'/{account}'`, all levels hardened.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::{self, ChildNumber, DerivationPath};
use crate::slip10::{self, ExtendedSecretKey};

/// BIP-44 purpose field.
pub const BIP44_PURPOSE: u32 = 44;
/// SLIP-44 coin type registered for ZooBC.
pub const ZOOBC_COIN_TYPE: u32 = 883;
/// Prefix for ZooBC key pairs derivation.
pub const ZOOBC_ACCOUNT_PREFIX: &str = "m/44'/883'";
/// Derivation path of the primary ZooBC account.
pub const ZOOBC_PRIMARY_ACCOUNT_PATH: &str = "m/44'/883'/0'";
/// Index of the first hardened child, added to every path segment.
pub const FIRST_HARDENED_INDEX: u32 = 0x8000_0000;

/// Format the derivation path of the ZooBC account `account`.
pub fn account_path(account: u32) -> String {
    format!("{}/{}'", ZOOBC_ACCOUNT_PREFIX, account)
}

/// Types that can be turned into a hardened derivation path.
pub trait Derivation {
    /// Return the derivation path, from the master key, of the key identified by `self`.
    fn derivation_path(&self) -> Result<DerivationPath, path::Error>;
}

impl Derivation for str {
    fn derivation_path(&self) -> Result<DerivationPath, path::Error> {
        path::parse_path(self)
    }
}

impl Derivation for DerivationPath {
    fn derivation_path(&self) -> Result<DerivationPath, path::Error> {
        if let Some(child) = self.as_ref().iter().find(|c| c.is_normal()) {
            return Err(path::Error::InvalidPath(format!(
                "{} (non-hardened segment {})",
                self, child
            )));
        }
        Ok(self.clone())
    }
}

/// A BIP-44 account, derived as `m/44'/{coin_type}'/{index}'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// The SLIP-44 coin type.
    pub coin_type: u32,
    /// The account index, must be within `[0, 2^31 - 1]`.
    pub index: u32,
}

impl Account {
    /// Create the ZooBC account number `index`.
    pub fn zoobc(index: u32) -> Self {
        Self {
            coin_type: ZOOBC_COIN_TYPE,
            index,
        }
    }

    /// Derive the account key from a seed.
    pub fn derive(&self, seed: impl AsRef<[u8]>) -> Result<ExtendedSecretKey, slip10::Error> {
        slip10::derive_for(self, seed)
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::zoobc(0)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "m/{}'/{}'/{}'", BIP44_PURPOSE, self.coin_type, self.index)
    }
}

impl Derivation for Account {
    fn derivation_path(&self) -> Result<DerivationPath, path::Error> {
        let path = [BIP44_PURPOSE, self.coin_type, self.index]
            .iter()
            .map(|i| ChildNumber::from_hardened_idx(*i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DerivationPath::from(path))
    }
}
