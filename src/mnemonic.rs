//! BIP-39 seed derivation from a mnemonic phrase and a passphrase.
//!
//! The phrase is used as is: word list membership and checksum are not validated, the phrase
//! bytes are stretched with PBKDF2-HMAC-SHA512 and the salt `"mnemonic" || passphrase`.

use std::fmt;

use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Number of PBKDF2 rounds to perform when deriving the seed.
const PBKDF2_ROUNDS: u32 = 2048;

/// Salt prefix defined by BIP-39.
const SALT_PREFIX: &str = "mnemonic";

/// Passphrase used when the user does not provide one.
pub const DEFAULT_PASSPHRASE: &str = "";

/// A BIP-39 seed, wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; Seed::SIZE]);

impl Seed {
    /// Number of bytes of PBKDF2 output to extract.
    pub const SIZE: usize = 64;

    /// Create a new seed from the given bytes.
    pub fn new(bytes: [u8; Seed::SIZE]) -> Self {
        Seed(bytes)
    }

    /// Get the inner secret byte slice.
    pub fn as_bytes(&self) -> &[u8; Seed::SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Seed").field(&"[REDACTED]").finish()
    }
}

/// Convert a mnemonic phrase and a passphrase into a 64-bytes seed.
pub fn seed_from_mnemonic(mnemonic: &str, passphrase: &str) -> Seed {
    let salt = Zeroizing::new(format!("{}{}", SALT_PREFIX, passphrase));
    let mut seed = [0u8; Seed::SIZE];
    pbkdf2::pbkdf2_hmac::<Sha512>(mnemonic.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed);
    Seed(seed)
}
