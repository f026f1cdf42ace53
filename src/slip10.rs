//! SLIP-10 implementation for ed25519, hardened derivation only. Ed25519 has no public
//! derivation, every child number must be hardened.
//!
//! ```rust
//! use zoobc_slip10::slip10::{derive_for_path, ExtendedSecretKey};
//!
//! let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
//! let master = ExtendedSecretKey::new_master(&seed);
//! let derived_key = derive_for_path("m/0'/1'", &seed).unwrap();
//!
//! assert_eq!(derived_key.depth(), 2);
//! assert_eq!(derived_key, master.derive(0x8000_0000).unwrap().derive(0x8000_0001).unwrap());
//! ```

use std::fmt;

use bitcoin::hashes::{sha512, Hash, HashEngine, Hmac, HmacEngine};
use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signer, KEYPAIR_LENGTH, SECRET_KEY_LENGTH};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::account::Derivation;
use crate::address::AccountAddress;
use crate::path::{self, ChildNumber};
use crate::signature::{self, Signature};

pub use bitcoin::hash_types::XpubIdentifier;
/// A public key fingerprint, the first four bytes of the identifier.
pub use bitcoin::util::bip32::Fingerprint;

/// Key of the HMAC engine used to compute the master key, as defined in SLIP-10.
const MASTER_SECRET: &[u8] = b"ed25519 seed";

/// Possible errors when deriving keys and using derived key material.
#[derive(Error, Debug)]
pub enum Error {
    /// The child number is not hardened, ed25519 cannot be derived in a non-hardened way.
    #[error("No public derivation for ed25519, child index {0} is not hardened")]
    NoPublicDerivation(u32),
    /// The ed25519 key pair cannot be generated from the secret key.
    #[error("Key generation error: {0}")]
    KeyGeneration(#[from] ed25519_dalek::SignatureError),
    /// The derivation path is not valid.
    #[error("Derivation path error: {0}")]
    Path(#[from] path::Error),
    /// The signature does not pass the validation.
    #[error("Signature error: {0}")]
    Signature(#[from] signature::Error),
}

/// Ed25519 extended secret key. The extended secret key contains its depth, parent fingerprint,
/// child number, the derived secret key, and the chain code. Secret key and chain code are wiped
/// from memory when the value is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedSecretKey {
    depth: u8,
    #[zeroize(skip)]
    parent_fingerprint: Fingerprint,
    #[zeroize(skip)]
    child_number: ChildNumber,
    secret_key: [u8; 32],
    chain_code: [u8; 32],
}

impl fmt::Debug for ExtendedSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ExtendedSecretKey")
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_number", &self.child_number)
            .field("secret_key", &"[REDACTED]")
            .field("chain_code", &"[REDACTED]")
            .finish()
    }
}

impl ExtendedSecretKey {
    /// Construct a new master key from a seed value, as defined in SLIP10 the HMAC engine is setup
    /// with the value `"ed25519 seed"`.
    pub fn new_master(seed: impl AsRef<[u8]>) -> Self {
        let mut hmac_engine: HmacEngine<sha512::Hash> = HmacEngine::new(MASTER_SECRET);
        hmac_engine.input(seed.as_ref());
        let hmac_result: Hmac<sha512::Hash> = Hmac::from_engine(hmac_engine);

        debug!(
            "generated ed25519 master key from {} bytes of seed",
            seed.as_ref().len()
        );
        Self::from_hmac(
            hmac_result,
            0,
            Fingerprint::default(),
            ChildNumber::Normal { index: 0 },
        )
    }

    /// Construct a depth-0 key from raw secret key and chain code bytes.
    pub fn from_raw(secret_key: [u8; 32], chain_code: [u8; 32]) -> Self {
        ExtendedSecretKey {
            depth: 0,
            parent_fingerprint: Fingerprint::default(),
            child_number: ChildNumber::Normal { index: 0 },
            secret_key,
            chain_code,
        }
    }

    fn from_hmac(
        hmac_result: Hmac<sha512::Hash>,
        depth: u8,
        parent_fingerprint: Fingerprint,
        child_number: ChildNumber,
    ) -> Self {
        let digest = Zeroizing::new(hmac_result.into_inner());

        let mut secret_key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        secret_key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);

        ExtendedSecretKey {
            depth,
            parent_fingerprint,
            child_number,
            secret_key,
            chain_code,
        }
    }

    /// Derive the extended secret key from `&self` up to the given `path`.
    pub fn derive_priv(&self, path: &impl AsRef<[ChildNumber]>) -> Result<Self, Error> {
        let mut sk = self.clone();
        for cnum in path.as_ref() {
            sk = sk.ckd_priv(*cnum)?;
        }
        Ok(sk)
    }

    /// Derive the child at the raw index `i`, the index must already include the hardened offset
    /// `2^31`.
    pub fn derive(&self, i: u32) -> Result<Self, Error> {
        self.ckd_priv(ChildNumber::from(i))
    }

    /// Derive the next extended secret key given the child number.
    ///
    /// ## Error
    /// Returns an error if the child number is not hardened. As defined in SLIP10, ed25519 cannot
    /// be derived in a non-hardened way.
    pub fn ckd_priv(&self, i: ChildNumber) -> Result<Self, Error> {
        if i.is_normal() {
            return Err(Error::NoPublicDerivation(u32::from(i)));
        }
        // depth is informational only, it sticks at 255 for deeper keys
        let depth = self.depth.saturating_add(1);

        let mut hmac_engine: HmacEngine<sha512::Hash> = HmacEngine::new(&self.chain_code);
        // Hardened key: 0x00 || secret key || ser32(i)
        hmac_engine.input(&[0u8]);
        hmac_engine.input(&self.secret_key);
        hmac_engine.input(&u32::from(i).to_be_bytes());
        let hmac_result: Hmac<sha512::Hash> = Hmac::from_engine(hmac_engine);

        trace!("derived ed25519 child {} at depth {}", i, depth);
        Ok(Self::from_hmac(
            hmac_result,
            depth,
            self.fingerprint()?,
            i,
        ))
    }

    /// The depth of this extended key, start with 0 for the master and saturate at 255.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The parent fingerprint, 0 for the master.
    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    /// The child number used to derive this key, `Normal { index: 0 }` for the master.
    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    /// The secret key, a 32-bytes value. In Ed25519 any 32-bytes long value is considered as valid
    /// secret key, computation is done on-top before using that value.
    pub fn secret_key(&self) -> &[u8; 32] {
        &self.secret_key
    }

    /// The 32-bytes entropy extention called chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Returns a copy of the secret key bytes, the seed of the ed25519 key pair.
    pub fn raw_seed(&self) -> [u8; 32] {
        self.secret_key
    }

    /// Get the associated ed25519 public key. The secret key is used as the RFC 8032 key
    /// generation seed.
    pub fn public_key(&self) -> Result<PublicKey, Error> {
        let secret = SecretKey::from_bytes(&self.secret_key)?;
        Ok(PublicKey::from(&secret))
    }

    /// Returns the ed25519 key pair, built from the secret key followed by its public key.
    pub fn keypair(&self) -> Result<Keypair, Error> {
        let public_key = self.public_key()?;
        let mut bytes = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
        bytes[..SECRET_KEY_LENGTH].copy_from_slice(&self.secret_key);
        bytes[SECRET_KEY_LENGTH..].copy_from_slice(public_key.as_bytes());
        Ok(Keypair::from_bytes(&bytes[..])?)
    }

    /// Sign the payload, the returned signature is prefixed with its signature type when
    /// serialized.
    pub fn sign(&self, payload: impl AsRef<[u8]>) -> Result<Signature, Error> {
        let keypair = self.keypair()?;
        Ok(Signature::new(keypair.sign(payload.as_ref())))
    }

    /// Verify a signature over the payload against this key's public key.
    pub fn verify(&self, payload: impl AsRef<[u8]>, signature: &Signature) -> Result<(), Error> {
        signature.verify(&self.public_key()?, payload.as_ref())?;
        Ok(())
    }

    /// Returns the checksummed account address of the public key.
    pub fn address(&self) -> Result<AccountAddress, Error> {
        Ok(AccountAddress::from(self.public_key()?))
    }

    /// Returns the address as a URL-safe base64 string, see [`AccountAddress`].
    pub fn serialize(&self) -> Result<String, Error> {
        Ok(self.address()?.to_string())
    }

    /// Returns the serialized public key, begins with a null byte.
    pub fn serialized_public_key(&self) -> Result<[u8; 33], Error> {
        let mut bytes = [0u8; 33];
        bytes[1..].copy_from_slice(self.public_key()?.as_bytes());
        Ok(bytes)
    }

    /// Returns the HASH160 of the serialized public key.
    pub fn key_identifier(&self) -> Result<XpubIdentifier, Error> {
        let mut engine = XpubIdentifier::engine();
        engine.input(self.serialized_public_key()?.as_ref());
        Ok(XpubIdentifier::from_engine(engine))
    }

    /// Returns the first four bytes of the identifier.
    pub fn fingerprint(&self) -> Result<Fingerprint, Error> {
        Ok(Fingerprint::from(&self.key_identifier()?[0..4]))
    }
}

/// Derive the key for a hardened-only path such as `m/44'/883'/0'` from a seed. Each path segment
/// is offset by `2^31` before deriving.
///
/// ## Error
/// Returns [`Error::Path`] if the path is not valid, no key is derived in that case.
pub fn derive_for_path(path: &str, seed: impl AsRef<[u8]>) -> Result<ExtendedSecretKey, Error> {
    derive_for(path, seed)
}

/// Derive the key identified by `derivation` from a seed, see [`Derivation`].
pub fn derive_for<D>(derivation: &D, seed: impl AsRef<[u8]>) -> Result<ExtendedSecretKey, Error>
where
    D: Derivation + ?Sized,
{
    let derivation_path = derivation.derivation_path()?;
    debug!("deriving ed25519 key for path {}", derivation_path);
    ExtendedSecretKey::new_master(seed).derive_priv(&derivation_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::path::DerivationPath;
    use std::str::FromStr;

    fn assert_ed25519_curve(master: &ExtendedSecretKey, asserts: Vec<Vec<&str>>) {
        for mut assert in asserts {
            let chain = master
                .derive_priv(&DerivationPath::from_str(assert[0]).unwrap())
                .unwrap();
            assert_eq_ed25519_elem(&chain, assert.drain(1..).collect());
        }
    }

    fn assert_eq_ed25519_elem(res: &ExtendedSecretKey, asserts: Vec<&str>) {
        assert_eq!(asserts[0], res.parent_fingerprint().to_string());
        assert_eq!(asserts[1], hex::encode(res.chain_code()));
        assert_eq!(asserts[2], hex::encode(res.secret_key()));
        assert_eq!(asserts[3], hex::encode(res.serialized_public_key().unwrap()));
    }

    #[test]
    fn ed25519_vector_1() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = ExtendedSecretKey::new_master(&seed);

        assert_ed25519_curve(
            &master,
            vec![
                vec![
                    "m",
                    "00000000",
                    "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb",
                    "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7",
                    "00a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed",
                ],
                vec![
                    "m/0'",
                    "ddebc675",
                    "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69",
                    "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3",
                    "008c8a13df77a28f3445213a0f432fde644acaa215fc72dcdf300d5efaa85d350c",
                ],
                vec![
                    "m/0'/1'",
                    "13dab143",
                    "a320425f77d1b5c2505a6b1b27382b37368ee640e3557c315416801243552f14",
                    "b1d0bad404bf35da785a64ca1ac54b2617211d2777696fbffaf208f746ae84f2",
                    "001932a5270f335bed617d5b935c80aedb1a35bd9fc1e31acafd5372c30f5c1187",
                ],
                vec![
                    "m/0'/1'/2'",
                    "ebe4cb29",
                    "2e69929e00b5ab250f49c3fb1c12f252de4fed2c1db88387094a0f8c4c9ccd6c",
                    "92a5b23c0b8a99e37d07df3fb9966917f5d06e02ddbd909c7e184371463e9fc9",
                    "00ae98736566d30ed0e9d2f4486a64bc95740d89c7db33f52121f8ea8f76ff0fc1",
                ],
                vec![
                    "m/0'/1'/2'/2'",
                    "316ec1c6",
                    "8f6d87f93d750e0efccda017d662a1b31a266e4a6f5993b15f5c1f07f74dd5cc",
                    "30d1dc7e5fc04c31219ab25a27ae00b50f6fd66622f6e9c913253d6511d1e662",
                    "008abae2d66361c879b900d204ad2cc4984fa2aa344dd7ddc46007329ac76c429c",
                ],
                vec![
                    "m/0'/1'/2'/2'/1000000000'",
                    "d6322ccd",
                    "68789923a0cac2cd5a29172a475fe9e0fb14cd6adb5ad98a3fa70333e7afa230",
                    "8f94d394a8e8fd6b1bc2f3f49f5c47e385281d5c17e65324b0f62483e37e8793",
                    "003c24da049451555d51a7014a37337aa4e12d41e485abccfa46b47dfb2af54b7a",
                ],
            ],
        );
    }

    #[test]
    fn ed25519_vector_2() {
        let seed = hex::decode("fffcf9f6f3f0edeae7e4e1dedbd8d5d2cfccc9c6c3c0bdbab7b4b1aeaba8a5a29f9c999693908d8a8784817e7b7875726f6c696663605d5a5754514e4b484542").unwrap();
        let master = ExtendedSecretKey::new_master(&seed);

        assert_ed25519_curve(
            &master,
            vec![
                vec![
                    "m",
                    "00000000",
                    "ef70a74db9c3a5af931b5fe73ed8e1a53464133654fd55e7a66f8570b8e33c3b",
                    "171cb88b1b3c1db25add599712e36245d75bc65a1a5c9e18d76f9f2b1eab4012",
                    "008fe9693f8fa62a4305a140b9764c5ee01e455963744fe18204b4fb948249308a",
                ],
                vec![
                    "m/0'",
                    "31981b50",
                    "0b78a3226f915c082bf118f83618a618ab6dec793752624cbeb622acb562862d",
                    "1559eb2bbec5790b0c65d8693e4d0875b1747f4970ae8b650486ed7470845635",
                    "0086fab68dcb57aa196c77c5f264f215a112c22a912c10d123b0d03c3c28ef1037",
                ],
                vec![
                    "m/0'/2147483647'",
                    "1e9411b1",
                    "138f0b2551bcafeca6ff2aa88ba8ed0ed8de070841f0c4ef0165df8181eaad7f",
                    "ea4f5bfe8694d8bb74b7b59404632fd5968b774ed545e810de9c32a4fb4192f4",
                    "005ba3b9ac6e90e83effcd25ac4e58a1365a9e35a3d3ae5eb07b9e4d90bcf7506d",
                ],
                vec![
                    "m/0'/2147483647'/1'",
                    "fcadf38c",
                    "73bd9fff1cfbde33a1b846c27085f711c0fe2d66fd32e139d3ebc28e5a4a6b90",
                    "3757c7577170179c7868353ada796c839135b3d30554bbb74a4b1e4a5a58505c",
                    "002e66aa57069c86cc18249aecf5cb5a9cebbfd6fadeab056254763874a9352b45",
                ],
                vec![
                    "m/0'/2147483647'/1'/2147483646'",
                    "aca70953",
                    "0902fe8a29f9140480a00ef244bd183e8a13288e4412d8389d140aac1794825a",
                    "5837736c89570de861ebc173b1086da4f505d4adb387c6a1b1342d5e4ac9ec72",
                    "00e33c0f7d81d843c572275f287498e8d408654fdf0d1e065b84e2e6f157aab09b",
                ],
                vec![
                    "m/0'/2147483647'/1'/2147483646'/2'",
                    "422c654b",
                    "5d70af781f3a37b829f0d060924d5e960bdc02e85423494afc0b1a41bbe196d4",
                    "551d333177df541ad876a60ea71f00447931c0a9da16f227c11ea080d7391b8d",
                    "0047150c75db263559a70d5778bf36abbab30fb061ad69f69ece61a72b0cfa4fc0",
                ],
            ],
        );
    }

    #[test]
    fn no_public_derivation() {
        let master = ExtendedSecretKey::new_master([0u8; 32]);
        for i in [0u32, 1, 44, 0x7fff_ffff].iter() {
            assert!(matches!(
                master.derive(*i),
                Err(Error::NoPublicDerivation(index)) if index == *i
            ));
        }
        assert!(matches!(
            master.ckd_priv(ChildNumber::Normal { index: 3 }),
            Err(Error::NoPublicDerivation(3))
        ));
        assert!(master.derive(0x8000_0000).is_ok());
        assert!(master.derive(u32::MAX).is_ok());
    }

    #[test]
    fn derive_matches_ckd_priv() {
        let master = ExtendedSecretKey::new_master([7u8; 64]);
        let child = master.derive(0x8000_0000 + 883).unwrap();
        let expected = master
            .ckd_priv(ChildNumber::from_hardened_idx(883).unwrap())
            .unwrap();
        assert_eq!(child, expected);
        assert_eq!(child.depth(), 1);
        assert_eq!(child.child_number(), ChildNumber::Hardened { index: 883 });
        assert_eq!(child.parent_fingerprint(), master.fingerprint().unwrap());
    }

    #[test]
    fn derivation_does_not_alter_parent() {
        let master = ExtendedSecretKey::new_master([1u8; 64]);
        let copy = master.clone();
        let _ = master.derive(0x8000_0001).unwrap();
        assert_eq!(master, copy);
        assert_eq!(master.depth(), 0);
    }

    #[test]
    fn derive_for_path_rejects_invalid_path() {
        let seed = [0u8; 64];
        for path in ["", "m", "m/44'/883'/0", "m/44'/883'/0'/", "m/2147483648'"].iter() {
            assert!(matches!(
                derive_for_path(path, seed),
                Err(Error::Path(path::Error::InvalidPath(_)))
            ));
        }
    }

    #[test]
    fn long_path_derivation() {
        let long_path = format!("m{}", "/0'".repeat(256));
        assert!(path::is_valid_path(&long_path));

        let key = derive_for_path(&long_path, [0u8; 64]).unwrap();
        assert_eq!(key.depth(), u8::MAX);
        assert_eq!(key.child_number(), ChildNumber::Hardened { index: 0 });

        let mut stepped = ExtendedSecretKey::new_master([0u8; 64]);
        for _ in 0..256 {
            stepped = stepped.derive(0x8000_0000).unwrap();
        }
        assert_eq!(key, stepped);
        assert!(key.derive(0x8000_0001).is_ok());
    }

    #[test]
    fn raw_seed_is_secret_key() {
        let key = ExtendedSecretKey::from_raw([5u8; 32], [6u8; 32]);
        assert_eq!(key.raw_seed(), [5u8; 32]);
        assert_eq!(key.chain_code(), &[6u8; 32]);
        assert_eq!(key.depth(), 0);
    }

    #[test]
    fn keypair_uses_derived_public_key() {
        let key = ExtendedSecretKey::new_master([3u8; 64]);
        let keypair = key.keypair().unwrap();
        assert_eq!(keypair.secret.as_bytes(), key.secret_key());
        assert_eq!(keypair.public, key.public_key().unwrap());
    }

    #[test]
    fn sign_and_verify() {
        let key = ExtendedSecretKey::new_master([4u8; 64]);
        let sig = key.sign(b"payload").unwrap();
        assert!(key.verify(b"payload", &sig).is_ok());
        assert!(key.verify(b"other payload", &sig).is_err());

        let other = key.derive(0x8000_0000).unwrap();
        assert!(other.verify(b"payload", &sig).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let key = ExtendedSecretKey::new_master([9u8; 64]);
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&hex::encode(key.secret_key())));
        assert!(!debug.contains(&hex::encode(key.chain_code())));
        assert!(debug.contains("depth: 0"));
    }

    #[test]
    fn extended_secret_key_serde() {
        let key = derive_for_path("m/44'/883'/0'", [8u8; 64]).unwrap();
        let s = serde_yaml::to_string(&key).expect("Encode key in yaml");
        let res: ExtendedSecretKey = serde_yaml::from_str(&s).expect("Decode key from yaml");
        assert_eq!(key, res);
    }
}
