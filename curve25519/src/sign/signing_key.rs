use core::fmt::{self, Debug, Formatter};
use crypto_signature::Error;
use rand_core::{CryptoRng, RngCore, TryCryptoRng, TryRngCore};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::sign::expanded::ExpandedSecretKey;
use crate::sign::{SECRET_KEY_LENGTH, Signature, VerifyingKey};

/// An Ed25519 seed, per RFC 8032 § 5.1.5: 32 octets of secret
/// randomness from which the signing scalar is derived.
pub type SecretKey = [u8; SECRET_KEY_LENGTH];

/// Ed25519 signing key.
///
/// Holds the seed in expanded form so repeated signing skips the key
/// derivation hash. Zeroized on drop.
#[derive(Clone)]
pub struct SigningKey {
    pub(crate) secret: ExpandedSecretKey,
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.secret.public_key)
            .finish_non_exhaustive()
    }
}

impl Zeroize for SigningKey {
    fn zeroize(&mut self) {
        self.secret.zeroize();
    }
}

impl ZeroizeOnDrop for SigningKey {}

impl ConstantTimeEq for SigningKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret.seed.ct_eq(&other.secret.seed)
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for SigningKey {}

impl From<SecretKey> for SigningKey {
    fn from(seed: SecretKey) -> Self {
        Self::from(&seed)
    }
}

impl From<&SecretKey> for SigningKey {
    fn from(seed: &SecretKey) -> Self {
        Self {
            secret: ExpandedSecretKey::from(seed),
        }
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = &'static str;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let seed: SecretKey = value
            .try_into()
            .map_err(|_| "invalid length for a signing key")?;
        Ok(Self::from(&seed))
    }
}

impl crypto_signature::Signer<Signature> for SigningKey {
    fn try_sign(&self, msg: &[u8]) -> Result<Signature, Error> {
        Ok(self.sign_raw(msg))
    }
}

impl crypto_signature::Verifier<Signature> for SigningKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<(), Error> {
        self.secret.public_key.verify_raw(signature, msg)
    }
}

impl SigningKey {
    /// Generate a signing key from a cryptographically secure RNG.
    pub fn generate<R: CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        rng.fill_bytes(&mut seed);
        let key = Self::from(&seed);
        seed.zeroize();
        key
    }

    /// Generate a signing key from a fallible randomness source.
    ///
    /// A failure of the source is returned as-is; no retry is made and
    /// no key material is produced.
    pub fn try_generate<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<Self, R::Error> {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        rng.try_fill_bytes(&mut seed)?;
        let key = Self::from(&seed);
        seed.zeroize();
        Ok(key)
    }

    /// Serialize this signing key as its seed.
    pub fn to_bytes(&self) -> SecretKey {
        self.secret.seed
    }

    /// View this signing key as its seed.
    pub fn as_bytes(&self) -> &SecretKey {
        &self.secret.seed
    }

    /// The [`VerifyingKey`] for this signing key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.secret.public_key
    }

    /// Sign a message with the Ed25519 algorithm defined in
    /// [RFC 8032 §5.1.6](https://datatracker.ietf.org/doc/html/rfc8032#section-5.1.6).
    pub fn sign_raw(&self, message: &[u8]) -> Signature {
        self.secret.sign_inner::<sha2::Sha512>(message).into()
    }
}
