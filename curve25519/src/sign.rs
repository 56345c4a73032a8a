//! Ed25519 digital signatures (RFC 8032).
//!
//! # Example
//!
//! Generate a [`SigningKey`], sign a message, and verify it with the
//! corresponding [`VerifyingKey`]:
//!
//! ```
//! use curve25519::{Signature, SigningKey};
//! use curve25519::crypto_signature::{Signer, Verifier};
//! use rand_chacha::ChaCha8Rng;
//! use rand_core::SeedableRng;
//!
//! let mut rng = ChaCha8Rng::from_seed([1u8; 32]);
//! let signing_key = SigningKey::generate(&mut rng);
//! let signature: Signature = signing_key.sign(b"message");
//! let verifying_key = signing_key.verifying_key();
//! assert!(verifying_key.verify(b"message", &signature).is_ok());
//! ```
//!
//! Signing is single-shot and deterministic: the nonce is derived from
//! the secret hash prefix and the message, never from an RNG.
//! Verification uses the cofactored equation `[8][S]B = [8]R + [8][k]A`
//! with a constant-time point comparison, and collapses every malformed
//! input into the same opaque [`crypto_signature::Error`].
//!
//! SHA-512 enters through the [`Digest`](sha2::digest::Digest) trait
//! seam, so a hardware implementation exposing that trait can be
//! substituted for [`sha2::Sha512`].

mod error;
mod expanded;
mod signature;
mod signing_key;
mod verifying_key;

pub use error::*;
pub use signature::*;
pub use signing_key::*;
pub use verifying_key::*;

use sha2::digest::{Digest, generic_array::typenum::U64};

/// Length of an Ed25519 seed (secret key) in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Length of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Hash a transcript into 64 bytes with the injected digest.
pub(crate) fn digest64<D>(parts: &[&[u8]]) -> [u8; 64]
where
    D: Digest<OutputSize = U64>,
{
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(hasher.finalize().as_slice());
    out
}
