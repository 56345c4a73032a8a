use sha2::digest::{Digest, generic_array::typenum::U64};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::edwards::EdwardsPoint;
use crate::scalar::Scalar;
use crate::sign::signature::InnerSignature;
use crate::sign::{SecretKey, VerifyingKey, digest64};

/// The expanded form of an Ed25519 seed: the clamped secret scalar, the
/// nonce-derivation prefix, and the cached public key.
#[derive(Clone)]
pub(crate) struct ExpandedSecretKey {
    pub(crate) seed: SecretKey,
    pub(crate) scalar: Scalar,
    pub(crate) hash_prefix: [u8; 32],
    pub(crate) public_key: VerifyingKey,
}

impl Zeroize for ExpandedSecretKey {
    fn zeroize(&mut self) {
        self.seed.zeroize();
        self.scalar.zeroize();
        self.hash_prefix.zeroize();
    }
}

impl Drop for ExpandedSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for ExpandedSecretKey {}

impl From<&SecretKey> for ExpandedSecretKey {
    fn from(seed: &SecretKey) -> Self {
        Self::expand::<sha2::Sha512>(seed)
    }
}

impl ExpandedSecretKey {
    /// Expand a seed per RFC 8032 §5.1.5: hash it to 64 bytes, clamp
    /// the lower half into the secret scalar (clear the low three bits,
    /// clear bit 255, set bit 254), keep the upper half as the nonce
    /// prefix.
    pub(crate) fn expand<D>(seed: &SecretKey) -> Self
    where
        D: Digest<OutputSize = U64>,
    {
        let mut h = digest64::<D>(&[seed]);

        let mut scalar_bytes = [0u8; 32];
        scalar_bytes.copy_from_slice(&h[..32]);
        scalar_bytes[0] &= 248;
        scalar_bytes[31] &= 63;
        scalar_bytes[31] |= 64;
        // The basepoint has order ℓ, so the clamped scalar can be kept
        // in reduced form.
        let scalar = Scalar::from_bytes_mod_order(&scalar_bytes);

        let mut hash_prefix = [0u8; 32];
        hash_prefix.copy_from_slice(&h[32..]);

        let point = EdwardsPoint::mul_base(&scalar);
        let public_key = VerifyingKey {
            compressed: point.compress(),
            point,
        };

        scalar_bytes.zeroize();
        h.zeroize();

        Self {
            seed: *seed,
            scalar,
            hash_prefix,
            public_key,
        }
    }

    /// Sign a message per RFC 8032 §5.1.6:
    /// r = H(prefix ‖ M), R = r·B, k = H(R ‖ A ‖ M), S = r + k·a mod ℓ.
    pub(crate) fn sign_inner<D>(&self, message: &[u8]) -> InnerSignature
    where
        D: Digest<OutputSize = U64>,
    {
        let r = Scalar::from_bytes_mod_order_wide(&digest64::<D>(&[&self.hash_prefix, message]));
        let big_r = EdwardsPoint::mul_base(&r);
        let compressed_r = big_r.compress();

        let k = Scalar::from_bytes_mod_order_wide(&digest64::<D>(&[
            compressed_r.as_bytes(),
            self.public_key.compressed.as_bytes(),
            message,
        ]));

        InnerSignature {
            r: big_r,
            s: r + k * self.scalar,
        }
    }
}
