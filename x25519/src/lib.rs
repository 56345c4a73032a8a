#![no_std]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations, unused_must_use)]

use core::error;
use core::fmt::{self, Display, Formatter};

use curve25519::MontgomeryPoint;
use curve25519::subtle::ConstantTimeEq;
use rand_core::{CryptoRng, RngCore, TryCryptoRng, TryRngCore};
use zeroize::Zeroize;

pub use curve25519::X25519_BASEPOINT_BYTES;

/// Key-exchange errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// An input buffer is not 32 bytes long
    InvalidLength,
    /// The peer's public key is a low-order point, or the exchange
    /// produced an all-zero shared secret
    WeakKey,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLength => write!(f, "input is not 32 bytes long"),
            Error::WeakKey => write!(f, "low-order public key or zero shared secret"),
        }
    }
}

impl error::Error for Error {}

/// A clamped X25519 secret scalar.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Secret([u8; 32]);

/// An X25519 public key: a point on Curve25519.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct PublicKey(MontgomeryPoint);

/// The result of a Diffie–Hellman key exchange.
///
/// Not directly usable as a symmetric key; derive one through a KDF.
#[derive(PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret(MontgomeryPoint);

impl core::fmt::Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret").finish_non_exhaustive()
    }
}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret").finish_non_exhaustive()
    }
}

/// Clamp a raw 32-byte string into a Secret per RFC 7748.
impl From<[u8; 32]> for Secret {
    fn from(bytes: [u8; 32]) -> Secret {
        let mut secret = Secret(bytes);
        secret.clamp();
        secret
    }
}

/// Compute the public key for a secret using the generator specified in
/// RFC 7748.
impl From<&Secret> for PublicKey {
    fn from(secret: &Secret) -> PublicKey {
        PublicKey(MontgomeryPoint::GENERATOR.mul_clamped(secret.0))
    }
}

impl PublicKey {
    /// Convert a byte slice into a public key, rejecting the seven
    /// low-order encodings.
    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey, Error> {
        let public_key = PublicKey::from_bytes_unchecked(bytes)?;
        if public_key.0.is_low_order().into() {
            return Err(Error::WeakKey);
        }
        Ok(public_key)
    }

    /// Convert a byte slice into a public key, checking only the
    /// length.
    pub fn from_bytes_unchecked(bytes: &[u8]) -> Result<PublicKey, Error> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidLength)?;
        Ok(PublicKey(MontgomeryPoint(arr)))
    }

    /// View the public key as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl SharedSecret {
    /// View the shared secret as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl Secret {
    /// Generate an X25519 secret from a cryptographically secure RNG.
    pub fn new<R: CryptoRng + ?Sized>(csprng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        csprng.fill_bytes(&mut bytes);
        let secret = Secret::from(bytes);
        bytes.zeroize();
        secret
    }

    /// Generate an X25519 secret from a fallible randomness source,
    /// propagating the source's error untouched.
    pub fn try_new<R: TryCryptoRng + ?Sized>(csprng: &mut R) -> Result<Self, R::Error> {
        let mut bytes = [0u8; 32];
        csprng.try_fill_bytes(&mut bytes)?;
        let secret = Secret::from(bytes);
        bytes.zeroize();
        Ok(secret)
    }

    /// Clamp per RFC 7748: clear bits 0–2 and 255, set bit 254.
    fn clamp(&mut self) {
        self.0[0] &= 248;
        self.0[31] &= 127;
        self.0[31] |= 64;
    }

    /// Perform a Diffie–Hellman key exchange with a peer's public key.
    ///
    /// Fails with [`Error::WeakKey`] if the peer's key is a low-order
    /// point or the resulting secret is all zero; a failed exchange
    /// yields no key material at all.
    pub fn diffie_hellman(&self, their_public: &PublicKey) -> Result<SharedSecret, Error> {
        if their_public.0.is_low_order().into() {
            return Err(Error::WeakKey);
        }
        let shared = their_public.0.mul_clamped(self.0);
        if shared.ct_eq(&MontgomeryPoint([0u8; 32])).into() {
            return Err(Error::WeakKey);
        }
        Ok(SharedSecret(shared))
    }

    /// Convert a byte slice into a secret, clamping it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Secret, Error> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidLength)?;
        Ok(Secret::from(arr))
    }

    /// View the clamped secret as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// The X25519 function of RFC 7748 §5, with the low-order and zero
/// output checks applied.
pub fn x25519(scalar_bytes: [u8; 32], point_bytes: [u8; 32]) -> Result<[u8; 32], Error> {
    let point = PublicKey::from_bytes(&point_bytes)?;
    let shared = Secret::from(scalar_bytes).diffie_hellman(&point)?;
    Ok(*shared.as_bytes())
}

/// The raw X25519 function of RFC 7748 §5. No checks are made on the
/// point, and an all-zero output is returned as-is.
pub fn x25519_unchecked(scalar_bytes: [u8; 32], point_bytes: [u8; 32]) -> [u8; 32] {
    MontgomeryPoint(point_bytes)
        .mul_clamped(scalar_bytes)
        .to_bytes()
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    /// The seven low-order encodings of RFC 7748's curve and twist.
    const LOW_ORDER_ENCODINGS: [[u8; 32]; 7] = [
        [0u8; 32],
        {
            let mut one = [0u8; 32];
            one[0] = 1;
            one
        },
        hex!("e0eb7a7c3b41b8ae1656e3faf19fc46ada098deb9c32b1fd866205165f49b800"),
        hex!("5f9c95bca3508c24b1d0b1559c83ef5b04445cc4581c8e86d8224eddd09f1157"),
        hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f"),
        hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f"),
        hex!("eeffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f"),
    ];

    #[test]
    fn test_low_order() {
        for encoding in &LOW_ORDER_ENCODINGS {
            assert_eq!(PublicKey::from_bytes(encoding), Err(Error::WeakKey));
            // An unchecked key still fails at exchange time.
            let bad_key = PublicKey::from_bytes_unchecked(encoding).unwrap();
            let mut rng = ChaCha8Rng::from_seed([13u8; 32]);
            let secret = Secret::new(&mut rng);
            assert_eq!(secret.diffie_hellman(&bad_key), Err(Error::WeakKey));
        }
    }

    #[test]
    fn test_wrong_lengths() {
        assert_eq!(PublicKey::from_bytes(&[0u8; 31]), Err(Error::InvalidLength));
        assert_eq!(Secret::from_bytes(&[0u8; 33]).err(), Some(Error::InvalidLength));
    }

    #[test]
    fn test_random_dh() {
        let mut rng = ChaCha8Rng::from_seed([14u8; 32]);
        for _ in 0..16 {
            let alice_priv = Secret::new(&mut rng);
            let alice_pub = PublicKey::from(&alice_priv);
            let bob_priv = Secret::new(&mut rng);
            let bob_pub = PublicKey::from(&bob_priv);

            let shared_alice = alice_priv.diffie_hellman(&bob_pub).unwrap();
            let shared_bob = bob_priv.diffie_hellman(&alice_pub).unwrap();
            assert_eq!(shared_alice.as_bytes(), shared_bob.as_bytes());
        }
    }

    #[test]
    fn test_public_key_matches_dh_with_basepoint() {
        let mut rng = ChaCha8Rng::from_seed([15u8; 32]);
        for _ in 0..16 {
            let secret = Secret::new(&mut rng);
            let public = PublicKey::from(&secret);
            let ladder = x25519_unchecked(*secret.as_bytes(), X25519_BASEPOINT_BYTES);
            assert_eq!(public.as_bytes(), &ladder);
        }
    }

    #[test]
    fn test_rfc_test_vectors_alice_bob() {
        let alice_priv = Secret::from_bytes(&hex!(
            "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a"
        ))
        .unwrap();
        let got_alice_pub = PublicKey::from(&alice_priv);
        let expected_alice_pub =
            hex!("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a");
        assert_eq!(got_alice_pub.as_bytes(), &expected_alice_pub);

        let bob_priv = Secret::from_bytes(&hex!(
            "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb"
        ))
        .unwrap();
        let got_bob_pub = PublicKey::from(&bob_priv);
        let expected_bob_pub =
            hex!("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f");
        assert_eq!(got_bob_pub.as_bytes(), &expected_bob_pub);

        let alice_shared = alice_priv.diffie_hellman(&got_bob_pub).unwrap();
        let bob_shared = bob_priv.diffie_hellman(&got_alice_pub).unwrap();
        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());

        let expected_shared =
            hex!("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742");
        assert_eq!(alice_shared.as_bytes(), &expected_shared);
    }

    #[test]
    fn test_rfc_test_vectors_fixed() {
        struct Test {
            secret: [u8; 32],
            point: [u8; 32],
            expected: [u8; 32],
        }

        let test_vectors = [
            Test {
                secret: hex!("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4"),
                point: hex!("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c"),
                expected: hex!("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552"),
            },
            Test {
                secret: hex!("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d"),
                point: hex!("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493"),
                expected: hex!("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957"),
            },
        ];

        for vector in test_vectors {
            let got = x25519_unchecked(vector.secret, vector.point);
            assert_eq!(got, vector.expected);
        }
    }
}
