use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use crypto_signature::Error;
use sha2::digest::{Digest, generic_array::typenum::U64};
use subtle::ConstantTimeEq;

use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::scalar::Scalar;
use crate::sign::signature::InnerSignature;
use crate::sign::{PUBLIC_KEY_LENGTH, Signature, SigningError, digest64};

/// Ed25519 public key as defined in [RFC 8032 § 5.1.5].
///
/// Carries both the decompressed point and its 32-byte encoding, so
/// verification never re-derives either.
#[derive(Copy, Clone, Default, Eq)]
pub struct VerifyingKey {
    pub(crate) compressed: CompressedEdwardsY,
    pub(crate) point: EdwardsPoint,
}

impl Debug for VerifyingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "VerifyingKey({:?})", self.compressed)
    }
}

impl AsRef<[u8]> for VerifyingKey {
    fn as_ref(&self) -> &[u8] {
        self.compressed.as_bytes()
    }
}

impl Hash for VerifyingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.compressed.as_bytes().hash(state);
    }
}

impl PartialEq for VerifyingKey {
    fn eq(&self, other: &Self) -> bool {
        self.compressed.as_bytes() == other.compressed.as_bytes()
    }
}

impl crypto_signature::Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<(), Error> {
        self.verify_raw(signature, msg)
    }
}

impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; PUBLIC_KEY_LENGTH] = value
            .try_into()
            .map_err(|_| SigningError::InvalidPublicKeyBytes)?;
        Self::from_bytes(bytes)
    }
}

impl VerifyingKey {
    /// Serialize this verifying key into its compressed form.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.compressed.to_bytes()
    }

    /// View this verifying key's compressed form.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.compressed.as_bytes()
    }

    /// Construct a `VerifyingKey` from its compressed encoding.
    ///
    /// Fails on a non-canonical or off-curve encoding, and on the
    /// identity point.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self, Error> {
        let compressed = CompressedEdwardsY(*bytes);
        let point = Option::<EdwardsPoint>::from(compressed.decompress())
            .ok_or(SigningError::InvalidPublicKeyBytes)?;
        if point.is_identity().into() {
            return Err(SigningError::InvalidPublicKeyBytes.into());
        }
        Ok(Self { compressed, point })
    }

    /// The verifying key as a curve point.
    pub fn to_edwards(self) -> EdwardsPoint {
        self.point
    }

    /// Verify a signature on a message with the Ed25519 algorithm
    /// defined in [RFC 8032 §5.1.7](https://datatracker.ietf.org/doc/html/rfc8032#section-5.1.7).
    ///
    /// The check is cofactored: `[8][S]B == [8]R + [8][k]A`, compared
    /// in constant time. Malformed R or S and a failed equation all
    /// collapse into one opaque error.
    pub fn verify_raw(&self, signature: &Signature, message: &[u8]) -> Result<(), Error> {
        self.verify_inner::<sha2::Sha512>(signature, message)
            .map_err(Into::into)
    }

    pub(crate) fn verify_inner<D>(
        &self,
        signature: &Signature,
        message: &[u8],
    ) -> Result<(), SigningError>
    where
        D: Digest<OutputSize = U64>,
    {
        let InnerSignature { r, s } = InnerSignature::try_from(signature)?;

        let k = Scalar::from_bytes_mod_order_wide(&digest64::<D>(&[
            signature.r_bytes(),
            self.compressed.as_bytes(),
            message,
        ]));

        let lhs = EdwardsPoint::mul_base(&s).mul_by_cofactor();
        let k_a = self.point * k;
        let rhs = (&r + &k_a.to_cached()).to_extended().mul_by_cofactor();

        if bool::from(lhs.ct_eq(&rhs)) {
            Ok(())
        } else {
            Err(SigningError::Verify)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::SigningKey;
    use hex_literal::hex;
    use rand_chacha::ChaCha8Rng;
    use rand_core::{RngCore, SeedableRng};

    struct Vector {
        seed: [u8; 32],
        public: [u8; 32],
        message: &'static [u8],
        signature: [u8; 64],
    }

    // RFC 8032 §7.1, test vectors 1–3
    fn vectors() -> [Vector; 3] {
        [
            Vector {
                seed: hex!("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"),
                public: hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"),
                message: b"",
                signature: hex!(
                    "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155"
                    "5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
                ),
            },
            Vector {
                seed: hex!("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb"),
                public: hex!("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c"),
                message: &[0x72],
                signature: hex!(
                    "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da"
                    "085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"
                ),
            },
            Vector {
                seed: hex!("c5aa8df43f9f837bedb7442f31dcb7b166d38535076f094b85ce3a2e0b4458f7"),
                public: hex!("fc51cd8e6218a1a38da47ed00230f0580816ed13ba3303ac5deb911548908025"),
                message: &hex!("af82"),
                signature: hex!(
                    "6291d657deec24024827e69c3abe01a30ce548a284743a445e3680d7db5ac3ac"
                    "18ff9b538d16f290ae67f760984dc6594a7c15e9716ed28dc027beceea1ec40a"
                ),
            },
        ]
    }

    #[test]
    fn rfc8032_sign_and_verify() {
        for vector in vectors() {
            let key = SigningKey::from(&vector.seed);
            assert_eq!(key.verifying_key().to_bytes(), vector.public);

            let signature = key.sign_raw(vector.message);
            assert_eq!(signature.to_bytes(), vector.signature);

            let verifying_key = VerifyingKey::from_bytes(&vector.public).unwrap();
            assert!(
                verifying_key
                    .verify_raw(&signature, vector.message)
                    .is_ok()
            );
        }
    }

    #[test]
    fn sign_verify_round_trip_random() {
        let mut rng = ChaCha8Rng::from_seed([5u8; 32]);
        for i in 0..1000 {
            let key = SigningKey::generate(&mut rng);
            let mut message = [0u8; 48];
            rng.fill_bytes(&mut message);
            let message = &message[..(i % 49)];

            let signature = key.sign_raw(message);
            assert!(key.verifying_key().verify_raw(&signature, message).is_ok());
        }
    }

    #[test]
    fn any_single_bit_flip_is_rejected() {
        let vector = &vectors()[2];
        let key = SigningKey::from(&vector.seed);
        let verifying_key = key.verifying_key();
        let signature = key.sign_raw(vector.message);

        let sig_bytes = signature.to_bytes();
        for bit in 0..(64 * 8) {
            let mut tampered = sig_bytes;
            tampered[bit / 8] ^= 1 << (bit % 8);
            let tampered = Signature::from_bytes(&tampered);
            assert!(
                verifying_key.verify_raw(&tampered, vector.message).is_err(),
                "accepted signature with bit {} flipped",
                bit
            );
        }

        for bit in 0..(vector.message.len() * 8) {
            let mut tampered = [0u8; 2];
            tampered.copy_from_slice(vector.message);
            tampered[bit / 8] ^= 1 << (bit % 8);
            assert!(
                verifying_key.verify_raw(&signature, &tampered).is_err(),
                "accepted message with bit {} flipped",
                bit
            );
        }
    }

    #[test]
    fn wrong_key_is_rejected() {
        let mut rng = ChaCha8Rng::from_seed([6u8; 32]);
        let key = SigningKey::generate(&mut rng);
        let other = SigningKey::generate(&mut rng);
        let signature = key.sign_raw(b"spinach");
        assert!(
            other
                .verifying_key()
                .verify_raw(&signature, b"spinach")
                .is_err()
        );
    }

    #[test]
    fn non_canonical_s_is_rejected() {
        let vector = &vectors()[0];
        let key = SigningKey::from(&vector.seed);
        let verifying_key = key.verifying_key();
        let signature = key.sign_raw(vector.message).to_bytes();

        // S + ℓ encodes the same residue but is not canonical.
        let order = hex!("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");
        let mut s_plus_order = [0u8; 32];
        let mut carry = 0u16;
        for i in 0..32 {
            let sum = signature[32 + i] as u16 + order[i] as u16 + carry;
            s_plus_order[i] = sum as u8;
            carry = sum >> 8;
        }
        let mut tampered = signature;
        tampered[32..].copy_from_slice(&s_plus_order);
        let tampered = Signature::from_bytes(&tampered);
        assert!(verifying_key.verify_raw(&tampered, vector.message).is_err());

        // S with the top bits set is far beyond the order.
        let mut high = signature;
        high[63] |= 0xe0;
        let high = Signature::from_bytes(&high);
        assert!(verifying_key.verify_raw(&high, vector.message).is_err());
    }

    #[test]
    fn undecodable_r_is_rejected() {
        let vector = &vectors()[0];
        let key = SigningKey::from(&vector.seed);
        let verifying_key = key.verifying_key();
        let mut bytes = key.sign_raw(vector.message).to_bytes();

        // y = 2 is not on the curve, so this R cannot decompress.
        bytes[..32].copy_from_slice(&{
            let mut r = [0u8; 32];
            r[0] = 2;
            r
        });
        let tampered = Signature::from_bytes(&bytes);
        assert!(verifying_key.verify_raw(&tampered, vector.message).is_err());
    }

    #[test]
    fn malformed_public_keys_are_rejected() {
        // non-canonical y
        let mut p_bytes = [0xffu8; 32];
        p_bytes[0] = 0xed;
        p_bytes[31] = 0x7f;
        assert!(VerifyingKey::from_bytes(&p_bytes).is_err());

        // off-curve y
        let mut two = [0u8; 32];
        two[0] = 2;
        assert!(VerifyingKey::from_bytes(&two).is_err());

        // the identity
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(VerifyingKey::from_bytes(&identity).is_err());

        // wrong length through the slice conversion
        assert!(VerifyingKey::try_from(&[0u8; 31][..]).is_err());
    }
}
