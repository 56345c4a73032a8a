//! X25519 scalar multiplication (RFC 7748) by the Montgomery ladder.
//!
//! The ladder runs over any [`FieldElementOps`] backend; the public
//! [`MontgomeryPoint`] API uses the crate-selected [`FieldElement`].

use core::fmt::{self, Debug, Formatter};
use subtle::{Choice, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

use crate::field::{FieldElement, FieldElementOps};

/// The u-coordinate of the X25519 generator, u = 9.
pub const X25519_BASEPOINT_BYTES: [u8; 32] = [
    9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0,
];

/// A point on Curve25519 (or its twist), encoded as the 32-byte
/// little-endian u-coordinate.
#[derive(Clone, Copy, Default)]
pub struct MontgomeryPoint(pub [u8; 32]);

/// The seven encodings of low-order points: 0, 1, the two points of
/// order eight, p − 1, p, and p + 1. Scalar multiples of these leak
/// nothing but the clamped scalar's cofactor bits, so they are rejected
/// as public keys.
const LOW_ORDER_ENCODINGS: [[u8; 32]; 7] = [
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ],
    [
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ],
    [
        0xe0, 0xeb, 0x7a, 0x7c, 0x3b, 0x41, 0xb8, 0xae, 0x16, 0x56, 0xe3, 0xfa, 0xf1, 0x9f, 0xc4,
        0x6a, 0xda, 0x09, 0x8d, 0xeb, 0x9c, 0x32, 0xb1, 0xfd, 0x86, 0x62, 0x05, 0x16, 0x5f, 0x49,
        0xb8, 0x00,
    ],
    [
        0x5f, 0x9c, 0x95, 0xbc, 0xa3, 0x50, 0x8c, 0x24, 0xb1, 0xd0, 0xb1, 0x55, 0x9c, 0x83, 0xef,
        0x5b, 0x04, 0x44, 0x5c, 0xc4, 0x58, 0x1c, 0x8e, 0x86, 0xd8, 0x22, 0x4e, 0xdd, 0xd0, 0x9f,
        0x11, 0x57,
    ],
    [
        0xec, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ],
    [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ],
    [
        0xee, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ],
];

impl Debug for MontgomeryPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0[..].fmt(f)
    }
}

impl DefaultIsZeroes for MontgomeryPoint {}

impl ConstantTimeEq for MontgomeryPoint {
    fn ct_eq(&self, other: &MontgomeryPoint) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for MontgomeryPoint {
    fn eq(&self, other: &MontgomeryPoint) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for MontgomeryPoint {}

impl MontgomeryPoint {
    /// The generator specified in RFC 7748.
    pub const GENERATOR: Self = Self(X25519_BASEPOINT_BYTES);

    /// Clamp a raw scalar per RFC 7748: clear bits 0–2 and 255, set
    /// bit 254.
    pub(crate) fn clamp_scalar(scalar: &mut [u8; 32]) {
        scalar[0] &= 248;
        scalar[31] &= 127;
        scalar[31] |= 64;
    }

    /// Multiply this point by a raw 32-byte scalar. The scalar is
    /// clamped internally; callers never pre-clamp.
    pub fn mul_clamped(&self, scalar: [u8; 32]) -> MontgomeryPoint {
        let mut clamped = scalar;
        Self::clamp_scalar(&mut clamped);
        let out = ladder::<FieldElement>(&clamped, &self.0);
        MontgomeryPoint(out)
    }

    /// Whether this encoding is one of the seven low-order points.
    /// All seven comparisons always run.
    pub fn is_low_order(&self) -> Choice {
        let mut found = Choice::from(0);
        for low in &LOW_ORDER_ENCODINGS {
            found |= self.0.ct_eq(low);
        }
        found
    }

    /// View the point as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy the point's byte encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

/// The Montgomery ladder over an already-clamped scalar.
///
/// One differential add-and-double per scalar bit, 255 iterations from
/// bit 254 down to 0. The only secret-dependent operation is the
/// conditional swap of the two working pairs.
pub(crate) fn ladder<F: FieldElementOps>(clamped: &[u8; 32], u: &[u8; 32]) -> [u8; 32] {
    let x1 = F::from_bytes(u);
    let mut x2 = F::ONE;
    let mut z2 = F::ZERO;
    let mut x3 = x1;
    let mut z3 = F::ONE;
    let mut swap = 0u8;

    for pos in (0..=254).rev() {
        let bit = (clamped[pos >> 3] >> (pos & 7)) & 1;
        swap ^= bit;
        F::conditional_swap(&mut x2, &mut x3, Choice::from(swap));
        F::conditional_swap(&mut z2, &mut z3, Choice::from(swap));
        swap = bit;

        // A = x2+z2, B = x2−z2, C = x3+z3, D = x3−z3,
        // DA = D·A, CB = C·B,
        // x3' = (DA+CB)², z3' = x1·(DA−CB)²,
        // AA = A², BB = B², x2' = AA·BB, E = AA−BB,
        // z2' = E·(BB + 121666·E)
        let a = x2.add(&z2);
        let b = x2.sub(&z2);
        let c = x3.add(&z3);
        let d = x3.sub(&z3);
        let da = d.mul(&a);
        let cb = c.mul(&b);
        x3 = da.add(&cb).square();
        z3 = x1.mul(&da.sub(&cb).square());
        let aa = a.square();
        let bb = b.square();
        x2 = aa.mul(&bb);
        let e = aa.sub(&bb);
        z2 = e.mul(&bb.add(&e.mul121666()));
    }

    F::conditional_swap(&mut x2, &mut x3, Choice::from(swap));
    F::conditional_swap(&mut z2, &mut z3, Choice::from(swap));

    x2.mul(&z2.invert()).to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldElement32, FieldElement2625};
    use hex_literal::hex;
    use rand_chacha::ChaCha8Rng;
    use rand_core::{RngCore, SeedableRng};

    fn x25519_vector(scalar: [u8; 32], u: [u8; 32]) -> [u8; 32] {
        MontgomeryPoint(u).mul_clamped(scalar).to_bytes()
    }

    #[test]
    fn rfc7748_vector_one() {
        let scalar = hex!("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
        let u = hex!("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
        let expected = hex!("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");
        assert_eq!(x25519_vector(scalar, u), expected);
    }

    #[test]
    fn rfc7748_vector_two() {
        let scalar = hex!("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
        let u = hex!("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
        let expected = hex!("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");
        assert_eq!(x25519_vector(scalar, u), expected);
    }

    #[test]
    fn rfc7748_iterated_ladder() {
        let mut k = X25519_BASEPOINT_BYTES;
        let mut u = X25519_BASEPOINT_BYTES;
        for _ in 0..1 {
            let result = MontgomeryPoint(u).mul_clamped(k).to_bytes();
            u = k;
            k = result;
        }
        assert_eq!(
            k,
            hex!("422c8e7a6227d7bca1350b3e2bb7279f7897b87bb6854b783c60e80311ae3079")
        );

        for _ in 1..1000 {
            let result = MontgomeryPoint(u).mul_clamped(k).to_bytes();
            u = k;
            k = result;
        }
        assert_eq!(
            k,
            hex!("684cf59ba83309552800ef566f2f4d3c1c3887c49360e3875f2eb94d99532c51")
        );
    }

    #[test]
    #[ignore]
    fn rfc7748_iterated_ladder_one_million() {
        let mut k = X25519_BASEPOINT_BYTES;
        let mut u = X25519_BASEPOINT_BYTES;
        for _ in 0..1_000_000 {
            let result = MontgomeryPoint(u).mul_clamped(k).to_bytes();
            u = k;
            k = result;
        }
        assert_eq!(
            k,
            hex!("7c3911e0ab2586fd864497297e575e6f3bc601c0883c30df5f4dd2d24f665424")
        );
    }

    #[test]
    fn ladder_agrees_across_backends() {
        let mut rng = ChaCha8Rng::from_seed([21u8; 32]);
        for _ in 0..50 {
            let mut scalar = [0u8; 32];
            let mut point = [0u8; 32];
            rng.fill_bytes(&mut scalar);
            rng.fill_bytes(&mut point);
            MontgomeryPoint::clamp_scalar(&mut scalar);
            assert_eq!(
                ladder::<FieldElement2625>(&scalar, &point),
                ladder::<FieldElement32>(&scalar, &point)
            );
        }
    }

    #[test]
    fn low_order_encodings_are_flagged() {
        for low in &LOW_ORDER_ENCODINGS {
            assert!(bool::from(MontgomeryPoint(*low).is_low_order()));
        }
        assert!(!bool::from(MontgomeryPoint::GENERATOR.is_low_order()));
        let rfc_public =
            MontgomeryPoint(hex!(
                "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
            ));
        assert!(!bool::from(rfc_public.is_low_order()));
    }

    #[test]
    fn low_order_points_multiply_to_zero() {
        let mut rng = ChaCha8Rng::from_seed([22u8; 32]);
        let mut scalar = [0u8; 32];
        rng.fill_bytes(&mut scalar);
        for low in &LOW_ORDER_ENCODINGS {
            let out = MontgomeryPoint(*low).mul_clamped(scalar);
            assert_eq!(out.to_bytes(), [0u8; 32]);
        }
    }
}
