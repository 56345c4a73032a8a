//! Twisted-Edwards group operations for Ed25519 (RFC 8032).
//!
//! Points live in extended coordinates (X, Y, Z, T) with x = X/Z,
//! y = Y/Z and x·y = T/Z on −x² + y² = 1 + d·x²·y². Addition goes
//! through a precomputed [`CachedPoint`] operand and a [`CompletedPoint`]
//! intermediate. All arithmetic runs on the reference field backend.

use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, Mul};
use subtle::{
    Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq, CtOption,
};

use crate::field::{FieldElement2625, FieldElementOps};
use crate::scalar::Scalar;

type Fe = FieldElement2625;

/// d = −121665/121666 mod p.
const EDWARDS_D: Fe = FieldElement2625([
    0x35978a3, 0x0d37284, 0x3156ebd, 0x06a0a0e, 0x001c029, 0x179e898, 0x3a03cbb, 0x1ce7198,
    0x2e2b6ff, 0x1480db3,
]);

/// 2d mod p.
const EDWARDS_D2: Fe = FieldElement2625([
    0x2b2f159, 0x1a6e509, 0x22add7a, 0x0d4141d, 0x0038052, 0x0f3d130, 0x3407977, 0x19ce331,
    0x1c56dff, 0x0901b67,
]);

/// √−1 mod p = 2^((p−1)/4).
const SQRT_M1: Fe = FieldElement2625([
    0x20ea0b0, 0x186c9d2, 0x08f189d, 0x035697f, 0x0bd0c60, 0x1fbd7a7, 0x2804c9e, 0x1e16569,
    0x004fc1d, 0x0ae0c92,
]);

const BASE_X: Fe = FieldElement2625([
    0x325d51a, 0x18b5823, 0x0f6592a, 0x104a92d, 0x1a4b31d, 0x1d6dc5c, 0x27118fe, 0x07fd814,
    0x13cd6e5, 0x085a4db,
]);

const BASE_Y: Fe = FieldElement2625([
    0x2666658, 0x1999999, 0x0cccccc, 0x1333333, 0x1999999, 0x0666666, 0x3333333, 0x0cccccc,
    0x2666666, 0x1999999,
]);

const BASE_T: Fe = FieldElement2625([
    0x1b7dda3, 0x1a2ace9, 0x25eadbb, 0x003ba8a, 0x083c27e, 0x0abe37d, 0x1274732, 0x0ccacdd,
    0x0fd78b7, 0x19e1d7c,
]);

/// An Ed25519 point in compressed form: the y-coordinate with the sign
/// of x folded into bit 255 (RFC 8032 §5.1.2).
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct CompressedEdwardsY(pub [u8; 32]);

impl Debug for CompressedEdwardsY {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CompressedEdwardsY({:?})", &self.0)
    }
}

impl CompressedEdwardsY {
    /// View the encoding as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy the encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Decode the point (RFC 8032 §5.1.3).
    ///
    /// Recovers x from the curve equation as u·v³·(u·v⁷)^((p−5)/8) with
    /// u = y² − 1, v = d·y² + 1, multiplying by √−1 when the first
    /// candidate misses. Rejects a non-canonical y, a y whose x is not
    /// on the curve, and the encoding of x = 0 with the sign bit set.
    pub fn decompress(&self) -> CtOption<EdwardsPoint> {
        let y = Fe::from_bytes(&self.0);
        let sign = Choice::from(self.0[31] >> 7);
        let mut masked = self.0;
        masked[31] &= 0x7f;
        let y_is_canonical = y.to_bytes().ct_eq(&masked);

        let yy = y.square();
        let u = yy - Fe::ONE;
        let v = yy * EDWARDS_D + Fe::ONE;

        let v3 = v.square() * v;
        let v7 = v3.square() * v;
        let mut x = (u * v3) * (u * v7).pow_p58();

        let vxx = v * x.square();
        let correct = vxx.ct_eq(&u);
        let flipped = vxx.ct_eq(&(-u));
        let x_sqrtm1 = x * SQRT_M1;
        x.conditional_assign(&x_sqrtm1, flipped);
        let is_on_curve = correct | flipped;

        x.conditional_negate(x.is_negative() ^ sign);
        let zero_with_sign = x.is_zero() & sign;

        let ok = y_is_canonical & is_on_curve & !zero_with_sign;
        CtOption::new(
            EdwardsPoint {
                X: x,
                Y: y,
                Z: Fe::ONE,
                T: x * y,
            },
            ok,
        )
    }
}

/// An Ed25519 point in extended coordinates.
#[derive(Clone, Copy)]
pub struct EdwardsPoint {
    pub(crate) X: Fe,
    pub(crate) Y: Fe,
    pub(crate) Z: Fe,
    pub(crate) T: Fe,
}

/// A point prepared as an addition operand: (Y+X, Y−X, Z, 2d·T).
#[derive(Clone, Copy, Debug)]
pub(crate) struct CachedPoint {
    y_plus_x: Fe,
    y_minus_x: Fe,
    z: Fe,
    t2d: Fe,
}

/// The intermediate of an addition or doubling, one multiplication away
/// from extended form.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CompletedPoint {
    X: Fe,
    Y: Fe,
    Z: Fe,
    T: Fe,
}

impl Debug for EdwardsPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EdwardsPoint{{ X: {:?}, Y: {:?}, Z: {:?}, T: {:?} }}",
            self.X, self.Y, self.Z, self.T
        )
    }
}

impl Default for EdwardsPoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ConditionallySelectable for EdwardsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        EdwardsPoint {
            X: Fe::conditional_select(&a.X, &b.X, choice),
            Y: Fe::conditional_select(&a.Y, &b.Y, choice),
            Z: Fe::conditional_select(&a.Z, &b.Z, choice),
            T: Fe::conditional_select(&a.T, &b.T, choice),
        }
    }
}

impl ConstantTimeEq for EdwardsPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Compare x and y across the projective scale factor.
        let XZ = self.X * other.Z;
        let ZX = self.Z * other.X;
        let YZ = self.Y * other.Z;
        let ZY = self.Z * other.Y;
        XZ.ct_eq(&ZX) & YZ.ct_eq(&ZY)
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for EdwardsPoint {}

impl Add<&CachedPoint> for &EdwardsPoint {
    type Output = CompletedPoint;

    fn add(self, other: &CachedPoint) -> CompletedPoint {
        let pp = (self.Y + self.X) * other.y_plus_x;
        let mm = (self.Y - self.X) * other.y_minus_x;
        let tt2d = self.T * other.t2d;
        let zz = self.Z * other.z;
        let zz2 = zz + zz;

        CompletedPoint {
            X: pp - mm,
            Y: pp + mm,
            Z: zz2 + tt2d,
            T: zz2 - tt2d,
        }
    }
}

impl Mul<&Scalar> for &EdwardsPoint {
    type Output = EdwardsPoint;

    fn mul(self, scalar: &Scalar) -> EdwardsPoint {
        self.mul_scalar(scalar)
    }
}

define_mul_variants!(LHS = EdwardsPoint, RHS = Scalar, Output = EdwardsPoint);

impl Mul<&EdwardsPoint> for &Scalar {
    type Output = EdwardsPoint;

    fn mul(self, point: &EdwardsPoint) -> EdwardsPoint {
        point.mul_scalar(self)
    }
}

define_mul_variants!(LHS = Scalar, RHS = EdwardsPoint, Output = EdwardsPoint);

impl EdwardsPoint {
    /// The base point B of RFC 8032 (y = 4/5, x even).
    pub const GENERATOR: Self = Self {
        X: BASE_X,
        Y: BASE_Y,
        Z: FieldElement2625::ONE,
        T: BASE_T,
    };

    /// The neutral element (0, 1).
    pub const IDENTITY: Self = Self {
        X: FieldElement2625::ZERO,
        Y: FieldElement2625::ONE,
        Z: FieldElement2625::ONE,
        T: FieldElement2625::ZERO,
    };

    pub(crate) fn to_cached(self) -> CachedPoint {
        CachedPoint {
            y_plus_x: self.Y + self.X,
            y_minus_x: self.Y - self.X,
            z: self.Z,
            t2d: self.T * EDWARDS_D2,
        }
    }

    /// Doubling, dbl-2008-hwcd specialized for a = −1.
    pub(crate) fn double(&self) -> CompletedPoint {
        let xx = self.X.square();
        let yy = self.Y.square();
        let zz2 = {
            let zz = self.Z.square();
            zz + zz
        };
        let xpy2 = (self.X + self.Y).square();
        let yy_plus_xx = yy + xx;
        let yy_minus_xx = yy - xx;

        CompletedPoint {
            X: xpy2 - yy_plus_xx,
            Y: yy_plus_xx,
            Z: yy_minus_xx,
            T: zz2 - yy_minus_xx,
        }
    }

    /// Scalar multiplication by fixed double-and-add, bit 255 down to
    /// bit 0. The addition runs on every iteration; a constant-time
    /// select keeps or discards it.
    fn mul_scalar(&self, scalar: &Scalar) -> EdwardsPoint {
        let cached = self.to_cached();
        let bytes = scalar.to_bytes();
        let mut q = EdwardsPoint::IDENTITY;
        for i in (0..256).rev() {
            q = q.double().to_extended();
            let sum = (&q + &cached).to_extended();
            let bit = Choice::from((bytes[i >> 3] >> (i & 7)) & 1);
            q = EdwardsPoint::conditional_select(&q, &sum, bit);
        }
        q
    }

    /// `scalar · B` for the RFC 8032 base point.
    pub fn mul_base(scalar: &Scalar) -> EdwardsPoint {
        Self::GENERATOR.mul_scalar(scalar)
    }

    /// Multiply by the cofactor 8.
    pub fn mul_by_cofactor(&self) -> EdwardsPoint {
        self.double()
            .to_extended()
            .double()
            .to_extended()
            .double()
            .to_extended()
    }

    /// Whether this is the neutral element.
    pub fn is_identity(&self) -> Choice {
        self.ct_eq(&Self::IDENTITY)
    }

    /// Encode per RFC 8032 §5.1.2: one inversion to affine, the sign of
    /// x into bit 255 of y.
    pub fn compress(&self) -> CompressedEdwardsY {
        let recip = self.Z.invert();
        let x = self.X * recip;
        let y = self.Y * recip;
        let mut s = y.to_bytes();
        s[31] ^= x.is_negative().unwrap_u8() << 7;
        CompressedEdwardsY(s)
    }
}

impl CompletedPoint {
    pub(crate) fn to_extended(self) -> EdwardsPoint {
        EdwardsPoint {
            X: self.X * self.T,
            Y: self.Y * self.Z,
            Z: self.Z * self.T,
            T: self.X * self.Y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn curve_constants_match_their_definitions() {
        // d = −121665/121666
        let num = -Fe::from_bytes(&{
            let mut b = [0u8; 32];
            b[0] = 0x41;
            b[1] = 0xdb;
            b[2] = 0x01;
            b
        });
        let den = Fe::ONE.mul121666();
        assert_eq!((num * den.invert()).to_bytes(), EDWARDS_D.to_bytes());
        assert_eq!((EDWARDS_D + EDWARDS_D).to_bytes(), EDWARDS_D2.to_bytes());
        // √−1 squared is −1
        assert_eq!(SQRT_M1.square().to_bytes(), (-Fe::ONE).to_bytes());
        // the generator satisfies T = X·Y and lies on the curve
        let g = EdwardsPoint::GENERATOR;
        assert_eq!((g.X * g.Y).to_bytes(), g.T.to_bytes());
        let (xx, yy) = (g.X.square(), g.Y.square());
        let lhs = yy - xx;
        let rhs = Fe::ONE + EDWARDS_D * xx * yy;
        assert_eq!(lhs.to_bytes(), rhs.to_bytes());
    }

    #[test]
    fn generator_compresses_to_known_bytes() {
        assert_eq!(
            EdwardsPoint::GENERATOR.compress().to_bytes(),
            hex!("5866666666666666666666666666666666666666666666666666666666666666")
        );
    }

    #[test]
    fn identity_round_trips() {
        let encoded = EdwardsPoint::IDENTITY.compress();
        let mut expected = [0u8; 32];
        expected[0] = 1;
        assert_eq!(encoded.to_bytes(), expected);
        let decoded = encoded.decompress().unwrap();
        assert!(bool::from(decoded.is_identity()));
    }

    #[test]
    fn double_equals_add_to_self() {
        let g = EdwardsPoint::GENERATOR;
        let doubled = g.double().to_extended();
        let added = (&g + &g.to_cached()).to_extended();
        assert_eq!(doubled, added);
    }

    #[test]
    fn scalar_multiples_compose() {
        let two = Scalar::ONE + Scalar::ONE;
        let three = two + Scalar::ONE;
        let six = two * three;

        let g = EdwardsPoint::GENERATOR;
        let lhs = g * six;
        let rhs = (g * two) * three;
        assert_eq!(lhs, rhs);
        assert_eq!(lhs.compress(), rhs.compress());
    }

    #[test]
    fn decompression_round_trips() {
        let two = Scalar::ONE + Scalar::ONE;
        let mut point = EdwardsPoint::GENERATOR;
        for _ in 0..8 {
            point = point * two;
            let compressed = point.compress();
            let decompressed = compressed.decompress().unwrap();
            assert_eq!(decompressed, point);
            assert_eq!(decompressed.compress(), compressed);
        }
    }

    #[test]
    fn non_canonical_y_is_rejected() {
        // y = p encodes the same residue as y = 0, but only the
        // canonical form decodes.
        let mut p_bytes = [0xffu8; 32];
        p_bytes[0] = 0xed;
        p_bytes[31] = 0x7f;
        assert!(bool::from(CompressedEdwardsY(p_bytes).decompress().is_none()));
    }

    #[test]
    fn off_curve_y_is_rejected() {
        // y = 2 gives x² = (y²−1)/(dy²+1), a non-residue.
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        assert!(bool::from(CompressedEdwardsY(bytes).decompress().is_none()));
    }

    #[test]
    fn negative_zero_is_rejected() {
        // (0, 1) with the sign bit set is not a valid encoding.
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        bytes[31] = 0x80;
        assert!(bool::from(CompressedEdwardsY(bytes).decompress().is_none()));
    }

    #[test]
    fn cofactor_multiplication_matches_scalar_eight() {
        let five = Scalar::from_bytes_mod_order(&{
            let mut b = [0u8; 32];
            b[0] = 5;
            b
        });
        let point = EdwardsPoint::GENERATOR * five;
        let eight = Scalar::from_bytes_mod_order(&{
            let mut b = [0u8; 32];
            b[0] = 8;
            b
        });
        assert_eq!(point.mul_by_cofactor(), point * eight);
    }
}
