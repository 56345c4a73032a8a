//! Portable reference field arithmetic: ten `u32` limbs of alternating
//! 26/25-bit width (bit offsets 0, 26, 51, 77, 102, 128, 153, 179, 204,
//! 230). Products above bit 255 fold back scaled by 19, since
//! 2^255 ≡ 19 (mod p).

use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, Mul, Neg, Sub};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

use super::FieldElementOps;

/// A field element in the 10-limb reference representation.
///
/// Limbs are unsigned and may run a couple of bits above their nominal
/// width between operations; `reduce` restores the canonical form.
#[derive(Clone, Copy, Default)]
pub struct FieldElement2625(pub(crate) [u32; 10]);

/// 16·p, limbwise. Added before subtracting so limbs never underflow for
/// any subtrahend below 2^29.
const SIXTEEN_P: [u64; 10] = [
    0x3ffffed0, 0x1ffffff0, 0x3ffffff0, 0x1ffffff0, 0x3ffffff0, 0x1ffffff0, 0x3ffffff0,
    0x1ffffff0, 0x3ffffff0, 0x1ffffff0,
];

const LOW_26_BITS: u64 = (1 << 26) - 1;
const LOW_25_BITS: u64 = (1 << 25) - 1;

impl Debug for FieldElement2625 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement2625({:?})", &self.0)
    }
}

impl DefaultIsZeroes for FieldElement2625 {}

impl ConditionallySelectable for FieldElement2625 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u32; 10];
        for i in 0..10 {
            limbs[i] = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(limbs)
    }
}

impl ConstantTimeEq for FieldElement2625 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for FieldElement2625 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for FieldElement2625 {}

impl Add<&FieldElement2625> for &FieldElement2625 {
    type Output = FieldElement2625;

    fn add(self, rhs: &FieldElement2625) -> FieldElement2625 {
        FieldElementOps::add(self, rhs)
    }
}

define_add_variants!(
    LHS = FieldElement2625,
    RHS = FieldElement2625,
    Output = FieldElement2625
);

impl Sub<&FieldElement2625> for &FieldElement2625 {
    type Output = FieldElement2625;

    fn sub(self, rhs: &FieldElement2625) -> FieldElement2625 {
        FieldElementOps::sub(self, rhs)
    }
}

define_sub_variants!(
    LHS = FieldElement2625,
    RHS = FieldElement2625,
    Output = FieldElement2625
);

impl Mul<&FieldElement2625> for &FieldElement2625 {
    type Output = FieldElement2625;

    fn mul(self, rhs: &FieldElement2625) -> FieldElement2625 {
        FieldElementOps::mul(self, rhs)
    }
}

define_mul_variants!(
    LHS = FieldElement2625,
    RHS = FieldElement2625,
    Output = FieldElement2625
);

impl Neg for &FieldElement2625 {
    type Output = FieldElement2625;

    fn neg(self) -> FieldElement2625 {
        FieldElementOps::sub(&FieldElement2625::ZERO, self)
    }
}

impl Neg for FieldElement2625 {
    type Output = FieldElement2625;

    fn neg(self) -> FieldElement2625 {
        -&self
    }
}

impl FieldElement2625 {
    /// One carry pass: fold every limb into its nominal width, wrapping
    /// the top carry back into limb 0 scaled by 19. The result's limbs
    /// are at most one bit over nominal width.
    fn weak_reduce(mut z: [u64; 10]) -> Self {
        let mut carry = 0u64;
        for (i, limb) in z.iter_mut().enumerate() {
            *limb += carry;
            let (mask, width) = if i & 1 == 0 {
                (LOW_26_BITS, 26)
            } else {
                (LOW_25_BITS, 25)
            };
            carry = *limb >> width;
            *limb &= mask;
        }
        z[0] += 19 * carry;
        let carry = z[0] >> 26;
        z[0] &= LOW_26_BITS;
        z[1] += carry;

        let mut limbs = [0u32; 10];
        for i in 0..10 {
            limbs[i] = z[i] as u32;
        }
        Self(limbs)
    }

    /// `self^((p−5)/8) = self^(2^252 − 3)`, used for the square-root
    /// step of point decompression. Fixed chain, like `invert`.
    #[cfg(feature = "signing")]
    pub(crate) fn pow_p58(&self) -> Self {
        let z2 = self.square();
        let z9 = z2.square().square().mul(self);
        let z11 = z9.mul(&z2);
        let z2_5_0 = z11.square().mul(&z9);
        let mut t = z2_5_0.square();
        for _ in 1..5 {
            t = t.square();
        }
        let z2_10_0 = t.mul(&z2_5_0);
        let mut t = z2_10_0.square();
        for _ in 1..10 {
            t = t.square();
        }
        let z2_20_0 = t.mul(&z2_10_0);
        let mut t = z2_20_0.square();
        for _ in 1..20 {
            t = t.square();
        }
        t = t.mul(&z2_20_0);
        for _ in 0..10 {
            t = t.square();
        }
        let z2_50_0 = t.mul(&z2_10_0);
        let mut t = z2_50_0.square();
        for _ in 1..50 {
            t = t.square();
        }
        let z2_100_0 = t.mul(&z2_50_0);
        let mut t = z2_100_0.square();
        for _ in 1..100 {
            t = t.square();
        }
        t = t.mul(&z2_100_0);
        for _ in 0..50 {
            t = t.square();
        }
        t = t.mul(&z2_50_0);
        // (2^250 − 1)·2^2 + 1 = 2^252 − 3
        t = t.square().square();
        t.mul(self)
    }
}

impl FieldElementOps for FieldElement2625 {
    const ZERO: Self = Self([0; 10]);
    const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    fn from_bytes(bytes: &[u8; 32]) -> Self {
        #[inline]
        fn load32(b: &[u8]) -> u64 {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as u64
        }

        let w0 = load32(&bytes[0..]);
        let w1 = load32(&bytes[4..]);
        let w2 = load32(&bytes[8..]);
        let w3 = load32(&bytes[12..]);
        let w4 = load32(&bytes[16..]);
        let w5 = load32(&bytes[20..]);
        let w6 = load32(&bytes[24..]);
        let w7 = load32(&bytes[28..]);

        Self([
            (w0 & 0x3ffffff) as u32,
            ((w0 >> 26) | ((w1 & 0x7ffff) << 6)) as u32,
            ((w1 >> 19) | ((w2 & 0x1fff) << 13)) as u32,
            ((w2 >> 13) | ((w3 & 0x3f) << 19)) as u32,
            ((w3 >> 6) & 0x3ffffff) as u32,
            (w4 & 0x1ffffff) as u32,
            ((w4 >> 25) | ((w5 & 0x7ffff) << 7)) as u32,
            ((w5 >> 19) | ((w6 & 0xfff) << 13)) as u32,
            ((w6 >> 12) | ((w7 & 0x3f) << 20)) as u32,
            // Bit 255 is dropped here.
            ((w7 >> 6) & 0x1ffffff) as u32,
        ])
    }

    fn to_bytes(&self) -> [u8; 32] {
        let t = self.reduce().0;
        let t: [u64; 10] = core::array::from_fn(|i| t[i] as u64);

        let mut s = [0u8; 32];
        s[0..4].copy_from_slice(&((t[0] | (t[1] << 26)) as u32).to_le_bytes());
        s[4..8].copy_from_slice(&(((t[1] >> 6) | (t[2] << 19)) as u32).to_le_bytes());
        s[8..12].copy_from_slice(&(((t[2] >> 13) | (t[3] << 13)) as u32).to_le_bytes());
        s[12..16].copy_from_slice(&(((t[3] >> 19) | (t[4] << 6)) as u32).to_le_bytes());
        s[16..20].copy_from_slice(&((t[5] | (t[6] << 25)) as u32).to_le_bytes());
        s[20..24].copy_from_slice(&(((t[6] >> 7) | (t[7] << 19)) as u32).to_le_bytes());
        s[24..28].copy_from_slice(&(((t[7] >> 13) | (t[8] << 12)) as u32).to_le_bytes());
        s[28..32].copy_from_slice(&(((t[8] >> 20) | (t[9] << 6)) as u32).to_le_bytes());
        s
    }

    fn reduce(&self) -> Self {
        let mut h: [u64; 10] = core::array::from_fn(|i| self.0[i] as u64);

        // Three carry passes bring arbitrary u32 limbs into nominal
        // widths with the total value below 2^255.
        for _ in 0..3 {
            let mut carry = 0u64;
            for (i, limb) in h.iter_mut().enumerate() {
                *limb += carry;
                let (mask, width) = if i & 1 == 0 {
                    (LOW_26_BITS, 26)
                } else {
                    (LOW_25_BITS, 25)
                };
                carry = *limb >> width;
                *limb &= mask;
            }
            h[0] += 19 * carry;
        }

        // q = 1 iff the value is in [p, 2^255): probe by adding 19 and
        // watching for a carry out of bit 254.
        let mut t = h;
        t[0] += 19;
        let mut carry = 0u64;
        for (i, limb) in t.iter_mut().enumerate() {
            *limb += carry;
            let (mask, width) = if i & 1 == 0 {
                (LOW_26_BITS, 26)
            } else {
                (LOW_25_BITS, 25)
            };
            carry = *limb >> width;
            *limb &= mask;
        }
        let q = carry;

        // value − q·p == value + 19·q mod 2^255
        h[0] += 19 * q;
        let mut carry = 0u64;
        for (i, limb) in h.iter_mut().enumerate() {
            *limb += carry;
            let (mask, width) = if i & 1 == 0 {
                (LOW_26_BITS, 26)
            } else {
                (LOW_25_BITS, 25)
            };
            carry = *limb >> width;
            *limb &= mask;
        }

        let mut limbs = [0u32; 10];
        for i in 0..10 {
            limbs[i] = h[i] as u32;
        }
        Self(limbs)
    }

    fn add(&self, rhs: &Self) -> Self {
        let z: [u64; 10] = core::array::from_fn(|i| self.0[i] as u64 + rhs.0[i] as u64);
        Self::weak_reduce(z)
    }

    fn sub(&self, rhs: &Self) -> Self {
        // Bias by 16p, subtract, then carry once so the result is as
        // tight as a multiplication output.
        let z: [u64; 10] =
            core::array::from_fn(|i| self.0[i] as u64 + SIXTEEN_P[i] - rhs.0[i] as u64);
        Self::weak_reduce(z)
    }

    fn mul(&self, rhs: &Self) -> Self {
        let f0 = self.0[0] as i64;
        let f1 = self.0[1] as i64;
        let f2 = self.0[2] as i64;
        let f3 = self.0[3] as i64;
        let f4 = self.0[4] as i64;
        let f5 = self.0[5] as i64;
        let f6 = self.0[6] as i64;
        let f7 = self.0[7] as i64;
        let f8 = self.0[8] as i64;
        let f9 = self.0[9] as i64;
        let g0 = rhs.0[0] as i64;
        let g1 = rhs.0[1] as i64;
        let g2 = rhs.0[2] as i64;
        let g3 = rhs.0[3] as i64;
        let g4 = rhs.0[4] as i64;
        let g5 = rhs.0[5] as i64;
        let g6 = rhs.0[6] as i64;
        let g7 = rhs.0[7] as i64;
        let g8 = rhs.0[8] as i64;
        let g9 = rhs.0[9] as i64;

        // Terms crossing bit 255 pick up the ×19 wrap; odd·odd limb
        // products sit one bit low in this radix, hence the ×2 on odd f.
        let g1_19 = 19 * g1;
        let g2_19 = 19 * g2;
        let g3_19 = 19 * g3;
        let g4_19 = 19 * g4;
        let g5_19 = 19 * g5;
        let g6_19 = 19 * g6;
        let g7_19 = 19 * g7;
        let g8_19 = 19 * g8;
        let g9_19 = 19 * g9;
        let f1_2 = 2 * f1;
        let f3_2 = 2 * f3;
        let f5_2 = 2 * f5;
        let f7_2 = 2 * f7;
        let f9_2 = 2 * f9;

        let mut h0 = f0 * g0
            + f1_2 * g9_19
            + f2 * g8_19
            + f3_2 * g7_19
            + f4 * g6_19
            + f5_2 * g5_19
            + f6 * g4_19
            + f7_2 * g3_19
            + f8 * g2_19
            + f9_2 * g1_19;
        let mut h1 = f0 * g1
            + f1 * g0
            + f2 * g9_19
            + f3 * g8_19
            + f4 * g7_19
            + f5 * g6_19
            + f6 * g5_19
            + f7 * g4_19
            + f8 * g3_19
            + f9 * g2_19;
        let mut h2 = f0 * g2
            + f1_2 * g1
            + f2 * g0
            + f3_2 * g9_19
            + f4 * g8_19
            + f5_2 * g7_19
            + f6 * g6_19
            + f7_2 * g5_19
            + f8 * g4_19
            + f9_2 * g3_19;
        let mut h3 = f0 * g3
            + f1 * g2
            + f2 * g1
            + f3 * g0
            + f4 * g9_19
            + f5 * g8_19
            + f6 * g7_19
            + f7 * g6_19
            + f8 * g5_19
            + f9 * g4_19;
        let mut h4 = f0 * g4
            + f1_2 * g3
            + f2 * g2
            + f3_2 * g1
            + f4 * g0
            + f5_2 * g9_19
            + f6 * g8_19
            + f7_2 * g7_19
            + f8 * g6_19
            + f9_2 * g5_19;
        let mut h5 = f0 * g5
            + f1 * g4
            + f2 * g3
            + f3 * g2
            + f4 * g1
            + f5 * g0
            + f6 * g9_19
            + f7 * g8_19
            + f8 * g7_19
            + f9 * g6_19;
        let mut h6 = f0 * g6
            + f1_2 * g5
            + f2 * g4
            + f3_2 * g3
            + f4 * g2
            + f5_2 * g1
            + f6 * g0
            + f7_2 * g9_19
            + f8 * g8_19
            + f9_2 * g7_19;
        let mut h7 = f0 * g7
            + f1 * g6
            + f2 * g5
            + f3 * g4
            + f4 * g3
            + f5 * g2
            + f6 * g1
            + f7 * g0
            + f8 * g9_19
            + f9 * g8_19;
        let mut h8 = f0 * g8
            + f1_2 * g7
            + f2 * g6
            + f3_2 * g5
            + f4 * g4
            + f5_2 * g3
            + f6 * g2
            + f7_2 * g1
            + f8 * g0
            + f9_2 * g9_19;
        let mut h9 = f0 * g9
            + f1 * g8
            + f2 * g7
            + f3 * g6
            + f4 * g5
            + f5 * g4
            + f6 * g3
            + f7 * g2
            + f8 * g1
            + f9 * g0;

        // Interleaved carry chain; the h9 overflow folds into h0 ×19.
        // Limbs are nonnegative throughout, so plain floor shifts carry
        // exactly.
        let c0 = h0 >> 26;
        h1 += c0;
        h0 -= c0 << 26;
        let c4 = h4 >> 26;
        h5 += c4;
        h4 -= c4 << 26;
        let c1 = h1 >> 25;
        h2 += c1;
        h1 -= c1 << 25;
        let c5 = h5 >> 25;
        h6 += c5;
        h5 -= c5 << 25;
        let c2 = h2 >> 26;
        h3 += c2;
        h2 -= c2 << 26;
        let c6 = h6 >> 26;
        h7 += c6;
        h6 -= c6 << 26;
        let c3 = h3 >> 25;
        h4 += c3;
        h3 -= c3 << 25;
        let c7 = h7 >> 25;
        h8 += c7;
        h7 -= c7 << 25;
        let c4 = h4 >> 26;
        h5 += c4;
        h4 -= c4 << 26;
        let c8 = h8 >> 26;
        h9 += c8;
        h8 -= c8 << 26;
        let c9 = h9 >> 25;
        h0 += c9 * 19;
        h9 -= c9 << 25;
        let c0 = h0 >> 26;
        h1 += c0;
        h0 -= c0 << 26;

        Self([
            h0 as u32, h1 as u32, h2 as u32, h3 as u32, h4 as u32, h5 as u32, h6 as u32, h7 as u32,
            h8 as u32, h9 as u32,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_times_one() {
        let one = FieldElement2625::ONE;
        let mut expected = [0u8; 32];
        expected[0] = 1;
        assert_eq!(one.mul(&one).to_bytes(), expected);
    }

    #[test]
    fn small_subtraction_wraps_mod_p() {
        let two = FieldElement2625::ONE.add(&FieldElement2625::ONE);
        // 1 − 2 == p − 1
        let mut expected = [0xffu8; 32];
        expected[0] = 0xec;
        expected[31] = 0x7f;
        assert_eq!(FieldElement2625::ONE.sub(&two).to_bytes(), expected);
    }

    #[test]
    fn negation_round_trips() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x42;
        bytes[17] = 0x99;
        let x = FieldElement2625::from_bytes(&bytes);
        assert_eq!((-(-x)).to_bytes(), x.to_bytes());
        assert!(bool::from((x + (-x)).is_zero()));
    }

    #[test]
    fn sign_of_small_values() {
        assert_eq!(FieldElement2625::ONE.is_negative().unwrap_u8(), 1);
        let two = FieldElement2625::ONE.add(&FieldElement2625::ONE);
        assert_eq!(two.is_negative().unwrap_u8(), 0);
    }
}
