//! Packed field arithmetic for flat 32-bit targets: eight `u32` limbs,
//! radix 2^32. Addition and subtraction walk the most significant limb
//! first and immediately fold any overflow back through ×19
//! (on-the-fly reduction), so intermediates never leave eight words.
//! Multiplication produces the full 512-bit product and folds it back
//! below 2^256 in two stages using 2^255 ≡ 19 (mod p).

use core::fmt::{self, Debug, Formatter};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

use super::FieldElementOps;

/// A field element as eight packed 32-bit limbs, value in `[0, 2^256)`.
#[derive(Clone, Copy, Default)]
pub struct FieldElement32(pub(crate) [u32; 8]);

impl Debug for FieldElement32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement32({:?})", &self.0)
    }
}

impl DefaultIsZeroes for FieldElement32 {}

impl ConditionallySelectable for FieldElement32 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u32; 8];
        for i in 0..8 {
            limbs[i] = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(limbs)
    }
}

impl ConstantTimeEq for FieldElement32 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for FieldElement32 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for FieldElement32 {}

impl FieldElement32 {
    /// Fold a 512-bit product (sixteen limbs, little-endian) back below
    /// 2^256.
    ///
    /// Stage one folds the high half through 2^256 ≡ 38; stage two folds
    /// the leftover carry through 2^255 ≡ 19, using the spare bit of the
    /// top limb so the final propagation cannot overflow eight words.
    fn fold_wide(wide: &[u32; 16]) -> Self {
        let mut limbs = [0u32; 8];

        let mut accu = 0u64;
        for i in 0..8 {
            accu += wide[i] as u64 + 38 * wide[i + 8] as u64;
            limbs[i] = accu as u32;
            accu >>= 32;
        }

        let msb = (limbs[7] >> 31) as u64;
        limbs[7] &= 0x7fff_ffff;
        let mut carry = 19 * (2 * accu + msb);
        for limb in limbs.iter_mut() {
            carry += *limb as u64;
            *limb = carry as u32;
            carry >>= 32;
        }

        Self(limbs)
    }
}

impl FieldElementOps for FieldElement32 {
    const ZERO: Self = Self([0; 8]);
    const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0]);

    fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u32; 8];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = u32::from_le_bytes([
                bytes[4 * i],
                bytes[4 * i + 1],
                bytes[4 * i + 2],
                bytes[4 * i + 3],
            ]);
        }
        // Bit 255 is dropped here.
        limbs[7] &= 0x7fff_ffff;
        Self(limbs)
    }

    fn to_bytes(&self) -> [u8; 32] {
        let reduced = self.reduce();
        let mut bytes = [0u8; 32];
        for (i, limb) in reduced.0.iter().enumerate() {
            bytes[4 * i..4 * i + 4].copy_from_slice(&limb.to_le_bytes());
        }
        bytes
    }

    fn reduce(&self) -> Self {
        // First pass estimates how many multiples of p to remove by
        // propagating (value + 19·guess + 19) without writing back;
        // the second pass applies exactly that many.
        let initial_guess = (self.0[7] >> 31) as u64;
        let mut accu = initial_guess * 19 + 19;
        for i in 0..7 {
            accu += self.0[i] as u64;
            accu >>= 32;
        }
        accu += self.0[7] as u64;
        let reductions = accu >> 31;

        let mut limbs = [0u32; 8];
        let mut accu = reductions * 19;
        for i in 0..7 {
            accu += self.0[i] as u64;
            limbs[i] = accu as u32;
            accu >>= 32;
        }
        accu += self.0[7] as u64;
        limbs[7] = (accu as u32) & 0x7fff_ffff;

        Self(limbs)
    }

    fn add(&self, rhs: &Self) -> Self {
        let mut limbs = [0u32; 8];

        // MSW first: keep 31 bits and immediately fold the overflow bit
        // through ×19.
        let mut accu = self.0[7] as u64 + rhs.0[7] as u64;
        limbs[7] = (accu as u32) & 0x7fff_ffff;
        accu = (accu >> 31) * 19;

        for i in 0..7 {
            accu += self.0[i] as u64 + rhs.0[i] as u64;
            limbs[i] = accu as u32;
            accu >>= 32;
        }
        accu += limbs[7] as u64;
        limbs[7] = accu as u32;

        Self(limbs)
    }

    fn sub(&self, rhs: &Self) -> Self {
        let mut limbs = [0u32; 8];

        // MSW first; forcing bit 31 keeps the running value nonnegative,
        // compensated by the −1 in the ×19 borrow fold.
        let mut accu = self.0[7] as i64 - rhs.0[7] as i64;
        limbs[7] = (accu as u32) | 0x8000_0000;
        accu = 19 * ((accu >> 31) - 1);

        for i in 0..7 {
            accu += self.0[i] as i64 - rhs.0[i] as i64;
            limbs[i] = accu as u32;
            accu >>= 32;
        }
        accu += limbs[7] as i64;
        limbs[7] = accu as u32;

        Self(limbs)
    }

    fn mul(&self, rhs: &Self) -> Self {
        // Schoolbook 256×256→512; the u128 accumulator absorbs a full
        // anti-diagonal of 64-bit products plus the running carry.
        let mut wide = [0u32; 16];
        let mut accu: u128 = 0;
        for k in 0usize..15 {
            let lo = k.saturating_sub(7);
            let hi = if k < 7 { k } else { 7 };
            for i in lo..=hi {
                accu += (self.0[i] as u64 as u128) * (rhs.0[k - i] as u64 as u128);
            }
            wide[k] = accu as u32;
            accu >>= 32;
        }
        wide[15] = accu as u32;

        Self::fold_wide(&wide)
    }

    fn mul121666(&self) -> Self {
        let mut limbs = [0u32; 8];
        let mut accu = 0u64;
        for i in 0..8 {
            accu += 121666 * self.0[i] as u64;
            limbs[i] = accu as u32;
            accu >>= 32;
        }

        let msb = (limbs[7] >> 31) as u64;
        limbs[7] &= 0x7fff_ffff;
        let mut carry = 19 * (2 * accu + msb);
        for limb in limbs.iter_mut() {
            carry += *limb as u64;
            *limb = carry as u32;
            carry >>= 32;
        }

        Self(limbs)
    }
}
