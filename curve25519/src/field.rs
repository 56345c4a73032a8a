//! Field arithmetic modulo p = 2^255 − 19.
//!
//! One algebraic contract, two conforming backends:
//!
//! - [`FieldElement2625`]: the portable reference backend, ten `u32`
//!   limbs of alternating 26/25-bit width.
//! - [`FieldElement32`]: eight packed 32-bit limbs with on-the-fly
//!   reduction, for 32-bit targets without a wide multiplier.
//!
//! The crate-wide [`FieldElement`] alias picks the backend at build time
//! via the `fe32` cargo feature; both backends always compile so they
//! can be tested against each other.

use core::fmt::Debug;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

mod fe2625;
mod fe32;

pub use fe2625::FieldElement2625;
pub use fe32::FieldElement32;

/// The field element type used by the X25519 ladder.
#[cfg(not(feature = "fe32"))]
pub type FieldElement = FieldElement2625;

/// The field element type used by the X25519 ladder.
#[cfg(feature = "fe32")]
pub type FieldElement = FieldElement32;

/// Arithmetic on integers modulo p = 2^255 − 19.
///
/// Elements may be held in a partially-reduced ("loose") form between
/// operations; [`reduce`](FieldElementOps::reduce) produces the unique
/// canonical representative and is idempotent. Comparison, sign checks
/// and serialization always operate on the canonical form.
///
/// The constant-time conditional swap and move come from the
/// [`ConditionallySelectable`] supertrait: both backends select limbwise
/// with masks, never with branches.
pub trait FieldElementOps:
    Copy + Clone + Debug + ConditionallySelectable + ConstantTimeEq
{
    /// The additive identity.
    const ZERO: Self;
    /// The multiplicative identity.
    const ONE: Self;

    /// Deserialize a little-endian encoding. Bit 255 is ignored, per
    /// RFC 7748; the result may be a non-canonical representative of
    /// its residue class.
    fn from_bytes(bytes: &[u8; 32]) -> Self;

    /// Serialize the canonical little-endian encoding (reduces first).
    fn to_bytes(&self) -> [u8; 32];

    /// Fully reduce into the canonical representative in `[0, p)`.
    fn reduce(&self) -> Self;

    /// `self + rhs`, possibly unreduced.
    fn add(&self, rhs: &Self) -> Self;

    /// `self − rhs`, possibly unreduced.
    fn sub(&self, rhs: &Self) -> Self;

    /// `self · rhs`.
    fn mul(&self, rhs: &Self) -> Self;

    /// `self²`. Backends may substitute a dedicated squaring routine;
    /// it must be a drop-in replacement for the multiply.
    fn square(&self) -> Self {
        self.mul(self)
    }

    /// `121666 · self`, the curve constant (A + 2)/4 scaling used by the
    /// Montgomery ladder. The default multiplies by the constant as a
    /// field element; backends may substitute a single-word scan.
    fn mul121666(&self) -> Self {
        // 121666 = 0x1db42
        let mut bytes = [0u8; 32];
        bytes[0] = 0x42;
        bytes[1] = 0xdb;
        bytes[2] = 0x01;
        self.mul(&Self::from_bytes(&bytes))
    }

    /// `self^(p−2)`, the multiplicative inverse (zero maps to zero).
    ///
    /// Fermat inversion by a fixed addition chain: build a^(2^5−1),
    /// a^(2^10−1), a^(2^20−1), a^(2^50−1), a^(2^100−1), a^(2^250−1),
    /// then five squarings and a final multiply by a^11. The chain shape
    /// never depends on the input value.
    fn invert(&self) -> Self {
        let z2 = self.square();
        let z9 = z2.square().square().mul(self);
        let z11 = z9.mul(&z2);
        // 2^5 − 1
        let z2_5_0 = z11.square().mul(&z9);
        // 2^10 − 1
        let mut t = z2_5_0.square();
        for _ in 1..5 {
            t = t.square();
        }
        let z2_10_0 = t.mul(&z2_5_0);
        // 2^20 − 1
        let mut t = z2_10_0.square();
        for _ in 1..10 {
            t = t.square();
        }
        let z2_20_0 = t.mul(&z2_10_0);
        // 2^40 − 1, then 2^50 − 1
        let mut t = z2_20_0.square();
        for _ in 1..20 {
            t = t.square();
        }
        t = t.mul(&z2_20_0);
        for _ in 0..10 {
            t = t.square();
        }
        let z2_50_0 = t.mul(&z2_10_0);
        // 2^100 − 1
        let mut t = z2_50_0.square();
        for _ in 1..50 {
            t = t.square();
        }
        let z2_100_0 = t.mul(&z2_50_0);
        // 2^200 − 1, then 2^250 − 1
        let mut t = z2_100_0.square();
        for _ in 1..100 {
            t = t.square();
        }
        t = t.mul(&z2_100_0);
        for _ in 0..50 {
            t = t.square();
        }
        t = t.mul(&z2_50_0);
        // 2^255 − 21 = p − 2
        for _ in 0..5 {
            t = t.square();
        }
        t.mul(&z11)
    }

    /// Sign of the canonical encoding: its least significant bit.
    fn is_negative(&self) -> Choice {
        Choice::from(self.to_bytes()[0] & 1)
    }

    /// Whether the element is zero mod p.
    fn is_zero(&self) -> Choice {
        self.to_bytes().ct_eq(&[0u8; 32])
    }
}
