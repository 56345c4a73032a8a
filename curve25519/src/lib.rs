#![no_std]
#![doc = include_str!("../README.md")]
#![allow(non_snake_case)]
#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    clippy::mod_module_files,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    unused_attributes,
    unused_imports,
    unused_mut,
    unused_must_use
)]

// Internal macros. Must come first!
#[macro_use]
pub(crate) mod macros;

#[cfg(feature = "signing")]
pub use crypto_signature;
#[cfg(feature = "signing")]
pub use ed25519;
pub use rand_core;
#[cfg(feature = "signing")]
pub use sha2;
pub use subtle;
pub use zeroize;

pub mod field;
pub(crate) mod montgomery;
pub(crate) mod scalar;

#[cfg(feature = "signing")]
pub(crate) mod edwards;
#[cfg(feature = "signing")]
pub(crate) mod sign;

pub use field::{FieldElement, FieldElement32, FieldElement2625, FieldElementOps};
pub use montgomery::{MontgomeryPoint, X25519_BASEPOINT_BYTES};
pub use scalar::Scalar;

#[cfg(feature = "signing")]
pub use edwards::{CompressedEdwardsY, EdwardsPoint};
#[cfg(feature = "signing")]
pub use sign::*;
