use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::scalar::Scalar;
use crate::sign::SigningError;

pub use ed25519::Signature;

/// A signature with its components parsed and validated: R decompressed
/// onto the curve, S canonical below the group order.
pub(crate) struct InnerSignature {
    pub(crate) r: EdwardsPoint,
    pub(crate) s: Scalar,
}

impl From<InnerSignature> for Signature {
    fn from(inner: InnerSignature) -> Self {
        Signature::from_components(inner.r.compress().to_bytes(), inner.s.to_bytes())
    }
}

impl TryFrom<&Signature> for InnerSignature {
    type Error = SigningError;

    fn try_from(signature: &Signature) -> Result<Self, Self::Error> {
        let s = Option::from(Scalar::from_canonical_bytes(signature.s_bytes()))
            .ok_or(SigningError::InvalidSignatureSComponent)?;
        let r = Option::from(CompressedEdwardsY(*signature.r_bytes()).decompress())
            .ok_or(SigningError::InvalidSignatureRComponent)?;
        Ok(Self { r, s })
    }
}

impl TryFrom<Signature> for InnerSignature {
    type Error = SigningError;

    fn try_from(signature: Signature) -> Result<Self, Self::Error> {
        Self::try_from(&signature)
    }
}
