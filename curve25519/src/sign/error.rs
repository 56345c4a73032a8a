use core::error::Error;
use core::fmt::{self, Display, Formatter};

/// Signing errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SigningError {
    /// Public key bytes are invalid
    InvalidPublicKeyBytes,
    /// Signature R component is invalid
    InvalidSignatureRComponent,
    /// Signature S component is invalid
    InvalidSignatureSComponent,
    /// Signature verification failed
    Verify,
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SigningError::InvalidPublicKeyBytes => write!(f, "public key bytes are invalid"),
            SigningError::InvalidSignatureRComponent => {
                write!(f, "signature R component is invalid")
            }
            SigningError::InvalidSignatureSComponent => {
                write!(f, "signature S component is invalid")
            }
            SigningError::Verify => write!(f, "signature verification failed"),
        }
    }
}

impl Error for SigningError {}

impl From<SigningError> for crypto_signature::Error {
    fn from(_err: SigningError) -> Self {
        crypto_signature::Error::new()
    }
}
