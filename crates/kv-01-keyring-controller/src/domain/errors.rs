//! # Keyring Errors
//!
//! Error types for keyring controller operations.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Context tag prepended to every typed-message signing failure.
pub const TYPED_MESSAGE_PREFIX: &str = "Keyring Controller signTypedMessage: ";

/// Error classes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input; nothing was touched
    Validation,
    /// Reported by the crypto provider
    Crypto,
    /// Address or keyring not present
    NotFound,
    /// Locked controller or other precondition
    State,
}

impl ErrorKind {
    /// Label used in metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Crypto => "crypto",
            Self::NotFound => "not_found",
            Self::State => "state",
        }
    }
}

/// Errors that can occur during keyring controller operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyringError {
    #[error("{0}")]
    Validation(String),

    /// Provider message, verbatim
    #[error("{0}")]
    Crypto(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    State(String),

    /// Any failure inside `sign_typed_message`
    #[error("Keyring Controller signTypedMessage: {0}")]
    TypedMessage(Box<KeyringError>),
}

impl KeyringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Crypto(_) => ErrorKind::Crypto,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::State(_) => ErrorKind::State,
            Self::TypedMessage(inner) => inner.kind(),
        }
    }

    pub(crate) fn locked() -> Self {
        Self::State("KeyringController is locked".into())
    }

    pub(crate) fn no_vault() -> Self {
        Self::State("Cannot unlock without a previous vault.".into())
    }

    pub(crate) fn duplicate_account() -> Self {
        Self::Validation("The account you are trying to import is a duplicate".into())
    }

    pub(crate) fn unknown_account() -> Self {
        Self::NotFound("No keyring found for the requested account.".into())
    }

    pub(crate) fn typed_message(inner: KeyringError) -> Self {
        match inner {
            already @ Self::TypedMessage(_) => already,
            other => Self::TypedMessage(Box::new(other)),
        }
    }
}

impl From<CryptoError> for KeyringError {
    /// Input the provider rejected as malformed is a validation failure;
    /// everything else keeps the provider's message as a crypto failure.
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidTypedData(_)
            | CryptoError::InvalidKeystore(_)
            | CryptoError::InvalidMnemonic(_)
            | CryptoError::InvalidPath(_)
            | CryptoError::InvalidPrivateKey
            | CryptoError::InvalidInput(_) => Self::Validation(err.to_string()),
            other => Self::Crypto(other.to_string()),
        }
    }
}
