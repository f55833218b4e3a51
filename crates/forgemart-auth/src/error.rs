//! Authentication error types.

use forgemart_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are deliberately
    /// indistinguishable to the caller.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Credentials were correct but the account is deactivated.
    #[error("account is disabled")]
    AccountDisabled,

    /// No valid session for the presented token.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Two freshly generated tokens collided in a row. With 256-bit
    /// tokens this is practically unreachable.
    #[error("session token collision")]
    TokenCollision,

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error(transparent)]
    Store(#[from] CoreError),
}
