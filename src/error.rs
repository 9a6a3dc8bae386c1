use std::fmt;

/// Challenge generation and signature verification errors
///
/// Structural failures only. A well-formed signature that does not match the
/// expected address, or whose `R||S` check fails, is reported as `Ok(false)`
/// by the verifier and never shows up here.
///
/// # Example
/// ```rust
/// use ecdsa_eth_auth::{AuthError, Result};
///
/// fn handle_verify_result(result: Result<bool>) {
///     match result {
///         Ok(true) => println!("Signer proved ownership"),
///         Ok(false) => println!("Signature does not belong to this address"),
///         Err(AuthError::MalformedSignature(msg)) => println!("Bad input: {}", msg),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
#[derive(Debug)]
pub enum AuthError {
    /// The secure random source could not supply the requested bytes
    RandomSourceFailure(String),

    /// Signature is not exactly 65 bytes (`R || S || V`)
    MalformedSignature(String),

    /// Public key could not be recovered from the message and signature
    ///
    /// This error occurs when:
    /// - The recovery id is outside the accepted range
    /// - `R` or `S` overflows the curve order
    /// - No curve point corresponds to `R`
    RecoveryFailure(String),

    /// Public key supplied by the caller is not in the expected form
    ///
    /// This error occurs when:
    /// - The key is not 65 bytes long
    /// - The key does not carry the uncompressed `0x04` tag
    InvalidPublicKey(String),

    /// Message is not acceptable for the configured message format
    ///
    /// This error occurs when:
    /// - A digest-mode message is not exactly 32 bytes
    /// - An encoded challenge is empty or decodes to the wrong length
    InvalidMessage(String),

    /// Base64 decoding failed
    Base64Error(String),

    /// Hex decoding failed
    HexError(String),

    /// Signing-side cryptographic failure (bad secret key, signer error)
    CryptoError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::RandomSourceFailure(msg) => {
                write!(f, "Random source failure: {msg}")
            }
            AuthError::MalformedSignature(msg) => {
                write!(f, "Malformed signature: {msg}")
            }
            AuthError::RecoveryFailure(msg) => {
                write!(f, "Public key recovery failed: {msg}")
            }
            AuthError::InvalidPublicKey(msg) => {
                write!(f, "Invalid public key: {msg}")
            }
            AuthError::InvalidMessage(msg) => {
                write!(f, "Invalid message: {msg}")
            }
            AuthError::Base64Error(msg) => {
                write!(f, "Base64 decode error: {msg}")
            }
            AuthError::HexError(msg) => {
                write!(f, "Hex decode error: {msg}")
            }
            AuthError::CryptoError(msg) => {
                write!(f, "Cryptographic error: {msg}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

pub type Result<T> = std::result::Result<T, AuthError>;
