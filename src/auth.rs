use crate::{
    config::VerifierConfig,
    crypto::{
        challenge::{generate_challenge, Challenge},
        ecdsa::Verifier,
        signature::RecoverableSignature,
    },
    error::{AuthError, Result},
};
use serde::{Deserialize, Serialize};

/// Authentication service for address-bound challenge-response login
///
/// This service provides stateless operations:
/// - Challenge generation for clients to sign
/// - Verification of a signed challenge against the claimed address
///
/// The service does not store any state - developers must handle challenge
/// storage, expiry and single-use enforcement in their own systems, and issue
/// whatever session they need once verification succeeds.
#[derive(Clone, Debug, Default)]
pub struct Authenticator {
    verifier: Verifier,
}

/// Request structure for authenticating with a signed challenge
///
/// This contains all the data needed to verify a client's identity:
/// - The address the client claims to control
/// - The original challenge that was provided to the client (base64)
/// - The client's 65-byte signature of that challenge (hex, `0x` optional)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthRequest {
    pub address: String,
    pub challenge: String,
    pub signature: String,
}

impl Authenticator {
    /// Create a new authenticator with the given verifier configuration
    ///
    /// # Example
    /// ```rust
    /// use ecdsa_eth_auth::{auth::Authenticator, config::VerifierConfig};
    ///
    /// let authenticator = Authenticator::new(VerifierConfig::default());
    /// ```
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            verifier: Verifier::new(config),
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        self.verifier.config()
    }

    /// Generate a cryptographically secure random challenge
    ///
    /// This challenge should be:
    /// 1. Sent to the client
    /// 2. Stored temporarily by the server (with expiration)
    /// 3. Signed by the client using their private key
    /// 4. Submitted back with the signature for verification
    ///
    /// # Example
    /// ```rust
    /// use ecdsa_eth_auth::auth::Authenticator;
    ///
    /// let authenticator = Authenticator::default();
    /// let challenge = authenticator.generate_challenge().unwrap();
    /// // Store this challenge with a session ID and expiration time
    /// // Send challenge.to_base64() to the client for signing
    /// ```
    pub fn generate_challenge(&self) -> Result<Challenge> {
        generate_challenge()
    }

    /// Verify raw message and signature bytes, optionally against an address
    ///
    /// See [`Verifier::verify`] for the result semantics.
    pub fn verify(
        &self,
        expected_address: Option<&str>,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        self.verifier.verify(expected_address, message, signature)
    }

    /// Authenticate a client by verifying their signed challenge
    ///
    /// 1. Validates that no field is empty
    /// 2. Decodes the base64 challenge and hex signature
    /// 3. Recovers the signer and compares it with the claimed address
    ///
    /// # Returns
    /// * `Ok(true)` - The client controls `address`
    /// * `Ok(false)` - The signature belongs to someone else or does not verify
    /// * `Err(AuthError)` - Malformed request or unrecoverable signature
    ///
    /// # Errors
    /// - `InvalidMessage` - Challenge is empty or not 32 bytes
    /// - `MalformedSignature` - Signature is empty or not 65 bytes
    /// - `Base64Error` / `HexError` - Bad encoding
    /// - `RecoveryFailure` - No public key can be recovered
    ///
    /// # Example
    /// ```rust
    /// use ecdsa_eth_auth::{auth::{Authenticator, AuthRequest}, crypto::signer::Keypair};
    ///
    /// let authenticator = Authenticator::default();
    /// let keypair = Keypair::generate();
    ///
    /// let challenge = authenticator.generate_challenge().unwrap();
    /// let signature = keypair.sign_challenge(&challenge).unwrap();
    ///
    /// let auth_request = AuthRequest {
    ///     address: keypair.address().to_checksum(),
    ///     challenge: challenge.to_base64(),
    ///     signature: signature.to_hex(),
    /// };
    /// match authenticator.authenticate(&auth_request) {
    ///     Ok(true) => println!("Authentication successful!"),
    ///     Ok(false) => println!("Signature does not belong to {}", auth_request.address),
    ///     Err(e) => println!("Authentication failed: {}", e),
    /// }
    /// ```
    pub fn authenticate(&self, auth_request: &AuthRequest) -> Result<bool> {
        if auth_request.challenge.trim().is_empty() {
            return Err(AuthError::InvalidMessage("Empty challenge".to_string()));
        }
        if auth_request.signature.trim().is_empty() {
            return Err(AuthError::MalformedSignature("Empty signature".to_string()));
        }

        let challenge = Challenge::from_base64(auth_request.challenge.trim())?;
        let signature = RecoverableSignature::from_hex(auth_request.signature.trim())?;

        let verified = self.verifier.verify_address(
            auth_request.address.trim(),
            challenge.as_bytes(),
            signature.as_ref(),
        )?;
        tracing::debug!(address = %auth_request.address, verified, "authentication attempt");
        Ok(verified)
    }
}
