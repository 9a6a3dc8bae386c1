use crate::error::{AuthError, Result};
use base64::prelude::*;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use std::fmt;

/// Length in bytes of every challenge
pub const CHALLENGE_LEN: usize = 32;

/// One-time random value a claimant signs to prove key possession
///
/// The bytes are signed directly as a 32-byte digest. Tracking which
/// challenges were issued, and invalidating them after use, is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Challenge([u8; CHALLENGE_LEN]);

impl Challenge {
    pub fn as_bytes(&self) -> &[u8; CHALLENGE_LEN] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; CHALLENGE_LEN] {
        self.0
    }

    /// Standard base64 rendering, the form handed to clients
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(self.0)
    }

    /// `0x`-prefixed lowercase hex rendering
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Decode a base64 challenge string back to its 32 bytes
    ///
    /// # Returns
    /// * `Ok(Challenge)` - Decoded challenge
    /// * `Err(AuthError::Base64Error)` - Input is not valid base64
    /// * `Err(AuthError::InvalidMessage)` - Input does not decode to 32 bytes
    ///
    /// # Example
    /// ```rust
    /// use ecdsa_eth_auth::crypto::challenge::{generate_challenge, Challenge};
    ///
    /// let challenge = generate_challenge().unwrap();
    /// let decoded = Challenge::from_base64(&challenge.to_base64()).unwrap();
    /// assert_eq!(decoded, challenge);
    /// ```
    pub fn from_base64(challenge_b64: &str) -> Result<Self> {
        let bytes = BASE64_STANDARD
            .decode(challenge_b64)
            .map_err(|e| AuthError::Base64Error(format!("Failed to decode challenge: {}", e)))?;
        let bytes: [u8; CHALLENGE_LEN] = bytes.as_slice().try_into().map_err(|_| {
            AuthError::InvalidMessage(format!(
                "challenge must be {} bytes, got {}",
                CHALLENGE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl From<[u8; CHALLENGE_LEN]> for Challenge {
    fn from(bytes: [u8; CHALLENGE_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Challenge {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// Generate a cryptographically secure random challenge
///
/// Draws 32 bytes from the operating system's random source.
///
/// # Returns
/// * `Ok(Challenge)` - Fresh challenge
/// * `Err(AuthError::RandomSourceFailure)` - The OS could not supply the bytes
///
/// # Example
/// ```rust
/// use ecdsa_eth_auth::crypto::challenge::generate_challenge;
///
/// let challenge = generate_challenge().unwrap();
/// assert_eq!(challenge.as_bytes().len(), 32);
/// println!("Challenge: {}", challenge);
/// ```
pub fn generate_challenge() -> Result<Challenge> {
    generate_challenge_with(&mut OsRng)
}

/// Generate a challenge from a caller-supplied cryptographic RNG
///
/// Fails as a whole if the RNG reports an error; a partially filled buffer is
/// never returned.
pub fn generate_challenge_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Challenge> {
    let mut challenge_bytes = [0u8; CHALLENGE_LEN];
    rng.try_fill_bytes(&mut challenge_bytes).map_err(|e| {
        tracing::debug!(error = %e, "random source failed while generating challenge");
        AuthError::RandomSourceFailure(format!("Failed to read {} random bytes: {}", CHALLENGE_LEN, e))
    })?;
    Ok(Challenge(challenge_bytes))
}
