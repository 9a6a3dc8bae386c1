use crate::{
    crypto::{
        challenge::Challenge,
        ethereum::{personal_message_digest, Address, UNCOMPRESSED_PUBLIC_KEY_LEN},
        signature::RecoverableSignature,
    },
    error::{AuthError, Result},
};
use k256::ecdsa::SigningKey;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// secp256k1 key pair acting as the claimant side of a challenge
///
/// Signatures come out in the 65-byte `R || S || V` layout with `V` in 0..=3
/// and `S` always in low form. The secret scalar stays behind [`Secret`] and
/// is not part of the `Debug` output.
pub struct Keypair {
    secret: Secret<[u8; 32]>,
    public_key: [u8; UNCOMPRESSED_PUBLIC_KEY_LEN],
    address: Address,
}

impl Keypair {
    /// Generate a fresh key pair from the OS random source
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_signing_key(&SigningKey::random(rng))
    }

    /// Build a key pair from a 32-byte big-endian secret scalar
    ///
    /// # Errors
    /// `CryptoError` if the bytes are not a valid non-zero scalar below the curve order.
    ///
    /// # Example
    /// ```rust
    /// use ecdsa_eth_auth::crypto::signer::Keypair;
    ///
    /// let mut secret = [0u8; 32];
    /// secret[31] = 1;
    /// let keypair = Keypair::from_secret_bytes(&secret).unwrap();
    /// assert_eq!(
    ///     keypair.address().to_string(),
    ///     "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
    /// );
    /// ```
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| AuthError::CryptoError(format!("Invalid secret key: {}", e)))?;
        Ok(Self::from_signing_key(&signing_key))
    }

    fn from_signing_key(signing_key: &SigningKey) -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&signing_key.to_bytes());

        let encoded = signing_key.verifying_key().to_encoded_point(false);
        let mut public_key = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
        public_key.copy_from_slice(encoded.as_bytes());

        Self {
            secret: Secret::new(secret),
            public_key,
            address: Address::from_uncompressed(&public_key),
        }
    }

    fn signing_key(&self) -> Result<SigningKey> {
        SigningKey::from_slice(self.secret.expose_secret())
            .map_err(|e| AuthError::CryptoError(format!("Invalid secret key: {}", e)))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Uncompressed SEC1 public key (`0x04 || X || Y`)
    pub fn public_key_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LEN] {
        self.public_key
    }

    /// Sign a 32-byte digest directly
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<RecoverableSignature> {
        let (signature, recovery_id) = self
            .signing_key()?
            .sign_prehash_recoverable(digest)
            .map_err(|e| AuthError::CryptoError(format!("Failed to sign digest: {}", e)))?;

        let mut rs = [0u8; 64];
        rs.copy_from_slice(&signature.to_bytes());
        Ok(RecoverableSignature::from_parts(&rs, recovery_id.to_byte()))
    }

    /// Sign a challenge as-is, the counterpart of digest-mode verification
    pub fn sign_challenge(&self, challenge: &Challenge) -> Result<RecoverableSignature> {
        self.sign_digest(challenge.as_bytes())
    }

    /// Sign an arbitrary message the way a wallet's `personal_sign` does
    pub fn sign_personal(&self, message: &[u8]) -> Result<RecoverableSignature> {
        self.sign_digest(&personal_message_digest(message))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::challenge::generate_challenge;

    #[test]
    fn test_generated_keys_differ() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        assert_ne!(a.address(), b.address());
        assert_eq!(a.public_key_uncompressed()[0], 0x04);
    }

    #[test]
    fn test_invalid_secret() {
        assert!(matches!(
            Keypair::from_secret_bytes(&[0u8; 32]),
            Err(AuthError::CryptoError(_))
        ));
        assert!(matches!(
            Keypair::from_secret_bytes(&[0xffu8; 32]),
            Err(AuthError::CryptoError(_))
        ));
        assert!(Keypair::from_secret_bytes(&[1u8; 16]).is_err());
    }

    #[test]
    fn test_address_matches_public_key() {
        let keypair = Keypair::generate();
        let derived = Address::from_public_key(&keypair.public_key_uncompressed()).unwrap();
        assert_eq!(keypair.address(), derived);
    }

    #[test]
    fn test_signatures_are_canonical() {
        let keypair = Keypair::generate();
        for _ in 0..64 {
            let challenge = generate_challenge().unwrap();
            let signature = keypair.sign_challenge(&challenge).unwrap();

            assert_eq!(signature.to_bytes().len(), 65);
            assert!(signature.v() <= 3, "recovery id {} out of range", signature.v());
            assert_eq!(signature.to_bytes()[32] & 0x80, 0, "high bit of S must be clear");
            assert!(signature.has_clear_s_high_bit());
            assert!(signature.is_low_s());
        }
    }

    #[test]
    fn test_signing_is_deterministic() {
        let keypair = Keypair::from_secret_bytes(&[7u8; 32]).unwrap();
        let digest = [42u8; 32];
        assert_eq!(
            keypair.sign_digest(&digest).unwrap(),
            keypair.sign_digest(&digest).unwrap()
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::from_secret_bytes(&[7u8; 32]).unwrap();
        let debug = format!("{:?}", keypair);
        assert!(debug.contains(&keypair.address().to_string()));
        assert!(!debug.contains("0707070707"));
    }
}
