use crate::{
    config::{MessageFormat, VerifierConfig},
    crypto::{
        ethereum::{personal_message_digest, Address},
        signature::RecoverableSignature,
    },
    error::{AuthError, Result},
};
use libsecp256k1::{Message, PublicKey, RecoveryId, Signature};

/// Length in bytes of a digest-mode message
pub const DIGEST_LEN: usize = 32;

/// Public key recovered from a message and signature, with the parsed inputs
/// kept around for the `R || S` check
struct Recovered {
    public_key: PublicKey,
    signature: Signature,
    message: Message,
}

impl Recovered {
    fn address(&self) -> Address {
        Address::from_uncompressed(&self.public_key.serialize())
    }

    /// `R || S` check; only lower-S signatures verify
    fn verify(&self) -> bool {
        if self.signature.s.is_high() {
            tracing::debug!("S is in the upper half of the curve order");
            return false;
        }
        libsecp256k1::verify(&self.message, &self.signature, &self.public_key)
    }
}

/// Signature verifier bound to a [`VerifierConfig`]
///
/// Stateless; share it freely between threads.
///
/// # Example
/// ```rust
/// use ecdsa_eth_auth::{
///     config::VerifierConfig,
///     crypto::{challenge::generate_challenge, ecdsa::Verifier, signer::Keypair},
/// };
///
/// let verifier = Verifier::new(VerifierConfig::default());
/// let keypair = Keypair::generate();
/// let challenge = generate_challenge().unwrap();
/// let signature = keypair.sign_challenge(&challenge).unwrap();
///
/// let address = keypair.address().to_string();
/// assert!(verifier
///     .verify(Some(address.as_str()), challenge.as_bytes(), signature.as_ref())
///     .unwrap());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify a signature, optionally bound to an expected address
    ///
    /// With `expected_address` set, the recovered signer's address must match
    /// it case-insensitively. Without it, only the signature's self-consistency
    /// is checked. A high-S signature still recovers a key but fails the
    /// `R || S` check, so it comes back as `Ok(false)`.
    ///
    /// # Returns
    /// * `Ok(true)` - Signature is valid (and matches the address, if given)
    /// * `Ok(false)` - Address mismatch, or the `R || S` check failed
    /// * `Err(AuthError)` - Malformed input or public key recovery failure
    pub fn verify(
        &self,
        expected_address: Option<&str>,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        let recovered = self.recover(message, signature)?;

        if let Some(expected) = expected_address {
            let address = recovered.address();
            if !address.matches(expected) {
                tracing::debug!(
                    recovered = %address,
                    expected,
                    "signature recovered to a different address"
                );
                return Ok(false);
            }
        }

        let valid = recovered.verify();
        if !valid {
            tracing::debug!("R || S check failed against recovered public key");
        }
        Ok(valid)
    }

    /// Address-bound verification
    pub fn verify_address(
        &self,
        expected_address: &str,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        self.verify(Some(expected_address), message, signature)
    }

    /// Key-recovery-only verification, with no identity check
    pub fn verify_recoverable(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        self.verify(None, message, signature)
    }

    /// Recover the signer's address without comparing it to anything
    ///
    /// Recovery alone does not prove the `R || S` check passes; use
    /// [`Verifier::verify`] for an authentication decision.
    pub fn recover_address(&self, message: &[u8], signature: &[u8]) -> Result<Address> {
        Ok(self.recover(message, signature)?.address())
    }

    /// Recover the signer's uncompressed public key (`0x04 || X || Y`)
    pub fn recover_public_key(&self, message: &[u8], signature: &[u8]) -> Result<[u8; 65]> {
        Ok(self.recover(message, signature)?.public_key.serialize())
    }

    fn digest(&self, message: &[u8]) -> Result<[u8; DIGEST_LEN]> {
        match self.config.message_format {
            MessageFormat::Digest => message.try_into().map_err(|_| {
                AuthError::InvalidMessage(format!(
                    "expected {}-byte digest, got {} bytes",
                    DIGEST_LEN,
                    message.len()
                ))
            }),
            MessageFormat::PersonalSign => Ok(personal_message_digest(message)),
        }
    }

    fn recover(&self, message: &[u8], signature: &[u8]) -> Result<Recovered> {
        let signature = RecoverableSignature::from_slice(signature)?;
        let digest = self.digest(message)?;

        let recovery_id = signature
            .recovery_id(self.config.legacy_recovery_ids)
            .inspect_err(|e| tracing::debug!(error = %e, "rejected recovery id"))?;
        let recovery_id = RecoveryId::parse(recovery_id).map_err(|e| {
            AuthError::RecoveryFailure(format!("Failed to parse recovery id: {:?}", e))
        })?;

        let rs = Signature::parse_standard_slice(signature.rs()).map_err(|e| {
            tracing::debug!(error = ?e, "R or S out of range");
            AuthError::RecoveryFailure(format!("Failed to parse signature: {:?}", e))
        })?;

        let message = Message::parse(&digest);
        let public_key = libsecp256k1::recover(&message, &rs, &recovery_id).map_err(|e| {
            tracing::debug!(error = ?e, "public key recovery failed");
            AuthError::RecoveryFailure(format!("Failed to recover public key: {:?}", e))
        })?;
        tracing::trace!("recovered public key from signature");

        Ok(Recovered {
            public_key,
            signature: rs,
            message,
        })
    }
}

/// Verify a signature against an expected address with the default configuration
///
/// # Arguments
/// * `expected_address` - Claimed signer address, compared case-insensitively
/// * `message` - 32-byte challenge that was signed
/// * `signature` - 65-byte `R || S || V` signature
///
/// # Returns
/// * `Ok(true)` - The holder of `expected_address` signed `message`
/// * `Ok(false)` - Well-formed signature from someone else, or invalid `R || S`
/// * `Err(AuthError)` - Malformed signature, bad message length, or recovery failure
///
/// # Example
/// ```rust
/// use ecdsa_eth_auth::crypto::{challenge::generate_challenge, ecdsa::verify_signature, signer::Keypair};
///
/// let keypair = Keypair::generate();
/// let challenge = generate_challenge().unwrap();
/// let signature = keypair.sign_challenge(&challenge).unwrap();
///
/// let address = keypair.address().to_checksum();
/// assert!(verify_signature(&address, challenge.as_bytes(), signature.as_ref()).unwrap());
///
/// let stranger = "0x0000000000000000000000000000000000000000";
/// assert!(!verify_signature(stranger, challenge.as_bytes(), signature.as_ref()).unwrap());
/// ```
pub fn verify_signature(expected_address: &str, message: &[u8], signature: &[u8]) -> Result<bool> {
    Verifier::default().verify_address(expected_address, message, signature)
}

/// Verify that a signature is valid for whatever key it recovers to
pub fn verify_recoverable(message: &[u8], signature: &[u8]) -> Result<bool> {
    Verifier::default().verify_recoverable(message, signature)
}

/// Recover the signer's address with the default configuration
pub fn recover_address(message: &[u8], signature: &[u8]) -> Result<Address> {
    Verifier::default().recover_address(message, signature)
}
