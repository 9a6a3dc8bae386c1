use crate::error::{AuthError, Result};
use k256::elliptic_curve::scalar::IsHigh;
use std::fmt;

/// Length in bytes of a recoverable signature (`R || S || V`)
pub const SIGNATURE_LEN: usize = 65;

/// Offset at which `V` is subtracted when the legacy 27..=30 encoding is used
const LEGACY_RECOVERY_ID_OFFSET: u8 = 27;

/// 65-byte `R(32) || S(32) || V(1)` signature
///
/// Parsing only checks the length. Whether `V` is a usable recovery id and
/// whether `R`/`S` are in range is decided at recovery time.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; SIGNATURE_LEN]);

impl RecoverableSignature {
    /// Parse a raw signature
    ///
    /// # Errors
    /// `MalformedSignature` if `bytes` is not exactly 65 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            AuthError::MalformedSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Parse a hex signature, with or without a `0x` prefix
    pub fn from_hex(signature_hex: &str) -> Result<Self> {
        let digits = signature_hex
            .strip_prefix("0x")
            .or_else(|| signature_hex.strip_prefix("0X"))
            .unwrap_or(signature_hex);
        let bytes = hex::decode(digits)
            .map_err(|e| AuthError::HexError(format!("Failed to decode signature: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub(crate) fn from_parts(rs: &[u8; 64], v: u8) -> Self {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..64].copy_from_slice(rs);
        bytes[64] = v;
        Self(bytes)
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    /// `R || S` with the recovery byte stripped
    pub fn rs(&self) -> &[u8] {
        &self.0[..64]
    }

    /// Raw `V` byte as submitted
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Normalised recovery id in 0..=3
    ///
    /// With `accept_legacy` set, `V` in 27..=30 maps to 0..=3.
    ///
    /// # Errors
    /// `RecoveryFailure` if `V` is outside the accepted ranges.
    pub fn recovery_id(&self, accept_legacy: bool) -> Result<u8> {
        match self.v() {
            v @ 0..=3 => Ok(v),
            v @ 27..=30 if accept_legacy => Ok(v - LEGACY_RECOVERY_ID_OFFSET),
            v => Err(AuthError::RecoveryFailure(format!(
                "invalid recovery id {}",
                v
            ))),
        }
    }

    /// True if the high bit of the first byte of `S` is clear
    pub fn has_clear_s_high_bit(&self) -> bool {
        self.0[32] & 0x80 == 0
    }

    /// True if `S` is a valid scalar no greater than half the curve order
    pub fn is_low_s(&self) -> bool {
        k256::ecdsa::Signature::from_slice(self.rs())
            .map(|signature| !bool::from(signature.s().is_high()))
            .unwrap_or(false)
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0
    }

    /// `0x`-prefixed lowercase hex rendering
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for RecoverableSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for RecoverableSignature {
    type Error = AuthError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecoverableSignature")
            .field(&self.to_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_length_is_malformed() {
        for len in [0usize, 1, 64, 66, 130] {
            let bytes = vec![1u8; len];
            let result = RecoverableSignature::from_slice(&bytes);
            assert!(
                matches!(result, Err(AuthError::MalformedSignature(_))),
                "length {} should be malformed",
                len
            );
        }
    }

    #[test]
    fn test_components() {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..32].fill(0x11);
        bytes[32..64].fill(0x22);
        bytes[64] = 1;
        let signature = RecoverableSignature::from_slice(&bytes).unwrap();

        assert_eq!(signature.r(), &[0x11; 32]);
        assert_eq!(signature.s(), &[0x22; 32]);
        assert_eq!(signature.rs().len(), 64);
        assert_eq!(signature.v(), 1);
        assert_eq!(signature.to_bytes(), bytes);
    }

    #[test]
    fn test_recovery_id_ranges() {
        let with_v = |v: u8| RecoverableSignature::from_parts(&[1u8; 64], v);

        assert_eq!(with_v(0).recovery_id(false).unwrap(), 0);
        assert_eq!(with_v(3).recovery_id(false).unwrap(), 3);
        assert_eq!(with_v(27).recovery_id(true).unwrap(), 0);
        assert_eq!(with_v(30).recovery_id(true).unwrap(), 3);

        assert!(matches!(
            with_v(27).recovery_id(false),
            Err(AuthError::RecoveryFailure(_))
        ));
        assert!(matches!(
            with_v(4).recovery_id(true),
            Err(AuthError::RecoveryFailure(_))
        ));
        assert!(matches!(
            with_v(31).recovery_id(true),
            Err(AuthError::RecoveryFailure(_))
        ));
    }

    #[test]
    fn test_hex_round_trip() {
        let signature = RecoverableSignature::from_parts(&[0xab; 64], 28);
        let encoded = signature.to_hex();
        assert!(encoded.starts_with("0xabab"));
        assert!(encoded.ends_with("1c"));

        assert_eq!(RecoverableSignature::from_hex(&encoded).unwrap(), signature);
        assert_eq!(
            RecoverableSignature::from_hex(&encoded[2..]).unwrap(),
            signature
        );
    }

    #[test]
    fn test_bad_hex() {
        assert!(matches!(
            RecoverableSignature::from_hex("0xnothex"),
            Err(AuthError::HexError(_))
        ));
        assert!(matches!(
            RecoverableSignature::from_hex("0xabcd"),
            Err(AuthError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_s_high_bit() {
        let mut rs = [0x01u8; 64];
        assert!(RecoverableSignature::from_parts(&rs, 0).has_clear_s_high_bit());
        assert!(RecoverableSignature::from_parts(&rs, 0).is_low_s());

        rs[32] = 0x80;
        let high = RecoverableSignature::from_parts(&rs, 0);
        assert!(!high.has_clear_s_high_bit());
        assert!(!high.is_low_s());
    }
}
