use serde::Deserialize;

/// How the verifier turns the submitted message into the digest that was signed
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    /// The message is the 32-byte digest itself, e.g. a raw challenge.
    /// Any other length is rejected with `InvalidMessage`.
    #[default]
    Digest,
    /// The message was signed with EIP-191 `personal_sign` and may be any length
    PersonalSign,
}

/// Configuration for signature verification
///
/// Deserializable so it can sit inside an application's own config file.
/// Missing fields fall back to [`VerifierConfig::default`].
///
/// # Example
/// ```rust
/// use ecdsa_eth_auth::config::{MessageFormat, VerifierConfig};
///
/// let config = VerifierConfig {
///     message_format: MessageFormat::PersonalSign,
///     legacy_recovery_ids: true,
/// };
/// assert_ne!(config, VerifierConfig::default());
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VerifierConfig {
    /// Interpretation of the signed message
    pub message_format: MessageFormat,
    /// Accept `V` in 27..=30 (legacy Ethereum convention) alongside 0..=3
    pub legacy_recovery_ids: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            message_format: MessageFormat::Digest,
            legacy_recovery_ids: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VerifierConfig::default();
        assert_eq!(config.message_format, MessageFormat::Digest);
        assert!(config.legacy_recovery_ids);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: VerifierConfig =
            serde_json::from_str(r#"{ "message_format": "personal_sign" }"#).unwrap();
        assert_eq!(config.message_format, MessageFormat::PersonalSign);
        assert!(config.legacy_recovery_ids);

        let config: VerifierConfig =
            serde_json::from_str(r#"{ "legacy_recovery_ids": false }"#).unwrap();
        assert_eq!(config.message_format, MessageFormat::Digest);
        assert!(!config.legacy_recovery_ids);
    }

    #[test]
    fn test_deserialize_unknown_format() {
        let result = serde_json::from_str::<VerifierConfig>(r#"{ "message_format": "eip712" }"#);
        assert!(result.is_err());
    }
}
