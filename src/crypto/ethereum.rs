use crate::error::{AuthError, Result};
use easy_hasher::easy_hasher::raw_keccak256;
use std::{fmt, str::FromStr};

/// Length in bytes of an address
pub const ADDRESS_LEN: usize = 20;

/// Length in bytes of an uncompressed SEC1 public key (`0x04 || X || Y`)
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Keccak-256 digest of `data`
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let hash = raw_keccak256(data.to_vec()).to_vec();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hash);
    digest
}

/// Digest a wallet signs for EIP-191 `personal_sign`
///
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`,
/// with the length written in decimal.
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    let mut prefixed = format!("{}{}", PERSONAL_MESSAGE_PREFIX, message.len()).into_bytes();
    prefixed.extend_from_slice(message);
    keccak256(&prefixed)
}

/// 20-byte identifier derived from a secp256k1 public key
///
/// The last 20 bytes of `keccak256(X || Y)` over the uncompressed key.
/// `Display` renders `0x` followed by lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Derive the address of an uncompressed public key
    ///
    /// # Errors
    /// `InvalidPublicKey` if the key is not 65 bytes starting with `0x04`.
    pub fn from_public_key(uncompressed: &[u8]) -> Result<Self> {
        if uncompressed.len() != UNCOMPRESSED_PUBLIC_KEY_LEN {
            return Err(AuthError::InvalidPublicKey(format!(
                "expected {}-byte uncompressed public key, got {} bytes",
                UNCOMPRESSED_PUBLIC_KEY_LEN,
                uncompressed.len()
            )));
        }
        if uncompressed[0] != 0x04 {
            return Err(AuthError::InvalidPublicKey(format!(
                "expected uncompressed tag 0x04, got {:#04x}",
                uncompressed[0]
            )));
        }
        let mut key = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
        key.copy_from_slice(uncompressed);
        Ok(Self::from_uncompressed(&key))
    }

    /// Derive the address of a key already known to be in uncompressed form
    pub(crate) fn from_uncompressed(key: &[u8; UNCOMPRESSED_PUBLIC_KEY_LEN]) -> Self {
        let hash = keccak256(&key[1..]);
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&hash[32 - ADDRESS_LEN..]);
        Self(address)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// EIP-55 mixed-case checksum rendering, for display only
    ///
    /// # Example
    /// ```rust
    /// use ecdsa_eth_auth::crypto::ethereum::Address;
    ///
    /// let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
    /// assert_eq!(address.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    /// ```
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut checksummed = String::with_capacity(2 + lower.len());
        checksummed.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if nibble >= 8 {
                checksummed.push(c.to_ascii_uppercase());
            } else {
                checksummed.push(c);
            }
        }
        checksummed
    }

    /// Case-insensitive comparison against a textual address
    ///
    /// Plain lowercase string equality; checksum casing in `other` is neither
    /// required nor validated.
    pub fn matches(&self, other: &str) -> bool {
        addresses_match(&self.to_string(), other)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.to_string()).finish()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AuthError;

    /// Parses 40 hex characters, with or without a `0x` prefix, in any case
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| AuthError::HexError(format!("Failed to decode address: {}", e)))?;
        let bytes: [u8; ADDRESS_LEN] = bytes.as_slice().try_into().map_err(|_| {
            AuthError::HexError(format!(
                "address must be {} bytes, got {}",
                ADDRESS_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

/// Compare two textual addresses case-insensitively
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // Uncompressed public key of the secret scalar 1 (the generator point G)
    const GENERATOR_UNCOMPRESSED: [u8; 65] = hex!(
        "04"
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
    );

    #[test]
    fn test_keccak256() {
        assert_eq!(
            keccak256(b"hello world"),
            hex!("47173285a8d7341e5e972fc677286384f802f8ef42a5ec5f03bbfa254cb01fad")
        );
        assert_eq!(
            keccak256(b""),
            hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn test_address_from_public_key() {
        let address = Address::from_public_key(&GENERATOR_UNCOMPRESSED).unwrap();
        assert_eq!(address.to_string(), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
        assert_eq!(address.to_checksum(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn test_address_rejects_compressed_key() {
        let result = Address::from_public_key(&GENERATOR_UNCOMPRESSED[..33]);
        assert!(matches!(result, Err(AuthError::InvalidPublicKey(_))));

        let mut wrong_tag = GENERATOR_UNCOMPRESSED;
        wrong_tag[0] = 0x02;
        assert!(matches!(
            Address::from_public_key(&wrong_tag),
            Err(AuthError::InvalidPublicKey(_))
        ));

        assert!(matches!(
            Address::from_public_key(&[]),
            Err(AuthError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_parse_address() {
        let with_prefix: Address = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".parse().unwrap();
        let without_prefix: Address = "7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap();
        assert_eq!(with_prefix, without_prefix);

        assert!(matches!(
            "0x7e5f45".parse::<Address>(),
            Err(AuthError::HexError(_))
        ));
        assert!(matches!(
            "0xzz5f4552091a69125d5dfcb7b8c2659029395bdf".parse::<Address>(),
            Err(AuthError::HexError(_))
        ));
    }

    #[test]
    fn test_case_insensitive_match() {
        let address = Address::from_public_key(&GENERATOR_UNCOMPRESSED).unwrap();
        assert!(address.matches("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"));
        assert!(address.matches("0X7E5F4552091A69125D5DFCB7B8C2659029395BDF"));
        // Wrong checksum casing is still a match
        assert!(address.matches("0x7e5F4552091A69125d5DfCb7b8C2659029395Bdf"));
        assert!(!address.matches("0x0000000000000000000000000000000000000000"));
        // No prefix normalisation: comparison is on the text as given
        assert!(!address.matches("7e5f4552091a69125d5dfcb7b8c2659029395bdf"));
    }

    #[test]
    fn test_personal_message_digest() {
        let expected = keccak256(b"\x19Ethereum Signed Message:\n9Some data");
        assert_eq!(personal_message_digest(b"Some data"), expected);
        assert_eq!(
            expected,
            hex!("1da44b586eb0729ff70a73c326926f6ed5a25f5b056e7f47fbc6e58d86871655")
        );
    }
}
