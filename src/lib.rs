//! # ecdsa-eth-auth
//!
//! A Rust library for **address-bound ECDSA challenge-response authentication** over secp256k1,
//! using the Ethereum public-key/address scheme. Clients prove they hold the private key behind
//! an address by signing a one-time challenge; the server recovers the signer from the signature
//! and compares addresses.
//!
//! ## Features
//!
//! - **Secure Challenge Generation** - Cryptographically secure 32-byte challenges
//! - **Public Key Recovery** - 65-byte `R || S || V` signatures, `V` in 0..=3 or 27..=30
//! - **Address-Bound Verification** - Case-insensitive comparison against the claimed address
//! - **Personal Messages** - Optional EIP-191 `personal_sign` verification for wallet signatures
//! - **Stateless Design** - No built-in storage, you control challenge persistence
//! - **Result vs. Error Split** - Wrong signer is `Ok(false)`, malformed input is an `AuthError`
//!
//! ## Quick Start
//!
//! ```rust
//! use ecdsa_eth_auth::{generate_challenge, verify_signature, Keypair};
//!
//! // Server: issue a challenge
//! let challenge = generate_challenge().unwrap();
//!
//! // Client: sign it with the key behind their address
//! let keypair = Keypair::generate();
//! let signature = keypair.sign_challenge(&challenge).unwrap();
//!
//! // Server: verify against the claimed address
//! let address = keypair.address().to_checksum();
//! match verify_signature(&address, challenge.as_bytes(), signature.as_ref()) {
//!     Ok(true) => println!("{} authenticated", address),
//!     Ok(false) => println!("Signature belongs to someone else"),
//!     Err(e) => println!("Rejected: {}", e),
//! }
//! ```
//!
//! ## Examples
//!
//! See the [basic_workflow example](demos/basic_workflow.rs) for a complete authentication flow:
//!
//! ```bash
//! cargo run --example basic_workflow
//! ```

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;

// Re-export main types for easier access
pub use auth::{AuthRequest, Authenticator};
pub use config::{MessageFormat, VerifierConfig};
pub use crypto::challenge::{generate_challenge, Challenge};
pub use crypto::ecdsa::{recover_address, verify_recoverable, verify_signature, Verifier};
pub use crypto::ethereum::Address;
pub use crypto::signature::RecoverableSignature;
pub use crypto::signer::Keypair;
pub use error::{AuthError, Result};
