pub mod challenge;
pub mod ecdsa;
pub mod ethereum;
pub mod signature;
pub mod signer;

// Re-export main functions for easier access
pub use challenge::{generate_challenge, Challenge};
pub use ecdsa::{recover_address, verify_recoverable, verify_signature, Verifier};
pub use ethereum::Address;
pub use signature::RecoverableSignature;
pub use signer::Keypair;
