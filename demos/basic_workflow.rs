// demos/basic_workflow.rs

use ecdsa_eth_auth::{
    auth::{AuthRequest, Authenticator},
    config::VerifierConfig,
    crypto::signer::Keypair,
};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    println!("ECDSA Ethereum Auth Basic Usage Example");

    // 1. Setup authentication service
    let authenticator = Authenticator::new(VerifierConfig::default());

    // 2. Simulate challenge storage (in real app, use Redis/DB)
    let mut challenges: HashMap<String, String> = HashMap::new();

    // 3. Generate challenge
    let challenge = authenticator.generate_challenge()?;
    let session_id = "example-session-123";
    challenges.insert(session_id.to_string(), challenge.to_base64());

    println!("Generated challenge: {}", challenge);
    println!("Stored with session ID: {}", session_id);

    // 4. Client side: sign the challenge with the wallet key
    let wallet = Keypair::generate();
    let signature = wallet.sign_challenge(&challenge)?;
    println!("\nClient address: {}", wallet.address().to_checksum());
    println!("Client signature: {}", signature.to_hex());

    // 5. Server side: consume the stored challenge and verify
    println!("\nAuthentication attempt...");
    let stored = challenges
        .remove(session_id)
        .ok_or("challenge already used or expired")?;

    let auth_request = AuthRequest {
        address: wallet.address().to_checksum(),
        challenge: stored.clone(),
        signature: signature.to_hex(),
    };
    match authenticator.authenticate(&auth_request)? {
        true => println!("Authentication successful for {}", auth_request.address),
        false => println!("Signature does not belong to {}", auth_request.address),
    }

    // 6. Someone else claiming the same signature
    let impostor = AuthRequest {
        address: Keypair::generate().address().to_string(),
        challenge: stored,
        signature: signature.to_hex(),
    };
    let verified = authenticator.authenticate(&impostor)?;
    println!("Impostor {} verified: {}", impostor.address, verified);

    // 7. Malformed input is an error, not a failed check
    let truncated = AuthRequest {
        signature: signature.to_hex()[..130].to_string(),
        ..auth_request
    };
    match authenticator.authenticate(&truncated) {
        Ok(verified) => println!("Unexpected result: {}", verified),
        Err(e) => println!("Truncated signature rejected: {}", e),
    }

    println!("\nExample completed!");
    Ok(())
}
