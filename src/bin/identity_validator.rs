use rsa::pkcs1::LineEnding;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use seedkey::keygen::PUBLIC_EXPONENT;
use seedkey::GeneratedIdentity;
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read};

struct ValidationResult {
    name: &'static str,
    success: bool,
    message: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let payload = if let Some(path) = args.get(1) {
        fs::read_to_string(path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    // Malformed addresses are rejected here, while decoding
    let identity: GeneratedIdentity = serde_json::from_str(&payload)?;

    let results = vec![
        run_validation("Address", || validate_address(&identity)),
        run_validation("Public", || validate_public_key(&identity)),
        run_validation("Private", || validate_private_key(&identity)),
    ];

    println!("=============== Identity Validation ===============");
    for result in &results {
        let status = if result.success { "PASS" } else { "FAIL" };
        println!("{:<10} {}", result.name, status);
        if !result.success {
            println!("    {}", result.message);
        }
    }

    let overall_success = results.iter().all(|r| r.success);
    println!("===================================================");
    if overall_success {
        println!("Overall status: identity verified");
        Ok(())
    } else {
        println!("Overall status: validation failed");
        Err("identity validation failed".into())
    }
}

fn run_validation<F>(name: &'static str, f: F) -> ValidationResult
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(_) => ValidationResult {
            name,
            success: true,
            message: String::new(),
        },
        Err(err) => ValidationResult {
            name,
            success: false,
            message: err,
        },
    }
}

fn validate_address(identity: &GeneratedIdentity) -> Result<(), String> {
    if !identity.address.matches(&identity.public_key) {
        return Err("address is not the SHA-224 of the public key PEM".to_string());
    }
    Ok(())
}

fn validate_public_key(identity: &GeneratedIdentity) -> Result<(), String> {
    let public = RsaPublicKey::from_public_key_pem(&identity.public_key).map_err(|e| e.to_string())?;
    if public.e() != &BigUint::from(PUBLIC_EXPONENT) {
        return Err(format!("public exponent is not {}", PUBLIC_EXPONENT));
    }
    let bits = public.n().bits();
    seedkey::keygen::validate_bits(bits).map_err(|e| e.to_string())?;
    Ok(())
}

fn validate_private_key(identity: &GeneratedIdentity) -> Result<(), String> {
    let private = identity.rsa_private_key().map_err(|e| e.to_string())?;
    private.validate().map_err(|e| e.to_string())?;

    let derived = private
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| e.to_string())?;
    if derived.trim_end() != identity.public_key {
        return Err("private key does not match the public key".to_string());
    }
    Ok(())
}
