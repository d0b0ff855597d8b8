// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use rand::rngs::OsRng;
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};

/// scrypt work factor (log2 of N) used for new hashes
pub const DEFAULT_LOG_N: u8 = 17;
const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// Hash a password using scrypt
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    hash_password_with_cost(plain, DEFAULT_LOG_N)
}

/// Hash a password with an explicit scrypt cost.
/// The cost is encoded in the PHC string, so verification needs no configuration.
pub fn hash_password_with_cost(plain: &str, log_n: u8) -> anyhow::Result<String> {
    let params = Params::new(log_n, BLOCK_SIZE, PARALLELISM, OUTPUT_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// [`verify_password`] on the blocking thread pool; callable from request handlers
pub async fn verify_password_async(hash: &str, plain: &str) -> bool {
    let (hash, plain) = (hash.to_owned(), plain.to_owned());
    match tokio::task::spawn_blocking(move || verify_password(&hash, &plain)).await {
        Ok(valid) => valid,
        Err(err) => {
            tracing::warn!(target: "security", error = %err, "password verification task failed");
            false
        },
    }
}

/// [`hash_password_with_cost`] on the blocking thread pool
pub async fn hash_password_async(plain: &str, log_n: u8) -> anyhow::Result<String> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || hash_password_with_cost(&plain, log_n)).await?
}
