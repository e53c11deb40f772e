use tracing::error;

/// Lowest cost bcrypt accepts; only tests should use it.
pub const MIN_COST: u32 = 4;

/// Salted bcrypt verifier: a 60-character modular-crypt string.
pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash_password error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Constant-time check of `plain` against a stored verifier.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt parse hash error");
        anyhow::anyhow!(e.to_string())
    })
}
