//! Login keypair handling.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::KeyGenerator;
use crate::domain::{DriverError, KeyPairPaths};

/// Make sure both key files exist, generating a fresh pair if either is
/// missing. Returns `true` when a new pair was written.
///
/// When both files are already present nothing on disk is touched.
///
/// # Errors
///
/// Returns [`DriverError::CredentialIo`] (possibly wrapped) if generation fails.
pub async fn ensure_keypair(keys: &impl KeyGenerator, paths: &KeyPairPaths) -> Result<bool> {
    if paths.private_key.exists() && paths.public_key.exists() {
        tracing::debug!(private_key = %paths.private_key.display(), "reusing existing keypair");
        return Ok(false);
    }
    tracing::info!(private_key = %paths.private_key.display(), "generating login keypair");
    keys.generate(&paths.private_key, &paths.public_key).await?;
    Ok(true)
}

/// Contents of the public key file, trimmed.
///
/// # Errors
///
/// Returns [`DriverError::CredentialIo`] if the file cannot be read.
pub async fn read_public_key(paths: &KeyPairPaths) -> Result<String> {
    let content = tokio::fs::read_to_string(&paths.public_key)
        .await
        .map_err(|e| DriverError::credential(&paths.public_key, e))?;
    Ok(content.trim().to_string())
}
