//! `ssh-keygen` backed implementation of the `KeyGenerator` port.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{CommandRunner, KeyGenerator};
use crate::domain::DriverError;

const KEY_COMMENT: &str = "kitchen_key";

/// Writes RSA 2048 keypairs with `ssh-keygen`.
pub struct SshKeygen<R> {
    runner: R,
}

impl<R: CommandRunner> SshKeygen<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> KeyGenerator for SshKeygen<R> {
    async fn generate(&self, private_key: &Path, public_key: &Path) -> Result<()> {
        for path in [private_key, public_key] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DriverError::credential(parent, e))?;
            }
            remove_if_present(path).await?;
        }
        let generated_public = sibling_pub(private_key);
        remove_if_present(&generated_public).await?;

        let private_arg = private_key.to_string_lossy().into_owned();
        let output = self
            .runner
            .run(
                "ssh-keygen",
                &[
                    "-q",
                    "-t",
                    "rsa",
                    "-b",
                    "2048",
                    "-N",
                    "",
                    "-C",
                    KEY_COMMENT,
                    "-f",
                    private_arg.as_str(),
                ],
            )
            .await
            .map_err(|e| DriverError::credential(private_key, io::Error::other(e.to_string())))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DriverError::credential(private_key, io::Error::other(stderr)).into());
        }

        if generated_public != public_key {
            tokio::fs::rename(&generated_public, public_key)
                .await
                .map_err(|e| DriverError::credential(public_key, e))?;
        }
        for path in [private_key, public_key] {
            restrict_permissions(path).await?;
        }
        tracing::info!(private_key = %private_key.display(), "keypair written");
        Ok(())
    }
}

/// `<private>.pub`, where `ssh-keygen` puts the public half.
fn sibling_pub(private_key: &Path) -> PathBuf {
    let mut name = OsString::from(private_key.as_os_str());
    name.push(".pub");
    PathBuf::from(name)
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DriverError::credential(path, e).into()),
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| DriverError::credential(path, e).into())
}

#[cfg(not(unix))]
#[allow(clippy::unused_async)]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
