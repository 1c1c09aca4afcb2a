//! Request signing for the TransIP `/auth` endpoint.
//!
//! The API wants an RSA-SHA512 signature over the exact request body. The
//! key is handed to the `openssl` CLI so it never has to be parsed here.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::providers::transip::error::TransipError;

/// Sign `body` with the PEM key at `private_key_path`, base64 encoded.
pub(crate) async fn sign(private_key_path: &str, body: &[u8]) -> Result<String, TransipError> {
    tokio::fs::File::open(private_key_path)
        .await
        .map_err(|source| TransipError::KeyFile {
            path: private_key_path.to_string(),
            source,
        })?;

    let mut child = Command::new("openssl")
        .arg("dgst")
        .arg("-sha512")
        .arg("-sign")
        .arg(private_key_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| TransipError::Signing(format!("failed to run openssl: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| TransipError::Signing("openssl stdin unavailable".to_string()))?;
    stdin
        .write_all(body)
        .await
        .map_err(|e| TransipError::Signing(e.to_string()))?;
    // closing stdin lets openssl finish
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| TransipError::Signing(e.to_string()))?;

    if !output.status.success() {
        return Err(TransipError::Signing(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    if output.stdout.is_empty() {
        return Err(TransipError::Signing("empty signature".to_string()));
    }

    Ok(STANDARD.encode(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_missing_key_file() {
        let result = sign("/nonexistent/transip.key", b"{}").await;
        assert_matches!(result, Err(TransipError::KeyFile { ref path, .. }) if path == "/nonexistent/transip.key");
    }

    #[tokio::test]
    async fn test_garbage_key_is_a_signing_error() {
        let path = std::env::temp_dir().join(format!("transip-{}.key", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "not a private key").await.unwrap();
        let path_str = path.to_str().unwrap().to_string();

        let result = sign(&path_str, b"{}").await;
        tokio::fs::remove_file(&path).await.ok();

        assert_matches!(result, Err(TransipError::Signing(_)));
    }
}
