//! TLS configuration and certificate loading.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Names the generated test certificate is valid for.
const TEST_CERT_NAMES: &[&str] = &["localhost", "127.0.0.1"];

#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("certificate file not found: {0:?}")]
    CertNotFound(std::path::PathBuf),

    #[error("private key file not found: {0:?}")]
    KeyNotFound(std::path::PathBuf),

    #[error("failed to load TLS material: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to generate test certificate: {0}")]
    Generate(#[from] rcgen::Error),
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertNotFound(cert_path.to_path_buf()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.to_path_buf()));
    }

    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}

/// Self-signed certificate for local testing of the TLS listener.
pub async fn generate_test_certificate() -> Result<RustlsConfig, TlsError> {
    let names: Vec<String> = TEST_CERT_NAMES.iter().map(|n| n.to_string()).collect();
    let rcgen::CertifiedKey { cert, key_pair } = rcgen::generate_simple_self_signed(names)?;

    tracing::warn!("Serving TLS with a generated self-signed certificate");
    Ok(RustlsConfig::from_pem(cert.pem().into_bytes(), key_pair.serialize_pem().into_bytes()).await?)
}
