//! TLS acceptor module
//!
//! Builds the rustls acceptor used by trust-verified prefixes. A presented
//! client certificate is validated against the configured trust anchors
//! during the handshake; revocation checking stays disabled because no
//! CRLs are loaded. The handshake itself tolerates anonymous clients so
//! the missing-credential case can still be answered over HTTP.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::server::WebPkiClientVerifier;
use tokio_rustls::rustls::{RootCertStore, ServerConfig};
use tokio_rustls::TlsAcceptor;

use crate::config::TlsConfig;
use crate::error::StartupError;

/// Build a TLS acceptor that requests a client certificate on every
/// connection
pub fn build_acceptor(tls: &TlsConfig) -> Result<TlsAcceptor, StartupError> {
    let certs = load_certs(&tls.certificate)?;
    let key = load_private_key(&tls.private_key)?;

    let mut roots = RootCertStore::empty();
    for cert in load_certs(&tls.client_ca)? {
        roots.add(cert)?;
    }

    let verifier = WebPkiClientVerifier::builder(Arc::new(roots))
        .allow_unauthenticated()
        .build()
        .map_err(|e| StartupError::TlsConfig(e.to_string()))?;

    let server_config = ServerConfig::builder()
        .with_client_cert_verifier(verifier)
        .with_single_cert(certs, key)?;

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

fn load_certs(path: &str) -> Result<Vec<CertificateDer<'static>>, StartupError> {
    let file = File::open(path)
        .map_err(|e| StartupError::TlsConfig(format!("cannot read {path}: {e}")))?;
    let mut reader = BufReader::new(file);

    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StartupError::TlsConfig(format!("invalid certificate in {path}: {e}")))?;

    if certs.is_empty() {
        return Err(StartupError::TlsConfig(format!(
            "no certificates found in {path}"
        )));
    }
    Ok(certs)
}

fn load_private_key(path: &str) -> Result<PrivateKeyDer<'static>, StartupError> {
    let file = File::open(path)
        .map_err(|e| StartupError::TlsConfig(format!("cannot read {path}: {e}")))?;
    let mut reader = BufReader::new(file);

    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| StartupError::TlsConfig(format!("invalid private key in {path}: {e}")))?
        .ok_or_else(|| StartupError::TlsConfig(format!("no private key found in {path}")))
}
