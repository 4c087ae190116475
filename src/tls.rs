use base64::{engine::general_purpose::STANDARD, Engine as _};
use rustls_pki_types::CertificateDer;
use tracing::{debug, warn};

use crate::service::PredictError;

/// Collects the platform's trusted root certificates into a single PEM
/// bundle that `tonic::transport::Certificate::from_pem` accepts.
pub fn native_root_pem() -> Result<String, PredictError> {
    let result = rustls_native_certs::load_native_certs();
    for e in &result.errors {
        warn!("Skipping unreadable root certificate: {}", e);
    }
    if result.certs.is_empty() {
        return Err(PredictError::Certificates(
            "no trusted root certificates found".to_string(),
        ));
    }
    debug!("Loaded {} native root certificates", result.certs.len());
    Ok(to_pem_bundle(&result.certs))
}

fn to_pem_bundle(certs: &[CertificateDer<'_>]) -> String {
    let mut pem = String::new();
    for cert in certs {
        let encoded = STANDARD.encode(cert.as_ref());
        pem.push_str("-----BEGIN CERTIFICATE-----\n");
        // PEM bodies wrap at 64 columns; base64 output is ASCII
        for line in encoded.as_bytes().chunks(64) {
            pem.push_str(std::str::from_utf8(line).unwrap_or_default());
            pem.push('\n');
        }
        pem.push_str("-----END CERTIFICATE-----\n");
    }
    pem
}
