use std::future::Future;

use thiserror::Error;

pub mod client;
pub mod envelope;

pub use client::ScmdClient;

/// What GetCertificate answered when the call itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// PEM bundle: user, root and issuing CA certificates.
    Certificate(String),
    /// The service answered without a certificate.
    Empty,
}

#[derive(Debug, Error)]
pub enum ScmdError {
    #[error("Request to SCMD service failed")]
    Transport(#[from] reqwest::Error),

    #[error("SCMD service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("SOAP fault: {0}")]
    Fault(String),

    #[error("Malformed SOAP response: {0}")]
    Xml(String),
}

/// Source of the certificate chain for a citizen, identified by the
/// application id and the user's phone number.
pub trait CertificateFetcher {
    fn get_certificate(
        &self,
        application_id: &[u8],
        user_id: &str,
    ) -> impl Future<Output = Result<FetchOutcome, ScmdError>> + Send;
}
