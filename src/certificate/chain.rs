use std::borrow::Cow;

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::parse_x509_certificate;
use x509_parser::pem::Pem;
use x509_parser::x509::X509Name;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const BEGIN_MARKER: &str = "-----BEGIN ";

/// Number of certificates the SCMD service returns: user, root and issuing CA.
pub const CHAIN_LENGTH: usize = 3;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Invalid PEM block {index}: {message}")]
    Pem { index: usize, message: String },

    #[error("Unexpected PEM block {index}: {label}")]
    UnexpectedBlock { index: usize, label: String },

    #[error("Invalid X.509 certificate in block {index}: {message}")]
    Decode { index: usize, message: String },

    #[error("Incomplete certificate chain: expected 3 certificates, found {found}")]
    Incomplete { found: usize },

    #[error("Certificate for {role} has no subject common name")]
    MissingCommonName { role: &'static str },
}

/// Iterate over the PEM blocks of `bundle`, in order, in a single pass.
pub fn pem_blocks(bundle: &str) -> impl Iterator<Item = Result<Pem, ChainError>> + '_ {
    Pem::iter_from_buffer(bundle.as_bytes())
        .enumerate()
        .map(|(index, pem)| {
            pem.map_err(|e| ChainError::Pem {
                index,
                message: e.to_string(),
            })
        })
}

/// Put every BEGIN marker at the start of a line. The PEM reader only
/// recognises armor lines, and the service may concatenate blocks without
/// a line break (`-----END CERTIFICATE----------BEGIN CERTIFICATE-----`).
pub fn split_joined_blocks(bundle: &str) -> Cow<'_, str> {
    let joined = bundle
        .match_indices(BEGIN_MARKER)
        .any(|(i, _)| i > 0 && !bundle[..i].ends_with('\n'));
    if !joined {
        return Cow::Borrowed(bundle);
    }

    let mut out = String::with_capacity(bundle.len() + CHAIN_LENGTH);
    let mut rest = bundle;
    while let Some(i) = rest.find(BEGIN_MARKER) {
        out.push_str(&rest[..i]);
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(BEGIN_MARKER);
        rest = &rest[i + BEGIN_MARKER.len()..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Presentation fields of one decoded certificate.
/// No signature, trust or expiry check is performed.
#[derive(Debug, Clone)]
pub struct ParsedCertificate {
    pub subject: String,
    pub subject_cn: Option<String>,
    pub issuer: String,
    pub issuer_cn: Option<String>,
    pub serial: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl ParsedCertificate {
    fn from_pem(index: usize, pem: Pem) -> Result<Self, ChainError> {
        if pem.label != CERTIFICATE_LABEL {
            return Err(ChainError::UnexpectedBlock {
                index,
                label: pem.label,
            });
        }

        let decode_error = |message: String| ChainError::Decode { index, message };

        let (_, cert) =
            parse_x509_certificate(&pem.contents).map_err(|e| decode_error(e.to_string()))?;
        let validity = cert.validity();
        let not_before = DateTime::from_timestamp(validity.not_before.timestamp(), 0)
            .ok_or_else(|| decode_error("notBefore out of range".to_string()))?;
        let not_after = DateTime::from_timestamp(validity.not_after.timestamp(), 0)
            .ok_or_else(|| decode_error("notAfter out of range".to_string()))?;

        Ok(ParsedCertificate {
            subject: cert.subject().to_string(),
            subject_cn: common_name(cert.subject()),
            issuer: cert.issuer().to_string(),
            issuer_cn: common_name(cert.issuer()),
            serial: cert.raw_serial_as_string(),
            not_before,
            not_after,
        })
    }
}

fn common_name(name: &X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string)
}

/// The chain returned by GetCertificate, in the fixed order the service uses:
/// `[0]` user, `[1]` root, `[2]` issuing CA.
#[derive(Debug, Clone)]
pub struct CertificateChain {
    pub user: ParsedCertificate,
    pub root: ParsedCertificate,
    pub ca: ParsedCertificate,
}

impl CertificateChain {
    /// Decode the first three PEM blocks of `bundle`. Extra blocks are ignored.
    pub fn from_pem(bundle: &str) -> Result<Self, ChainError> {
        let bundle = split_joined_blocks(bundle);
        let mut certs = Vec::with_capacity(CHAIN_LENGTH);
        for (index, pem) in pem_blocks(&bundle).take(CHAIN_LENGTH).enumerate() {
            certs.push(ParsedCertificate::from_pem(index, pem?)?);
        }

        let found = certs.len();
        let mut certs = certs.into_iter();
        match (certs.next(), certs.next(), certs.next()) {
            (Some(user), Some(root), Some(ca)) => Ok(CertificateChain { user, root, ca }),
            _ => Err(ChainError::Incomplete { found }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParsedCertificate)> {
        [("user", &self.user), ("root", &self.root), ("ca", &self.ca)].into_iter()
    }

    /// Status message naming the three subjects.
    pub fn summary(&self) -> Result<String, ChainError> {
        let user = subject_cn(&self.user, "user")?;
        let ca = subject_cn(&self.ca, "ca")?;
        let root = subject_cn(&self.root, "root")?;

        Ok(format!(
            "Certificado emitido para \"{user}\" pela Entidade de Certificação \"{ca}\" na hierarquia do \"{root}\""
        ))
    }
}

fn subject_cn<'a>(cert: &'a ParsedCertificate, role: &'static str) -> Result<&'a str, ChainError> {
    cert.subject_cn
        .as_deref()
        .ok_or(ChainError::MissingCommonName { role })
}
