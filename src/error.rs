use std::fmt::Write;

use thiserror::Error;

use crate::certificate::ChainError;
use crate::config::ConfigError;
use crate::scmd::ScmdError;

/// Any failure that ends a check run before a status could be computed.
/// All variants are reported as UNKNOWN.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scmd(#[from] ScmdError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Flatten an error and its sources into a single line.
/// Plugin output must never span multiple lines, so causes are joined with `: `.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let cause = src.to_string();
        // some causes are already embedded in the outer message
        if !s.ends_with(&cause) {
            let _ = write!(s, ": {}", cause);
        }
        err = src;
    }
    s.replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Outer(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Inner;

    #[derive(Debug, Error)]
    #[error("bad\nthing")]
    struct Multiline;

    #[test]
    fn test_report_joins_sources() {
        let err = Outer(Inner);
        assert_eq!(report(&err), "error sending request: connection refused");
    }

    #[test]
    fn test_report_through_transparent_variant() {
        let err = ProbeError::from(ScmdError::Fault("Invalid user".to_string()));
        assert_eq!(report(&err), "SOAP fault: Invalid user");
    }

    #[test]
    fn test_report_is_single_line() {
        assert_eq!(report(&Multiline), "bad thing");
    }
}
