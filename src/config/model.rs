use std::time::Duration;

/// Extra time granted after the network timeout before the check is aborted,
/// so the HTTP client gets to report its own timeout first.
pub const DEADLINE_SLACK_SECONDS: u64 = 5;

/// The SCMD deployment to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Preprod,
    Prod,
}

impl Environment {
    pub fn from_prod_flag(prod: bool) -> Self {
        if prod {
            Environment::Prod
        } else {
            Environment::Preprod
        }
    }

    /// SOAP endpoint of the CCMovelDigitalSignature service.
    pub fn endpoint(self) -> &'static str {
        match self {
            Environment::Preprod => {
                "https://preprod.cmd.autenticacao.gov.pt/Ama.Authentication.Frontend/CCMovelDigitalSignature.svc"
            }
            Environment::Prod => {
                "https://cmd.autenticacao.gov.pt/Ama.Authentication.Frontend/CCMovelDigitalSignature.svc"
            }
        }
    }

    pub fn wsdl(self) -> String {
        format!("{}?wsdl", self.endpoint())
    }
}

/// One check invocation, built from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub application_id: Vec<u8>,
    /// Phone number, `+XXX NNNNNNNNN`.
    pub user_id: String,
    pub environment: Environment,
    pub timeout_seconds: u64,
    pub warning_seconds: u64,
    pub critical_seconds: u64,
}

impl ProbeRequest {
    /// Connect and response timeout of the HTTP client.
    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Hard limit for the whole check.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.saturating_add(DEADLINE_SLACK_SECONDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_flag() {
        assert_eq!(Environment::from_prod_flag(false), Environment::Preprod);
        assert_eq!(Environment::from_prod_flag(true), Environment::Prod);
    }

    #[test]
    fn test_wsdl() {
        assert_eq!(
            Environment::Prod.wsdl(),
            "https://cmd.autenticacao.gov.pt/Ama.Authentication.Frontend/CCMovelDigitalSignature.svc?wsdl"
        );
        assert!(Environment::Preprod.wsdl().starts_with("https://preprod.cmd."));
    }

    #[test]
    fn test_deadline_adds_slack() {
        let request = ProbeRequest {
            application_id: b"id".to_vec(),
            user_id: "+351 912345678".to_string(),
            environment: Environment::Preprod,
            timeout_seconds: 10,
            warning_seconds: 3,
            critical_seconds: 6,
        };
        assert_eq!(request.network_timeout(), Duration::from_secs(10));
        assert_eq!(request.deadline(), Duration::from_secs(15));
    }

    #[test]
    fn test_deadline_saturates() {
        let request = ProbeRequest {
            application_id: b"id".to_vec(),
            user_id: "+351 912345678".to_string(),
            environment: Environment::Prod,
            timeout_seconds: u64::MAX,
            warning_seconds: 3,
            critical_seconds: 6,
        };
        assert_eq!(request.deadline(), Duration::from_secs(u64::MAX));
    }
}
