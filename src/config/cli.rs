use std::ffi::OsString;

use clap::Parser;

use super::model::{Environment, ProbeRequest};

/// Single-dash long options accepted for compatibility with existing
/// Nagios/Icinga command definitions.
const SINGLE_DASH_LONG: [(&str, &str); 2] = [
    ("-prod", "--prod"),
    ("-applicationId", "--applicationId"),
];

#[derive(Debug, Parser)]
#[command(name = "check_scmd")]
#[command(
    version = concat!("v", env!("CARGO_PKG_VERSION")),
    about = "check_scmd Command Line Program (for Preprod/Prod Signature CMD (SOAP) version 1.6 technical specification)"
)]
pub struct Cli {
    #[arg(short, long, help = "show debug information")]
    pub verbose: bool,

    #[arg(short, long, help = "user phone number (+XXX NNNNNNNNN)")]
    pub user: String,

    #[arg(short = 'a', long = "applicationId", help = "CMD ApplicationId")]
    pub application_id: String,

    #[arg(
        long,
        help = "Use production SCMD service (preproduction SCMD service used by default)"
    )]
    pub prod: bool,

    #[arg(
        short,
        long,
        default_value_t = 3,
        help = "Warning threshold (time to service response) in seconds"
    )]
    pub warning: u64,

    #[arg(
        short,
        long,
        default_value_t = 6,
        help = "Critical threshold (time to service response) in seconds"
    )]
    pub critical: u64,

    #[arg(
        short,
        long,
        default_value_t = 20,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout in seconds"
    )]
    pub timeout: u64,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn probe_request(&self) -> ProbeRequest {
        ProbeRequest {
            application_id: self.application_id.as_bytes().to_vec(),
            user_id: self.user.clone(),
            environment: Environment::from_prod_flag(self.prod),
            timeout_seconds: self.timeout,
            warning_seconds: self.warning,
            critical_seconds: self.critical,
        }
    }
}

/// Rewrite `-prod` and `-applicationId` to their double-dash form.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            SINGLE_DASH_LONG
                .iter()
                .find(|(single, _)| arg.to_str() == Some(*single))
                .map(|(_, double)| OsString::from(*double))
                .unwrap_or(arg)
        })
        .collect()
}
