use config::app_config::{endpoint_override, load_config, setup_client, setup_logging};
use config::cli::Cli;
use config::model::ProbeRequest;
use error::ProbeError;
use probe::prelude::*;
use scmd::ScmdClient;

pub mod certificate;
pub mod config;
pub mod error;
pub mod output;
pub mod probe;
pub mod scmd;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse_args();
    setup_logging(cli.verbose);

    let outcome = match build_client(&cli, endpoint_override().as_deref()) {
        Ok((client, request)) => run_check(&client, &request).await,
        Err(e) => error_outcome(&e),
    };

    output::print_and_exit(outcome)
}

fn build_client(
    cli: &Cli,
    endpoint_override: Option<&str>,
) -> Result<(ScmdClient, ProbeRequest), ProbeError> {
    let app_config = load_config(cli, endpoint_override)?;
    log::debug!(
        "{:?} service, WSDL {}",
        app_config.request.environment,
        app_config.request.environment.wsdl()
    );

    let http_client = setup_client(app_config.request.network_timeout())?;
    let client = ScmdClient::new(http_client, app_config.endpoint);
    log::debug!("GetCertificate via {}", client.endpoint());

    Ok((client, app_config.request))
}
