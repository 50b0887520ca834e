use tokio::time::{Instant, timeout};

use super::result::{ProbeOutcome, StatusLevel};
use super::threshold::evaluate;
use crate::certificate::CertificateChain;
use crate::config::model::ProbeRequest;
use crate::error::{ProbeError, report};
use crate::scmd::{CertificateFetcher, FetchOutcome};

pub const TIME_SECONDS_METRIC: &str = "time_seconds";

const EMPTY_RESULT_MESSAGE: &str = "Impossible to obtain certificate";

/// Run one GetCertificate check under the hard deadline of the request.
///
/// Always yields an outcome: the deadline and any error become UNKNOWN.
pub async fn run_check<F: CertificateFetcher>(
    fetcher: &F,
    request: &ProbeRequest,
) -> ProbeOutcome {
    let deadline = request.deadline();

    match timeout(deadline, check(fetcher, request)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => error_outcome(&e),
        Err(_) => ProbeOutcome::unknown(format!(
            "Plugin timed out after {} seconds",
            deadline.as_secs()
        )),
    }
}

/// UNKNOWN outcome for an error that stopped the check, setup errors included.
pub fn error_outcome(err: &ProbeError) -> ProbeOutcome {
    log::debug!("check failed: {:?}", err);
    ProbeOutcome::unknown(format!("Error: {}", report(err)))
}

async fn check<F: CertificateFetcher>(
    fetcher: &F,
    request: &ProbeRequest,
) -> Result<ProbeOutcome, ProbeError> {
    let start = Instant::now();
    let bundle = match fetcher
        .get_certificate(&request.application_id, &request.user_id)
        .await?
    {
        FetchOutcome::Certificate(bundle) => bundle,
        FetchOutcome::Empty => {
            return Ok(ProbeOutcome::new(StatusLevel::Critical, EMPTY_RESULT_MESSAGE));
        }
    };
    let elapsed = round_seconds(start.elapsed().as_secs_f64());

    let chain = CertificateChain::from_pem(&bundle)?;
    for (role, cert) in chain.iter() {
        log::debug!(
            "{role}: subject \"{}\" issued by \"{}\" serial {} valid {} to {}",
            cert.subject,
            cert.issuer_cn.as_deref().unwrap_or(&cert.issuer),
            cert.serial,
            cert.not_before,
            cert.not_after
        );
    }

    let status = evaluate(elapsed, request.warning_seconds, request.critical_seconds);
    Ok(ProbeOutcome::new(status, chain.summary()?).with_perf_data(TIME_SECONDS_METRIC, elapsed))
}

/// Round to 5 decimal places.
fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100_000.0).round() / 100_000.0
}
