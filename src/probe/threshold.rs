use super::result::StatusLevel;

/// Classify a response time. A threshold is only breached when strictly exceeded.
pub fn evaluate(elapsed_seconds: f64, warning_seconds: u64, critical_seconds: u64) -> StatusLevel {
    if elapsed_seconds > critical_seconds as f64 {
        StatusLevel::Critical
    } else if elapsed_seconds > warning_seconds as f64 {
        StatusLevel::Warning
    } else {
        StatusLevel::Ok
    }
}
