use std::process;

use crate::probe::prelude::*;

/// Service name shown in the plugin output.
pub const SERVICE_NAME: &str = "scmd";

/// Format the plugin output line:
/// `<STATE> - <name>: <message>[ - <lines>][|'<key>'=<value> ...]`
pub fn render(outcome: &ProbeOutcome) -> String {
    let mut output = format!("{} - {}: {}", outcome.status, SERVICE_NAME, outcome.message);

    if !outcome.lines.is_empty() {
        output.push_str(" - ");
        output.push_str(&outcome.lines.join(" "));
    }

    if !outcome.perf_data.is_empty() {
        let perf_data: Vec<String> = outcome
            .perf_data
            .iter()
            .map(|(key, value)| format!("'{}'={}", key, format_value(value)))
            .collect();
        output.push('|');
        output.push_str(&perf_data.join(" "));
    }

    output
}

/// Print the plugin output and exit with the matching status code.
pub fn print_and_exit(outcome: ProbeOutcome) -> ! {
    println!("{}", render(&outcome));
    process::exit(outcome.status.exit_code())
}

/// Floats always keep a decimal part, e.g. `2.0`.
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
