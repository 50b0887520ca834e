use std::fmt;

/// Service state as understood by Nagios-compatible schedulers.
/// The discriminant is the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusLevel {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl StatusLevel {
    pub fn exit_code(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusLevel::Ok => "OK",
            StatusLevel::Warning => "WARNING",
            StatusLevel::Critical => "CRITICAL",
            StatusLevel::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Performance data, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerfData(Vec<(String, f64)>);

impl PerfData {
    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.0.push((name.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// The result of one check run, consumed once by the reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub status: StatusLevel,
    pub message: String,
    pub lines: Vec<String>,
    pub perf_data: PerfData,
}

impl ProbeOutcome {
    pub fn new(status: StatusLevel, message: impl Into<String>) -> Self {
        ProbeOutcome {
            status,
            message: message.into(),
            lines: Vec::new(),
            perf_data: PerfData::default(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Unknown, message)
    }

    pub fn with_perf_data(mut self, name: impl Into<String>, value: f64) -> Self {
        self.perf_data.push(name, value);
        self
    }
}
