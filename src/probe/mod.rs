pub mod probe;
pub mod result;
pub mod threshold;

pub mod prelude {
    pub use super::probe::{error_outcome, run_check};
    pub use super::result::{PerfData, ProbeOutcome, StatusLevel};
    pub use super::threshold::evaluate;
}
