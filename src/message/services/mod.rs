//! Application services for message intake.

mod intake;

pub use intake::{MessageIntake, ReportEnvelope};
