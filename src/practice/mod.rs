//! Practice screens built on the detection engine.

pub mod beat;
pub mod session;

pub use beat::BeatSync;
pub use session::{record_outcome, PracticeOutcome, PracticeSession};
