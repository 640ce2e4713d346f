pub mod error;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use error::CoreError;
pub use phase::{Phase, StandardPhase};
pub use stimulus::{Item, Stimulus};
pub use trial::{Outcome, Response, ResponseRecord, TrialDefinition, TrialRecord, TrialType};
