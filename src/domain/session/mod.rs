//! Session lifecycle: phases, per-session bookkeeping, and the response
//! history the reconciler refits from.

mod history;
mod phase;
mod state;

pub use history::{Choice, ResponseRecord, SessionHistory};
pub use phase::{PhaseThresholds, SessionPhase};
pub use state::SessionState;
