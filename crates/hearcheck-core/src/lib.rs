//! hearcheck-core: round scheduling, grading, and statistics.
//!
//! This crate defines the tone catalog, the round state machine, and the
//! capability traits (tone player, round observer) that the rest of
//! hearcheck builds on. It never touches an audio device itself.

pub mod catalog;
pub mod error;
pub mod grader;
pub mod report;
pub mod scheduler;
pub mod sequence;
pub mod session;
pub mod stats;
pub mod traits;

pub use catalog::{Catalog, Tone};
pub use error::{CatalogError, PlayerError, SessionError};
pub use grader::{KeyDebouncer, Signal, Verdict};
pub use report::RoundReport;
pub use scheduler::{Phase, PlaybackState, RoundScheduler, Timing};
pub use sequence::{build_plan, RoundMode, RoundPlan};
pub use session::{spawn_session, SessionHandle, SessionStatus};
pub use stats::RoundStats;
pub use traits::{NoopObserver, RoundObserver, TonePlayer};
