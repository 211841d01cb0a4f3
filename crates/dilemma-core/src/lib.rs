//! Scenario progression state machine and end-of-run decision analysis.
//!
//! A [`Session`] walks a fixed scenario dataset one decision at a time,
//! timing each decision against an injectable [`Clock`]. Once every scenario
//! has been decided and advanced past, [`analyze`] derives the average
//! decision time, the speed and side-bias tendencies, and the ordered
//! decision history.

pub mod analyzer;
pub mod clock;
pub mod session;

pub use analyzer::{analyze, analyze_records};
pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{Session, SessionError, SessionState};
