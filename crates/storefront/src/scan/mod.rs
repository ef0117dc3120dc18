//! Body-scan capture flow.
//!
//! The capture runs client-side (the browser owns the camera); the
//! server tracks each account's capture as a state machine driven by
//! client-reported stream events plus a server-side countdown clock,
//! and writes the scan record when the window completes.

mod machine;
mod service;

pub use machine::{COUNTDOWN_TICKS, ScanEvent, ScanMachine, ScanPhase, StreamGuard, TickOutcome};
pub use service::{PgScanSink, ScanService, ScanSink, ScanStatus};
