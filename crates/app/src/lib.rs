//! # pawfeed-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `FeederBackend` — sensor snapshot, feed, mode, settings and schedule calls
//!   - `FeederView` — where readings, mode, schedules and notices are shown
//!   - `Clock` — source of timestamps
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   - `ModeGuard` — compare-and-set token held while a mode change is in flight
//!   - `NoticeBoard` — transient notices that expire on their own
//! - Provide the **driving use-cases**:
//!   - `Controller` — reconciliation, mode switching, auto/manual feeding,
//!     settings and schedule management
//!   - `Poller` — periodic poll cycles
//!
//! ## Dependency rule
//! Depends on `pawfeed-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod mode_guard;
pub mod notices;
pub mod poller;
pub mod ports;

#[cfg(test)]
mod testing;
