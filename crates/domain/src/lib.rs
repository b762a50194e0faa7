//! # pawfeed-domain
//!
//! Pure domain model for the pawfeed feeder controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define the **feeding mode** (manual / auto) and its display
//! - Define **sensor snapshots** as reported by the feeder backend
//! - Define **schedules** and **settings** (backend-owned, cached client-side)
//! - Define the **controller state** and the **feed policy** (cooldowns, delays)
//! - Contain the auto-feed decision and the manual-feed preconditions
//! - Format readings for presentation (readout, food gauge, notices)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod feeding;
pub mod mode;
pub mod notice;
pub mod readout;
pub mod schedule;
pub mod settings;
pub mod snapshot;
pub mod state;
