//! # pawfeed-adapter-console
//!
//! Console adapter — implements the `FeederView` port by writing plain text
//! lines, and owns the input reader so that confirmations and the command
//! loop share a single line stream.
//!
//! ## Dependency rule
//! Depends on `pawfeed-app` (for the port trait) and `pawfeed-domain`.

mod render;
mod view;

pub use view::ConsoleView;
