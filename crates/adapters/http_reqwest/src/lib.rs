//! # pawfeed-adapter-http-reqwest
//!
//! HTTP adapter — implements the `FeederBackend` port against the feeder's
//! JSON API using `reqwest`.
//!
//! ## Endpoints
//! | Operation | Request |
//! |-----------|---------|
//! | snapshot | `GET /api/sensor_data` |
//! | feed | `POST /api/feed` `{amount}` |
//! | mode | `POST /api/mode` `{mode}` |
//! | settings | `POST /api/settings` `{default_feed_amount, min_food_level, auto_feed_enabled}` |
//! | add schedule | `POST /api/schedule` `{time, amount}` |
//! | delete schedule | `DELETE /api/schedule/{id}` |
//!
//! Commands answer `{status, message}`; anything but `status == "success"`
//! with a 2xx code is a rejection.
//!
//! ## Dependency rule
//! Depends on `pawfeed-app` (for the port trait) and `pawfeed-domain`.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::RestBackend;
pub use config::HttpConfig;
pub use error::HttpError;
