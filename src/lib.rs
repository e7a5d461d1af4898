//! Gold news bias: derives a directional gold call from scheduled USD
//! macro releases.
//!
//! Pipeline: fetch weekly calendar markup → [`calendar::parse`] (USD,
//! High/Medium only) → [`bias::analyze`] in pre- or post-release mode →
//! [`format`] → [`notify`]. The engine itself is a pure synchronous
//! function; only the feed fetch and webhook delivery are async.

pub mod bias;
pub mod calendar;
pub mod config;
pub mod feed;
pub mod format;
pub mod knowledge;
pub mod logging;
pub mod notify;
pub mod numeric;
