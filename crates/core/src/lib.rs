//! `claimgate-core` — shared identity and time primitives.
//!
//! No authorization logic lives here; these are the leaf types every other
//! crate in the workspace builds on.

pub mod error;
pub mod id;
pub mod time;

pub use error::CoreError;
pub use id::UserId;
pub use time::{Clock, FixedClock, SystemClock, Timestamp, parse_timestamp};
