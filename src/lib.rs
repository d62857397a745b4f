//! freqlist: O(1) access-frequency tracking for LFU / MFU eviction, with
//! optional overall recency order and time-window expiry.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod clock;
pub(crate) mod ds;
pub mod error;
pub mod frequency_list;
pub mod iter;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use builder::FrequencyListBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use ds::DEFAULT_BUCKET_PREALLOC;
pub use error::{FeatureNotEnabled, InvariantError};
pub use frequency_list::FrequencyList;
