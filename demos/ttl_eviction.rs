//! Frequency plus idle-time eviction with a manually driven clock.
//!
//! Run with: `RUST_LOG=freqlist=trace cargo run --example ttl_eviction`

use std::rc::Rc;
use std::time::Duration;

use freqlist::{FeatureNotEnabled, FrequencyList, ManualClock};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), FeatureNotEnabled> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clock = Rc::new(ManualClock::new());
    let mut sessions = FrequencyList::with_clock(Rc::clone(&clock));

    for (second, user) in [(0, "ana"), (1, "bo"), (2, "ana"), (3, "cy"), (20, "bo"), (21, "dee")] {
        clock.set(Duration::from_secs(second));
        sessions.update(user);
    }

    // Drop anyone idle for more than 15 seconds, however active they were
    let expired = sessions.remove_overall_least_recent_outside(Duration::from_secs(15))?;
    println!("expired after idling: {:?}", expired);

    // Then trim to one session by frequency
    let trimmed = sessions.remove_least_frequent(sessions.len().saturating_sub(1), None);
    println!("trimmed by frequency: {:?}", trimmed);

    let remaining: Vec<_> = sessions.overall_most_to_least_recent()?.collect();
    println!("remaining: {:?}", remaining);
    Ok(())
}
