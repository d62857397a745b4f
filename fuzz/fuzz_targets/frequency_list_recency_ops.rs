#![no_main]

use std::time::Duration;

use freqlist::{Clock, FrequencyList, ManualClock};
use libfuzzer_sys::fuzz_target;

// Fuzz recency-enabled FrequencyList with a fuzzer-driven clock
//
// Every byte triple advances time, then applies one operation. Windowed
// removals are checked against the cutoff they were given.
fuzz_target!(|data: &[u8]| {
    let clock = ManualClock::new();
    let mut list = FrequencyList::with_clock(&clock);

    for chunk in data.chunks_exact(3) {
        let op = chunk[0] % 7;
        let key = chunk[1] % 64;
        let arg = u64::from(chunk[2]);
        clock.advance(Duration::from_millis(arg % 8));

        match op {
            0 | 1 => {
                list.update(key);
                assert_eq!(list.overall_most_to_least_recent().unwrap().next(), Some(&key));
            },
            2 => {
                list.remove(&key);
            },
            3 => {
                list.remove_overall_least_recent(arg as usize % 8).unwrap();
            },
            4 => {
                list.remove_overall_most_recent(arg as usize % 8).unwrap();
            },
            5 => {
                let window = Duration::from_millis(arg);
                let cutoff = clock.earlier(window);
                list.remove_overall_least_recent_outside(window).unwrap();
                for value in list.overall_least_to_most_recent().unwrap() {
                    assert!(list.last_touched(value).unwrap().unwrap() >= cutoff);
                }
            },
            6 => {
                let window = Duration::from_millis(arg);
                let cutoff = clock.earlier(window);
                list.remove_overall_most_recent_within(window).unwrap();
                for value in list.overall_least_to_most_recent().unwrap() {
                    assert!(list.last_touched(value).unwrap().unwrap() < cutoff);
                }
            },
            _ => unreachable!(),
        }

        if let Err(err) = list.check_invariants() {
            panic!("invariant violated after op {}: {}", op, err);
        }
    }
});
