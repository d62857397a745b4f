#![no_main]

use freqlist::FrequencyList;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on a frequency-only FrequencyList
//
// Tests random sequences of update, remove, bulk removal with skip, pops,
// traversal and clear, checking every structural invariant after each step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let mut list: FrequencyList<u32> = FrequencyList::new();

    let mut idx = 0;
    while idx + 2 < data.len() {
        let op = data[idx] % 9;
        let key = u32::from(data[idx + 1]);
        let arg = usize::from(data[idx + 2] % 16);

        match op {
            0 | 1 => {
                list.update(key);
            },
            2 => {
                list.remove(&key);
            },
            3 => {
                let removed = list.remove_least_frequent(arg, Some(&key));
                assert!(!removed.contains(&key));
            },
            4 => {
                let before = list.len();
                let removed = list.remove_most_frequent(arg, None);
                assert_eq!(removed.len(), arg.min(before));
            },
            5 => {
                let peeked = list.peek_least_frequent().copied();
                assert_eq!(list.pop_least_frequent(), peeked);
            },
            6 => {
                let forward: Vec<u32> = list.least_to_most_frequent().copied().collect();
                let mut backward: Vec<u32> = list.most_to_least_frequent().copied().collect();
                backward.reverse();
                assert_eq!(forward, backward);
            },
            7 => {
                assert!(list.remove_overall_least_recent(arg).is_err());
            },
            8 => {
                if arg == 0 {
                    list.clear();
                }
            },
            _ => unreachable!(),
        }

        if let Err(err) = list.check_invariants() {
            panic!("invariant violated after op {}: {}", op, err);
        }
        idx += 3;
    }
});
