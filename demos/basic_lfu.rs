//! A tiny bounded LFU cache built on `FrequencyList`.
//!
//! Run with: `cargo run --example basic_lfu`

use std::collections::HashMap;
use std::hash::Hash;

use freqlist::FrequencyList;

struct LfuCache<K: Eq + Hash + Clone, V> {
    capacity: usize,
    values: HashMap<K, V>,
    order: FrequencyList<K>,
}

impl<K: Eq + Hash + Clone, V> LfuCache<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: HashMap::with_capacity(capacity),
            order: FrequencyList::with_capacity(capacity),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if self.values.contains_key(key) {
            self.order.update(key.clone());
        }
        self.values.get(key)
    }

    fn insert(&mut self, key: K, value: V) {
        self.order.update(key.clone());
        self.values.insert(key.clone(), value);
        if self.values.len() > self.capacity {
            // Never evict the entry that was just written
            let overflow = self.values.len() - self.capacity;
            for evicted in self.order.remove_least_frequent(overflow, Some(&key)) {
                self.values.remove(&evicted);
            }
        }
    }
}

fn main() {
    let mut cache = LfuCache::new(3);
    cache.insert("home", "<h1>home</h1>");
    cache.insert("docs", "<h1>docs</h1>");
    cache.insert("blog", "<h1>blog</h1>");

    for _ in 0..3 {
        cache.get(&"home");
    }
    cache.get(&"docs");

    // "blog" has the lowest count and goes first
    cache.insert("about", "<h1>about</h1>");
    assert!(cache.get(&"blog").is_none());

    println!("hottest to coldest:");
    for key in cache.order.most_to_least_frequent() {
        println!("  {:<6} x{}", key, cache.order.frequency(key).unwrap_or(0));
    }
}
