//! Static host sharding for asset URLs.
//!
//! An asset's host is picked from a content-derived hash of its identity, so
//! the choice is stable across calls and process restarts for a fixed pool.
//! This is not a hash ring: resizing the pool may move every asset to a
//! different host.

const HASH_BOUND: f64 = 2147483647.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSharder {
    hosts: Vec<String>,
}

impl HostSharder {
    pub fn new(hosts: Vec<String>) -> Self {
        Self { hosts }
    }

    /// Host for `identity`, or `None` when the pool is empty.
    pub fn assign(&self, identity: &str) -> Option<&str> {
        if self.hosts.is_empty() {
            return None;
        }
        let index = host_index(identity, self.hosts.len());
        self.hosts.get(index).map(String::as_str)
    }
}

/// 32-bit rolling hash over UTF-16 code units (`hash * 31 + unit`, wrapping).
pub fn string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Index in `[0, host_count - 1]` for `identity`. `host_count` must be > 0.
pub fn host_index(identity: &str, host_count: usize) -> usize {
    debug_assert!(host_count > 0);
    let magnitude = i64::from(string_hash(identity)).abs() as f64;
    let position = magnitude / HASH_BOUND;
    let last = host_count.saturating_sub(1);
    // `i32::MIN` normalizes slightly above 1.0.
    ((last as f64 * position).round() as usize).min(last)
}
