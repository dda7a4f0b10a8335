use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

/// Allocation counts per class base name.
///
/// A [`Runtime`](crate::Runtime) owns one table shared by everything that
/// defines classes into its generated loader, so names minted through
/// different bridges never collide.
#[derive(Debug, Default)]
pub struct NameCounts {
    counts: DashMap<String, u32, BuildHasherDefault<FxHasher>>,
}

impl NameCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps the count for `base` and returns the new value, or `None` once
    /// the count cannot grow any further.
    pub fn increment(&self, base: &str) -> Option<u32> {
        // The shard lock is held across the increment and the read.
        let mut count = self.counts.entry(base.to_string()).or_insert(0);
        let next = count.checked_add(1)?;
        *count = next;
        Some(next)
    }

    pub fn get(&self, base: &str) -> u32 {
        self.counts.get(base).map(|count| *count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_start_at_one_and_grow() {
        let counts = NameCounts::new();
        assert_eq!(counts.get("ns.Foo"), 0);
        assert_eq!(counts.increment("ns.Foo"), Some(1));
        assert_eq!(counts.increment("ns.Foo"), Some(2));
        assert_eq!(counts.increment("ns.Bar"), Some(1));
        assert_eq!(counts.get("ns.Foo"), 2);
    }

    #[test]
    fn exhausted_count_stays_put() {
        let counts = NameCounts::new();
        counts.counts.insert("ns.Foo".to_string(), u32::MAX);
        assert_eq!(counts.increment("ns.Foo"), None);
        assert_eq!(counts.get("ns.Foo"), u32::MAX);
    }
}
