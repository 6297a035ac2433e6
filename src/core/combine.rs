//! Combinable partial results
//!
//! Every partition-local aggregate in the engine implements [`Combine`]:
//! `combine` is associative and commutative, `identity()` is its neutral
//! element, and neither operand is modified. Any merge tree over any
//! partitioning of the input therefore yields the same aggregate (floating
//! point means and variances up to rounding).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

use crate::model::TimeFrame;

/// An associative, commutative merge with a neutral element
pub trait Combine: Sized {
    /// The neutral element: `x.combine(&Self::identity()) == x`
    fn identity() -> Self;

    /// Merge two independently computed partials into a new value
    fn combine(&self, other: &Self) -> Self;
}

/// Fold partials left to right on the calling thread
pub fn fold_all<T, I>(partials: I) -> T
where
    T: Combine,
    I: IntoIterator<Item = T>,
{
    partials
        .into_iter()
        .fold(T::identity(), |acc, next| acc.combine(&next))
}

/// Merge partials pairwise on the rayon pool
///
/// Merge order follows rayon's work splitting, which is fine because
/// `combine` is associative and commutative.
pub fn parallel_combine<T>(partials: Vec<T>) -> T
where
    T: Combine + Send,
{
    partials
        .into_par_iter()
        .reduce(T::identity, |a, b| a.combine(&b))
}

impl Combine for u64 {
    fn identity() -> Self {
        0
    }

    fn combine(&self, other: &Self) -> Self {
        self.saturating_add(*other)
    }
}

impl Combine for Option<TimeFrame> {
    fn identity() -> Self {
        None
    }

    fn combine(&self, other: &Self) -> Self {
        match (self, other) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (Some(a), None) | (None, Some(a)) => Some(*a),
            (None, None) => None,
        }
    }
}

impl<A: Combine, B: Combine> Combine for (A, B) {
    fn identity() -> Self {
        (A::identity(), B::identity())
    }

    fn combine(&self, other: &Self) -> Self {
        (self.0.combine(&other.0), self.1.combine(&other.1))
    }
}

/// Per-key partials; keys present on both sides have their values combined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grouped<K: Ord, V> {
    entries: BTreeMap<K, V>,
}

/// Occurrence counts per key
pub type CountMap<K> = Grouped<K, u64>;

impl<K: Ord, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> Grouped<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<K, V> {
        &self.entries
    }

    pub fn into_map(self) -> BTreeMap<K, V> {
        self.entries
    }

    /// Replace the partial for `key`
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }
}

impl<K: Ord, V: Combine> Grouped<K, V> {
    /// Partial for `key`, starting from the identity when absent
    pub fn entry_mut(&mut self, key: K) -> &mut V {
        self.entries.entry(key).or_insert_with(V::identity)
    }
}

impl<K: Ord> Grouped<K, u64> {
    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: K, n: u64) {
        let count = self.entry_mut(key);
        *count = count.saturating_add(n);
    }

    /// Count for `key`, zero when never seen
    pub fn count(&self, key: &K) -> u64 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries.values().sum()
    }
}

impl<K, V> Combine for Grouped<K, V>
where
    K: Ord + Clone,
    V: Combine + Clone,
{
    fn identity() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        let mut entries = self.entries.clone();
        for (key, value) in &other.entries {
            match entries.get_mut(key) {
                Some(existing) => *existing = existing.combine(value),
                None => {
                    entries.insert(key.clone(), value.clone());
                }
            }
        }
        Self { entries }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Grouped<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a Grouped<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn counts(pairs: &[(&str, u64)]) -> CountMap<String> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_count_map_combine_sums_shared_keys() {
        let a = counts(&[("submit", 2), ("review", 1)]);
        let b = counts(&[("submit", 3), ("approve", 4)]);

        let merged = a.combine(&b);
        assert_eq!(merged.count(&"submit".to_string()), 5);
        assert_eq!(merged.count(&"review".to_string()), 1);
        assert_eq!(merged.count(&"approve".to_string()), 4);
        assert_eq!(merged.count(&"missing".to_string()), 0);
        assert_eq!(merged.total(), 10);

        // operands untouched
        assert_eq!(a.total(), 3);
        assert_eq!(b.total(), 7);
    }

    #[test]
    fn test_count_map_identity() {
        let a = counts(&[("submit", 2)]);
        assert_eq!(a.combine(&CountMap::identity()), a);
        assert_eq!(CountMap::identity().combine(&a), a);
    }

    #[test]
    fn test_nested_grouped_combine() {
        let mut a: Grouped<String, CountMap<String>> = Grouped::new();
        a.entry_mut("Alice".into()).increment("submit".into());
        let mut b: Grouped<String, CountMap<String>> = Grouped::new();
        b.entry_mut("Alice".into()).increment("submit".into());
        b.entry_mut("Bob".into()).increment("review".into());

        let merged = a.combine(&b);
        assert_eq!(
            merged.get(&"Alice".to_string()).unwrap().count(&"submit".to_string()),
            2
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_time_frame_option_combine() {
        let early = Some(TimeFrame::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        ));
        let late = Some(TimeFrame::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap(),
        ));

        let merged = early.combine(&late).unwrap();
        assert_eq!(merged.start, early.unwrap().start);
        assert_eq!(merged.end, late.unwrap().end);
        assert_eq!(early.combine(&None), early);
        assert_eq!(None::<TimeFrame>.combine(&None), None);
    }

    #[test]
    fn test_fold_and_parallel_agree() {
        let partials: Vec<u64> = (1..=1000).collect();
        assert_eq!(fold_all(partials.clone()), 500_500);
        assert_eq!(parallel_combine(partials), 500_500);
        assert_eq!(fold_all(Vec::<u64>::new()), 0);
    }
}
