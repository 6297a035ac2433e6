//! Partitioned fold-and-merge
//!
//! The event stream is split into contiguous partitions, each partition is
//! folded into a partial on the rayon pool, and the partials are merged
//! pairwise through [`Combine`]. Partitions never share state; a partial is
//! owned by its fold until it is handed to the merge.

use super::combine::{parallel_combine, Combine};
use crate::error::{ErrorCode, ProcMinerError, Result};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace};

/// A contiguous slice of the input and its position in the whole stream
#[derive(Debug)]
pub struct Partition<'a, T> {
    pub index: usize,
    /// Stream position of `items[0]`
    pub start_index: usize,
    pub items: &'a [T],
}

impl<T> Partition<'_, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stream position one past the last item
    pub fn end_index(&self) -> usize {
        self.start_index + self.items.len()
    }
}

/// Split `items` into at most `partitions` contiguous chunks
///
/// Chunk sizes differ by at most one, earlier chunks taking the remainder.
/// Never yields an empty chunk, so an empty input yields no partitions.
pub fn distribute<T>(items: &[T], partitions: usize) -> Vec<Partition<'_, T>> {
    let total_items = items.len();
    let actual = partitions.max(1).min(total_items);
    if actual == 0 {
        return Vec::new();
    }

    let per_partition = total_items / actual;
    let remainder = total_items % actual;

    let mut distribution = Vec::with_capacity(actual);
    let mut current_start = 0;
    for index in 0..actual {
        let size = per_partition + usize::from(index < remainder);
        let end = current_start + size;
        distribution.push(Partition {
            index,
            start_index: current_start,
            items: &items[current_start..end],
        });
        current_start = end;
    }

    trace!(
        "Distributed {} items across {} partitions",
        total_items,
        distribution.len()
    );
    distribution
}

/// Fold every partition with `map`, then merge the partials
///
/// A single partition is folded on the calling thread. The first failing
/// partition aborts the whole reduction; a panicking fold is reported as an
/// execution error for its partition.
pub fn map_reduce<'a, T, R, F>(partitions: &[Partition<'a, T>], map: F) -> Result<R>
where
    T: Sync,
    R: Combine + Send,
    F: Fn(&Partition<'a, T>) -> Result<R> + Sync,
{
    match partitions {
        [] => return Ok(R::identity()),
        [only] => return guarded(only.index, || map(only)),
        _ => {}
    }

    let partials = partitions
        .par_iter()
        .map(|partition| guarded(partition.index, || map(partition)))
        .collect::<Result<Vec<R>>>()?;

    debug!("Merging {} partial results", partials.len());
    panic::catch_unwind(AssertUnwindSafe(|| parallel_combine(partials))).map_err(|_| {
        ProcMinerError::execution_with_code(
            ErrorCode::EXEC_WORKER_PANICKED,
            "merge of partial results panicked",
            None,
        )
    })
}

fn guarded<R, F>(index: usize, f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        Err(ProcMinerError::execution_with_code(
            ErrorCode::EXEC_WORKER_PANICKED,
            format!("fold of partition {} panicked", index),
            Some(index),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_evenly() {
        let items: Vec<u32> = (0..10).collect();
        let parts = distribute(&items, 3);

        let sizes: Vec<_> = parts.iter().map(Partition::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(parts[1].start_index, 4);
        assert_eq!(parts[1].end_index(), 7);
        assert_eq!(parts[2].items, &[7, 8, 9]);
    }

    #[test]
    fn test_distribute_more_partitions_than_items() {
        let items = [1, 2];
        let parts = distribute(&items, 8);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.len() == 1));
    }

    #[test]
    fn test_distribute_empty_and_zero() {
        let empty: [u8; 0] = [];
        assert!(distribute(&empty, 4).is_empty());

        let items = [1, 2, 3];
        let parts = distribute(&items, 0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].len(), 3);
    }

    #[test]
    fn test_map_reduce_sums_partitions() {
        let items: Vec<u64> = (1..=100).collect();
        for n in [1, 2, 7, 100] {
            let parts = distribute(&items, n);
            let total = map_reduce(&parts, |p| Ok(p.items.iter().sum::<u64>())).unwrap();
            assert_eq!(total, 5_050);
        }
    }

    #[test]
    fn test_map_reduce_of_nothing_is_identity() {
        let parts: Vec<Partition<'_, u64>> = Vec::new();
        let total: u64 = map_reduce(&parts, |_| Ok(1)).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_map_reduce_propagates_errors() {
        let items: Vec<u64> = (0..8).collect();
        let parts = distribute(&items, 4);
        let err = map_reduce(&parts, |p| {
            if p.index == 2 {
                Err(ProcMinerError::other("bad partition"))
            } else {
                Ok(1u64)
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("bad partition"));
    }

    #[test]
    fn test_map_reduce_reports_panics() {
        let items: Vec<u64> = (0..8).collect();
        let parts = distribute(&items, 4);
        let err = map_reduce::<_, u64, _>(&parts, |p| {
            if p.index == 1 {
                panic!("boom");
            }
            Ok(1)
        })
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::EXEC_WORKER_PANICKED);
    }
}
