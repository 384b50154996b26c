//! Blob handle generation.
//!
//! Large values live outside the log and are identified by a `u64` blob
//! handle. A blob vault mints handles through a [`BlobHandleGenerator`];
//! vaults opened read-only get [`IMMUTABLE`], which refuses every request.

use crate::error::{LogError, LogResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of unique blob handles.
///
/// # Invariants
///
/// - A handle is unique within one vault and never reused while that vault
///   exists
/// - Persisting the counter across restarts is the vault's job
pub trait BlobHandleGenerator: Send + Sync {
    /// Returns the next unique handle.
    ///
    /// # Errors
    ///
    /// Returns an error if this generator cannot mint handles.
    fn next_handle(&self) -> LogResult<u64>;
}

/// Generator for read-only vaults. Every call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImmutableHandleGenerator;

/// The generator handed to read-only vaults.
///
/// A call to [`next_handle`](BlobHandleGenerator::next_handle) on it is a
/// bug in the caller.
pub const IMMUTABLE: ImmutableHandleGenerator = ImmutableHandleGenerator;

impl BlobHandleGenerator for ImmutableHandleGenerator {
    fn next_handle(&self) -> LogResult<u64> {
        Err(LogError::unsupported("next_handle on an immutable blob vault"))
    }
}

/// Hands out consecutive handles from an atomic counter.
#[derive(Debug, Default)]
pub struct SequentialHandleGenerator {
    next: AtomicU64,
}

impl SequentialHandleGenerator {
    /// Creates a generator whose first handle is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Returns the handle the next call will produce. Vaults persist this
    /// value to resume after a restart.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.next.load(Ordering::Acquire)
    }
}

impl BlobHandleGenerator for SequentialHandleGenerator {
    fn next_handle(&self) -> LogResult<u64> {
        self.next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .map_err(|_| LogError::HandlesExhausted)
    }
}

impl<T: BlobHandleGenerator + ?Sized> BlobHandleGenerator for Arc<T> {
    fn next_handle(&self) -> LogResult<u64> {
        (**self).next_handle()
    }
}

impl<T: BlobHandleGenerator + ?Sized> BlobHandleGenerator for &T {
    fn next_handle(&self) -> LogResult<u64> {
        (**self).next_handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn immutable_always_fails() {
        for _ in 0..3 {
            let result = IMMUTABLE.next_handle();
            assert!(matches!(result, Err(LogError::UnsupportedOperation { .. })));
        }
        assert_eq!(IMMUTABLE, ImmutableHandleGenerator);
    }

    #[test]
    fn immutable_behind_trait_object() {
        let generator: Arc<dyn BlobHandleGenerator> = Arc::new(IMMUTABLE);
        assert!(generator.next_handle().is_err());
        assert!(generator.next_handle().is_err());
    }

    #[test]
    fn sequential_counts_up() {
        let generator = SequentialHandleGenerator::starting_at(10);
        assert_eq!(generator.next_handle().unwrap(), 10);
        assert_eq!(generator.next_handle().unwrap(), 11);
        assert_eq!(generator.current(), 12);
    }

    #[test]
    fn sequential_exhaustion() {
        let generator = SequentialHandleGenerator::starting_at(u64::MAX - 1);
        assert_eq!(generator.next_handle().unwrap(), u64::MAX - 1);
        assert!(matches!(generator.next_handle(), Err(LogError::HandlesExhausted)));
        assert!(matches!(generator.next_handle(), Err(LogError::HandlesExhausted)));
    }

    #[test]
    fn sequential_unique_across_threads() {
        let generator = Arc::new(SequentialHandleGenerator::default());
        let handles: Vec<u64> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let generator = &generator;
                    s.spawn(move || {
                        (0..250)
                            .map(|_| generator.next_handle().unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|w| w.join().unwrap())
                .collect()
        });

        let unique: HashSet<u64> = handles.iter().copied().collect();
        assert_eq!(unique.len(), 1000);
        assert_eq!(generator.current(), 1000);
    }

    proptest! {
        #[test]
        fn sequential_strictly_increasing(first in 0u64..u64::MAX - 64, n in 1usize..64) {
            let generator = SequentialHandleGenerator::starting_at(first);
            let mut last = None;
            for _ in 0..n {
                let handle = generator.next_handle().unwrap();
                if let Some(prev) = last {
                    prop_assert!(handle > prev);
                }
                last = Some(handle);
            }
            prop_assert_eq!(generator.current(), first + n as u64);
        }
    }
}
