//! Per-ticker execution serialization.
//!
//! Two concurrent signals for the same symbol would race on position reads
//! and could both try to open or close. Each executor owns one lock map per
//! account, so at most one execution is in flight per (account, ticker).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lazily grown map of per-symbol async locks.
#[derive(Debug, Default)]
pub struct SymbolLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SymbolLocks {
    /// Create an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a symbol, waiting behind any in-flight
    /// execution for the same symbol. The guard releases on drop.
    ///
    /// Entries for symbols with no holder or waiter are evicted on the
    /// way in, so the map tracks only in-flight symbols.
    pub async fn acquire(&self, symbol: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            // A guard or a waiting task holds a second Arc reference.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(symbol.to_uppercase())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_symbol_executions_serialize() {
        let locks = Arc::new(SymbolLocks::new());
        let in_flight = Arc::new(AtomicU32::new(0));
        let max_in_flight = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let in_flight = Arc::clone(&in_flight);
            let max_in_flight = Arc::clone(&max_in_flight);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("AAPL").await;
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(1)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_symbols_do_not_block_each_other() {
        let locks = SymbolLocks::new();
        let _aapl = locks.acquire("AAPL").await;
        // Would deadlock if symbols shared a lock.
        let _msft = locks.acquire("MSFT").await;
    }

    #[tokio::test]
    async fn idle_symbol_entries_are_evicted() {
        let locks = SymbolLocks::new();
        {
            let _aapl = locks.acquire("AAPL").await;
            let _msft = locks.acquire("MSFT").await;
        }
        // Both guards dropped; the next acquire sweeps the idle entries.
        let _tsla = locks.acquire("TSLA").await;
        assert_eq!(locks.inner.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn held_symbol_entries_survive_eviction() {
        let locks = Arc::new(SymbolLocks::new());
        let guard = locks.acquire("AAPL").await;
        let _msft = locks.acquire("MSFT").await;
        assert_eq!(locks.inner.lock().await.len(), 2);

        // AAPL is still held, so contenders must queue behind it.
        let locks2 = Arc::clone(&locks);
        let contended = tokio::spawn(async move {
            let _guard = locks2.acquire("AAPL").await;
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!contended.is_finished());

        drop(guard);
        contended.await.unwrap();
    }

    #[tokio::test]
    async fn symbol_lookup_is_case_insensitive() {
        let locks = Arc::new(SymbolLocks::new());
        let guard = locks.acquire("aapl").await;

        let locks2 = Arc::clone(&locks);
        let contended = tokio::spawn(async move {
            let _guard = locks2.acquire("AAPL").await;
        });
        // Give the spawned task a chance to run; it must still be waiting.
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!contended.is_finished());

        drop(guard);
        contended.await.unwrap();
    }
}
