use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

type Slots<K, V> = Mutex<HashMap<K, Arc<OnceCell<V>>>>;

/// Single-flight execution keyed by `K`.
///
/// The first caller for a key runs the fetch; callers arriving while it is in
/// flight wait for it and receive a clone of the same outcome, error included.
/// Once the fetch settles the slot is released, so the next miss fetches again.
pub struct FetchCoalescer<K, V> {
    inflight: Slots<K, V>,
}

impl<K, V> Default for FetchCoalescer<K, V> {
    fn default() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> FetchCoalescer<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let slot = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                inflight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };

        // Released on drop, so a caller cancelled at any await still clears a
        // settled slot.
        let release = Release {
            inflight: &self.inflight,
            key,
            slot,
        };

        release.slot.get_or_init(fetch).await.clone()
    }

    /// Keys with a slot currently registered.
    pub fn inflight_len(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

struct Release<'a, K, V>
where
    K: Eq + Hash,
{
    inflight: &'a Slots<K, V>,
    key: K,
    slot: Arc<OnceCell<V>>,
}

impl<K, V> Drop for Release<'_, K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        // An unsettled slot stays: remaining waiters or the next caller finish it.
        if !self.slot.initialized() {
            return;
        }
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if inflight
            .get(&self.key)
            .is_some_and(|current| Arc::ptr_eq(current, &self.slot))
        {
            inflight.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::task::JoinSet;

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_fetch() {
        let coalescer = Arc::new(FetchCoalescer::<&'static str, u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut set = JoinSet::new();
        for _ in 0..8 {
            let coalescer = coalescer.clone();
            let calls = calls.clone();
            set.spawn(async move {
                coalescer
                    .run("brands", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        7
                    })
                    .await
            });
        }

        while let Some(result) = set.join_next().await {
            assert_eq!(result.unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.inflight_len(), 0);
    }

    #[tokio::test]
    async fn settled_key_fetches_again() {
        let coalescer = FetchCoalescer::<u8, u8>::new();
        assert_eq!(coalescer.run(1, || async { 1 }).await, 1);
        assert_eq!(coalescer.run(1, || async { 2 }).await, 2);
        assert_eq!(coalescer.inflight_len(), 0);
    }

    #[tokio::test]
    async fn settled_error_is_not_replayed() {
        let coalescer = FetchCoalescer::<u8, Result<u8, String>>::new();
        assert!(coalescer.run(1, || async { Err("offline".to_string()) }).await.is_err());
        assert_eq!(coalescer.run(1, || async { Ok(2) }).await, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_caller_does_not_pin_its_slot() {
        let coalescer = FetchCoalescer::<u8, u8>::new();

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            coalescer.run(1, || async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                1
            }),
        )
        .await;
        assert!(abandoned.is_err());

        assert_eq!(coalescer.run(1, || async { 2 }).await, 2);
        assert_eq!(coalescer.inflight_len(), 0);
        assert_eq!(coalescer.run(1, || async { 3 }).await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_waiter_leaves_the_leader_in_flight() {
        let coalescer = Arc::new(FetchCoalescer::<u8, u8>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let leader = {
            let coalescer = coalescer.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                coalescer
                    .run(1, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        5
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;

        let waiter = tokio::time::timeout(
            Duration::from_millis(10),
            coalescer.run(1, || async { 9 }),
        )
        .await;
        assert!(waiter.is_err());
        assert_eq!(coalescer.inflight_len(), 1);

        assert_eq!(coalescer.run(1, || async { 9 }).await, 5);
        assert_eq!(leader.await.unwrap(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.inflight_len(), 0);
    }
}
