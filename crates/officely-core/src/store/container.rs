// ── Per-entity state container ──
//
// Holds the current `EntityState` snapshot behind a `watch` channel.
// Views get their own container handle injected and subscribe to it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::state::{Action, EntityState, reduce};
use crate::stream::StateStream;

/// Reactive holder of one entity type's state.
///
/// Every [`dispatch`](Self::dispatch) runs the reducer against the current
/// snapshot and publishes the result to all subscribers.
pub struct EntityStore<T: Clone + Send + Sync + 'static> {
    state: watch::Sender<Arc<EntityState<T>>>,
    seq: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> EntityStore<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(EntityState::default()));
        Self {
            state,
            seq: AtomicU64::new(0),
        }
    }

    /// Apply an action and return the resulting snapshot.
    pub fn dispatch(&self, action: Action<T>) -> Arc<EntityState<T>> {
        let mut next = None;
        self.state.send_modify(|current| {
            let reduced = Arc::new(reduce(current, action));
            next = Some(Arc::clone(&reduced));
            *current = reduced;
        });
        next.unwrap_or_else(|| self.snapshot())
    }

    /// The current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<EntityState<T>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<T> {
        StateStream::new(self.state.subscribe())
    }

    /// Allocate the sequence number for a new list read.
    pub(crate) fn next_list_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use officely_api::{Page, PageLinks};

    use super::*;

    #[tokio::test]
    async fn subscribers_see_dispatched_snapshots() {
        let store = EntityStore::<u32>::new();
        let mut stream = store.subscribe();
        assert!(!stream.current().loading);

        let seq = store.next_list_seq();
        store.dispatch(Action::ListPending { seq });
        let snap = stream.changed().await;
        assert!(snap.is_some_and(|s| s.loading));

        store.dispatch(Action::ListFulfilled {
            seq,
            page: Page {
                items: vec![4, 5],
                total: 2,
                links: PageLinks::default(),
            },
        });
        assert_eq!(*stream.latest().entities, vec![4, 5]);
    }

    #[test]
    fn sequence_numbers_increase() {
        let store = EntityStore::<u32>::new();
        let a = store.next_list_seq();
        let b = store.next_list_seq();
        assert!(b > a);
    }
}
