// ── Per-entity state and its reducer ──
//
// `EntityState` is an immutable snapshot; `reduce` is the only way to get
// from one snapshot to the next. No I/O happens here.

use std::sync::Arc;

use officely_api::{Page, PageLinks};

/// Everything a view needs to render one entity type.
#[derive(Debug, Clone)]
pub struct EntityState<T> {
    /// A list or single-record read is in flight.
    pub loading: bool,
    /// A create/update/delete is in flight.
    pub updating: bool,
    /// The last mutation completed successfully.
    pub update_success: bool,
    pub error_message: Option<String>,
    /// Rows of the most recent list read.
    pub entities: Arc<Vec<T>>,
    /// The record most recently read or written.
    pub entity: Option<T>,
    /// Rows across all pages, as reported by the backend.
    pub total_items: u64,
    pub links: PageLinks,
    /// Sequence number of the newest list read issued.
    pub list_seq: u64,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            updating: false,
            update_success: false,
            error_message: None,
            entities: Arc::new(Vec::new()),
            entity: None,
            total_items: 0,
            links: PageLinks::default(),
            list_seq: 0,
        }
    }
}

/// Lifecycle events of the requests issued for one entity type.
#[derive(Debug, Clone)]
pub enum Action<T> {
    ListPending { seq: u64 },
    ListFulfilled { seq: u64, page: Page<T> },
    EntityPending,
    EntityFulfilled(T),
    MutationPending,
    MutationFulfilled(T),
    DeleteFulfilled,
    /// A request failed. List reads carry their sequence number so a late
    /// failure of a superseded read cannot clobber a newer one.
    Rejected { seq: Option<u64>, message: String },
    Reset,
}

/// Pure transition function over state snapshots.
pub fn reduce<T: Clone>(state: &EntityState<T>, action: Action<T>) -> EntityState<T> {
    match action {
        // `update_success` stays as the last write left it.
        Action::ListPending { seq } => EntityState {
            loading: true,
            error_message: None,
            list_seq: state.list_seq.max(seq),
            ..state.clone()
        },
        Action::ListFulfilled { seq, .. } if seq < state.list_seq => state.clone(),
        Action::ListFulfilled { page, .. } => EntityState {
            loading: false,
            entities: Arc::new(page.items),
            total_items: page.total,
            links: page.links,
            ..state.clone()
        },
        Action::EntityPending => EntityState {
            loading: true,
            update_success: false,
            error_message: None,
            ..state.clone()
        },
        Action::EntityFulfilled(entity) => EntityState {
            loading: false,
            entity: Some(entity),
            ..state.clone()
        },
        Action::MutationPending => EntityState {
            updating: true,
            update_success: false,
            error_message: None,
            ..state.clone()
        },
        Action::MutationFulfilled(entity) => EntityState {
            loading: false,
            updating: false,
            update_success: true,
            entity: Some(entity),
            ..state.clone()
        },
        Action::DeleteFulfilled => EntityState {
            updating: false,
            update_success: true,
            entity: None,
            ..state.clone()
        },
        Action::Rejected { seq: Some(seq), .. } if seq < state.list_seq => state.clone(),
        Action::Rejected { message, .. } => EntityState {
            loading: false,
            updating: false,
            update_success: false,
            error_message: Some(message),
            ..state.clone()
        },
        Action::Reset => EntityState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: Vec<u32>, total: u64) -> Page<u32> {
        Page {
            items,
            total,
            links: PageLinks::default(),
        }
    }

    #[test]
    fn list_lifecycle() {
        let state = EntityState::<u32>::default();
        let state = reduce(&state, Action::ListPending { seq: 1 });
        assert!(state.loading);

        let state = reduce(
            &state,
            Action::ListFulfilled {
                seq: 1,
                page: page(vec![1, 2, 3], 45),
            },
        );
        assert!(!state.loading);
        assert_eq!(*state.entities, vec![1, 2, 3]);
        assert_eq!(state.total_items, 45);
    }

    #[test]
    fn stale_list_response_is_dropped() {
        let state = EntityState::<u32>::default();
        let state = reduce(&state, Action::ListPending { seq: 1 });
        let state = reduce(&state, Action::ListPending { seq: 2 });

        let state = reduce(
            &state,
            Action::ListFulfilled {
                seq: 2,
                page: page(vec![20], 1),
            },
        );
        let state = reduce(
            &state,
            Action::ListFulfilled {
                seq: 1,
                page: page(vec![10], 1),
            },
        );
        assert_eq!(*state.entities, vec![20]);

        let state = reduce(
            &state,
            Action::Rejected {
                seq: Some(1),
                message: "late failure".into(),
            },
        );
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn rejection_clears_in_flight_flags() {
        let state = EntityState::<u32>::default();
        let state = reduce(&state, Action::MutationPending);
        assert!(state.updating);

        let state = reduce(
            &state,
            Action::Rejected {
                seq: None,
                message: "boom".into(),
            },
        );
        assert!(!state.updating);
        assert!(!state.loading);
        assert!(!state.update_success);
        assert_eq!(state.error_message.as_deref(), Some("boom"));

        let state = reduce(&state, Action::EntityPending);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn mutation_and_delete() {
        let state = EntityState::<u32>::default();
        let state = reduce(&state, Action::MutationPending);
        let state = reduce(&state, Action::MutationFulfilled(7));
        assert!(state.update_success);
        assert_eq!(state.entity, Some(7));

        let state = reduce(&state, Action::MutationPending);
        assert!(!state.update_success);
        let state = reduce(&state, Action::DeleteFulfilled);
        assert!(state.update_success);
        assert_eq!(state.entity, None);
    }

    #[test]
    fn refresh_after_write_keeps_success() {
        let state = EntityState::<u32>::default();
        let state = reduce(&state, Action::MutationPending);
        let state = reduce(&state, Action::MutationFulfilled(5));
        let state = reduce(&state, Action::ListPending { seq: 1 });
        assert!(state.update_success);

        let state = reduce(
            &state,
            Action::ListFulfilled {
                seq: 1,
                page: page(vec![5], 1),
            },
        );
        assert!(state.update_success);
        assert!(!state.loading);

        let state = reduce(&state, Action::EntityPending);
        assert!(!state.update_success);
    }

    #[test]
    fn previous_snapshot_is_untouched() {
        let before = EntityState::<u32>::default();
        let after = reduce(&before, Action::ListPending { seq: 3 });
        assert!(!before.loading);
        assert_eq!(before.list_seq, 0);
        assert_eq!(after.list_seq, 3);
    }
}
