// ── Invitations view ──
//
// Bookings other employees invited the caller to. Read-only; kept in its
// own store so it never disturbs the booking list.

use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use futures_util::future::BoxFuture;
use tracing::debug;

use officely_api::{ApiClient, Page, PageRequest, paths};

use crate::error::CoreError;
use crate::invalidation::{Query, QueryClient, QueryOwner, Refetch};
use crate::model::BookingRequest;
use crate::store::{Action, EntityState, EntityStore};
use crate::stream::StateStream;

pub struct InvitationsView {
    api: Arc<ApiClient>,
    store: EntityStore<BookingRequest>,
    last: ArcSwapOption<PageRequest>,
}

impl InvitationsView {
    pub fn new(api: Arc<ApiClient>, queries: &QueryClient) -> Arc<Self> {
        let view = Arc::new(Self {
            api,
            store: EntityStore::new(),
            last: ArcSwapOption::empty(),
        });
        let weak: Weak<Self> = Arc::downgrade(&view);
        let handler: Weak<dyn Refetch> = weak;
        queries.register(QueryOwner::Invitations, handler);
        view
    }

    pub fn state(&self) -> Arc<EntityState<BookingRequest>> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> StateStream<BookingRequest> {
        self.store.subscribe()
    }

    pub async fn load(&self, request: &PageRequest) -> Result<Page<BookingRequest>, CoreError> {
        self.last.store(Some(Arc::new(request.clone())));
        let seq = self.store.next_list_seq();
        self.store.dispatch(Action::ListPending { seq });

        match self.api.list(paths::MY_INVITATIONS, request).await {
            Ok(page) => {
                debug!(rows = page.items.len(), total = page.total, "invitations loaded");
                self.store.dispatch(Action::ListFulfilled {
                    seq,
                    page: page.clone(),
                });
                Ok(page)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.store.dispatch(Action::Rejected {
                    seq: Some(seq),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Re-issue the last load (or the first page if nothing was loaded).
    pub async fn retry(&self) -> Result<Page<BookingRequest>, CoreError> {
        let request = self
            .last
            .load_full()
            .map(|r| (*r).clone())
            .unwrap_or_default();
        self.load(&request).await
    }
}

impl Refetch for InvitationsView {
    fn refetch<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Result<bool, CoreError>> {
        Box::pin(async move {
            if *query != Query::Invitations || self.last.load().is_none() {
                return Ok(false);
            }
            self.retry().await.map(|_| true)
        })
    }
}
