// ── Async request layer ──
//
// One `EntityService` per entity type. Each call records its lifecycle in
// the type's `EntityStore` (pending → fulfilled / rejected) and every
// successful write re-runs the reads it invalidates.

use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use chrono::Utc;
use futures_core::Stream;
use futures_util::future::BoxFuture;
use futures_util::{StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use officely_api::{ApiClient, Page, PageRequest, Sort};

use crate::error::CoreError;
use crate::form::{FieldError, ValidationErrors};
use crate::invalidation::{Mutation, Query, QueryClient, QueryOwner, Refetch};
use crate::list::ITEMS_PER_PAGE;
use crate::model::{Decision, Entity, EntityId};
use crate::session::Session;
use crate::store::{Action, EntityState, EntityStore};
use crate::stream::StateStream;
use crate::workflow::{self, Reviewable};

/// Which slice of a collection a list read returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListScope {
    #[default]
    All,
    /// The caller's own records. Kinds without an own-records endpoint
    /// fall back to the full collection.
    Own,
}

/// A list read as issued: scope plus page parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub scope: ListScope,
    pub request: PageRequest,
}

/// Create/read/update/delete contract for one entity type.
pub struct EntityService<T: Entity> {
    api: Arc<ApiClient>,
    session: Arc<Session>,
    queries: Arc<QueryClient>,
    store: EntityStore<T>,
    last_list: ArcSwapOption<ListQuery>,
}

impl<T: Entity> EntityService<T> {
    /// Build the service and register it as the owner of its list query.
    pub fn new(
        api: Arc<ApiClient>,
        session: Arc<Session>,
        queries: Arc<QueryClient>,
    ) -> Arc<Self> {
        let service = Arc::new(Self {
            api,
            session,
            queries: Arc::clone(&queries),
            store: EntityStore::new(),
            last_list: ArcSwapOption::empty(),
        });
        let weak: Weak<Self> = Arc::downgrade(&service);
        let handler: Weak<dyn Refetch> = weak;
        queries.register(QueryOwner::Entity(T::KIND), handler);
        service
    }

    // ── State access ─────────────────────────────────────────────────

    pub fn store(&self) -> &EntityStore<T> {
        &self.store
    }

    pub fn state(&self) -> Arc<EntityState<T>> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> StateStream<T> {
        self.store.subscribe()
    }

    /// The list read most recently issued, if any.
    pub fn last_list(&self) -> Option<Arc<ListQuery>> {
        self.last_list.load_full()
    }

    pub fn reset(&self) {
        self.store.dispatch(Action::Reset);
    }

    fn path(scope: ListScope) -> &'static str {
        match scope {
            ListScope::Own => T::KIND.own_path().unwrap_or(T::KIND.path()),
            ListScope::All => T::KIND.path(),
        }
    }

    fn reject(&self, err: CoreError, seq: Option<u64>) -> CoreError {
        self.store.dispatch(Action::Rejected {
            seq,
            message: err.to_string(),
        });
        err
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// `list(page, size, sort)` over the full collection.
    pub async fn list(&self, request: &PageRequest) -> Result<Page<T>, CoreError> {
        self.run_list(ListQuery {
            scope: ListScope::All,
            request: request.clone(),
        })
        .await
    }

    /// The caller's own records (`/my`).
    pub async fn list_own(&self, request: &PageRequest) -> Result<Page<T>, CoreError> {
        self.run_list(ListQuery {
            scope: ListScope::Own,
            request: request.clone(),
        })
        .await
    }

    pub async fn run_list(&self, query: ListQuery) -> Result<Page<T>, CoreError> {
        let path = Self::path(query.scope);
        let query = Arc::new(query);
        // Recorded at issue time; a superseded response never replaces it.
        self.last_list.store(Some(Arc::clone(&query)));
        let seq = self.store.next_list_seq();
        self.store.dispatch(Action::ListPending { seq });
        let result = self.api.list::<T>(path, &query.request).await;

        match result {
            Ok(page) => {
                debug!(kind = %T::KIND, rows = page.items.len(), total = page.total, "list fulfilled");
                let state = self.store.dispatch(Action::ListFulfilled {
                    seq,
                    page: page.clone(),
                });
                if state.list_seq > seq {
                    warn!(kind = %T::KIND, seq, newest = state.list_seq, "stale list response dropped");
                }
                Ok(page)
            }
            Err(e) => Err(self.reject(e.into(), Some(seq))),
        }
    }

    /// Walk every page of the full collection without touching list state.
    pub fn pages(
        &self,
        size: u32,
        sort: Option<Sort>,
    ) -> impl Stream<Item = Result<Page<T>, CoreError>> + '_ {
        self.api
            .pages::<T>(T::KIND.path(), size, sort)
            .map(|page| page.map_err(CoreError::from))
    }

    /// Every record of the collection, used to populate selection lists.
    pub async fn fetch_all(&self) -> Result<Vec<T>, CoreError> {
        let pages: Vec<Page<T>> = self
            .pages(ITEMS_PER_PAGE * 5, Some(Sort::asc("id")))
            .try_collect()
            .await?;
        Ok(pages.into_iter().flat_map(|p| p.items).collect())
    }

    pub async fn get(&self, id: EntityId) -> Result<T, CoreError> {
        self.store.dispatch(Action::EntityPending);
        match self.api.get_one::<T>(T::KIND.path(), id.get()).await {
            Ok(record) => {
                self.store.dispatch(Action::EntityFulfilled(record.clone()));
                Ok(record)
            }
            Err(e) => Err(self.reject(CoreError::from(e).with_subject(T::KIND, id), None)),
        }
    }

    pub async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.api.count(T::KIND.path()).await?)
    }

    // ── Writes ───────────────────────────────────────────────────────

    pub async fn create(&self, record: &T) -> Result<T, CoreError> {
        if record.id().is_some() {
            return Err(self.reject(
                CoreError::Validation(ValidationErrors::single(FieldError::new(
                    "id",
                    format!("a new {} cannot already have an id", T::KIND.label()),
                ))),
                None,
            ));
        }
        let mut record = record.clone();
        record.prepare_create();

        self.store.dispatch(Action::MutationPending);
        match self.api.create::<T, T>(T::KIND.path(), &record).await {
            Ok(stored) => {
                info!(kind = %T::KIND, id = ?stored.id(), "created");
                self.store.dispatch(Action::MutationFulfilled(stored.clone()));
                self.after_mutation(Mutation::Create(T::KIND)).await;
                Ok(stored)
            }
            Err(e) => Err(self.reject(e.into(), None)),
        }
    }

    /// Full-record `PUT`. Last write wins; there is no version check.
    pub async fn update(&self, record: &T) -> Result<T, CoreError> {
        let id = self.require_id(record)?;

        self.store.dispatch(Action::MutationPending);
        match self.api.update::<T, T>(T::KIND.path(), id.get(), record).await {
            Ok(stored) => {
                info!(kind = %T::KIND, %id, "updated");
                self.store.dispatch(Action::MutationFulfilled(stored.clone()));
                self.after_mutation(Mutation::Update(T::KIND, id)).await;
                Ok(stored)
            }
            Err(e) => Err(self.reject(CoreError::from(e).with_subject(T::KIND, id), None)),
        }
    }

    /// Merge-patch `PATCH` carrying only the fields in `patch`.
    pub async fn partial_update(
        &self,
        id: EntityId,
        patch: &serde_json::Value,
    ) -> Result<T, CoreError> {
        let mut body = patch.clone();
        if let Some(object) = body.as_object_mut() {
            object.insert("id".into(), serde_json::json!(id));
        }

        self.store.dispatch(Action::MutationPending);
        match self
            .api
            .partial_update::<T, _>(T::KIND.path(), id.get(), &body)
            .await
        {
            Ok(stored) => {
                info!(kind = %T::KIND, %id, "patched");
                self.store.dispatch(Action::MutationFulfilled(stored.clone()));
                self.after_mutation(Mutation::PartialUpdate(T::KIND, id))
                    .await;
                Ok(stored)
            }
            Err(e) => Err(self.reject(CoreError::from(e).with_subject(T::KIND, id), None)),
        }
    }

    /// `DELETE`. The backend decides whether referencing rows block the
    /// delete; nothing is cascaded from here.
    pub async fn remove(&self, id: EntityId) -> Result<(), CoreError> {
        self.store.dispatch(Action::MutationPending);
        match self.api.remove(T::KIND.path(), id.get()).await {
            Ok(()) => {
                info!(kind = %T::KIND, %id, "deleted");
                self.store.dispatch(Action::DeleteFulfilled);
                self.after_mutation(Mutation::Delete(T::KIND, id)).await;
                Ok(())
            }
            Err(e) => Err(self.reject(CoreError::from(e).with_subject(T::KIND, id), None)),
        }
    }

    fn require_id(&self, record: &T) -> Result<EntityId, CoreError> {
        record.id().ok_or_else(|| {
            self.reject(
                CoreError::Validation(ValidationErrors::single(FieldError::new(
                    "id",
                    "an existing record needs an id to be updated",
                ))),
                None,
            )
        })
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Re-run this kind's list, then every other query the write declared.
    async fn after_mutation(&self, mutation: Mutation) {
        if let Err(e) = self.refresh().await {
            debug!(kind = %T::KIND, error = %e, "list refresh after mutation failed");
        }
        let others: Vec<Query> = mutation
            .invalidates()
            .into_iter()
            .filter(|q| *q != Query::List(T::KIND))
            .collect();
        self.queries.invalidate(&others).await;
    }

    /// Scope a refresh re-runs: role-sensitive kinds show reviewers the
    /// whole collection and everyone else their own records.
    pub fn refresh_scope(&self, previous: ListScope) -> ListScope {
        if !T::KIND.is_role_sensitive() {
            return previous;
        }
        if self.session.is_reviewer() {
            ListScope::All
        } else {
            ListScope::Own
        }
    }

    /// Re-run the list with the last page parameters (or the first page).
    pub async fn refresh(&self) -> Result<Page<T>, CoreError> {
        let (scope, request) = match self.last_list.load_full() {
            Some(last) => (last.scope, last.request.clone()),
            None => (
                ListScope::All,
                PageRequest::new(0, ITEMS_PER_PAGE, Some(Sort::asc("id"))),
            ),
        };
        self.run_list(ListQuery {
            scope: self.refresh_scope(scope),
            request,
        })
        .await
    }
}

// ── Status workflow ──────────────────────────────────────────────────

impl<T: Reviewable> EntityService<T> {
    /// Approve or reject a pending record and submit it through `update`.
    pub async fn review(&self, record: &T, decision: Decision) -> Result<T, CoreError> {
        let next = workflow::transition(record, decision, Utc::now())?;
        self.update(&next).await
    }

    /// Load the record by id, then [`review`](Self::review) it.
    pub async fn review_by_id(&self, id: EntityId, decision: Decision) -> Result<T, CoreError> {
        let record = self.get(id).await?;
        self.review(&record, decision).await
    }
}

impl<T: Entity> Refetch for EntityService<T> {
    fn refetch<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Result<bool, CoreError>> {
        Box::pin(async move {
            match query {
                Query::List(kind) if *kind == T::KIND && self.last_list.load().is_some() => {
                    self.refresh().await.map(|_| true)
                }
                _ => Ok(false),
            }
        })
    }
}
