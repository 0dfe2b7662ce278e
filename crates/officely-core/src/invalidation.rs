// ── Query invalidation ──
//
// Every mutation names the reads it makes stale. After a successful write
// the request layer hands that list to the `QueryClient`, which re-runs
// exactly those reads on whichever view owns them.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{EntityId, EntityKind};

/// A read whose result a view keeps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    /// The paginated list of a kind. For role-sensitive kinds this is the
    /// full list for reviewers and the caller's own subset for everyone else.
    List(EntityKind),
    /// Bookings the caller is invited to.
    Invitations,
}

impl Query {
    pub fn owner(self) -> QueryOwner {
        match self {
            Self::List(kind) => QueryOwner::Entity(kind),
            Self::Invitations => QueryOwner::Invitations,
        }
    }
}

/// Who answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOwner {
    Entity(EntityKind),
    Invitations,
}

/// A write issued through the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create(EntityKind),
    Update(EntityKind, EntityId),
    PartialUpdate(EntityKind, EntityId),
    Delete(EntityKind, EntityId),
}

impl Mutation {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Create(kind)
            | Self::Update(kind, _)
            | Self::PartialUpdate(kind, _)
            | Self::Delete(kind, _) => kind,
        }
    }

    /// The reads this write makes stale.
    ///
    /// The written record itself comes back in the response, so no
    /// single-record read is ever listed.
    pub fn invalidates(self) -> Vec<Query> {
        let kind = self.kind();
        let mut queries = vec![Query::List(kind)];

        if kind == EntityKind::BookingRequest {
            queries.push(Query::Invitations);
        }

        // Other lists render labels of this kind's records.
        if !matches!(self, Self::Create(_)) {
            let dependents: &[Query] = match kind {
                EntityKind::MeetingRoom => &[Query::List(EntityKind::BookingRequest)],
                EntityKind::Equipment => &[Query::List(EntityKind::MeetingRoom)],
                EntityKind::Employee => &[
                    Query::List(EntityKind::BookingRequest),
                    Query::List(EntityKind::VacationRequest),
                    Query::Invitations,
                ],
                EntityKind::VacationRequest => &[Query::List(EntityKind::Attachment)],
                EntityKind::BookingRequest | EntityKind::Attachment => &[],
            };
            for query in dependents {
                if !queries.contains(query) {
                    queries.push(*query);
                }
            }
        }

        queries
    }
}

/// A view that can re-run the queries it owns.
pub trait Refetch: Send + Sync {
    /// Re-run `query`. Returns `false` when the view had nothing loaded for
    /// it, so there was nothing to refresh.
    fn refetch<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Result<bool, CoreError>>;
}

/// Registry routing invalidated queries to their owners.
///
/// Holds weak references only: a view that has been dropped simply stops
/// being refreshed.
#[derive(Default)]
pub struct QueryClient {
    owners: DashMap<QueryOwner, Weak<dyn Refetch>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, owner: QueryOwner, handler: Weak<dyn Refetch>) {
        self.owners.insert(owner, handler);
    }

    fn handler(&self, owner: QueryOwner) -> Option<Arc<dyn Refetch>> {
        self.owners.get(&owner).and_then(|h| h.upgrade())
    }

    /// Re-run every query in `queries`, returning those that were re-run.
    ///
    /// Failures are recorded in the owning view's state; they do not stop
    /// the remaining queries.
    pub async fn invalidate(&self, queries: &[Query]) -> Vec<Query> {
        let mut rerun = Vec::new();
        for query in queries {
            let Some(handler) = self.handler(query.owner()) else {
                continue;
            };
            match handler.refetch(query).await {
                Ok(true) => {
                    debug!(?query, "re-ran invalidated query");
                    rerun.push(*query);
                }
                Ok(false) => {}
                Err(e) => warn!(?query, error = %e, "refresh after mutation failed"),
            }
        }
        rerun
    }
}
