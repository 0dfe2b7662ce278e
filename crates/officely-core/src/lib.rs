//! Domain layer between `officely-api` and the command line.
//!
//! - **[`Office`]**: Facade for one backend: builds the HTTP client, loads
//!   the signed-in [`Account`] into the [`Session`] and hands out one
//!   [`EntityService`] per record type.
//!
//! - **[`EntityService<T>`]**: The request layer. `list` / `get` / `create`
//!   / `update` / `partial_update` / `remove` record their lifecycle in the
//!   type's [`EntityStore`] and re-run the reads each write invalidates
//!   (see [`invalidation`]).
//!
//! - **[`EntityStore<T>`]**: Immutable [`EntityState`] snapshots behind a
//!   `tokio::sync::watch` channel, advanced only by the pure [`reduce`]
//!   function. Subscribers get a [`StateStream`].
//!
//! - **[`ListController<T>`]** / **[`FormController<T>`]**: Pagination and
//!   sort state for list views; text form values to typed records and back.
//!
//! - **[`workflow`]**: Approve / reject for pending booking and vacation
//!   requests.

pub mod config;
pub mod error;
pub mod form;
pub mod invalidation;
pub mod invitations;
pub mod list;
pub mod model;
pub mod office;
pub mod service;
pub mod session;
pub mod store;
pub mod stream;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use error::CoreError;
pub use form::{
    EntityForm, FieldError, FieldKind, FieldSpec, FormContext, FormController, FormMode,
    FormValues, RelatedLists, SelectOption, Submitted, ValidationErrors,
};
pub use invalidation::{Mutation, Query, QueryClient};
pub use invitations::InvitationsView;
pub use list::{ITEMS_PER_PAGE, ListController, PaginationState, total_pages};
pub use office::{Office, Resource};
pub use service::{EntityService, ListQuery, ListScope};
pub use session::Session;
pub use store::{Action, EntityState, EntityStore, reduce};
pub use stream::StateStream;
pub use workflow::{Reviewable, available_actions, transition};

pub use officely_api::{Direction, Page, PageLinks, PageRequest, Sort};

pub use model::{
    Account, Attachment, Authority, BookingRequest, Decision, DepartmentType, Employee, Entity,
    EntityId, EntityKind, Equipment, MeetingRoom, RequestStatus, UserRef, VacationRequest,
    VacationType,
};
