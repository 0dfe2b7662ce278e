// ── Office facade ──
//
// One handle per backend: owns the HTTP client, the signed-in session, the
// query registry and one request-layer service per entity type.

use std::sync::Arc;

use chrono::FixedOffset;
use tracing::{debug, info, warn};

use officely_api::ApiClient;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::form::{EntityForm, FormContext, FormController, FormMode, RelatedLists};
use crate::invalidation::QueryClient;
use crate::invitations::InvitationsView;
use crate::list::{ListController, PaginationState};
use crate::model::{
    Account, Attachment, BookingRequest, Employee, EntityKind, Equipment, MeetingRoom,
    VacationRequest,
};
use crate::service::EntityService;
use crate::session::Session;

/// A form-backed entity type reachable through [`Office`].
pub trait Resource: EntityForm {
    fn service(office: &Office) -> &Arc<EntityService<Self>>;
}

/// Entry point for consumers. Cheap to clone.
#[derive(Clone)]
pub struct Office {
    inner: Arc<OfficeInner>,
}

struct OfficeInner {
    config: ClientConfig,
    api: Arc<ApiClient>,
    session: Arc<Session>,
    queries: Arc<QueryClient>,
    employees: Arc<EntityService<Employee>>,
    meeting_rooms: Arc<EntityService<MeetingRoom>>,
    equipment: Arc<EntityService<Equipment>>,
    booking_requests: Arc<EntityService<BookingRequest>>,
    vacation_requests: Arc<EntityService<VacationRequest>>,
    attachments: Arc<EntityService<Attachment>>,
    invitations: Arc<InvitationsView>,
}

impl Office {
    /// Build the client without contacting the backend. The session stays
    /// anonymous until [`reload_account`](Self::reload_account) runs.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let api = Arc::new(ApiClient::new(
            config.url.as_str(),
            &config.credentials(),
            &config.transport(),
        )?);
        Ok(Self::with_client(config, api))
    }

    /// Use an already built API client.
    pub fn with_client(config: ClientConfig, api: Arc<ApiClient>) -> Self {
        let session = Arc::new(Session::anonymous());
        let queries = Arc::new(QueryClient::new());
        let service = || (Arc::clone(&api), Arc::clone(&session), Arc::clone(&queries));

        let (a, s, q) = service();
        let employees = EntityService::new(a, s, q);
        let (a, s, q) = service();
        let meeting_rooms = EntityService::new(a, s, q);
        let (a, s, q) = service();
        let equipment = EntityService::new(a, s, q);
        let (a, s, q) = service();
        let booking_requests = EntityService::new(a, s, q);
        let (a, s, q) = service();
        let vacation_requests = EntityService::new(a, s, q);
        let (a, s, q) = service();
        let attachments = EntityService::new(a, s, q);
        let invitations = InvitationsView::new(Arc::clone(&api), &queries);

        Self {
            inner: Arc::new(OfficeInner {
                config,
                api,
                session,
                queries,
                employees,
                meeting_rooms,
                equipment,
                booking_requests,
                vacation_requests,
                attachments,
                invitations,
            }),
        }
    }

    /// Build the client and load the signed-in account.
    ///
    /// Without a token a 401 is expected and leaves the session anonymous;
    /// with one it is an error.
    pub async fn connect(config: ClientConfig) -> Result<Self, CoreError> {
        let anonymous = config.token.is_none();
        let office = Self::new(config)?;
        match office.reload_account().await {
            Ok(Some(account)) => {
                info!(login = %account.login, reviewer = account.is_reviewer(), "signed in");
            }
            Ok(None) => {}
            Err(CoreError::Unauthorized { .. }) if anonymous => {
                debug!("no token configured; continuing anonymously");
            }
            Err(CoreError::Api {
                status: Some(404), ..
            }) => {
                warn!("backend has no account endpoint; role-sensitive lists show own records");
            }
            Err(e) => return Err(e),
        }
        Ok(office)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    pub fn queries(&self) -> &Arc<QueryClient> {
        &self.inner.queries
    }

    /// Fetch `GET /api/account` and install it as the session.
    pub async fn reload_account(&self) -> Result<Option<Arc<Account>>, CoreError> {
        let account: Account = self.inner.api.account().await?;
        self.inner.session.set_account(Some(account));
        Ok(self.inner.session.account())
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn employees(&self) -> &Arc<EntityService<Employee>> {
        &self.inner.employees
    }

    pub fn meeting_rooms(&self) -> &Arc<EntityService<MeetingRoom>> {
        &self.inner.meeting_rooms
    }

    pub fn equipment(&self) -> &Arc<EntityService<Equipment>> {
        &self.inner.equipment
    }

    pub fn booking_requests(&self) -> &Arc<EntityService<BookingRequest>> {
        &self.inner.booking_requests
    }

    pub fn vacation_requests(&self) -> &Arc<EntityService<VacationRequest>> {
        &self.inner.vacation_requests
    }

    pub fn attachments(&self) -> &Arc<EntityService<Attachment>> {
        &self.inner.attachments
    }

    pub fn invitations(&self) -> &Arc<InvitationsView> {
        &self.inner.invitations
    }

    pub fn service<T: Resource>(&self) -> &Arc<EntityService<T>> {
        T::service(self)
    }

    /// The employee record linked to the signed-in account, matched by
    /// login. `None` when anonymous or when no employee carries the login.
    pub async fn my_employee(&self) -> Result<Option<Employee>, CoreError> {
        let Some(login) = self.inner.session.login() else {
            return Ok(None);
        };
        let employees = self.employees().fetch_all().await?;
        Ok(employees
            .into_iter()
            .find(|e| e.login() == Some(login.as_str())))
    }

    // ── Controllers ──────────────────────────────────────────────────

    /// A list controller sized by the configured page size.
    pub fn list<T: Resource>(&self) -> ListController<T> {
        ListController::new(Arc::clone(self.service::<T>()))
            .with_state(PaginationState::default().with_page_size(self.inner.config.page_size))
    }

    /// Every record of each requested kind, for selection fields.
    pub async fn related_lists(&self, kinds: &[EntityKind]) -> Result<RelatedLists, CoreError> {
        let mut related = RelatedLists::default();
        for kind in kinds {
            match kind {
                EntityKind::Employee => related.employees = self.employees().fetch_all().await?,
                EntityKind::MeetingRoom => {
                    related.meeting_rooms = self.meeting_rooms().fetch_all().await?;
                }
                EntityKind::Equipment => related.equipment = self.equipment().fetch_all().await?,
                EntityKind::VacationRequest => {
                    related.vacation_requests = self.vacation_requests().fetch_all().await?;
                }
                EntityKind::BookingRequest | EntityKind::Attachment => {}
            }
            debug!(%kind, "related list loaded");
        }
        Ok(related)
    }

    /// Mount a create/edit form: related lists first, then the record.
    pub async fn form<T: Resource>(
        &self,
        mode: FormMode,
        offset: FixedOffset,
    ) -> Result<FormController<T>, CoreError> {
        let related = self.related_lists(T::RELATED).await?;
        let ctx = FormContext::new(related, self.inner.session.account(), offset);
        FormController::mount(Arc::clone(self.service::<T>()), ctx, mode).await
    }
}

impl Resource for Employee {
    fn service(office: &Office) -> &Arc<EntityService<Self>> {
        office.employees()
    }
}

impl Resource for MeetingRoom {
    fn service(office: &Office) -> &Arc<EntityService<Self>> {
        office.meeting_rooms()
    }
}

impl Resource for Equipment {
    fn service(office: &Office) -> &Arc<EntityService<Self>> {
        office.equipment()
    }
}

impl Resource for BookingRequest {
    fn service(office: &Office) -> &Arc<EntityService<Self>> {
        office.booking_requests()
    }
}

impl Resource for VacationRequest {
    fn service(office: &Office) -> &Arc<EntityService<Self>> {
        office.vacation_requests()
    }
}

impl Resource for Attachment {
    fn service(office: &Office) -> &Arc<EntityService<Self>> {
        office.attachments()
    }
}
