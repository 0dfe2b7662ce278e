// Async HTTP client for the officely REST backend.
//
// Base path: /api/
// Auth: optional `Authorization: Bearer` header

use futures_core::Stream;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::pagination::{Page, PageLinks, PageRequest, Sort, TOTAL_COUNT_HEADER};
use crate::transport::TransportConfig;

/// Collection paths, relative to the backend root.
pub mod paths {
    pub const ACCOUNT: &str = "api/account";
    pub const EMPLOYEES: &str = "api/employees";
    pub const MEETING_ROOMS: &str = "api/meeting-rooms";
    pub const EQUIPMENT: &str = "api/equipment";
    pub const BOOKING_REQUESTS: &str = "api/booking-requests";
    pub const MY_BOOKING_REQUESTS: &str = "api/v1/booking-requests/my";
    pub const MY_INVITATIONS: &str = "api/v1/booking-requests/my-invitations";
    pub const VACATION_REQUESTS: &str = "api/vacation-requests";
    pub const MY_VACATION_REQUESTS: &str = "api/v1/vacation-requests/my";
    pub const ATTACHMENTS: &str = "api/attachments";
}

// ── Error response shape from the backend ────────────────────────────
//
// Custom handler: `{message, entity, errorKey}`.
// Problem JSON:   `{title, detail, entityName, errorKey}`.

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entity: Option<String>,
    #[serde(default)]
    entity_name: Option<String>,
    #[serde(default)]
    error_key: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the office resource backend.
///
/// Speaks the JSON REST collection convention (`GET ?page&size&sort`,
/// `GET /{id}`, `POST`, `PUT /{id}`, `PATCH /{id}`, `DELETE /{id}`).
/// Entity types are supplied by the caller; this crate only knows the
/// envelope.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client, injecting the bearer token (if any) as a default
    /// header on every request.
    pub fn new(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(credentials.headers()?)?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins keep any prefix
    /// the backend is mounted under.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self
            .http
            .patch(url)
            .header(reqwest::header::CONTENT_TYPE, "application/merge-patch+json")
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            decode(body)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// Validate the list envelope: array body plus `X-Total-Count`.
    async fn handle_page<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Page<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let headers = resp.headers();
        let total = match headers.get(TOTAL_COUNT_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .ok_or_else(|| Error::Envelope {
                    message: format!("unparsable {TOTAL_COUNT_HEADER} header: {value:?}"),
                })?,
            None => {
                warn!(url = %resp.url(), "list response without {TOTAL_COUNT_HEADER}");
                return Err(Error::Envelope {
                    message: format!("missing {TOTAL_COUNT_HEADER} header"),
                });
            }
        };
        let links = headers
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(PageLinks::parse)
            .unwrap_or_default();

        let body = resp.text().await?;
        if !body.trim_start().starts_with('[') {
            let preview = preview(&body);
            warn!("list response body is not a JSON array: {preview:?}");
            return Err(Error::Envelope {
                message: format!("expected a JSON array body (body preview: {preview:?})"),
            });
        }
        let items: Vec<T> = decode(body)?;

        Ok(Page {
            items,
            total,
            links,
        })
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

        let (message, error_key, entity) = match parsed {
            Some(err) => (
                err.message
                    .or(err.detail)
                    .or(err.title)
                    .unwrap_or_else(|| status.to_string()),
                err.error_key,
                err.entity.or(err.entity_name),
            ),
            None if raw.is_empty() => (status.to_string(), None, None),
            None => (raw, None, None),
        };

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication { message },
            reqwest::StatusCode::FORBIDDEN => Error::Forbidden { message },
            _ => Error::Api {
                status: status.as_u16(),
                message,
                error_key,
                entity,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Collections ──────────────────────────────────────────────────

    /// `GET {path}?page&size&sort`
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &PageRequest,
    ) -> Result<Page<T>, Error> {
        let url = self.url(path)?;
        let params = request.query_params();
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(&params).send().await?;
        self.handle_page(resp).await
    }

    /// Lazily walk every page of a collection, starting at page zero.
    pub fn pages<'a, T: DeserializeOwned + 'a>(
        &'a self,
        path: &'a str,
        size: u32,
        sort: Option<Sort>,
    ) -> impl Stream<Item = Result<Page<T>, Error>> + 'a {
        async_stream::try_stream! {
            let mut request = PageRequest::new(0, size.max(1), sort);
            let mut seen: u64 = 0;
            loop {
                let page: Page<T> = self.list(path, &request).await?;
                let received = page.items.len();
                seen += u64::try_from(received).unwrap_or(u64::MAX);
                let total = page.total;
                yield page;

                if received == 0 || seen >= total {
                    break;
                }
                request.page += 1;
            }
        }
    }

    /// `GET {path}/{id}`
    pub async fn get_one<T: DeserializeOwned>(&self, path: &str, id: i64) -> Result<T, Error> {
        self.get(&format!("{path}/{id}")).await
    }

    /// `GET {path}/count`
    pub async fn count(&self, path: &str) -> Result<u64, Error> {
        self.get(&format!("{path}/count")).await
    }

    /// `POST {path}`
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.post(path, body).await
    }

    /// `PUT {path}/{id}` with the full record.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        id: i64,
        body: &B,
    ) -> Result<T, Error> {
        self.put(&format!("{path}/{id}"), body).await
    }

    /// `PATCH {path}/{id}` with only the fields to change.
    pub async fn partial_update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        id: i64,
        body: &B,
    ) -> Result<T, Error> {
        self.patch(&format!("{path}/{id}"), body).await
    }

    /// `DELETE {path}/{id}`
    pub async fn remove(&self, path: &str, id: i64) -> Result<(), Error> {
        self.delete(&format!("{path}/{id}")).await
    }

    // ── Account ──────────────────────────────────────────────────────

    /// The authenticated account (`GET /api/account`).
    pub async fn account<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.get(paths::ACCOUNT).await
    }
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// First 200 characters of a body, for log lines and error messages.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
