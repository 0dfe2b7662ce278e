#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use officely_api::{ApiClient, Credentials, Error, PageRequest, Sort, TransportConfig, paths};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Room {
    id: Option<i64>,
    name: String,
    capacity: u32,
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn rooms(range: std::ops::Range<i64>) -> serde_json::Value {
    json!(
        range
            .map(|id| json!({ "id": id, "name": format!("Room {id}"), "capacity": 4 }))
            .collect::<Vec<_>>()
    )
}

// ── Paginated reads ─────────────────────────────────────────────────

#[tokio::test]
async fn test_list_reads_total_count() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/booking-requests"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .and(query_param("sort", "id,asc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "45")
                .set_body_json(rooms(1..21)),
        )
        .mount(&server)
        .await;

    let page = client
        .list::<Room>(
            paths::BOOKING_REQUESTS,
            &PageRequest::new(0, 20, Some(Sort::asc("id"))),
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 20);
    assert_eq!(page.total, 45);
}

#[tokio::test]
async fn test_list_parses_link_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/meeting-rooms"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "3")
                .insert_header(
                    "Link",
                    "</api/meeting-rooms?page=1&size=2>; rel=\"next\",</api/meeting-rooms?page=1&size=2>; rel=\"last\"",
                )
                .set_body_json(rooms(1..3)),
        )
        .mount(&server)
        .await;

    let page = client
        .list::<Room>(paths::MEETING_ROOMS, &PageRequest::new(0, 2, None))
        .await
        .unwrap();
    assert_eq!(page.links.next, Some(1));
    assert_eq!(page.links.last, Some(1));
}

#[tokio::test]
async fn test_list_without_total_count_is_envelope_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/booking-requests/my-invitations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rooms(1..3)))
        .mount(&server)
        .await;

    let result = client
        .list::<Room>(paths::MY_INVITATIONS, &PageRequest::default())
        .await;
    assert!(
        matches!(result, Err(Error::Envelope { .. })),
        "expected Envelope error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_with_object_body_is_envelope_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/booking-requests/my-invitations"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "2")
                .set_body_json(json!({ "content": rooms(1..3), "totalElements": 2 })),
        )
        .mount(&server)
        .await;

    let result = client
        .list::<Room>(paths::MY_INVITATIONS, &PageRequest::default())
        .await;
    assert!(
        matches!(result, Err(Error::Envelope { .. })),
        "expected Envelope error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_with_wrong_item_shape_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/meeting-rooms"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "1")
                .set_body_json(json!([{ "id": "not-a-number" }])),
        )
        .mount(&server)
        .await;

    let result = client
        .list::<Room>(paths::MEETING_ROOMS, &PageRequest::default())
        .await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn test_pages_walks_until_total() {
    let (server, client) = setup().await;

    for (page, range) in [("0", 1..3), ("1", 3..5), ("2", 5..6)] {
        Mock::given(method("GET"))
            .and(path("/api/equipment"))
            .and(query_param("page", page))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "5")
                    .set_body_json(rooms(range)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let pages: Vec<_> = client
        .pages::<Room>(paths::EQUIPMENT, 2, None)
        .collect()
        .await;
    let rows: usize = pages.iter().map(|p| p.as_ref().unwrap().items.len()).sum();

    assert_eq!(pages.len(), 3);
    assert_eq!(rows, 5);
}

// ── Single-record operations ────────────────────────────────────────

#[tokio::test]
async fn test_get_create_update_delete() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/meeting-rooms/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Board", "capacity": 12})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/meeting-rooms"))
        .and(body_json(json!({"id": null, "name": "Loft", "capacity": 6})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 8, "name": "Loft", "capacity": 6})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/meeting-rooms/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Board", "capacity": 14})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/meeting-rooms/8"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let room: Room = client.get_one(paths::MEETING_ROOMS, 7).await.unwrap();
    assert_eq!(room.capacity, 12);

    let created: Room = client
        .create(
            paths::MEETING_ROOMS,
            &Room {
                id: None,
                name: "Loft".into(),
                capacity: 6,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, Some(8));

    let updated: Room = client
        .update(paths::MEETING_ROOMS, 7, &Room { capacity: 14, ..room })
        .await
        .unwrap();
    assert_eq!(updated.capacity, 14);

    client.remove(paths::MEETING_ROOMS, 8).await.unwrap();
}

#[tokio::test]
async fn test_partial_update_uses_merge_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/equipment/3"))
        .and(header("content-type", "application/merge-patch+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "Projector", "capacity": 0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let patched: Room = client
        .partial_update(paths::EQUIPMENT, 3, &json!({"id": 3, "name": "Projector"}))
        .await
        .unwrap();
    assert_eq!(patched.name, "Projector");
}

#[tokio::test]
async fn test_count() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/employees/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(42)))
        .mount(&server)
        .await;

    assert_eq!(client.count(paths::EMPLOYEES).await.unwrap(), 42);
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_overlap_error_body_is_structured() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/booking-requests"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "The selected time is already booked. Please choose another slot.",
            "entity": "bookingRequest",
            "errorKey": "timeoverlap"
        })))
        .mount(&server)
        .await;

    let err = client
        .create::<Room, _>(paths::BOOKING_REQUESTS, &json!({}))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.api_error_key(), Some("timeoverlap"));
    match err {
        Error::Api {
            status, message, entity, ..
        } => {
            assert_eq!(status, 400);
            assert!(message.starts_with("The selected time is already booked"));
            assert_eq!(entity.as_deref(), Some("bookingRequest"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_problem_json_detail_is_used() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/meeting-rooms/1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "title": "Conflict",
            "detail": "could not execute statement; constraint violation",
            "entityName": "meetingRoom"
        })))
        .mount(&server)
        .await;

    let err = client.remove(paths::MEETING_ROOMS, 1).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("constraint violation"));
}

#[tokio::test]
async fn test_unauthorized_and_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/employees/1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access Denied"))
        .mount(&server)
        .await;

    let account = client.account::<serde_json::Value>().await;
    assert!(matches!(account, Err(Error::Authentication { .. })));

    let employee = client.get_one::<Room>(paths::EMPLOYEES, 1).await;
    match employee {
        Err(Error::Forbidden { message }) => assert_eq!(message, "Access Denied"),
        other => panic!("expected Forbidden, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_plain_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/attachments/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .get_one::<Room>(paths::ATTACHMENTS, 99)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    let credentials = Credentials::from_token(Some(SecretString::from("t0ken")));
    let client = ApiClient::new(&server.uri(), &credentials, &TransportConfig::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/account"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "alice"})))
        .expect(1)
        .mount(&server)
        .await;

    let account: serde_json::Value = client.account().await.unwrap();
    assert_eq!(account["login"], "alice");
}

#[tokio::test]
async fn test_anonymous_requests_proceed() {
    let server = MockServer::start().await;
    let client = ApiClient::new(
        &server.uri(),
        &Credentials::Anonymous,
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/meeting-rooms"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "0")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let page = client
        .list::<Room>(paths::MEETING_ROOMS, &PageRequest::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}
