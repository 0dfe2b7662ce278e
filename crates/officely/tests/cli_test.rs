//! Integration tests for the `officely` CLI binary.
//!
//! Argument parsing, help, completions and config handling run without a
//! backend; record commands run against a wiremock server. Every command
//! gets its own config file in a temp dir so tests never touch the user's
//! real configuration.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `officely` binary with env isolation.
fn officely_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("officely");
    cmd.env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("OFFICELY_CONFIG", dir.join("config.toml"))
        .env_remove("OFFICELY_PROFILE")
        .env_remove("OFFICELY_SERVER")
        .env_remove("OFFICELY_TOKEN")
        .env_remove("OFFICELY_OUTPUT")
        .env_remove("OFFICELY_INSECURE")
        .env_remove("OFFICELY_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// A command already pointed at `server`, with colors off.
fn against(dir: &Path, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = officely_cmd(dir);
    cmd.args(["--server", &server.uri(), "--no-color"]);
    cmd
}

fn page(body: serde_json::Value, total: u64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-Total-Count", total.to_string().as_str())
        .set_body_json(body)
}

fn booking_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "startTime": "2025-05-02T07:00:00Z",
        "endTime": "2025-05-02T08:00:00Z",
        "status": status,
        "purpose": "Planning",
        "invitedUsers": [],
        "employee": { "id": 3, "name": "Carol", "email": "carol@example.com" },
        "meetingRoom": { "id": 10, "name": "Aurora", "requiresApproval": false, "equipment": [] }
    })
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = officely_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_entities() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("bookings")
            .and(predicate::str::contains("vacations"))
            .and(predicate::str::contains("rooms"))
            .and(predicate::str::contains("whoami")),
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("officely"));
}

#[test]
fn test_completions_zsh() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .arg("foobar")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("foobar"));
}

#[test]
fn test_bad_set_syntax_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .args(["rooms", "create", "--set", "capacity"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FIELD=VALUE"));
}

#[test]
fn test_list_without_backend_config() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .args(["bookings", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No backend configured"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_set_show_masks_token() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .args(["config", "set", "server", "http://office.test"])
        .assert()
        .success();
    officely_cmd(dir.path())
        .args(["config", "set", "token", "s3cret"])
        .assert()
        .success();

    officely_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("server = \"http://office.test\"")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("s3cret").not()),
        );

    officely_cmd(dir.path())
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn test_config_profiles_and_use() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .args(["config", "set", "profiles.work.server", "http://work.test"])
        .assert()
        .success();
    officely_cmd(dir.path())
        .args(["config", "use", "work"])
        .assert()
        .success();
    officely_cmd(dir.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("work *"));

    officely_cmd(dir.path())
        .args(["config", "use", "home"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("home"));
}

#[test]
fn test_unknown_config_key() {
    let dir = tempfile::tempdir().unwrap();
    officely_cmd(dir.path())
        .args(["config", "set", "defaults.colour", "never"])
        .assert()
        .code(2);
}

// ── Records against a backend ───────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_bookings_list_table_shows_actions_and_pages() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let rows: Vec<_> = (1..=19)
        .map(|id| booking_json(id, "PENDING"))
        .chain([booking_json(20, "APPROVED")])
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/booking-requests"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .and(query_param("sort", "id,asc"))
        .respond_with(page(json!(rows), 45))
        .expect(1)
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["bookings", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ACTIONS")
                .and(predicate::str::contains("approve/reject"))
                .and(predicate::str::contains("APPROVED"))
                .and(predicate::str::contains("Aurora")),
        )
        .stderr(predicate::str::contains("Page 1 of 3, 45 total (next: --page 2)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_sort_and_page_flags() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meeting-rooms"))
        .and(query_param("page", "1"))
        .and(query_param("size", "5"))
        .and(query_param("sort", "name,desc"))
        .respond_with(page(
            json!([{ "id": 10, "name": "Aurora", "capacity": 8, "requiresApproval": false, "equipment": [] }]),
            6,
        ))
        .expect(1)
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["rooms", "list", "--page", "2", "--size", "5", "--sort", "name,desc", "-o", "plain"])
        .assert()
        .success()
        .stdout("10\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_my_vacations_use_own_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vacation-requests/my"))
        .respond_with(page(
            json!([{ "id": 4, "startDate": "2025-03-03", "endDate": "2025-03-07", "type": "ANNUAL", "status": "PENDING" }]),
            1,
        ))
        .expect(1)
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["vacations", "mine", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"startDate\": \"2025-03-03\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_record_exits_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/booking-requests/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["bookings", "get", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("booking request '99' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_needs_confirmation_without_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["rooms", "delete", "10"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_deleting_referenced_room_is_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/meeting-rooms/10"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Meeting room is still booked",
            "entity": "meetingRoom",
            "errorKey": "roominuse"
        })))
        .expect(1)
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["rooms", "delete", "10", "--yes"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("still booked"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_approving_decided_booking_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/booking-requests/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(booking_json(7, "APPROVED")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["bookings", "approve", "7"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Only PENDING requests"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_approve_pending_vacation() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let pending = json!({ "id": 4, "startDate": "2025-03-03", "endDate": "2025-03-07", "type": "SICK", "status": "PENDING" });
    Mock::given(method("GET"))
        .and(path("/api/vacation-requests/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/vacation-requests/4"))
        .and(body_partial_json(json!({ "id": 4, "status": "APPROVED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "startDate": "2025-03-03", "endDate": "2025-03-07", "type": "SICK", "status": "APPROVED"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vacation-requests"))
        .respond_with(page(json!([]), 0))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vacation-requests/my"))
        .respond_with(page(json!([]), 0))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["vacations", "approve", "4"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Vacation request 4 approved"))
        .stdout(predicate::str::contains("APPROVED"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_room_from_set_values() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/equipment"))
        .respond_with(page(
            json!([{ "id": 1, "name": "Projector", "isAvailable": true }]),
            1,
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/meeting-rooms"))
        .and(body_partial_json(json!({
            "name": "Borealis",
            "capacity": 6,
            "requiresApproval": true,
            "equipment": [{ "id": 1 }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12, "name": "Borealis", "capacity": 6, "requiresApproval": true,
            "equipment": [{ "id": 1, "name": "Projector" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/meeting-rooms"))
        .respond_with(page(json!([]), 0))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args([
            "rooms",
            "create",
            "--set",
            "name=Borealis",
            "--set",
            "capacity=6",
            "--set",
            "requiresApproval=yes",
            "--set",
            "equipment=1",
            "-o",
            "plain",
        ])
        .assert()
        .success()
        .stdout("12\n")
        .stderr(predicate::str::contains("Meeting room 12 created"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_values_are_usage_errors() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/equipment"))
        .respond_with(page(json!([]), 0))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["rooms", "create", "--set", "capacity=lots"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("officely rooms fields"));

    against(dir.path(), &server)
        .args(["rooms", "create", "--set", "colour=red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("colour"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_whoami_with_token() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/account"))
        .and(wiremock::matchers::header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "alice",
            "firstName": "Alice",
            "lastName": "Doe",
            "activated": true,
            "authorities": ["ROLE_USER", "ROLE_HR"]
        })))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["whoami", "--token", "t0ken"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("alice")
                .and(predicate::str::contains("Alice Doe"))
                .and(predicate::str::contains("Reviewer  yes")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_anonymous_whoami_names_profile() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["whoami", "--profile", "lab"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("set-token --profile lab"));
}

fn signed_in_as_alice() -> Mock {
    Mock::given(method("GET"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "alice",
            "activated": true,
            "authorities": ["ROLE_USER"]
        })))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_employees_me_shows_vacation_balance() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    signed_in_as_alice().mount(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(page(
            json!([
                { "id": 1, "name": "Bob Smith", "email": "bob@example.com",
                  "vacationBalance": 3, "user": { "id": 20, "login": "bob" } },
                { "id": 2, "name": "Alice Doe", "email": "alice@example.com",
                  "vacationBalance": 14, "user": { "id": 10, "login": "alice" } }
            ]),
            2,
        ))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["employees", "me", "--token", "t0ken"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Alice Doe")
                .and(predicate::str::contains("Vacation days  14"))
                .and(predicate::str::contains("Bob").not()),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_employees_me_without_linked_record() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    signed_in_as_alice().mount(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(page(json!([]), 0))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["employees", "me", "--token", "t0ken"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("'alice' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_is_auth_error() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "title": "Unauthorized" })))
        .mount(&server)
        .await;

    against(dir.path(), &server)
        .args(["bookings", "list", "--token", "expired"])
        .assert()
        .code(3);
}
