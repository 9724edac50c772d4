#[path = "common/mod.rs"]
mod common;

use common::HelpdeskTest;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Offline commands
// ============================================================================

#[test]
fn test_transitions_table() {
    let helpdesk = HelpdeskTest::new();

    let output = helpdesk.run_success(&["transitions"]);
    assert!(output.contains("DEVELOPER"));
    assert!(output.contains("start_work"));
    assert!(output.contains("reject"));
}

#[test]
fn test_transitions_for_role_json() {
    let helpdesk = HelpdeskTest::new();

    let output = helpdesk.run_success(&["transitions", "--role", "client", "--json"]);
    let entries: Value = serde_json::from_str(&output).unwrap();
    let entries = entries.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["role"] == "CLIENT"));
    assert!(
        entries
            .iter()
            .any(|e| e["to"] == "REJECTED" && e["operation"] == "reject")
    );
}

#[test]
fn test_transitions_rejects_unknown_role() {
    let helpdesk = HelpdeskTest::new();

    let stderr = helpdesk.run_failure(&["transitions", "--role", "owner"]);
    assert!(stderr.contains("Invalid role"));
}

#[test]
fn test_config_set_and_get() {
    let helpdesk = HelpdeskTest::new();

    helpdesk.run_success(&["config", "set", "api.url", "https://desk.example.com/api"]);
    helpdesk.run_success(&["config", "set", "auth.role", "developer"]);
    helpdesk.run_success(&["config", "set", "auth.token", "abcdef123456"]);

    let url = helpdesk.run_success(&["config", "get", "api.url"]);
    assert_eq!(url.trim(), "https://desk.example.com/api");

    let role = helpdesk.run_success(&["config", "get", "auth.role"]);
    assert_eq!(role.trim(), "DEVELOPER");

    let token = helpdesk.run_success(&["config", "get", "auth.token"]);
    assert_eq!(token.trim(), "ab...56");

    let stored = helpdesk.read_config().unwrap();
    assert!(stored.contains("desk.example.com"));
}

#[test]
fn test_config_show_json_hides_token() {
    let helpdesk = HelpdeskTest::new();
    helpdesk.write_config("auth:\n  token: supersecret\n  role: CLIENT\n");

    let output = helpdesk.run_success(&["config", "show", "--json"]);
    assert!(!output.contains("supersecret"));

    let shown: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(shown["auth"]["token_configured"], true);
    assert_eq!(shown["auth"]["role"], "CLIENT");
    assert_eq!(shown["board"]["refresh_after_transition"], true);
}

#[test]
fn test_config_rejects_bad_input() {
    let helpdesk = HelpdeskTest::new();

    let stderr = helpdesk.run_failure(&["config", "set", "api_url", "https://x"]);
    assert!(stderr.contains("api.url"));

    let stderr = helpdesk.run_failure(&["config", "set", "auth.role", "owner"]);
    assert!(stderr.contains("invalid role"));

    let stderr = helpdesk.run_failure(&["config", "set", "api.timeout", "0"]);
    assert!(stderr.contains("positive number of seconds"));

    let stderr = helpdesk.run_failure(&["config", "get", "nope.key"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_board_without_api_url() {
    let helpdesk = HelpdeskTest::new();

    let stderr = helpdesk.run_failure(&["board"]);
    assert!(stderr.contains("API URL not configured"));
}

#[test]
fn test_move_without_role() {
    let helpdesk = HelpdeskTest::new().with_env("HELPDESK_API_URL", "http://127.0.0.1:9/");

    let stderr = helpdesk.run_failure(&["move", "1", "opened"]);
    assert!(stderr.contains("not authenticated"));
}

#[test]
fn test_move_rejects_unknown_status() {
    let helpdesk = HelpdeskTest::new();

    let stderr = helpdesk.run_failure(&["move", "1", "done"]);
    assert!(stderr.contains("Invalid status"));
}

// ============================================================================
// Against a mock Ticket API
// ============================================================================

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "status": "NEW", "title": "Printer on fire" },
            { "id": 2, "status": "OPENED", "title": "Cannot log in" },
            { "id": 3, "status": "RESOLVED", "title": "Email bounces" },
        ])))
        .mount(&server)
        .await;
    server
}

fn against(server: &MockServer, role: &str) -> HelpdeskTest {
    HelpdeskTest::new()
        .with_env("HELPDESK_API_URL", &server.uri())
        .with_env("HELPDESK_ROLE", role)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_board_renders_columns() {
    let server = mock_api().await;
    let helpdesk = against(&server, "developer");

    let output = helpdesk.run_success(&["board"]);
    assert!(output.contains("New (1)"));
    assert!(output.contains("In Progress (0)"));
    assert!(output.contains("Printer on fire"));

    let json_output = helpdesk.run_success(&["board", "--json"]);
    let board: Value = serde_json::from_str(&json_output).unwrap();
    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 6);
    assert_eq!(columns[0]["status"], "NEW");
    assert_eq!(columns[5]["status"], "REJECTED");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ls_filters_by_status() {
    let server = mock_api().await;
    let helpdesk = against(&server, "client");

    let output = helpdesk.run_success(&["ls", "--status", "resolved", "--json"]);
    let tickets: Value = serde_json::from_str(&output).unwrap();
    let tickets = tickets.as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["id"], 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_move_start_work() {
    let server = mock_api().await;
    Mock::given(method("POST"))
        .and(path("/tickets/2/start_work/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let helpdesk = against(&server, "developer");
    helpdesk.write_config("board:\n  refresh_after_transition: false\n");

    let output = helpdesk.run_success(&["move", "2", "in_progress", "--json"]);
    let result: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(result["outcome"], "confirmed");
    assert_eq!(result["status"], "IN_PROGRESS");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_move_forbidden_makes_no_call() {
    let server = mock_api().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let helpdesk = against(&server, "client");

    let stderr = helpdesk.run_failure(&["move", "1", "opened"]);
    assert!(stderr.contains("do not have permission"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_move_reject_needs_reason() {
    let server = mock_api().await;
    Mock::given(method("POST"))
        .and(path("/tickets/3/reject/"))
        .and(body_json(json!({ "reason": "Still bouncing" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let helpdesk = against(&server, "client");

    let stderr = helpdesk.run_failure(&["move", "3", "rejected"]);
    assert!(stderr.contains("--reason"));

    helpdesk.run_success(&["move", "3", "rejected", "--reason", "Still bouncing"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_move_failure_exits_with_server_message() {
    let server = mock_api().await;
    Mock::given(method("POST"))
        .and(path("/tickets/1/open_ticket/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Ticket is archived" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let helpdesk = against(&server, "admin");

    let stderr = helpdesk.run_failure(&["move", "1", "opened"]);
    assert!(stderr.contains("Ticket is archived"));
}
