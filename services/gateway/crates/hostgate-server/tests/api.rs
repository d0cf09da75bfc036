//! End-to-end tests of the HTTP API, driven through the router in-process.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use hostgate_common::GatewayConfig;
use hostgate_server::{AppState, router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADDR: &str = "10.0.0.1";
const UNKNOWN: &str = "10.9.9.9";

fn app() -> Router {
    app_with(&GatewayConfig::default())
}

fn app_with(config: &GatewayConfig) -> Router {
    router(Arc::new(AppState::new(config)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn app_with_server() -> Router {
    let app = app();
    let (status, _) = post_json(&app, "/add_server", json!({"name": "web-1", "ip": ADDR})).await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

const BOUNDARY: &str = "hostgate-test-boundary";

fn multipart_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn multipart_upload(uri: &str, part_name: &str, file_name: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{part_name}\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         hello\r\n\
         --{BOUNDARY}--\r\n"
    );
    multipart_request(uri, body)
}

// --- Service endpoints ---

#[tokio::test]
async fn health_and_index_respond() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// --- Identity ---

#[tokio::test]
async fn register_then_login() {
    let app = app();
    let creds = json!({"username": "alice", "password": "s3cret"});

    let (status, body) = post_json(&app, "/register", creds.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = post_json(&app, "/login", creds).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app();
    let creds = json!({"username": "alice", "password": "s3cret"});
    post_json(&app, "/register", creds.clone()).await;

    let (status, body) = post_json(
        &app,
        "/register",
        json!({"username": "alice", "password": "other"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    let (status, _) = post_json(&app, "/login", creds).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_requires_both_fields() {
    let app = app();
    let (status, body) = post_json(&app, "/register", json!({"username": "alice"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and password are required");
}

#[tokio::test]
async fn login_failures_look_identical() {
    let app = app();
    post_json(
        &app,
        "/register",
        json!({"username": "alice", "password": "s3cret"}),
    )
    .await;

    let unknown = post_json(
        &app,
        "/login",
        json!({"username": "mallory", "password": "s3cret"}),
    )
    .await;
    let wrong = post_json(
        &app,
        "/login",
        json!({"username": "alice", "password": "guess"}),
    )
    .await;

    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
    assert_eq!(unknown.1["message"], "Invalid username or password");
}

#[tokio::test]
async fn malformed_body_is_treated_as_empty() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and password are required");
}

// --- Registry ---

#[tokio::test]
async fn add_and_list_servers_in_order() {
    let app = app();
    post_json(&app, "/add_server", json!({"name": "b", "ip": "10.0.0.2"})).await;
    post_json(&app, "/add_server", json!({"name": "a", "ip": "10.0.0.1"})).await;

    let (status, body) = get(&app, "/list_servers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"name": "b", "ip": "10.0.0.2"},
            {"name": "a", "ip": "10.0.0.1"},
        ])
    );
}

#[tokio::test]
async fn add_server_requires_name_and_ip() {
    let app = app();
    let (status, body) = post_json(&app, "/add_server", json!({"name": "web-1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Server name and IP are required");

    let (_, body) = get(&app, "/list_servers").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn duplicate_addresses_accepted_by_default() {
    let app = app_with_server().await;
    let (status, _) = post_json(&app, "/add_server", json!({"name": "web-2", "ip": ADDR})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get(&app, "/list_servers").await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unique_policy_returns_conflict() {
    let config = GatewayConfig {
        unique_addresses: true,
        ..GatewayConfig::default()
    };
    let app = app_with(&config);
    post_json(&app, "/add_server", json!({"name": "web-1", "ip": ADDR})).await;
    let (status, _) = post_json(&app, "/add_server", json!({"name": "web-2", "ip": ADDR})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// --- Operations: not found ---

#[tokio::test]
async fn unknown_server_is_404_on_every_route() {
    let app = app_with_server().await;

    for uri in [
        format!("/server_status/{UNKNOWN}"),
        format!("/download/{UNKNOWN}/a.txt"),
        format!("/list_files/{UNKNOWN}/var/log"),
        format!("/list_databases/{UNKNOWN}"),
        format!("/list_tables/{UNKNOWN}/app"),
        format!("/docker/{UNKNOWN}/images"),
        format!("/docker/{UNKNOWN}/containers"),
        format!("/docker/{UNKNOWN}/container_logs/c1a2b3c4d5e6"),
    ] {
        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({"error": "Server not found"}), "{uri}");
    }

    // Missing fields do not mask the lookup failure.
    for uri in [
        format!("/execute_query/{UNKNOWN}/app"),
        format!("/execute_command/{UNKNOWN}"),
        format!("/docker/{UNKNOWN}/pull_image"),
        format!("/install_software/{UNKNOWN}"),
    ] {
        let (status, _) = post_json(&app, &uri, json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = send(
        &app,
        multipart_upload(&format!("/upload/{UNKNOWN}"), "other", "a.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- Operations: payloads ---

#[tokio::test]
async fn server_status_reports_fixed_usage() {
    let app = app_with_server().await;
    let (status, body) = get(&app, &format!("/server_status/{ADDR}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ip": ADDR,
            "cpu_usage": "15%",
            "memory_usage": "45%",
            "disk_usage": "60%",
        })
    );
}

#[tokio::test]
async fn upload_reports_file_name() {
    let app = app_with_server().await;
    let (status, body) = send(
        &app,
        multipart_upload(&format!("/upload/{ADDR}"), "file", "notes.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("File 'notes.txt' successfully uploaded to {ADDR} (simulated)")
    );
}

#[tokio::test]
async fn upload_without_file_part_is_rejected() {
    let app = app_with_server().await;
    let (status, body) = send(
        &app,
        multipart_upload(&format!("/upload/{ADDR}"), "attachment", "notes.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file part in the request");
}

#[tokio::test]
async fn upload_with_empty_file_name_is_rejected() {
    let app = app_with_server().await;
    let (status, body) = send(&app, multipart_upload(&format!("/upload/{ADDR}"), "file", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No selected file");
}

#[tokio::test]
async fn plain_form_value_named_file_is_not_a_file_part() {
    let app = app_with_server().await;
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"\r\n\
         \r\n\
         just text\r\n\
         --{BOUNDARY}--\r\n"
    );
    let (status, body) = send(&app, multipart_request(&format!("/upload/{ADDR}"), body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file part in the request");
}

#[tokio::test]
async fn file_part_after_form_value_is_found() {
    let app = app_with_server().await;
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"\r\n\
         \r\n\
         just text\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"real.txt\"\r\n\
         \r\n\
         hello\r\n\
         --{BOUNDARY}--\r\n"
    );
    let (status, body) = send(&app, multipart_request(&format!("/upload/{ADDR}"), body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("File 'real.txt' successfully uploaded to {ADDR} (simulated)")
    );
}

#[tokio::test]
async fn truncated_multipart_body_is_rejected() {
    let app = app_with_server().await;
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
         \r\n\
         hello, and then the stream just stops"
    );
    let (status, _) = send(&app, multipart_request(&format!("/upload/{ADDR}"), body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let truncated = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
         \r\n\
         hello"
    );
    let (status, body) = send(
        &app,
        multipart_request(&format!("/upload/{UNKNOWN}"), truncated),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Server not found"}));
}

#[tokio::test]
async fn download_accepts_nested_paths() {
    let app = app_with_server().await;
    let (status, body) = get(&app, &format!("/download/{ADDR}/logs/app.log")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("File 'logs/app.log' successfully downloaded from {ADDR} (simulated)")
    );
}

#[tokio::test]
async fn list_files_echoes_path() {
    let app = app_with_server().await;
    let (status, body) = get(&app, &format!("/list_files/{ADDR}/var/log")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "var/log");
    assert_eq!(body["files"][0], json!({"name": "file1.txt", "type": "file", "size": "1KB"}));
    assert_eq!(body["directories"][1], json!({"name": "another_dir", "type": "directory"}));
}

#[tokio::test]
async fn database_listings() {
    let app = app_with_server().await;
    let (status, body) = get(&app, &format!("/list_databases/{ADDR}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server_ip"], ADDR);
    assert_eq!(body["databases"].as_array().unwrap().len(), 2);
    assert_eq!(body["databases"][1]["type"], "PostgreSQL");

    let (status, body) = get(&app, &format!("/list_tables/{ADDR}/shop")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database_name"], "shop");
    assert_eq!(
        body["tables"],
        json!(["users", "products", "orders", "inventory_items"])
    );
}

#[tokio::test]
async fn select_query_returns_rows() {
    let app = app_with_server().await;
    let (status, body) = post_json(
        &app,
        &format!("/execute_query/{ADDR}/shop"),
        json!({"query": "SELECT * FROM users"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["id", "name", "email"]));
    assert_eq!(
        body["rows"],
        json!([
            [1, "Alice Wonderland", "alice@example.com"],
            [2, "Bob The Builder", "bob@example.com"],
        ])
    );
    assert!(body.get("rows_affected").is_none());
}

#[tokio::test]
async fn write_query_returns_rows_affected() {
    let app = app_with_server().await;
    let (status, body) = post_json(
        &app,
        &format!("/execute_query/{ADDR}/shop"),
        json!({"query": "DELETE FROM users"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows_affected"], 3);
    assert!(body.get("columns").is_none());
    assert!(body.get("rows").is_none());
    assert_eq!(body["message"], "Query executed successfully (simulated).");
}

#[tokio::test]
async fn query_is_required() {
    let app = app_with_server().await;
    let (status, body) = post_json(&app, &format!("/execute_query/{ADDR}/shop"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Query is required");
}

#[tokio::test]
async fn execute_command_known_and_unknown() {
    let app = app_with_server().await;
    let uri = format!("/execute_command/{ADDR}");

    let (status, body) = post_json(&app, &uri, json!({"command": "whoami"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "mock_user");
    assert_eq!(body["exit_code"], 0);

    let (status, body) = post_json(&app, &uri, json!({"command": "foo bar"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "");
    assert_eq!(body["error"], "command not found: foo");
    assert_eq!(body["exit_code"], 127);

    let (status, body) = post_json(&app, &uri, json!({"command": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Command is required");
}

#[tokio::test]
async fn docker_routes() {
    let app = app_with_server().await;

    let (status, body) = get(&app, &format!("/docker/{ADDR}/images")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"][0]["repository"], "ubuntu");

    let (status, body) = get(&app, &format!("/docker/{ADDR}/containers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["containers"][2]["name"], "my_redis");

    let (status, body) = get(&app, &format!("/docker/{ADDR}/container_logs/abc123")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["container_id"], "abc123");

    let uri = format!("/docker/{ADDR}/pull_image");
    let (status, body) = post_json(&app, &uri, json!({"image_name": "nginx:stable"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Image 'nginx:stable' is being pulled on {ADDR} (simulated).")
    );

    let (status, body) = post_json(&app, &uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Image name is required");
}

#[tokio::test]
async fn install_software_defaults_to_latest() {
    let app = app_with_server().await;
    let uri = format!("/install_software/{ADDR}");

    let (status, body) = post_json(&app, &uri, json!({"package_name": "nginx"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "latest");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["task_id"], "mock_task_123");

    let (_, body) = post_json(
        &app,
        &uri,
        json!({"package_name": "nginx", "version": "1.25.3"}),
    )
    .await;
    assert_eq!(body["version"], "1.25.3");

    let (status, body) = post_json(&app, &uri, json!({"version": "1.0"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Package name is required");
}

#[tokio::test]
async fn badly_typed_version_keeps_package_name() {
    let app = app_with_server().await;
    let (status, body) = post_json(
        &app,
        &format!("/install_software/{ADDR}"),
        json!({"package_name": "nginx", "version": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["package_name"], "nginx");
    assert_eq!(body["version"], "latest");
}

#[tokio::test]
async fn badly_typed_username_reports_missing_credentials() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/register",
        json!({"username": 42, "password": "s3cret"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and password are required");
}
