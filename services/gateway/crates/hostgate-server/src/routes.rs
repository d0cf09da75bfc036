//! HTTP surface of the gateway.
//!
//! Handlers only translate: they pull inputs out of the request, call the
//! identity store, the registry or the dispatcher, and map the outcome to a
//! status code. `ApiError` is the single place where domain errors become
//! HTTP responses.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use hostgate_common::{
    AddServerBody, CommandBody, CredentialsBody, ErrorBody, Field, InstallBody, Message,
    PullImageBody, QueryBody, Target,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::dispatch::{OperationOutput, OperationRequest};
use crate::error::{AuthError, OperationError, RegisterError, RegistryError};
use crate::state::AppState;

/// Returned when an upload request carries no `file` part at all.
pub const NO_FILE_PART: &str = "No file part in the request";

type SharedState = Arc<AppState>;

// ===================================================================
// Error mapping
// ===================================================================

/// Every non-success outcome the HTTP layer can produce.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Server not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn missing(field: Field) -> Self {
        ApiError::BadRequest(field.missing_message().to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let text = self.to_string();
        match self {
            // Lookup failures use `error`, everything else `message`.
            ApiError::NotFound => (status, Json(ErrorBody { error: text })).into_response(),
            _ => (status, Json(Message::new(text))).into_response(),
        }
    }
}

impl From<OperationError> for ApiError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::TargetNotFound(_) => ApiError::NotFound,
            OperationError::MissingField(field) => ApiError::missing(field),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::MissingField(field) => ApiError::missing(field),
            RegistryError::AddressInUse(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::MissingField(field) => ApiError::missing(field),
            RegisterError::AlreadyExists => ApiError::BadRequest(err.to_string()),
            RegisterError::Hashing(_) => {
                tracing::error!(error = %err, "registration failed");
                ApiError::Internal
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingField(field) => ApiError::missing(field),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ===================================================================
// Router
// ===================================================================

/// Build the gateway router over shared state.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/add_server", post(add_server))
        .route("/list_servers", get(list_servers))
        .route("/server_status/{server_ip}", get(server_status))
        .route("/upload/{server_ip}", post(upload))
        .route("/download/{server_ip}/{*filename}", get(download))
        .route("/list_files/{server_ip}/{*directory_path}", get(list_files))
        .route("/list_databases/{server_ip}", get(list_databases))
        .route("/list_tables/{server_ip}/{database_name}", get(list_tables))
        .route(
            "/execute_query/{server_ip}/{database_name}",
            post(execute_query),
        )
        .route("/execute_command/{server_ip}", post(execute_command))
        .route("/docker/{server_ip}/images", get(docker_images))
        .route("/docker/{server_ip}/containers", get(docker_containers))
        .route("/docker/{server_ip}/pull_image", post(docker_pull_image))
        .route(
            "/docker/{server_ip}/container_logs/{container_id}",
            get(docker_container_logs),
        )
        .route("/install_software/{server_ip}", post(install_software))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// -------------------------------------------------------------------
// Helpers
// -------------------------------------------------------------------

/// Parse a JSON body field by field.
///
/// An absent or malformed body counts as `{}`, and any member that is not a
/// string counts as absent, so one badly typed field never hides another.
fn lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    let Ok(mut members) = serde_json::from_slice::<Map<String, Value>>(body) else {
        return T::default();
    };
    members.retain(|_, value| value.is_string());
    serde_json::from_value(Value::Object(members)).unwrap_or_default()
}

fn dispatch(
    state: &AppState,
    address: &str,
    request: &OperationRequest,
) -> ApiResult<Json<OperationOutput>> {
    Ok(Json(state.dispatcher.invoke(address, request)?))
}

/// File name of the first `file` part that carries a `filename`.
///
/// A `file` part without a `filename` is a plain form value and is
/// skipped. The whole body is read, so a truncated stream is an error.
async fn file_part_name(mut multipart: Multipart) -> Result<Option<String>, MultipartError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        let name = match (field.name(), field.file_name()) {
            (Some("file"), Some(file_name)) if file.is_none() => Some(file_name.to_string()),
            _ => None,
        };
        field.bytes().await?;
        if name.is_some() {
            file = name;
        }
    }
    Ok(file)
}

// -------------------------------------------------------------------
// Service endpoints
// -------------------------------------------------------------------

async fn index() -> &'static str {
    "hostgate gateway is running"
}

/// Liveness check for container and load-balancer health checks.
async fn health() -> StatusCode {
    StatusCode::OK
}

// -------------------------------------------------------------------
// Identity
// -------------------------------------------------------------------

async fn register(
    State(state): State<SharedState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let creds: CredentialsBody = lenient(&body);
    state
        .identity
        .register(creds.username.as_deref(), creds.password.as_deref())?;
    Ok((
        StatusCode::CREATED,
        Json(Message::new("User registered successfully")),
    ))
}

async fn login(State(state): State<SharedState>, body: Bytes) -> ApiResult<Json<Message>> {
    let creds: CredentialsBody = lenient(&body);
    state
        .identity
        .verify(creds.username.as_deref(), creds.password.as_deref())?;
    Ok(Json(Message::new("Login successful")))
}

// -------------------------------------------------------------------
// Registry
// -------------------------------------------------------------------

async fn add_server(
    State(state): State<SharedState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let server: AddServerBody = lenient(&body);
    state
        .registry
        .add(server.name.as_deref(), server.ip.as_deref())?;
    Ok((
        StatusCode::CREATED,
        Json(Message::new("Server added successfully")),
    ))
}

async fn list_servers(State(state): State<SharedState>) -> Json<Vec<Target>> {
    Json(state.registry.list())
}

// -------------------------------------------------------------------
// Operations
// -------------------------------------------------------------------

async fn server_status(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
) -> ApiResult<Json<OperationOutput>> {
    dispatch(&state, &server_ip, &OperationRequest::Status)
}

async fn upload(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<OperationOutput>> {
    let (file, rejection) = match multipart {
        Ok(multipart) => match file_part_name(multipart).await {
            Ok(file) => (file, NO_FILE_PART.to_string()),
            Err(err) => (None, err.body_text()),
        },
        Err(_) => (None, NO_FILE_PART.to_string()),
    };
    let has_part = file.is_some();

    // The registry lookup still wins over a bad body.
    dispatch(&state, &server_ip, &OperationRequest::Upload { file }).map_err(|err| match err {
        ApiError::BadRequest(_) if !has_part => ApiError::BadRequest(rejection),
        other => other,
    })
}

async fn download(
    State(state): State<SharedState>,
    Path((server_ip, filename)): Path<(String, String)>,
) -> ApiResult<Json<OperationOutput>> {
    let request = OperationRequest::Download {
        filename: Some(filename),
    };
    dispatch(&state, &server_ip, &request)
}

async fn list_files(
    State(state): State<SharedState>,
    Path((server_ip, directory_path)): Path<(String, String)>,
) -> ApiResult<Json<OperationOutput>> {
    let request = OperationRequest::ListFiles {
        directory_path: Some(directory_path),
    };
    dispatch(&state, &server_ip, &request)
}

async fn list_databases(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
) -> ApiResult<Json<OperationOutput>> {
    dispatch(&state, &server_ip, &OperationRequest::ListDatabases)
}

async fn list_tables(
    State(state): State<SharedState>,
    Path((server_ip, database_name)): Path<(String, String)>,
) -> ApiResult<Json<OperationOutput>> {
    let request = OperationRequest::ListTables {
        database_name: Some(database_name),
    };
    dispatch(&state, &server_ip, &request)
}

async fn execute_query(
    State(state): State<SharedState>,
    Path((server_ip, database_name)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<OperationOutput>> {
    let QueryBody { query } = lenient(&body);
    let request = OperationRequest::ExecuteQuery {
        database_name: Some(database_name),
        query,
    };
    dispatch(&state, &server_ip, &request)
}

async fn execute_command(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
    body: Bytes,
) -> ApiResult<Json<OperationOutput>> {
    let CommandBody { command } = lenient(&body);
    dispatch(
        &state,
        &server_ip,
        &OperationRequest::ExecuteCommand { command },
    )
}

async fn docker_images(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
) -> ApiResult<Json<OperationOutput>> {
    dispatch(&state, &server_ip, &OperationRequest::DockerImages)
}

async fn docker_containers(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
) -> ApiResult<Json<OperationOutput>> {
    dispatch(&state, &server_ip, &OperationRequest::DockerContainers)
}

async fn docker_pull_image(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
    body: Bytes,
) -> ApiResult<Json<OperationOutput>> {
    let PullImageBody { image_name } = lenient(&body);
    dispatch(
        &state,
        &server_ip,
        &OperationRequest::DockerPull { image_name },
    )
}

async fn docker_container_logs(
    State(state): State<SharedState>,
    Path((server_ip, container_id)): Path<(String, String)>,
) -> ApiResult<Json<OperationOutput>> {
    let request = OperationRequest::DockerLogs {
        container_id: Some(container_id),
    };
    dispatch(&state, &server_ip, &request)
}

async fn install_software(
    State(state): State<SharedState>,
    Path(server_ip): Path<String>,
    body: Bytes,
) -> ApiResult<Json<OperationOutput>> {
    let InstallBody {
        package_name,
        version,
    } = lenient(&body);
    let request = OperationRequest::InstallSoftware {
        package_name,
        version,
    };
    dispatch(&state, &server_ip, &request)
}
