//! HTTP surface of the mock service: router, handlers, and server startup.
//!
//! Implements the remote contract consumed by the `termboard` client:
//! credential login issuing bearer tokens, bearer-validated user lookup,
//! and project/task CRUD. Error responses carry a
//! `{"success": false, "message": ...}` body.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};

use termboard_api::envelope::{Ack, Failure};
use termboard_api::project::{NewProject, ProjectPatch, ProjectsResponse};
use termboard_api::task::{NewTask, TaskPatch, TasksResponse};
use termboard_api::user::{AuthUser, Credentials, NewUser};

use crate::state::MockState;

type ApiFailure = (StatusCode, Json<Failure>);

fn failure(status: StatusCode, message: &str) -> ApiFailure {
    (status, Json(Failure::new(message)))
}

/// Extracts the bearer token from the `Authorization` header.
fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves the bearer token to a registered user, or a 401 failure.
async fn require_auth(
    state: &MockState,
    headers: &HeaderMap,
) -> Result<crate::state::UserRecord, ApiFailure> {
    let Some(token) = bearer(headers) else {
        return Err(failure(StatusCode::UNAUTHORIZED, "missing bearer token"));
    };
    state
        .user_for_token(token)
        .await
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "invalid or expired token"))
}

/// Builds the full application router over shared state.
pub fn router(state: Arc<MockState>) -> axum::Router {
    axum::Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/user/{id}", get(current_user))
        .route("/projects", post(create_project))
        .route(
            "/projects/{id}",
            get(list_projects)
                .put(update_project)
                .delete(delete_project),
        )
        .route("/tasks", post(create_task))
        .route("/tasks/{project_id}", get(list_tasks))
        .route(
            "/tasks/{project_id}/{task_id}",
            axum::routing::put(update_task).delete(delete_task),
        )
        .with_state(state)
}

// -- auth --

async fn register(
    State(state): State<Arc<MockState>>,
    Json(new_user): Json<NewUser>,
) -> Result<Json<AuthUser>, ApiFailure> {
    if new_user.email.is_empty() || new_user.password.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "email and password are required",
        ));
    }
    match state
        .register(&new_user.name, &new_user.email, &new_user.password)
        .await
    {
        Some(user) => {
            tracing::info!(user_id = %user.id, "user registered");
            Ok(Json(user))
        }
        None => Err(failure(StatusCode::CONFLICT, "email already registered")),
    }
}

async fn login(
    State(state): State<Arc<MockState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthUser>, ApiFailure> {
    match state.login(&credentials.email, &credentials.password).await {
        Some(user) => {
            tracing::info!(user_id = %user.id, "login succeeded");
            Ok(Json(user))
        }
        None => Err(failure(StatusCode::UNAUTHORIZED, "invalid credentials")),
    }
}

async fn current_user(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AuthUser>, ApiFailure> {
    let Some(token) = bearer(&headers) else {
        return Err(failure(StatusCode::UNAUTHORIZED, "missing bearer token"));
    };
    let user = state
        .user_for_token(token)
        .await
        .filter(|u| u.id == id)
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "invalid or expired token"))?;
    Ok(Json(AuthUser {
        id: user.id,
        email: user.email,
        name: user.name,
        token: token.to_string(),
    }))
}

// -- projects --

async fn list_projects(
    State(state): State<Arc<MockState>>,
    Path(user_id): Path<String>,
) -> Json<ProjectsResponse> {
    Json(ProjectsResponse {
        projects: state.projects_for(&user_id).await,
    })
}

async fn create_project(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(new_project): Json<NewProject>,
) -> Result<Json<termboard_api::project::Project>, ApiFailure> {
    let owner = require_auth(&state, &headers).await?;
    if new_project.name.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "project name is required"));
    }
    let project = state
        .create_project(&owner.id, &new_project.name, new_project.invited_users)
        .await;
    tracing::info!(project_id = %project.id, owner = %owner.id, "project created");
    Ok(Json(project))
}

async fn update_project(
    State(state): State<Arc<MockState>>,
    Path(project_id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<termboard_api::project::Project>, ApiFailure> {
    if patch.name.as_deref() == Some("") {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "project name cannot be empty",
        ));
    }
    state
        .update_project(&project_id, patch.name, patch.invited_users)
        .await
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "project not found"))
}

async fn delete_project(
    State(state): State<Arc<MockState>>,
    Path(project_id): Path<String>,
) -> Result<Json<Ack>, ApiFailure> {
    if state.delete_project(&project_id).await {
        tracing::info!(project_id = %project_id, "project deleted");
        Ok(Json(Ack::OK))
    } else {
        Err(failure(StatusCode::NOT_FOUND, "project not found"))
    }
}

// -- tasks --

async fn list_tasks(
    State(state): State<Arc<MockState>>,
    Path(project_id): Path<String>,
) -> Json<TasksResponse> {
    Json(TasksResponse {
        project_tasks: state.tasks_for(&project_id).await,
    })
}

async fn create_task(
    State(state): State<Arc<MockState>>,
    Json(new_task): Json<NewTask>,
) -> Result<Json<termboard_api::task::Task>, ApiFailure> {
    if new_task.title.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "task title is required"));
    }
    if !state.project_exists(&new_task.project_id).await {
        return Err(failure(StatusCode::NOT_FOUND, "project not found"));
    }
    let task = state.create_task(new_task).await;
    tracing::info!(task_id = %task.id, project_id = %task.project_id, "task created");
    Ok(Json(task))
}

async fn update_task(
    State(state): State<Arc<MockState>>,
    Path((project_id, task_id)): Path<(String, String)>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<termboard_api::task::Task>, ApiFailure> {
    if state.take_task_update_fault().await {
        tracing::warn!(task_id = %task_id, "injected task update failure");
        return Err(failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "injected update failure",
        ));
    }
    if patch.title.as_deref() == Some("") {
        return Err(failure(StatusCode::BAD_REQUEST, "task title cannot be empty"));
    }
    state
        .update_task(&project_id, &task_id, patch)
        .await
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "task not found"))
}

async fn delete_task(
    State(state): State<Arc<MockState>>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> Json<Ack> {
    // Deletes are idempotent: removing an absent task still acks.
    let existed = state.delete_task(&project_id, &task_id).await;
    tracing::info!(task_id = %task_id, existed, "task delete");
    Json(Ack::OK)
}

// -- startup --

/// Starts the mock server on the given address and returns the bound
/// address and a join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(MockState::new())).await
}

/// Starts the mock server with a pre-configured [`MockState`]. Tests use
/// this to seed accounts and arm fault injection before the first request.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<MockState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "mock server error");
        }
    });

    Ok((bound_addr, handle))
}
