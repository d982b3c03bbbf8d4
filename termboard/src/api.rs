//! HTTP client for the remote board service.
//!
//! All task and project mutations go through [`ApiClient`]. Board code is
//! written against the [`BoardApi`] trait so unit tests can substitute an
//! in-process fake.
//!
//! Failure bodies carry `{"success": false, "message": ...}`; those are
//! surfaced as [`ApiError::Rejected`] with the message attached. A 401 is
//! split out as [`ApiError::Unauthorized`] because the session layer reacts
//! to it differently (invalidate) than to other failures (keep going).

use reqwest::StatusCode;

use termboard_api::envelope::Failure;
use termboard_api::project::{NewProject, Project, ProjectPatch, ProjectsResponse};
use termboard_api::task::{NewTask, Task, TaskPatch, TasksResponse};
use termboard_api::user::{AuthUser, Credentials, NewUser};

/// Errors from talking to the board service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, timeout, or body decoding failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the bearer token (or none was sent).
    #[error("unauthorized")]
    Unauthorized,

    /// The server rejected the request for a non-auth reason.
    #[error("request rejected ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the failure body, when present.
        message: Option<String>,
    },
}

/// The subset of the service the board reconciler depends on.
///
/// [`ApiClient`] implements it against the real service; tests implement
/// it in-process to script failures.
#[allow(async_fn_in_trait)]
pub trait BoardApi {
    /// Lists every task in a project.
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, ApiError>;

    /// Creates a task and returns it with its server-assigned id.
    async fn create_task(&self, new: NewTask) -> Result<Task, ApiError>;

    /// Applies a partial update to a task.
    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<Task, ApiError>;

    /// Deletes a task. Deleting an absent task is not an error.
    async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<(), ApiError>;
}

/// HTTP client bound to a base URL, optionally carrying a bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates an unauthenticated client. Trailing slashes on the base URL
    /// are trimmed so endpoint paths can be joined naively.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Returns a copy of this client that authenticates with `token`.
    #[must_use]
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
        }
    }

    /// The base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Maps non-2xx responses to [`ApiError`], decoding the failure body
    /// for its message where possible.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let message = response
            .json::<Failure>()
            .await
            .ok()
            .and_then(|f| f.message);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.authorize(self.http.get(self.url(path))).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn send_json<B, T>(&self, req: reqwest::RequestBuilder, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self.authorize(req).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // -- auth --

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] if the email is already taken.
    pub async fn register(&self, new_user: &NewUser) -> Result<AuthUser, ApiError> {
        self.send_json(self.http.post(self.url("/auth/register")), new_user)
            .await
    }

    /// Exchanges credentials for an authenticated user and bearer token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] if the credentials are wrong.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthUser, ApiError> {
        self.send_json(self.http.post(self.url("/auth/login")), credentials)
            .await
    }

    /// Fetches the authenticated user, validating the bearer token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] if the token is no longer valid.
    pub async fn current_user(&self, user_id: &str) -> Result<AuthUser, ApiError> {
        self.get_json(&format!("/auth/user/{user_id}")).await
    }

    // -- projects --

    /// Lists projects the user owns or is invited to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>, ApiError> {
        let response: ProjectsResponse = self.get_json(&format!("/projects/{user_id}")).await?;
        Ok(response.projects)
    }

    /// Creates a project owned by the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create_project(&self, new: &NewProject) -> Result<Project, ApiError> {
        self.send_json(self.http.post(self.url("/projects")), new)
            .await
    }

    /// Applies a partial update to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> Result<Project, ApiError> {
        self.send_json(
            self.http.put(self.url(&format!("/projects/{project_id}"))),
            patch,
        )
        .await
    }

    /// Deletes a project and all of its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        let response = self
            .authorize(self.http.delete(self.url(&format!("/projects/{project_id}"))))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl BoardApi for ApiClient {
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        let response: TasksResponse = self.get_json(&format!("/tasks/{project_id}")).await?;
        Ok(response.project_tasks)
    }

    async fn create_task(&self, new: NewTask) -> Result<Task, ApiError> {
        self.send_json(self.http.post(self.url("/tasks")), &new)
            .await
    }

    async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<Task, ApiError> {
        self.send_json(
            self.http
                .put(self.url(&format!("/tasks/{project_id}/{task_id}"))),
            &patch,
        )
        .await
    }

    async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<(), ApiError> {
        let response = self
            .authorize(
                self.http
                    .delete(self.url(&format!("/tasks/{project_id}/{task_id}"))),
            )
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
