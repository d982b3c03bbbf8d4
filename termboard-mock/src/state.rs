//! Shared mock server state: users, sessions, projects, tasks, and fault
//! injection hooks.
//!
//! Everything lives behind `tokio::sync::RwLock`ed maps. Ids and bearer
//! tokens are UUID v7 strings, opaque to clients.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use termboard_api::project::Project;
use termboard_api::task::Task;
use termboard_api::user::AuthUser;

/// A registered account.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Server-assigned user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email, unique.
    pub email: String,
    /// Plaintext password. A mock never leaves the developer's machine.
    pub password: String,
}

/// A project plus the user who created it (the contract scopes project
/// listing by user, so the mock must remember ownership).
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    /// The project as served to clients.
    pub project: Project,
    /// User id of the creator.
    pub owner: String,
}

/// Fault injection knobs, settable by tests via [`MockState`].
#[derive(Debug, Default)]
struct Faults {
    /// Number of upcoming task updates that should fail with a 500.
    fail_task_updates: u32,
    /// Artificial latency for `GET /tasks/{projectId}`, per project.
    task_list_delay: HashMap<String, Duration>,
}

/// In-memory service state shared across handlers.
#[derive(Debug, Default)]
pub struct MockState {
    users: RwLock<HashMap<String, UserRecord>>,
    /// Bearer token -> user id.
    tokens: RwLock<HashMap<String, String>>,
    projects: RwLock<HashMap<String, ProjectRecord>>,
    tasks: RwLock<HashMap<String, Task>>,
    faults: Mutex<Faults>,
}

fn fresh_id() -> String {
    Uuid::now_v7().to_string()
}

impl MockState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- accounts and sessions --

    /// Registers an account directly, bypassing the HTTP surface. Returns
    /// the new user logged in with a fresh token. Test setup convenience.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str) -> AuthUser {
        let record = UserRecord {
            id: fresh_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.users
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        let token = self.issue_token(&record.id).await;
        AuthUser {
            id: record.id,
            email: record.email,
            name: record.name,
            token,
        }
    }

    /// Registers an account, failing if the email is already taken.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Option<AuthUser> {
        {
            let users = self.users.read().await;
            if users.values().any(|u| u.email == email) {
                return None;
            }
        }
        Some(self.seed_user(name, email, password).await)
    }

    /// Checks credentials and issues a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Option<AuthUser> {
        let record = {
            let users = self.users.read().await;
            users
                .values()
                .find(|u| u.email == email && u.password == password)
                .cloned()
        }?;
        let token = self.issue_token(&record.id).await;
        Some(AuthUser {
            id: record.id,
            email: record.email,
            name: record.name,
            token,
        })
    }

    async fn issue_token(&self, user_id: &str) -> String {
        let token = fresh_id();
        self.tokens
            .write()
            .await
            .insert(token.clone(), user_id.to_string());
        token
    }

    /// Resolves a bearer token to the user it was issued for.
    pub async fn user_for_token(&self, token: &str) -> Option<UserRecord> {
        let user_id = self.tokens.read().await.get(token).cloned()?;
        self.users.read().await.get(&user_id).cloned()
    }

    /// Revokes every token issued for a user, simulating server-side
    /// session expiry.
    pub async fn revoke_tokens(&self, user_id: &str) {
        self.tokens.write().await.retain(|_, uid| uid != user_id);
    }

    // -- projects --

    /// Lists projects the user owns or is invited to.
    pub async fn projects_for(&self, user_id: &str) -> Vec<Project> {
        let projects = self.projects.read().await;
        let mut found: Vec<Project> = projects
            .values()
            .filter(|r| r.owner == user_id || r.project.invited_users.iter().any(|u| u == user_id))
            .map(|r| r.project.clone())
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Creates a project owned by `owner`.
    pub async fn create_project(
        &self,
        owner: &str,
        name: &str,
        invited_users: Vec<String>,
    ) -> Project {
        let project = Project {
            id: fresh_id(),
            name: name.to_string(),
            description: None,
            invited_users,
        };
        self.projects.write().await.insert(
            project.id.clone(),
            ProjectRecord {
                project: project.clone(),
                owner: owner.to_string(),
            },
        );
        project
    }

    /// Applies a partial update to a project.
    pub async fn update_project(
        &self,
        project_id: &str,
        name: Option<String>,
        invited_users: Option<Vec<String>>,
    ) -> Option<Project> {
        let mut projects = self.projects.write().await;
        let record = projects.get_mut(project_id)?;
        if let Some(name) = name {
            record.project.name = name;
        }
        if let Some(invited) = invited_users {
            record.project.invited_users = invited;
        }
        Some(record.project.clone())
    }

    /// Deletes a project and every task it owns.
    pub async fn delete_project(&self, project_id: &str) -> bool {
        let existed = self.projects.write().await.remove(project_id).is_some();
        self.tasks
            .write()
            .await
            .retain(|_, t| t.project_id != project_id);
        existed
    }

    /// Whether a project exists.
    pub async fn project_exists(&self, project_id: &str) -> bool {
        self.projects.read().await.contains_key(project_id)
    }

    // -- tasks --

    /// Lists all tasks in a project, applying any injected delay first.
    pub async fn tasks_for(&self, project_id: &str) -> Vec<Task> {
        let delay = {
            let faults = self.faults.lock().await;
            faults.task_list_delay.get(project_id).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let tasks = self.tasks.read().await;
        let mut found: Vec<Task> = tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Creates a task from a full field set.
    pub async fn create_task(&self, new: termboard_api::task::NewTask) -> Task {
        let task = Task {
            id: fresh_id(),
            title: new.title,
            description: new.description,
            priority: new.priority,
            status: new.status,
            project_id: new.project_id,
        };
        self.tasks
            .write()
            .await
            .insert(task.id.clone(), task.clone());
        task
    }

    /// Applies a partial update to a task. `None` when the task does not
    /// exist under the given project.
    pub async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        patch: termboard_api::task::TaskPatch,
    ) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .filter(|t| t.project_id == project_id)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        Some(task.clone())
    }

    /// Removes a task. Deleting an absent task is not an error.
    pub async fn delete_task(&self, project_id: &str, task_id: &str) -> bool {
        let mut tasks = self.tasks.write().await;
        match tasks.get(task_id) {
            Some(t) if t.project_id == project_id => {
                tasks.remove(task_id);
                true
            }
            _ => false,
        }
    }

    // -- fault injection --

    /// Makes the next `count` task updates fail with a 500.
    pub async fn fail_task_updates(&self, count: u32) {
        self.faults.lock().await.fail_task_updates = count;
    }

    /// Consumes one pending injected update failure, if any.
    pub async fn take_task_update_fault(&self) -> bool {
        let mut faults = self.faults.lock().await;
        if faults.fail_task_updates > 0 {
            faults.fail_task_updates -= 1;
            true
        } else {
            false
        }
    }

    /// Delays every task listing for the given project.
    pub async fn delay_task_list(&self, project_id: &str, delay: Duration) {
        self.faults
            .lock()
            .await
            .task_list_delay
            .insert(project_id.to_string(), delay);
    }

    /// Clears an injected task-list delay.
    pub async fn clear_task_list_delay(&self, project_id: &str) {
        self.faults.lock().await.task_list_delay.remove(project_id);
    }
}
