//! Picks which project's board to show.
//!
//! Precedence: an explicit `--project` argument wins, then the project
//! remembered from the previous run (if the user still has access to it),
//! then the first project in the listing. The chosen project is written
//! back to a small state file so the next launch lands on the same board.

use std::path::PathBuf;

use termboard_api::project::Project;

/// Remembers the last opened project across runs.
#[derive(Debug, Clone)]
pub struct ProjectSelector {
    path: Option<PathBuf>,
}

impl ProjectSelector {
    /// Selector persisting at `<data_dir>/termboard/last-project`. Falls
    /// back to no persistence when the platform has no data directory.
    #[must_use]
    pub fn default_location() -> Self {
        Self {
            path: dirs::data_dir().map(|d| d.join("termboard").join("last-project")),
        }
    }

    /// Selector persisting at an explicit path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Selector that never persists. Test support.
    #[must_use]
    pub const fn ephemeral() -> Self {
        Self { path: None }
    }

    /// The project id remembered from a previous run, if any.
    #[must_use]
    pub fn recall(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        let contents = std::fs::read_to_string(path).ok()?;
        let id = contents.trim();
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }

    /// Persists a project id for the next run. Failures are logged, not
    /// fatal; losing the preference only costs one extra selection.
    pub fn remember(&self, project_id: &str) {
        let Some(path) = &self.path else { return };
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(error = %e, "failed to create state directory");
            return;
        }
        if let Err(e) = std::fs::write(path, project_id) {
            tracing::warn!(error = %e, "failed to remember project");
        }
    }

    /// Chooses a project from a listing. `explicit` may be a project id or
    /// an exact project name.
    #[must_use]
    pub fn select<'a>(&self, projects: &'a [Project], explicit: Option<&str>) -> Option<&'a Project> {
        if let Some(wanted) = explicit {
            return projects.iter().find(|p| p.id == wanted || p.name == wanted);
        }
        if let Some(remembered) = self.recall()
            && let Some(found) = projects.iter().find(|p| p.id == remembered)
        {
            return Some(found);
        }
        projects.first()
    }
}
