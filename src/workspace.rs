//! Workspace resolution
//!
//! Finds the configured workspace by exact name, creating it only when no
//! workspace with that name is visible.

use crate::error::Result;
use crate::postman::CollectionService;

/// How a workspace ID was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceResolution {
    Existing(String),
    Created(String),
}

impl WorkspaceResolution {
    pub fn id(&self) -> &str {
        match self {
            WorkspaceResolution::Existing(id) | WorkspaceResolution::Created(id) => id,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, WorkspaceResolution::Created(_))
    }
}

/// Return the ID of the workspace called `name`, creating it if needed.
///
/// Matching is case-sensitive; the first match in listing order wins.
pub fn resolve_or_create<S>(service: &S, name: &str, description: &str) -> Result<WorkspaceResolution>
where
    S: CollectionService + ?Sized,
{
    let workspaces = service.list_workspaces()?;
    if let Some(existing) = workspaces.into_iter().find(|w| w.name == name) {
        tracing::debug!(workspace_id = %existing.id, %name, "found workspace");
        return Ok(WorkspaceResolution::Existing(existing.id));
    }

    let id = service.create_workspace(name, description)?;
    tracing::info!(workspace_id = %id, %name, "created workspace");
    Ok(WorkspaceResolution::Created(id))
}
