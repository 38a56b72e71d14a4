//! Error types for specsync
//!
//! Every fallible step of a sync run returns one of these instead of
//! aborting, so the orchestrator can decide whether to stop or move on.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The remote calls a sync run makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    ListWorkspaces,
    CreateWorkspace,
    ListCollections,
    DeleteCollection,
    GetCollection,
    UpdateCollection,
    ImportOpenApi,
    FetchSpec,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteOperation::ListWorkspaces => "list workspaces",
            RemoteOperation::CreateWorkspace => "create workspace",
            RemoteOperation::ListCollections => "list collections",
            RemoteOperation::DeleteCollection => "delete collection",
            RemoteOperation::GetCollection => "get collection",
            RemoteOperation::UpdateCollection => "update collection",
            RemoteOperation::ImportOpenApi => "import OpenAPI",
            RemoteOperation::FetchSpec => "fetch specification",
        };
        f.write_str(name)
    }
}

/// Problems found in local configuration before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Open and fill in file: {}", .0.display())]
    UrlsFileEmpty(PathBuf),

    #[error(
        "{url} in {} should be for app.swaggerhub.com or api.swaggerhub.com or point to a public swagger.json page",
        .file.display()
    )]
    InvalidUrl { url: String, file: PathBuf },

    #[error("workspace name must not be empty")]
    EmptyWorkspaceName,

    #[error("no Postman API key available; set POSTMAN_API_KEY or write it to {}", .0.display())]
    MissingApiKey(PathBuf),

    #[error("Postman API key must not be empty")]
    EmptyApiKey,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{operation} failed with status {status}: {body}")]
    Remote {
        operation: RemoteOperation,
        status: u16,
        body: String,
    },

    #[error("{operation} failed: {message}")]
    Transport {
        operation: RemoteOperation,
        message: String,
    },

    #[error("unexpected {operation} response: {reason}")]
    MalformedResponse {
        operation: RemoteOperation,
        reason: String,
    },

    #[error("malformed specification at {url}: {reason}")]
    MalformedSpec { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// The remote call this error came from, if any.
    pub fn operation(&self) -> Option<RemoteOperation> {
        match self {
            SyncError::Remote { operation, .. }
            | SyncError::Transport { operation, .. }
            | SyncError::MalformedResponse { operation, .. } => Some(*operation),
            SyncError::MalformedSpec { .. } => Some(RemoteOperation::FetchSpec),
            SyncError::Config(_) | SyncError::HttpClient(_) | SyncError::Io(_) => None,
        }
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
