//! Postman API access
//!
//! [`CollectionService`] is the seam the synchronization protocol talks to;
//! [`PostmanClient`] implements it over the Postman REST API with a blocking
//! `reqwest` client.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::credentials::ApiKey;
use crate::error::{RemoteOperation, Result, SyncError};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Visibility type given to workspaces this tool creates.
pub const WORKSPACE_TYPE: &str = "personal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
}

/// Full collection as returned by `GET /collections/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub info: CollectionInfo,
    /// Request items; kept as raw JSON so unknown fields survive the round trip.
    #[serde(default)]
    pub item: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// Body of `PUT /collections/{id}` (wrapped in `{"collection": ...}` on the wire).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionUpdate {
    pub info: CollectionInfo,
    pub item: Vec<Value>,
}

/// Operations the sync protocol needs from the collection-management service.
pub trait CollectionService {
    fn list_workspaces(&self) -> Result<Vec<WorkspaceSummary>>;
    fn create_workspace(&self, name: &str, description: &str) -> Result<String>;
    fn list_collections(&self, workspace_id: &str) -> Result<Vec<CollectionSummary>>;
    fn delete_collection(&self, collection_id: &str) -> Result<()>;
    /// Import a raw OpenAPI document; returns the collections it produced.
    fn import_openapi(&self, workspace_id: &str, spec: &Value) -> Result<Vec<CollectionSummary>>;
    fn get_collection(&self, collection_id: &str) -> Result<CollectionDetail>;
    fn update_collection(&self, collection_id: &str, update: &CollectionUpdate) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct WorkspacesEnvelope {
    workspaces: Vec<WorkspaceSummary>,
}

#[derive(Deserialize)]
struct CreatedWorkspace {
    id: String,
}

#[derive(Deserialize)]
struct CreatedWorkspaceEnvelope {
    workspace: CreatedWorkspace,
}

#[derive(Serialize)]
struct NewWorkspace<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct NewWorkspaceEnvelope<'a> {
    workspace: NewWorkspace<'a>,
}

#[derive(Deserialize)]
struct CollectionsEnvelope {
    #[serde(default)]
    collections: Vec<CollectionSummary>,
}

#[derive(Deserialize)]
struct CollectionEnvelope {
    collection: CollectionDetail,
}

#[derive(Serialize)]
struct CollectionUpdateEnvelope<'a> {
    collection: &'a CollectionUpdate,
}

#[derive(Serialize)]
struct ImportRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    input: &'a Value,
}

/// Build the blocking HTTP client shared by every remote call.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("specsync/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|error| SyncError::HttpClient(error.to_string()))
}

pub(crate) fn send(operation: RemoteOperation, request: RequestBuilder) -> Result<Response> {
    request.send().map_err(|error| SyncError::Transport {
        operation,
        message: error.to_string(),
    })
}

pub(crate) fn read_body(operation: RemoteOperation, response: Response) -> Result<String> {
    response.text().map_err(|error| SyncError::Transport {
        operation,
        message: error.to_string(),
    })
}

fn parse_json<T: DeserializeOwned>(operation: RemoteOperation, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|error| SyncError::MalformedResponse {
        operation,
        reason: error.to_string(),
    })
}

/// Blocking client for the Postman REST API.
pub struct PostmanClient {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl PostmanClient {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn workspace_scoped(&self, path: &str, workspace_id: &str) -> String {
        format!(
            "{}?workspace={}",
            self.url(path),
            urlencoding::encode(workspace_id)
        )
    }

    fn collection_url(&self, collection_id: &str) -> String {
        self.url(&format!(
            "/collections/{}",
            urlencoding::encode(collection_id)
        ))
    }

    /// Send an authenticated request and return the body of a 200 response.
    fn execute(&self, operation: RemoteOperation, request: RequestBuilder) -> Result<String> {
        let request = request.header(API_KEY_HEADER, self.api_key.expose());
        let response = send(operation, request)?;
        let status = response.status().as_u16();
        let body = read_body(operation, response)?;
        tracing::debug!(%operation, status, "postman response");

        if status != 200 {
            return Err(SyncError::Remote {
                operation,
                status,
                body,
            });
        }
        Ok(body)
    }
}

impl CollectionService for PostmanClient {
    fn list_workspaces(&self) -> Result<Vec<WorkspaceSummary>> {
        let op = RemoteOperation::ListWorkspaces;
        let body = self.execute(op, self.http.get(self.url("/workspaces")))?;
        Ok(parse_json::<WorkspacesEnvelope>(op, &body)?.workspaces)
    }

    fn create_workspace(&self, name: &str, description: &str) -> Result<String> {
        let op = RemoteOperation::CreateWorkspace;
        let payload = NewWorkspaceEnvelope {
            workspace: NewWorkspace {
                name,
                description,
                kind: WORKSPACE_TYPE,
            },
        };
        let body = self.execute(op, self.http.post(self.url("/workspaces")).json(&payload))?;
        Ok(parse_json::<CreatedWorkspaceEnvelope>(op, &body)?.workspace.id)
    }

    fn list_collections(&self, workspace_id: &str) -> Result<Vec<CollectionSummary>> {
        let op = RemoteOperation::ListCollections;
        let url = self.workspace_scoped("/collections", workspace_id);
        let body = self.execute(op, self.http.get(url))?;
        Ok(parse_json::<CollectionsEnvelope>(op, &body)?.collections)
    }

    fn delete_collection(&self, collection_id: &str) -> Result<()> {
        let op = RemoteOperation::DeleteCollection;
        self.execute(op, self.http.delete(self.collection_url(collection_id)))?;
        Ok(())
    }

    fn import_openapi(&self, workspace_id: &str, spec: &Value) -> Result<Vec<CollectionSummary>> {
        let op = RemoteOperation::ImportOpenApi;
        let url = self.workspace_scoped("/import/openapi", workspace_id);
        let payload = ImportRequest {
            kind: "json",
            input: spec,
        };
        let body = self.execute(op, self.http.post(url).json(&payload))?;
        Ok(parse_json::<CollectionsEnvelope>(op, &body)?.collections)
    }

    fn get_collection(&self, collection_id: &str) -> Result<CollectionDetail> {
        let op = RemoteOperation::GetCollection;
        let body = self.execute(op, self.http.get(self.collection_url(collection_id)))?;
        Ok(parse_json::<CollectionEnvelope>(op, &body)?.collection)
    }

    fn update_collection(&self, collection_id: &str, update: &CollectionUpdate) -> Result<()> {
        let op = RemoteOperation::UpdateCollection;
        let payload = CollectionUpdateEnvelope { collection: update };
        self.execute(
            op,
            self.http.put(self.collection_url(collection_id)).json(&payload),
        )?;
        Ok(())
    }
}
