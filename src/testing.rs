//! In-memory Postman and spec host used by the protocol tests.

use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::{RemoteOperation, Result, SyncError};
use crate::postman::{
    CollectionDetail, CollectionInfo, CollectionService, CollectionSummary, CollectionUpdate,
    WorkspaceSummary,
};
use crate::spec::{SpecDocument, SpecFetcher, extract_title};

pub const IMPORT_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListWorkspaces,
    CreateWorkspace { name: String, description: String },
    ListCollections { workspace_id: String },
    DeleteCollection { collection_id: String },
    ImportOpenApi { workspace_id: String, title: String },
    GetCollection { collection_id: String },
    UpdateCollection { collection_id: String, update: CollectionUpdate },
    FetchSpec { url: String },
}

#[derive(Debug, Clone)]
struct StoredCollection {
    workspace_id: String,
    id: String,
    detail: CollectionDetail,
}

/// Records every call and keeps just enough state to behave like the real service.
#[derive(Default)]
pub struct FakePostman {
    calls: RefCell<Vec<Call>>,
    workspaces: RefCell<Vec<WorkspaceSummary>>,
    collections: RefCell<Vec<StoredCollection>>,
    specs: RefCell<HashMap<String, Value>>,
    failures: RefCell<HashMap<RemoteOperation, u16>>,
    empty_imports: Cell<bool>,
    next_id: Cell<u32>,
}

impl FakePostman {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn add_workspace(&self, id: &str, name: &str) {
        self.workspaces.borrow_mut().push(WorkspaceSummary {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn add_collection(&self, workspace_id: &str, id: &str, name: &str) {
        self.collections.borrow_mut().push(StoredCollection {
            workspace_id: workspace_id.to_string(),
            id: id.to_string(),
            detail: CollectionDetail {
                info: CollectionInfo {
                    name: name.to_string(),
                    description: None,
                    schema: Some(IMPORT_SCHEMA.to_string()),
                },
                item: Vec::new(),
            },
        });
    }

    /// Serve `document` at `url`.
    pub fn add_spec(&self, url: &str, document: Value) {
        self.specs.borrow_mut().insert(url.to_string(), document);
    }

    /// Make every call of `operation` answer with `status`.
    pub fn fail_on(&self, operation: RemoteOperation, status: u16) {
        self.failures.borrow_mut().insert(operation, status);
    }

    /// Make imports succeed without producing a collection.
    pub fn return_empty_imports(&self) {
        self.empty_imports.set(true);
    }

    pub fn collections_in(&self, workspace_id: &str) -> Vec<CollectionDetail> {
        self.collections
            .borrow()
            .iter()
            .filter(|c| c.workspace_id == workspace_id)
            .map(|c| c.detail.clone())
            .collect()
    }

    pub fn workspace_count(&self) -> usize {
        self.workspaces.borrow().len()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, operation: RemoteOperation) -> Result<()> {
        match self.failures.borrow().get(&operation) {
            Some(&status) => Err(SyncError::Remote {
                operation,
                status,
                body: format!("{{\"error\":\"{operation} rejected\"}}"),
            }),
            None => Ok(()),
        }
    }

    fn generate_id(&self, prefix: &str) -> String {
        let next = self.next_id.get() + 1;
        self.next_id.set(next);
        format!("{prefix}-{next}")
    }
}

impl CollectionService for FakePostman {
    fn list_workspaces(&self) -> Result<Vec<WorkspaceSummary>> {
        self.record(Call::ListWorkspaces);
        self.check(RemoteOperation::ListWorkspaces)?;
        Ok(self.workspaces.borrow().clone())
    }

    fn create_workspace(&self, name: &str, description: &str) -> Result<String> {
        self.record(Call::CreateWorkspace {
            name: name.to_string(),
            description: description.to_string(),
        });
        self.check(RemoteOperation::CreateWorkspace)?;
        let id = self.generate_id("ws");
        self.add_workspace(&id, name);
        Ok(id)
    }

    fn list_collections(&self, workspace_id: &str) -> Result<Vec<CollectionSummary>> {
        self.record(Call::ListCollections {
            workspace_id: workspace_id.to_string(),
        });
        self.check(RemoteOperation::ListCollections)?;
        Ok(self
            .collections
            .borrow()
            .iter()
            .filter(|c| c.workspace_id == workspace_id)
            .map(|c| CollectionSummary {
                id: c.id.clone(),
                name: c.detail.info.name.clone(),
            })
            .collect())
    }

    fn delete_collection(&self, collection_id: &str) -> Result<()> {
        self.record(Call::DeleteCollection {
            collection_id: collection_id.to_string(),
        });
        self.check(RemoteOperation::DeleteCollection)?;
        let mut collections = self.collections.borrow_mut();
        let before = collections.len();
        collections.retain(|c| c.id != collection_id);
        if collections.len() == before {
            return Err(SyncError::Remote {
                operation: RemoteOperation::DeleteCollection,
                status: 404,
                body: "{\"error\":\"instanceNotFoundError\"}".to_string(),
            });
        }
        Ok(())
    }

    fn import_openapi(&self, workspace_id: &str, spec: &Value) -> Result<Vec<CollectionSummary>> {
        let title = extract_title(spec).unwrap_or("Untitled").to_string();
        self.record(Call::ImportOpenApi {
            workspace_id: workspace_id.to_string(),
            title: title.clone(),
        });
        self.check(RemoteOperation::ImportOpenApi)?;
        if self.empty_imports.get() {
            return Ok(Vec::new());
        }

        let paths: Vec<String> = spec
            .get("paths")
            .and_then(Value::as_object)
            .map(|paths| paths.keys().cloned().collect())
            .unwrap_or_default();
        let item = paths
            .iter()
            .map(|path| {
                json!({
                    "id": self.generate_id("item"),
                    "name": path,
                    "item": [{"id": self.generate_id("req"), "name": format!("GET {path}")}],
                })
            })
            .collect();

        let id = self.generate_id("col");
        self.collections.borrow_mut().push(StoredCollection {
            workspace_id: workspace_id.to_string(),
            id: id.clone(),
            detail: CollectionDetail {
                info: CollectionInfo {
                    name: title.clone(),
                    description: None,
                    schema: Some(IMPORT_SCHEMA.to_string()),
                },
                item,
            },
        });
        Ok(vec![CollectionSummary { id, name: title }])
    }

    fn get_collection(&self, collection_id: &str) -> Result<CollectionDetail> {
        self.record(Call::GetCollection {
            collection_id: collection_id.to_string(),
        });
        self.check(RemoteOperation::GetCollection)?;
        self.collections
            .borrow()
            .iter()
            .find(|c| c.id == collection_id)
            .map(|c| c.detail.clone())
            .ok_or_else(|| SyncError::Remote {
                operation: RemoteOperation::GetCollection,
                status: 404,
                body: "{\"error\":\"instanceNotFoundError\"}".to_string(),
            })
    }

    fn update_collection(&self, collection_id: &str, update: &CollectionUpdate) -> Result<()> {
        self.record(Call::UpdateCollection {
            collection_id: collection_id.to_string(),
            update: update.clone(),
        });
        self.check(RemoteOperation::UpdateCollection)?;
        let mut collections = self.collections.borrow_mut();
        let stored = collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| SyncError::Remote {
                operation: RemoteOperation::UpdateCollection,
                status: 404,
                body: "{\"error\":\"instanceNotFoundError\"}".to_string(),
            })?;
        stored.detail = CollectionDetail {
            info: update.info.clone(),
            item: update.item.clone(),
        };
        Ok(())
    }
}

impl SpecFetcher for FakePostman {
    fn fetch(&self, url: &str) -> Result<SpecDocument> {
        self.record(Call::FetchSpec {
            url: url.to_string(),
        });
        self.check(RemoteOperation::FetchSpec)?;
        let document = self
            .specs
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| SyncError::Remote {
                operation: RemoteOperation::FetchSpec,
                status: 404,
                body: "Not Found".to_string(),
            })?;
        SpecDocument::from_document(url, document)
    }
}

/// A minimal Swagger 2.0 document titled `title`.
pub fn petstore_like(title: &str) -> Value {
    json!({
        "swagger": "2.0",
        "info": {"title": title, "version": "1.0.0"},
        "paths": {
            "/pets": {"get": {"responses": {"200": {"description": "ok"}}}},
            "/pets/{id}": {"get": {"responses": {"200": {"description": "ok"}}}},
        }
    })
}
