//! Collection synchronization
//!
//! Keeps exactly one collection per specification title in a workspace.
//! The import endpoint neither deduplicates by name nor accepts a custom
//! description or schema tag, so an import is bracketed by a delete of the
//! previous collection and a metadata update of the new one.

use serde::Serialize;
use serde_json::Value;

use crate::error::{RemoteOperation, Result, SyncError};
use crate::postman::{CollectionInfo, CollectionService, CollectionUpdate};
use crate::spec::SpecDocument;

/// Server-assigned field that must not be echoed back on update.
pub const ITEM_ID_FIELD: &str = "id";

/// Outcome of synchronizing one specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedCollection {
    pub collection_id: String,
    pub name: String,
    /// ID of the collection that was deleted to make room, if any.
    pub replaced: Option<String>,
}

/// Description written on every synchronized collection.
pub fn provenance_description(source_url: &str) -> String {
    format!("Generated from {source_url}")
}

/// Remove the server-assigned ID from every top-level item, keeping order.
pub fn strip_item_ids(items: &mut [Value]) {
    for item in items.iter_mut() {
        if let Some(fields) = item.as_object_mut() {
            fields.remove(ITEM_ID_FIELD);
        }
    }
}

/// Replace the collection named after `spec` in `workspace_id` with a fresh import.
///
/// Order matters: list, delete any same-named collection, import, re-read the
/// new collection, strip item IDs, then update its description and schema.
/// A failed delete stops before importing so no duplicate is created. A
/// failure after a successful delete leaves the workspace without the
/// collection until the next run.
pub fn sync_collection<S>(
    service: &S,
    workspace_id: &str,
    spec: &SpecDocument,
    schema: &str,
) -> Result<SyncedCollection>
where
    S: CollectionService + ?Sized,
{
    let existing = service.list_collections(workspace_id)?;
    let replaced = match existing.into_iter().find(|c| c.name == spec.title) {
        Some(previous) => {
            tracing::warn!(
                collection_id = %previous.id,
                name = %previous.name,
                "replacing existing collection"
            );
            service.delete_collection(&previous.id)?;
            Some(previous.id)
        }
        None => None,
    };

    let created = service
        .import_openapi(workspace_id, &spec.document)?
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::MalformedResponse {
            operation: RemoteOperation::ImportOpenApi,
            reason: "import produced no collections".to_string(),
        })?;

    let mut detail = service.get_collection(&created.id)?;
    strip_item_ids(&mut detail.item);

    let update = CollectionUpdate {
        info: CollectionInfo {
            name: detail.info.name.clone(),
            description: Some(provenance_description(&spec.url)),
            schema: Some(schema.to_string()),
        },
        item: detail.item,
    };
    service.update_collection(&created.id, &update)?;

    tracing::info!(
        collection_id = %created.id,
        name = %update.info.name,
        %workspace_id,
        "imported collection"
    );

    Ok(SyncedCollection {
        collection_id: created.id,
        name: update.info.name,
        replaced,
    })
}
