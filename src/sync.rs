//! Sync orchestration
//!
//! Resolves the workspace once, then fetches and synchronizes each source
//! URL in order. Nothing runs concurrently.

use serde::Serialize;

use crate::collection::{SyncedCollection, sync_collection};
use crate::config::Config;
use crate::error::Result;
use crate::postman::CollectionService;
use crate::spec::SpecFetcher;
use crate::workspace::resolve_or_create;

/// What to do when one source URL fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the run on the first error; earlier imports stay in place.
    #[default]
    FailFast,
    /// Record the failure and move on to the next URL.
    Continue,
}

/// Settings for one run, built once from the configuration.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub workspace_name: String,
    pub workspace_description: String,
    pub collection_schema: String,
    pub policy: FailurePolicy,
}

impl SyncSettings {
    pub fn from_config(config: &Config, policy: FailurePolicy) -> Self {
        Self {
            workspace_name: config.workspace_name.clone(),
            workspace_description: config.workspace_description.clone(),
            collection_schema: config.collection_schema.clone(),
            policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedSpec {
    pub url: String,
    #[serde(flatten)]
    pub collection: SyncedCollection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSpec {
    pub url: String,
    pub error: String,
}

/// Result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub workspace_id: String,
    pub workspace_created: bool,
    pub imported: Vec<ImportedSpec>,
    pub failed: Vec<FailedSpec>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum SyncEvent<'a> {
    WorkspaceResolved { id: &'a str, created: bool },
    Imported(&'a ImportedSpec),
    Failed(&'a FailedSpec),
}

/// Runs the whole synchronization against a collection service and a spec host.
pub struct Synchronizer<'a, S: ?Sized, F: ?Sized> {
    service: &'a S,
    fetcher: &'a F,
    settings: SyncSettings,
}

impl<'a, S, F> Synchronizer<'a, S, F>
where
    S: CollectionService + ?Sized,
    F: SpecFetcher + ?Sized,
{
    pub fn new(service: &'a S, fetcher: &'a F, settings: SyncSettings) -> Self {
        Self {
            service,
            fetcher,
            settings,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn run(&self, urls: &[String]) -> Result<SyncReport> {
        self.run_with(urls, |_| {})
    }

    /// Synchronize every URL, reporting progress through `on_event`.
    ///
    /// Workspace resolution failures always abort. Per-URL failures abort
    /// under [`FailurePolicy::FailFast`] and are collected in the report
    /// under [`FailurePolicy::Continue`].
    pub fn run_with<E>(&self, urls: &[String], mut on_event: E) -> Result<SyncReport>
    where
        E: FnMut(SyncEvent<'_>),
    {
        let workspace = resolve_or_create(
            self.service,
            &self.settings.workspace_name,
            &self.settings.workspace_description,
        )?;
        on_event(SyncEvent::WorkspaceResolved {
            id: workspace.id(),
            created: workspace.was_created(),
        });

        let mut report = SyncReport {
            workspace_id: workspace.id().to_string(),
            workspace_created: workspace.was_created(),
            ..Default::default()
        };

        for url in urls {
            match self.sync_one(&report.workspace_id, url) {
                Ok(collection) => {
                    let imported = ImportedSpec {
                        url: url.clone(),
                        collection,
                    };
                    on_event(SyncEvent::Imported(&imported));
                    report.imported.push(imported);
                }
                Err(error) => {
                    tracing::debug!(%url, %error, "failed to synchronize specification");
                    let failed = FailedSpec {
                        url: url.clone(),
                        error: error.to_string(),
                    };
                    on_event(SyncEvent::Failed(&failed));
                    if self.settings.policy == FailurePolicy::FailFast {
                        return Err(error);
                    }
                    report.failed.push(failed);
                }
            }
        }

        Ok(report)
    }

    fn sync_one(&self, workspace_id: &str, url: &str) -> Result<SyncedCollection> {
        let spec = self.fetcher.fetch(url)?;
        sync_collection(
            self.service,
            workspace_id,
            &spec,
            &self.settings.collection_schema,
        )
    }
}
