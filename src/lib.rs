//! specsync - OpenAPI to Postman synchronization
//!
//! Imports OpenAPI/Swagger specifications into a named Postman workspace,
//! one collection per specification. Runs are idempotent: the workspace is
//! found or created by name, and a collection with the specification's title
//! is replaced rather than duplicated.

pub mod collection;
pub mod config;
pub mod credentials;
pub mod error;
pub mod init;
pub mod postman;
pub mod sources;
pub mod spec;
pub mod sync;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ConfigError, RemoteOperation, SyncError};
pub use postman::{CollectionService, PostmanClient};
pub use spec::{HttpSpecFetcher, SpecDocument, SpecFetcher};
pub use sync::{FailurePolicy, SyncReport, SyncSettings, Synchronizer};
