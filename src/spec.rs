//! Specification retrieval
//!
//! Fetches an OpenAPI/Swagger document and pulls out the `info.title` that
//! names its collection.

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{RemoteOperation, Result, SyncError};
use crate::postman::{build_http_client, read_body, send};

/// A fetched specification and the title it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    pub url: String,
    pub title: String,
    pub document: Value,
}

impl SpecDocument {
    /// Wrap a parsed document, failing if it has no `info.title`.
    pub fn from_document(url: &str, document: Value) -> Result<Self> {
        let title = extract_title(&document).ok_or_else(|| SyncError::MalformedSpec {
            url: url.to_string(),
            reason: "missing info.title".to_string(),
        })?;
        Ok(Self {
            url: url.to_string(),
            title: title.to_string(),
            document,
        })
    }
}

pub fn extract_title(document: &Value) -> Option<&str> {
    document.get("info")?.get("title")?.as_str()
}

/// Retrieves specification documents by URL.
pub trait SpecFetcher {
    fn fetch(&self, url: &str) -> Result<SpecDocument>;
}

/// Parse a specification body as JSON, falling back to YAML.
pub fn parse_document(url: &str, body: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(value),
        Err(json_error) => match serde_yaml::from_str::<Value>(body) {
            Ok(value) if value.is_object() => Ok(value),
            _ => Err(SyncError::MalformedSpec {
                url: url.to_string(),
                reason: format!("not a JSON or YAML document: {json_error}"),
            }),
        },
    }
}

/// Unauthenticated HTTP fetcher.
pub struct HttpSpecFetcher {
    http: Client,
}

impl HttpSpecFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
        })
    }
}

impl SpecFetcher for HttpSpecFetcher {
    fn fetch(&self, url: &str) -> Result<SpecDocument> {
        let op = RemoteOperation::FetchSpec;
        tracing::debug!(%url, "fetching specification");
        let response = send(op, self.http.get(url))?;
        let status = response.status();
        let body = read_body(op, response)?;
        if !status.is_success() {
            return Err(SyncError::Remote {
                operation: op,
                status: status.as_u16(),
                body,
            });
        }

        let document = parse_document(url, &body)?;
        SpecDocument::from_document(url, document)
    }
}
