//! Specification source list
//!
//! Reads the URL file, rejects anything that is not a recognizable
//! specification location and rewrites browse links to their API form.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ConfigError, Result};

pub const SWAGGERHUB_BROWSE_HOST: &str = "https://app.swaggerhub.com";
pub const SWAGGERHUB_API_HOST: &str = "https://api.swaggerhub.com";
pub const SPEC_FILE_SUFFIX: &str = "/swagger.json";

/// Fragments of which at least one must appear in every source URL.
const ACCEPTED_URL_FRAGMENTS: [&str; 3] =
    [SWAGGERHUB_BROWSE_HOST, SWAGGERHUB_API_HOST, SPEC_FILE_SUFFIX];

/// Load, validate and normalize the source URLs listed in `path`.
///
/// A missing or zero-length file is created empty and reported as
/// [`ConfigError::UrlsFileEmpty`]. Blank lines and `#` comments are skipped.
/// The returned URLs keep the file's order.
pub fn load_source_urls(path: &Path) -> Result<Vec<String>> {
    let is_empty = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => return Err(e.into()),
    };
    if is_empty {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "")?;
        return Err(ConfigError::UrlsFileEmpty(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let urls = parse_source_urls(&content, path)?;
    if urls.is_empty() {
        return Err(ConfigError::UrlsFileEmpty(path.to_path_buf()).into());
    }
    Ok(urls)
}

/// Validate and normalize every URL in `content`; `file` is only used for messages.
pub fn parse_source_urls(content: &str, file: &Path) -> Result<Vec<String>, ConfigError> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|url| {
            if is_accepted_url(url) {
                Ok(normalize_url(url))
            } else {
                Err(ConfigError::InvalidUrl {
                    url: url.to_string(),
                    file: file.to_path_buf(),
                })
            }
        })
        .collect()
}

pub fn is_accepted_url(url: &str) -> bool {
    ACCEPTED_URL_FRAGMENTS
        .iter()
        .any(|fragment| url.contains(fragment))
}

/// Rewrite a SwaggerHub browse URL to the API host; other URLs pass through.
pub fn normalize_url(url: &str) -> String {
    match url.strip_prefix(SWAGGERHUB_BROWSE_HOST) {
        Some(rest) => format!("{SWAGGERHUB_API_HOST}{rest}"),
        None => url.to_string(),
    }
}
