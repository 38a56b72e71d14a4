//! Template generation for the init command
//!
//! Writes a starter configuration and an empty URL list into a directory.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::{CONFIG_FILE_NAME, DEFAULT_URLS_FILE};

/// Default configuration template
pub const DEFAULT_CONFIG: &str = r#"# specsync configuration
# Imports every specification listed in `urls_file` into one Postman workspace.

# Workspace to create or reuse (matched by exact name)
workspace_name = "Imported APIs"
workspace_description = "Collections generated from OpenAPI specifications"

# File holding the Postman API key (prompted for and saved on first run).
# POSTMAN_API_KEY in the environment takes precedence.
api_key_file = ".postman_api_key"

# One specification URL per line
urls_file = "swagger_urls.txt"

# Schema tag written into every generated collection
collection_schema = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"

# Per-request timeout in seconds (0 = wait forever)
# timeout_secs = 60
"#;

/// Default URL list template
pub const DEFAULT_URLS: &str = "";

/// Create `specsync.toml` and the URL file in `dir`.
///
/// Existing files are kept unless `force` is set.
pub fn init(dir: &Path, force: bool) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        println!("  {} Created directory: {}", "✔".green(), dir.display());
    }

    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        println!(
            "  {} Config already exists: {} (use --force to overwrite)",
            "!".yellow(),
            config_path.display()
        );
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("  {} Created: {}", "✔".green(), config_path.display());
    }

    let urls_path = dir.join(DEFAULT_URLS_FILE);
    if urls_path.exists() && !force {
        println!(
            "  {} URL list already exists: {} (use --force to overwrite)",
            "!".yellow(),
            urls_path.display()
        );
    } else {
        fs::write(&urls_path, DEFAULT_URLS)
            .with_context(|| format!("Failed to write {}", urls_path.display()))?;
        println!("  {} Created: {}", "✔".green(), urls_path.display());
    }

    Ok(())
}
