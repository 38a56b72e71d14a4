//! Postman API key lookup
//!
//! The key comes from `POSTMAN_API_KEY`, then the key file, then an
//! interactive prompt whose answer is saved to the key file.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "POSTMAN_API_KEY";

/// Secret token sent as `X-API-Key`. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Resolve the API key for a run, prompting on a terminal if nothing is stored.
pub fn resolve_api_key(key_file: &Path) -> Result<ApiKey> {
    use is_terminal::IsTerminal;

    let from_env = std::env::var(API_KEY_ENV).ok();
    let interactive = std::io::stdin().is_terminal();

    resolve_api_key_with(key_file, from_env, || {
        if !interactive {
            return Ok(None);
        }
        let key = dialoguer::Password::new()
            .with_prompt("Postman API Key")
            .interact()
            .context("Failed to read API key from terminal")?;
        Ok(Some(key))
    })
}

/// Same as [`resolve_api_key`] with the environment value and prompt injected.
///
/// `prompt` returns `None` when no one can be asked.
pub fn resolve_api_key_with<P>(
    key_file: &Path,
    from_env: Option<String>,
    prompt: P,
) -> Result<ApiKey>
where
    P: FnOnce() -> Result<Option<String>>,
{
    if let Some(key) = from_env.filter(|k| !k.trim().is_empty()) {
        tracing::debug!("using API key from {}", API_KEY_ENV);
        return Ok(ApiKey::new(key)?);
    }

    if key_file.is_file() {
        let content = fs::read_to_string(key_file)
            .with_context(|| format!("Failed to read API key file: {}", key_file.display()))?;
        tracing::debug!(file = %key_file.display(), "using API key from file");
        return Ok(ApiKey::new(content)?);
    }

    let Some(entered) = prompt()? else {
        return Err(ConfigError::MissingApiKey(key_file.to_path_buf()).into());
    };
    let key = ApiKey::new(entered)?;
    store_api_key(key_file, &key)?;
    Ok(key)
}

/// Persist the key so later runs do not prompt again.
pub fn store_api_key(key_file: &Path, key: &ApiKey) -> Result<()> {
    if let Some(parent) = key_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(key_file, key.expose())
        .with_context(|| format!("Failed to write API key file: {}", key_file.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(key_file, fs::Permissions::from_mode(0o600)).with_context(|| {
            format!("Failed to restrict permissions on {}", key_file.display())
        })?;
    }

    Ok(())
}
