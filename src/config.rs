use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::batch::DEFAULT_DELAY;
use crate::inventory::DEFAULT_BASE_URL;
use crate::{InventoryError, Result};

pub const ACCESS_KEY_ENV: &str = "COUPANG_ACCESS_KEY";
pub const SECRET_KEY_ENV: &str = "COUPANG_SECRET_KEY";

pub const DEFAULT_INPUT_FILE: &str = "option_id.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "inventory.csv";

/// Where the API keys come from: entries read from a dotenv file override the
/// process environment.
#[derive(Clone, Default)]
pub struct CredentialSource {
    overrides: BTreeMap<String, String>,
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSource")
            .field("override_keys", &self.override_keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialSource {
    pub fn from_dotenv_str(contents: &str) -> Self {
        Self {
            overrides: contents.lines().filter_map(parse_dotenv_line).collect(),
        }
    }

    pub async fn from_dotenv_file(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|err| {
            InventoryError::Config(format!("failed to read dotenv {}: {err}", path.display()))
        })?;
        let source = Self::from_dotenv_str(&contents);
        tracing::debug!(
            path = %path.display(),
            keys = ?source.override_keys().collect::<Vec<_>>(),
            "loaded dotenv"
        );
        Ok(source)
    }

    pub fn override_keys(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    /// Both keys are required; there is no built-in fallback credential.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            self.lookup(ACCESS_KEY_ENV)?,
            self.lookup(SECRET_KEY_ENV)?,
        ))
    }

    fn lookup(&self, key: &str) -> Result<String> {
        self.overrides
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| InventoryError::Config(format!("missing {key}")))
    }
}

/// One `KEY=VALUE` line. Comments, blank values and lines without `=` yield
/// `None`.
fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = unquote(value.trim()).trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

/// Everything a run needs besides credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub delay: Duration,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            delay: DEFAULT_DELAY,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: crate::inventory::DEFAULT_TIMEOUT,
        }
    }
}
