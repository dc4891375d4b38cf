use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Fixed relative path the default config is persisted to on startup.
pub const DEFAULT_CONFIG_PATH: &str = "domain_config.json";

// Include the default country table at compile time
const DEFAULT_CONFIG_JSON: &str = include_str!("../default_domain_config.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryDomains {
    pub domains: Vec<String>,
}

/// Country code to domain-list mapping.
///
/// Backed by an insertion-ordered map: the classifier scans countries in the
/// order the config file declares them, so a domain listed under two
/// countries always resolves to the earlier one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainConfig {
    countries: IndexMap<String, CountryDomains>,
}

impl DomainConfig {
    /// Parse the embedded default table.
    pub fn embedded_default() -> Result<Self> {
        serde_json::from_str(DEFAULT_CONFIG_JSON)
            .context("Failed to parse embedded default domain config")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CountryDomains)> {
        self.countries.iter().map(|(cc, cd)| (cc.as_str(), cd))
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Load the domain config from `path`, falling back to `fallback` when the
/// file does not exist. A file that exists but cannot be read or parsed is a
/// hard error.
pub fn load(path: &Path, fallback: DomainConfig) -> Result<DomainConfig> {
    if !path.exists() {
        warn!(config_path = ?path, "Domain config file not found, using embedded default");
        return Ok(fallback);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read domain config {:?}", path))?;
    let config: DomainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse domain config {:?}", path))?;

    info!(config_path = ?path, country_count = config.country_count(), "Loaded domain config");
    Ok(config)
}

/// Write the embedded default table to `path` if no file exists there.
/// Returns whether a file was written. The content is the embedded asset
/// verbatim, so the persisted file matches the default exactly.
pub fn ensure_config_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    fs::write(path, DEFAULT_CONFIG_JSON)
        .with_context(|| format!("Failed to create default domain config {:?}", path))?;
    info!(config_path = ?path, "Created default domain config");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn embedded_default_parses() {
        let config = DomainConfig::embedded_default().unwrap();
        assert_eq!(config.country_count(), 17);

        let first = config.iter().next().unwrap();
        assert_eq!(first.0, "us");
        assert!(first.1.domains.iter().any(|d| d == "gmail.com"));

        let last = config.iter().last().unwrap();
        assert_eq!(last.0, "sa");
    }

    #[test]
    fn load_missing_file_returns_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");

        let config = load(&path, DomainConfig::embedded_default().unwrap()).unwrap();
        assert_eq!(config.country_count(), 17);
    }

    #[test]
    fn load_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load(&path, DomainConfig::embedded_default().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn load_preserves_declaration_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(
            &path,
            r#"{ "zz": { "domains": ["z.com"] }, "aa": { "domains": ["a.com"] } }"#,
        )
        .unwrap();

        let config = load(&path, DomainConfig::embedded_default().unwrap()).unwrap();
        let codes: Vec<&str> = config.iter().map(|(cc, _)| cc).collect();
        assert_eq!(codes, vec!["zz", "aa"]);
    }

    #[test]
    fn ensure_config_file_writes_embedded_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("domain_config.json");

        assert!(ensure_config_file(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG_JSON);

        // Second call leaves the existing file alone
        assert!(!ensure_config_file(&path).unwrap());
    }

    #[test]
    fn persisted_default_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("domain_config.json");
        ensure_config_file(&path).unwrap();

        let config = load(&path, DomainConfig::embedded_default().unwrap()).unwrap();
        assert_eq!(config.country_count(), 17);
    }
}
