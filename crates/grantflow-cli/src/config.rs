use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use grantflow_auth::{Client, GrantConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub grant: GrantConfig,
    pub logging: LoggingConfig,
    pub clients: Vec<Client>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        self.grant.validate().context("Invalid [grant] section")?;

        let mut seen = HashSet::new();
        for client in &self.clients {
            client
                .validate()
                .with_context(|| format!("Invalid client '{}'", client.client_id))?;
            if !seen.insert(client.client_id.as_str()) {
                anyhow::bail!("Duplicate client_id '{}'", client.client_id);
            }
        }
        Ok(())
    }

    pub fn find_client(&self, client_id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.client_id == client_id)
    }
}

pub fn parse(content: &str) -> Result<FileConfig> {
    let cfg: FileConfig = toml::from_str(content)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SAMPLE: &str = r#"
[grant]
authorization_code_lifetime = "5m"
context_lifetime = "5m"
require_pkce = true

[logging]
level = "debug"

[[clients]]
clientId = "c1"
name = "Test App"
clientSecret = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
redirectUris = ["https://app/cb"]
"#;

    #[test]
    fn test_parse_sample() {
        let cfg = parse(SAMPLE).unwrap();
        assert_eq!(cfg.grant.authorization_code_lifetime, Duration::from_secs(300));
        assert_eq!(cfg.grant.access_token_lifetime, Duration::from_secs(3600));
        assert!(cfg.grant.require_pkce);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.clients.len(), 1);
        assert!(cfg.find_client("c1").is_some());
        assert!(cfg.find_client("c2").is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.grant, GrantConfig::default());
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.clients.is_empty());
    }

    #[test]
    fn test_duplicate_client_rejected() {
        let content = format!(
            "{SAMPLE}\n[[clients]]\nclientId = \"c1\"\nname = \"Again\"\nclientSecret = \"x\"\nredirectUris = [\"https://app/cb\"]\n"
        );
        let err = parse(&content).unwrap_err();
        assert!(err.to_string().contains("Duplicate client_id"));
    }

    #[test]
    fn test_client_without_secret_rejected() {
        let content = r#"
[[clients]]
clientId = "c1"
name = "Test App"
redirectUris = ["https://app/cb"]
"#;
        let err = parse(content).unwrap_err();
        assert!(format!("{err:#}").contains("client_secret"));
    }

    #[test]
    fn test_invalid_grant_section_rejected() {
        let err = parse("[grant]\ntoken_bytes = 8\n").unwrap_err();
        assert!(err.to_string().contains("[grant]"));
    }

    #[test]
    fn test_unrepresentable_lifetime_rejected() {
        let content = r#"
[grant]
authorization_code_lifetime = "40000y"
context_lifetime = "40000y"
"#;
        let err = parse(content).unwrap_err();
        assert!(format!("{err:#}").contains("representable date range"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grantflow.toml");
        fs::write(&path, SAMPLE).unwrap();

        let cfg = load(&path).unwrap();
        assert_eq!(cfg.clients[0].client_id, "c1");

        let missing = load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(missing.to_string().contains("Cannot read config file"));
    }
}
