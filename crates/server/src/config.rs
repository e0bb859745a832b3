use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub executor: ExecutorConfig,
}

impl ServerConfig {
    /// Loads the config file when it exists, falling back to defaults so a
    /// bare checkout still starts against the public backend.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            executor: ExecutorConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutorConfig {
    #[serde(default = "default_execute_url")]
    pub execute_url: String,
    /// Upper bound on a single execution call; untrusted code against a
    /// remote backend can hang indefinitely otherwise.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            execute_url: default_execute_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_execute_url() -> String {
    "https://emkc.org/api/v2/piston/execute".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    #[test]
    fn parse_config_with_overrides() {
        let raw = r#"
listen_addr = "127.0.0.1:9000"

[executor]
execute_url = "http://localhost:2000/api/v2/execute"
timeout_secs = 5
"#;

        let config = ServerConfig::from_str(raw).expect("config should parse");

        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.executor.execute_url, "http://localhost:2000/api/v2/execute");
        assert_eq!(config.executor.timeout_secs, 5);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ServerConfig::from_str("").expect("empty config should parse");

        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.executor.timeout_secs, 30);
        assert!(config.executor.execute_url.contains("piston"));
    }
}
