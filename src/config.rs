use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use catalog_auth::prelude::{AccessPolicy, HashParams, UserSeed, DEFAULT_TOKEN_TTL};
use catalog_service::laptop::DEFAULT_MAX_IMAGE_BYTES;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const ENV_PREFIX: &str = "CATALOG_";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret: String,
    #[serde(with = "humantime_str")]
    pub token_ttl: Duration,
    #[serde(with = "humantime_str")]
    pub refresh_interval: Duration,
    #[serde(with = "humantime_str")]
    pub retry_delay: Duration,
    pub users: Vec<UserSeed>,
    /// Extra method rules layered over the built-in laptop service policy.
    pub policy: Option<AccessPolicy>,
    pub password_hash: HashParams,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "secret".to_string(),
            token_ttl: DEFAULT_TOKEN_TTL,
            refresh_interval: Duration::from_secs(30),
            retry_delay: Duration::from_secs(1),
            users: UserSeed::defaults(),
            policy: None,
            password_hash: HashParams::default(),
        }
    }
}

impl AuthConfig {
    pub fn access_policy(&self) -> AccessPolicy {
        let base = AccessPolicy::laptop_service();
        match &self.policy {
            Some(overrides) => base.merged_with(overrides.clone()),
            None => base,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaptopBackend {
    Memory,
    Persistent { dsn: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub laptops: LaptopBackend,
    pub image_dir: PathBuf,
    pub max_image_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            laptops: LaptopBackend::Memory,
            image_dir: PathBuf::from("img"),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl CatalogConfig {
    /// Applies `CATALOG_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(listen) = var("LISTEN") {
            self.server.listen = listen
                .parse()
                .with_context(|| format!("invalid {ENV_PREFIX}LISTEN: {listen}"))?;
        }
        if let Some(secret) = var("SECRET") {
            self.auth.secret = secret;
        }
        if let Some(ttl) = var("TOKEN_TTL") {
            self.auth.token_ttl = parse_duration("TOKEN_TTL", &ttl)?;
        }
        if let Some(interval) = var("REFRESH_INTERVAL") {
            self.auth.refresh_interval = parse_duration("REFRESH_INTERVAL", &interval)?;
        }
        if let Some(delay) = var("RETRY_DELAY") {
            self.auth.retry_delay = parse_duration("RETRY_DELAY", &delay)?;
        }
        if let Some(dir) = var("IMAGE_DIR") {
            self.storage.image_dir = PathBuf::from(dir);
        }
        if let Some(max) = var("MAX_IMAGE_BYTES") {
            self.storage.max_image_bytes = max
                .parse()
                .with_context(|| format!("invalid {ENV_PREFIX}MAX_IMAGE_BYTES: {max}"))?;
        }
        Ok(())
    }
}

fn parse_duration(name: &str, raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw).with_context(|| format!("invalid {ENV_PREFIX}{name}: {raw}"))
}

pub struct LoadedConfig {
    pub config: CatalogConfig,
    pub path: PathBuf,
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let mut config = if config_path.exists() {
        let config = read_config(&config_path).await?;
        info!("Loaded configuration from: {}", config_path.display());
        config
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        CatalogConfig::default()
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(LoadedConfig {
        config,
        path: config_path,
    })
}

pub async fn read_config(path: &Path) -> Result<CatalogConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read config file")?;
    serde_yaml::from_str(&content).context("Failed to parse config file")
}

fn default_config_path() -> Result<PathBuf> {
    // Priority: ./config/catalog.yaml > ~/.config/catalog/catalog.yaml
    let local_config = PathBuf::from("config/catalog.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("catalog");
    path.push("catalog.yaml");
    Ok(path)
}

mod humantime_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_types::{method, Role};
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  listen: "0.0.0.0:9000"
auth:
  token_ttl: 5m
storage:
  max_image_bytes: 2048
"#;
        let config: CatalogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.listen.port(), 9000);
        assert_eq!(config.auth.token_ttl, Duration::from_secs(300));
        assert_eq!(config.auth.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.auth.users, UserSeed::defaults());
        assert_eq!(config.storage.max_image_bytes, 2048);
        assert_eq!(config.storage.laptops, LaptopBackend::Memory);
    }

    #[test]
    fn policy_override_merges_into_laptop_rules() {
        let yaml = r#"
auth:
  policy:
    "/catalog.v1.LaptopService/SearchLaptop": [admin]
"#;
        let config: CatalogConfig = serde_yaml::from_str(yaml).unwrap();
        let policy = config.auth.access_policy();
        assert!(policy.requires_auth(method::SEARCH_LAPTOP));
        assert!(!policy.is_allowed(method::SEARCH_LAPTOP, Role::User));
        assert!(policy.is_allowed(method::RATE_LAPTOP, Role::User));
    }

    #[test]
    fn persistent_backend_parses() {
        let yaml = "storage:\n  laptops:\n    kind: persistent\n    dsn: postgres://catalog\n";
        let config: CatalogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.storage.laptops,
            LaptopBackend::Persistent {
                dsn: "postgres://catalog".into()
            }
        );
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("CATALOG_LISTEN", "127.0.0.1:7000"),
            ("CATALOG_SECRET", "s3"),
            ("CATALOG_TOKEN_TTL", "90s"),
            ("CATALOG_MAX_IMAGE_BYTES", "10"),
        ]
        .into_iter()
        .collect();
        let mut config = CatalogConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.listen.port(), 7000);
        assert_eq!(config.auth.secret, "s3");
        assert_eq!(config.auth.token_ttl, Duration::from_secs(90));
        assert_eq!(config.storage.max_image_bytes, 10);
    }

    #[test]
    fn bad_env_override_is_an_error() {
        let mut config = CatalogConfig::default();
        let err = config
            .apply_overrides(|key| (key == "CATALOG_TOKEN_TTL").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("CATALOG_TOKEN_TTL"));
    }
}
