// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry credential lookup from the ambient docker credential store

use crate::constants::registry::{DEFAULT_REGISTRY, DEFAULT_REGISTRY_AUTH_URL, DOCKER_HUB_ALIAS};
use crate::error::{PopulateError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

const DOCKER_CONFIG_FILE: &str = "config.json";
const HELPER_NOT_FOUND: &str = "credentials not found";
const HELPER_PREFIX: &str = "docker-credential-";

/// Basic auth credentials for a registry
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolves credentials for a registry host
#[async_trait]
pub trait Keychain: Send + Sync {
    /// Returns `None` when the store holds nothing for `registry`
    async fn resolve(&self, registry: &str) -> Result<Option<Credentials>>;
}

/// Keychain holding a single set of credentials
#[derive(Debug, Clone)]
pub struct StaticKeychain {
    registry: String,
    credentials: Credentials,
}

impl StaticKeychain {
    pub fn new(registry: &str, username: &str, password: &str) -> Self {
        Self {
            registry: registry.to_string(),
            credentials: Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
        }
    }
}

#[async_trait]
impl Keychain for StaticKeychain {
    async fn resolve(&self, registry: &str) -> Result<Option<Credentials>> {
        if same_registry(&self.registry, registry) {
            Ok(Some(self.credentials.clone()))
        } else {
            Ok(None)
        }
    }
}

/// Keychain backed by the docker CLI config (`$DOCKER_CONFIG/config.json` or `~/.docker/config.json`)
#[derive(Debug, Clone)]
pub struct DockerConfigKeychain {
    config_dir: Option<PathBuf>,
    /// Credential helpers are run as `<prefix><name>`
    helper_prefix: String,
}

impl DockerConfigKeychain {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir: Some(config_dir),
            helper_prefix: HELPER_PREFIX.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let config_dir = env::var_os("DOCKER_CONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".docker")));
        Self {
            config_dir,
            helper_prefix: HELPER_PREFIX.to_string(),
        }
    }

    /// Look credential helpers up under a different program prefix, e.g. a directory path
    pub fn with_helper_prefix(mut self, prefix: &str) -> Self {
        self.helper_prefix = prefix.to_string();
        self
    }

    /// Load the config file; a missing file is an empty config
    async fn load(&self) -> Result<DockerConfig> {
        let Some(dir) = &self.config_dir else {
            return Ok(DockerConfig::default());
        };
        let path = dir.join(DOCKER_CONFIG_FILE);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => DockerConfig::from_json(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No docker config at {}", path.display());
                Ok(DockerConfig::default())
            }
            Err(e) => Err(PopulateError::DockerConfigError(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl Keychain for DockerConfigKeychain {
    #[instrument(skip(self))]
    async fn resolve(&self, registry: &str) -> Result<Option<Credentials>> {
        let config = self.load().await?;

        if let Some(helper) = config.helper_for(registry) {
            debug!("Using credential helper {} for {}", helper, registry);
            let program = format!("{}{}", self.helper_prefix, helper);
            if let Some(credentials) = run_credential_helper(&program, &server_url(registry)).await? {
                return Ok(Some(credentials));
            }
            debug!("Helper {} has no credentials for {}, checking auths", helper, registry);
        }

        config.find_auth(registry)
    }
}

/// The subset of the docker CLI config used for authentication
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerConfig {
    #[serde(default)]
    auths: BTreeMap<String, AuthEntry>,
    #[serde(default)]
    creds_store: Option<String>,
    #[serde(default)]
    cred_helpers: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthEntry {
    #[serde(default)]
    auth: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl DockerConfig {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| PopulateError::DockerConfigError(format!("invalid config: {}", e)))
    }

    fn helper_for(&self, registry: &str) -> Option<&str> {
        self.cred_helpers
            .iter()
            .find(|(key, _)| same_registry(key, registry))
            .map(|(_, helper)| helper.as_str())
            .or(self.creds_store.as_deref())
    }

    /// Credentials stored inline under `auths`
    pub fn find_auth(&self, registry: &str) -> Result<Option<Credentials>> {
        let Some((key, entry)) = self
            .auths
            .iter()
            .find(|(key, _)| same_registry(key, registry))
        else {
            return Ok(None);
        };

        if let Some(auth) = entry.auth.as_deref().filter(|a| !a.is_empty()) {
            return decode_auth(auth)
                .map(Some)
                .map_err(|reason| PopulateError::DockerConfigError(format!("{}: {}", key, reason)));
        }

        match (&entry.username, &entry.password) {
            (Some(username), Some(password)) => Ok(Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            })),
            _ => Ok(None),
        }
    }
}

/// Decode a base64 `user:password` pair
fn decode_auth(auth: &str) -> std::result::Result<Credentials, String> {
    let decoded = STANDARD
        .decode(auth.trim())
        .map_err(|e| format!("invalid base64 auth: {}", e))?;
    let decoded = String::from_utf8(decoded).map_err(|e| format!("invalid auth: {}", e))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| "auth is not in user:password form".to_string())?;

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HelperResponse {
    username: String,
    secret: String,
}

/// Run `<program> get` with the server URL on stdin
async fn run_credential_helper(program: &str, server_url: &str) -> Result<Option<Credentials>> {
    let helper_error = |reason: String| PopulateError::CredentialHelperError {
        helper: program.to_string(),
        reason,
    };

    let mut child = Command::new(program)
        .arg("get")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| helper_error(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(server_url.as_bytes())
            .await
            .map_err(|e| helper_error(e.to_string()))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| helper_error(e.to_string()))?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
        if stdout.contains(HELPER_NOT_FOUND) {
            return Ok(None);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(helper_error(format!(
            "exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let response: HelperResponse =
        serde_json::from_str(&stdout).map_err(|e| helper_error(format!("invalid output: {}", e)))?;

    Ok(Some(Credentials {
        username: response.username,
        password: response.secret,
    }))
}

/// Server URL the docker CLI stores credentials under
fn server_url(registry: &str) -> String {
    if canonical_host(registry) == DEFAULT_REGISTRY {
        DEFAULT_REGISTRY_AUTH_URL.to_string()
    } else {
        registry.to_string()
    }
}

/// Host part of a config key, with Docker Hub aliases folded together
fn canonical_host(key: &str) -> &str {
    let host = key
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = host.split('/').next().unwrap_or(host);

    match host {
        DOCKER_HUB_ALIAS | "registry-1.docker.io" => DEFAULT_REGISTRY,
        _ => host,
    }
}

fn same_registry(key: &str, registry: &str) -> bool {
    canonical_host(key) == canonical_host(registry)
}
