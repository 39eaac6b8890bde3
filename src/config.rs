// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::registry::{DEFAULT_REGISTRY, DEFAULT_REGISTRY_AUTH_URL};
use crate::error::{PopulateError, Result};
use crate::registry::{ImageReference, Keychain};
use std::fmt;
use tracing::{debug, instrument};

/// Run configuration, derived once from the entry point parameters
#[derive(Clone)]
pub struct Config {
    /// Registry URL recorded on the docker secret
    pub registry: String,
    pub username: String,
    pub password: String,
    /// Image tag as passed by the user
    pub image_tag: String,
    /// Repository the builder and image tags are derived from
    pub repository: String,
    /// Number of images to create
    pub count: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("registry", &self.registry)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("image_tag", &self.image_tag)
            .field("repository", &self.repository)
            .field("count", &self.count)
            .finish()
    }
}

impl Config {
    /// Parse the image tag and resolve registry credentials for it
    #[instrument(skip(keychain))]
    pub async fn load(count: u32, image_tag: &str, keychain: &dyn Keychain) -> Result<Self> {
        let reference = ImageReference::parse(image_tag)?;

        let credentials = keychain
            .resolve(reference.registry())
            .await?
            .ok_or_else(|| PopulateError::MissingCredentials(reference.registry().to_string()))?;

        debug!(
            "Resolved credentials for registry {} (user {})",
            reference.registry(),
            credentials.username
        );

        Ok(Config {
            registry: registry_url(reference.registry()),
            username: credentials.username,
            password: credentials.password,
            image_tag: image_tag.to_string(),
            repository: reference.repository_name().to_string(),
            count,
        })
    }

    /// Tag for an image built from this run's repository
    pub fn tag(&self, suffix: &str) -> String {
        format!("{}:{}", self.repository, suffix)
    }
}

/// The default registry is recorded by its v1 auth endpoint
fn registry_url(registry: &str) -> String {
    if registry == DEFAULT_REGISTRY {
        DEFAULT_REGISTRY_AUTH_URL.to_string()
    } else {
        registry.to_string()
    }
}
