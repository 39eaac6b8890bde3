// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Image reference parsing
//!
//! References are parsed leniently: the tag is optional, a missing registry
//! means Docker Hub, and single-component Docker Hub repositories live under
//! `library/`.

use crate::constants::registry::{DEFAULT_REGISTRY, DEFAULT_TAG, DOCKER_HUB_ALIAS};
use crate::error::{PopulateError, Result};
use std::fmt;
use url::Url;

const REPOSITORY_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789_-./";
const MAX_TAG_LEN: usize = 128;

/// Tag or digest part of a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Tag(String),
    Digest(String),
}

/// A parsed image reference such as `gcr.io/project/app:1.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: String,
    repository: String,
    identifier: Identifier,
    /// The reference as written, without tag or digest
    repository_name: String,
}

impl ImageReference {
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = |reason: &str| PopulateError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        if reference.is_empty() {
            return Err(invalid("reference is empty"));
        }

        let (name, identifier) = match reference.split_once('@') {
            Some((name, digest)) => {
                validate_digest(digest).map_err(|r| invalid(&r))?;
                // A tag next to a digest is dropped
                let (name, _) = split_tag(name).map_err(|r| invalid(&r))?;
                (name, Identifier::Digest(digest.to_string()))
            }
            None => split_tag(reference).map_err(|r| invalid(&r))?,
        };

        let (registry, repository) = split_registry(name);
        let registry = normalize_registry(registry).map_err(|r| invalid(&r))?;

        let repository = if registry == DEFAULT_REGISTRY && !repository.contains('/') {
            format!("library/{}", repository)
        } else {
            repository.to_string()
        };
        validate_repository(&repository).map_err(|r| invalid(&r))?;

        Ok(ImageReference {
            registry,
            repository,
            identifier,
            repository_name: name.to_string(),
        })
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    /// Fully qualified `registry/repository`
    pub fn context(&self) -> String {
        format!("{}/{}", self.registry, self.repository)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Identifier::Tag(tag) => write!(f, "{}:{}", self.context(), tag),
            Identifier::Digest(digest) => write!(f, "{}@{}", self.context(), digest),
        }
    }
}

/// A colon after the last slash starts the tag; earlier colons belong to a registry port.
/// An empty tag means the default one.
fn split_tag(reference: &str) -> std::result::Result<(&str, Identifier), String> {
    let last_slash = reference.rfind('/');
    match reference.rfind(':') {
        Some(colon) if last_slash.map_or(true, |slash| colon > slash) => {
            let tag = &reference[colon + 1..];
            if tag.is_empty() {
                return Ok((&reference[..colon], Identifier::Tag(DEFAULT_TAG.to_string())));
            }
            validate_tag(tag)?;
            Ok((&reference[..colon], Identifier::Tag(tag.to_string())))
        }
        _ => Ok((reference, Identifier::Tag(DEFAULT_TAG.to_string()))),
    }
}

fn split_registry(name: &str) -> (&str, &str) {
    match name.split_once('/') {
        Some((first, rest))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            (first, rest)
        }
        _ => (DEFAULT_REGISTRY, name),
    }
}

fn normalize_registry(registry: &str) -> std::result::Result<String, String> {
    if registry == DOCKER_HUB_ALIAS {
        return Ok(DEFAULT_REGISTRY.to_string());
    }

    let url = Url::parse(&format!("https://{}", registry))
        .map_err(|e| format!("invalid registry {}: {}", registry, e))?;
    if url.path() != "/" || url.query().is_some() || !url.username().is_empty() {
        return Err(format!("invalid registry {}", registry));
    }

    Ok(registry.to_string())
}

fn validate_repository(repository: &str) -> std::result::Result<(), String> {
    if repository.is_empty() {
        return Err("repository is empty".to_string());
    }
    if let Some(c) = repository.chars().find(|c| !REPOSITORY_CHARS.contains(*c)) {
        return Err(format!("repository contains invalid character {:?}", c));
    }
    if repository.split('/').any(str::is_empty) {
        return Err("repository has an empty path component".to_string());
    }
    Ok(())
}

fn validate_tag(tag: &str) -> std::result::Result<(), String> {
    let mut chars = tag.chars();
    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if !valid_first || !valid_rest || tag.len() > MAX_TAG_LEN {
        return Err(format!("invalid tag {:?}", tag));
    }
    Ok(())
}

fn validate_digest(digest: &str) -> std::result::Result<(), String> {
    let Some((algorithm, hex)) = digest.split_once(':') else {
        return Err(format!("invalid digest {:?}", digest));
    };
    if algorithm != "sha256" || hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("unsupported digest {:?}", digest));
    }
    Ok(())
}
