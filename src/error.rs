// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopulateError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to build kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Could not parse image reference {reference}: {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Could not find credentials for registry {0}")]
    MissingCredentials(String),

    #[error("Could not read docker config: {0}")]
    DockerConfigError(String),

    #[error("Credential helper {helper} failed: {reason}")]
    CredentialHelperError { helper: String, reason: String },

    #[error("Invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: String, reason: String },

    #[error("Required CRDs missing: {0}")]
    CrdMissing(String),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("Gave up generating a unique image name after {0} collisions")]
    NameCollisions(usize),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PopulateError>;

/// True when the API server rejected a create because the name is taken
pub fn is_already_exists(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 409)
}

/// True when the API server reported the object as missing
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}
