// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::{is_already_exists, PopulateError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Ensure a namespace exists in the cluster; an existing one is left untouched
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(_) => {
            info!("Namespace {} created successfully", namespace);
            Ok(())
        }
        Err(e) if is_already_exists(&e) => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Err(e) => Err(PopulateError::NamespaceError(format!(
            "Failed to create namespace {}: {}",
            namespace, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{already_exists_json, internal_error_json, MockService};

    const PATH: &str = "/api/v1/namespaces";

    #[tokio::test]
    async fn test_creates_missing_namespace() {
        let mock = MockService::new().on_post_echo(PATH);
        let client = mock.clone().into_client();

        ensure_namespace_exists(&client, "demo").await.unwrap();

        let requests = mock.requests_for("POST", PATH);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].json()["metadata"]["name"], "demo");
    }

    #[tokio::test]
    async fn test_existing_namespace_is_ok() {
        let client = MockService::new()
            .on_post(PATH, 409, &already_exists_json("namespaces", "demo"))
            .into_client();

        ensure_namespace_exists(&client, "demo").await.unwrap();
    }

    #[tokio::test]
    async fn test_other_errors_fail() {
        let client = MockService::new()
            .on_post(PATH, 500, &internal_error_json("etcd unavailable"))
            .into_client();

        let err = ensure_namespace_exists(&client, "demo").await.unwrap_err();

        assert!(matches!(err, PopulateError::NamespaceError(_)));
    }
}
