// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry secret and service account scaffolding for image builds

use crate::config::Config;
use crate::constants::{annotations, generate_names};
use crate::error::Result;
use k8s_openapi::api::core::v1::{ObjectReference, Secret, ServiceAccount};
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client, ResourceExt,
};
use std::collections::BTreeMap;
use tracing::{info, instrument};

const BASIC_AUTH_TYPE: &str = "kubernetes.io/basic-auth";

/// Create a basic-auth secret holding the registry credentials
#[instrument(skip(client, config), fields(registry = %config.registry))]
pub async fn create_registry_secret(
    client: &Client,
    namespace: &str,
    config: &Config,
) -> Result<Secret> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let secret = secrets
        .create(&PostParams::default(), &registry_secret(config))
        .await?;

    info!("Created registry secret {}/{}", namespace, secret.name_any());
    Ok(secret)
}

/// Create a service account that exposes `secret_name` to builds
#[instrument(skip(client))]
pub async fn create_service_account(
    client: &Client,
    namespace: &str,
    secret_name: &str,
) -> Result<ServiceAccount> {
    let service_accounts: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);
    let service_account = service_accounts
        .create(&PostParams::default(), &build_service_account(secret_name))
        .await?;

    info!(
        "Created service account {}/{}",
        namespace,
        service_account.name_any()
    );
    Ok(service_account)
}

fn registry_secret(config: &Config) -> Secret {
    Secret {
        metadata: ObjectMeta {
            generate_name: Some(generate_names::SECRET.to_string()),
            annotations: Some(BTreeMap::from([(
                annotations::DOCKER_REGISTRY.to_string(),
                config.registry.clone(),
            )])),
            ..Default::default()
        },
        string_data: Some(BTreeMap::from([
            ("username".to_string(), config.username.clone()),
            ("password".to_string(), config.password.clone()),
        ])),
        type_: Some(BASIC_AUTH_TYPE.to_string()),
        ..Default::default()
    }
}

fn build_service_account(secret_name: &str) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta {
            generate_name: Some(generate_names::SERVICE_ACCOUNT.to_string()),
            ..Default::default()
        },
        secrets: Some(vec![ObjectReference {
            name: Some(secret_name.to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    }
}
