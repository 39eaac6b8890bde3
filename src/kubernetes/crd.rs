// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{MAX_ATTEMPTS, POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::{PopulateError, Result};
use crate::types::{CustomClusterBuilder, Image};
use kube::{discovery::Discovery, Client, Resource};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait for the kpack Image and CustomClusterBuilder CRDs to be served.
/// Polls with exponential backoff and gives up after MAX_ATTEMPTS checks.
pub async fn wait_for_kpack_crds(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    for attempt in 1..=MAX_ATTEMPTS {
        match check_kpack_crds_exist(client).await {
            Ok(true) => {
                info!("kpack CRDs are available");
                return Ok(());
            }
            Ok(false) => {
                info!(
                    "kpack CRDs not yet available (attempt {}/{}), waiting {} seconds...",
                    attempt, MAX_ATTEMPTS, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for kpack CRDs: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        if attempt < MAX_ATTEMPTS {
            sleep(Duration::from_secs(interval)).await;
            interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
        }
    }

    Err(PopulateError::CrdMissing(format!(
        "{} and {} are not served by the cluster, is kpack installed?",
        Image::api_version(&()),
        CustomClusterBuilder::api_version(&())
    )))
}

/// Both kinds must be discoverable in their group/version
async fn check_kpack_crds_exist(client: &Client) -> Result<bool> {
    let image_group = Image::group(&());
    let builder_group = CustomClusterBuilder::group(&());

    let discovery = Discovery::new(client.clone())
        .filter(&[&*image_group, &*builder_group])
        .run()
        .await?;

    Ok(is_served::<Image>(&discovery) && is_served::<CustomClusterBuilder>(&discovery))
}

fn is_served<K: Resource<DynamicType = ()>>(discovery: &Discovery) -> bool {
    let group = K::group(&());
    let version = K::version(&());
    let kind = K::kind(&());

    discovery
        .groups()
        .filter(|g| g.name() == &*group)
        .flat_map(|g| g.versioned_resources(&version))
        .any(|(ar, _)| ar.kind == &*kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{internal_error_json, MockService};
    use serde_json::json;

    const GROUPS: &str = "/apis";
    const IMAGE_RESOURCES: &str = "/apis/build.pivotal.io/v1alpha1";
    const BUILDER_RESOURCES: &str = "/apis/experimental.kpack.pivotal.io/v1alpha1";

    fn api_group(name: &str) -> serde_json::Value {
        let version = json!({
            "groupVersion": format!("{}/v1alpha1", name),
            "version": "v1alpha1"
        });
        json!({
            "name": name,
            "versions": [version.clone()],
            "preferredVersion": version
        })
    }

    fn group_list(groups: &[&str]) -> String {
        json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": groups.iter().map(|g| api_group(g)).collect::<Vec<_>>()
        })
        .to_string()
    }

    fn resource_list(group_version: &str, name: &str, kind: &str, namespaced: bool) -> String {
        json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": group_version,
            "resources": [{
                "name": name,
                "singularName": kind.to_lowercase(),
                "namespaced": namespaced,
                "kind": kind,
                "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
            }]
        })
        .to_string()
    }

    /// Resource lists for both kpack groups; callers queue the group list responses
    fn resources_mock() -> MockService {
        MockService::new()
            .on_get(
                IMAGE_RESOURCES,
                200,
                &resource_list("build.pivotal.io/v1alpha1", "images", "Image", true),
            )
            .on_get(
                BUILDER_RESOURCES,
                200,
                &resource_list(
                    "experimental.kpack.pivotal.io/v1alpha1",
                    "customclusterbuilders",
                    "CustomClusterBuilder",
                    false,
                ),
            )
    }

    #[tokio::test(start_paused = true)]
    async fn test_kpack_crds_served() {
        let mock = resources_mock().on_get(
            GROUPS,
            200,
            &group_list(&["build.pivotal.io", "experimental.kpack.pivotal.io"]),
        );
        let client = mock.clone().into_client();

        wait_for_kpack_crds(&client).await.unwrap();

        assert_eq!(mock.requests_for("GET", GROUPS).len(), 1);
        assert_eq!(mock.requests_for("GET", IMAGE_RESOURCES).len(), 1);
        assert_eq!(mock.requests_for("GET", BUILDER_RESOURCES).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_when_no_groups_are_served() {
        let mock = MockService::new().on_get(GROUPS, 200, &group_list(&[]));
        let client = mock.clone().into_client();

        let err = wait_for_kpack_crds(&client).await.unwrap_err();

        assert!(matches!(err, PopulateError::CrdMissing(ref msg) if msg.contains("is kpack installed?")));
        assert_eq!(mock.requests_for("GET", GROUPS).len(), MAX_ATTEMPTS as usize);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_missing_group_is_not_enough() {
        let mock = resources_mock().on_get(GROUPS, 200, &group_list(&["build.pivotal.io"]));
        let client = mock.clone().into_client();

        let err = wait_for_kpack_crds(&client).await.unwrap_err();

        assert!(matches!(err, PopulateError::CrdMissing(_)));
        assert!(mock.requests_for("GET", BUILDER_RESOURCES).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_errors_are_retried() {
        let mock = resources_mock()
            .on_get(GROUPS, 500, &internal_error_json("etcd unavailable"))
            .on_get(
                GROUPS,
                200,
                &group_list(&["build.pivotal.io", "experimental.kpack.pivotal.io"]),
            );
        let client = mock.clone().into_client();

        wait_for_kpack_crds(&client).await.unwrap();

        assert_eq!(mock.requests_for("GET", GROUPS).len(), 2);
    }
}
