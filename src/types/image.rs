// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "build.pivotal.io", version = "v1alpha1", kind = "Image")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    /// Registry location the built image is pushed to
    pub tag: String,
    pub builder: ObjectReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
    pub source: SourceConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_build_history_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_build_history_limit: Option<i64>,
    #[serde(default)]
    pub image_tagging_strategy: ImageTaggingStrategy,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<Git>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct Git {
    pub url: String,
    pub revision: String,
}

/// Whether builds push additional tags besides `spec.tag`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum ImageTaggingStrategy {
    #[default]
    None,
    BuildNumber,
}

impl SourceConfig {
    pub fn git(url: &str, revision: &str) -> Self {
        Self {
            git: Some(Git {
                url: url.to_string(),
                revision: revision.to_string(),
            }),
            sub_path: None,
        }
    }

    pub fn with_sub_path(mut self, sub_path: &str) -> Self {
        self.sub_path = Some(sub_path.to_string());
        self
    }

    pub fn git_url(&self) -> Option<&str> {
        self.git.as_ref().map(|g| g.url.as_str())
    }
}
