// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::annotations;
use crate::error::Result;
use crate::types::order::Order;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(
    group = "experimental.kpack.pivotal.io",
    version = "v1alpha1",
    kind = "CustomClusterBuilder"
)]
#[serde(rename_all = "camelCase")]
pub struct CustomClusterBuilderSpec {
    /// Where the assembled builder image is pushed
    pub tag: String,
    pub stack: String,
    pub store: String,
    pub order: Order,
    pub service_account_ref: ObjectReference,
}

impl CustomClusterBuilder {
    /// Record the current spec in the old-spec annotation
    pub fn stash_spec(&mut self) -> Result<()> {
        let old_spec = serde_json::to_string(&self.spec)?;
        self.metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert(annotations::OLD_SPEC.to_string(), old_spec);
        Ok(())
    }

    /// The spec saved by the last update, if any
    pub fn previous_spec(&self) -> Result<Option<CustomClusterBuilderSpec>> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(annotations::OLD_SPEC))
            .map(|s| serde_json::from_str(s))
            .transpose()
            .map_err(Into::into)
    }
}
