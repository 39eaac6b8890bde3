// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-update of the shared builder

use crate::error::{is_not_found, Result};
use crate::types::CustomClusterBuilder;
use kube::{api::PostParams, Api, Client, ResourceExt};
use tracing::{info, instrument};

/// Create the builder, or replace the spec of an existing one.
/// The replaced spec is kept in the old-spec annotation.
#[instrument(skip_all, fields(builder = %builder.name_any()))]
pub async fn save_builder(
    client: &Client,
    builder: CustomClusterBuilder,
) -> Result<CustomClusterBuilder> {
    let builders: Api<CustomClusterBuilder> = Api::all(client.clone());
    let name = builder.name_any();

    match builders.get(&name).await {
        Ok(mut existing) => {
            existing.stash_spec()?;
            existing.spec = builder.spec;

            let updated = builders
                .replace(&name, &PostParams::default(), &existing)
                .await?;
            info!("Updated builder {}", name);
            Ok(updated)
        }
        Err(e) if is_not_found(&e) => {
            let created = builders.create(&PostParams::default(), &builder).await?;
            info!("Created builder {}", name);
            Ok(created)
        }
        Err(e) => Err(e.into()),
    }
}
