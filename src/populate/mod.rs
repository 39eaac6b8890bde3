// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Seeding of the demo namespace: scaffolding, the shared builder and images.

pub mod builder;
pub mod images;

pub use builder::save_builder;
pub use images::{create_images, random_source, ImageTemplate, SampleSource, SAMPLE_SOURCES};

use crate::config::Config;
use crate::constants::images::{BUILDER_TAG, PAUSE_SECS};
use crate::constants::{BUILDER_NAME, NAMESPACE, STACK_NAME, STORE_NAME};
use crate::error::Result;
use crate::kubernetes::{create_registry_secret, create_service_account, ensure_namespace_exists};
use crate::quantity::parse_quantity;
use crate::registry::Keychain;
use crate::types::{CustomClusterBuilder, CustomClusterBuilderSpec, Order};
use k8s_openapi::api::core::v1::ObjectReference;
use kube::{Client, ResourceExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{info, instrument};

/// Parameters of a populate run
#[derive(Debug, Clone)]
pub struct PopulateOptions {
    pub count: u32,
    pub order: Order,
    pub image_tag: String,
    /// Build cache size, e.g. `1Gi`
    pub cache_size: String,
    /// Pause after each created image
    pub pause: Duration,
}

impl PopulateOptions {
    pub fn new(count: u32, order: Order, image_tag: &str, cache_size: &str) -> Self {
        Self {
            count,
            order,
            image_tag: image_tag.to_string(),
            cache_size: cache_size.to_string(),
            pause: Duration::from_secs(PAUSE_SECS),
        }
    }
}

/// Seed the cluster and return the names of the created images
pub async fn populate(
    client: &Client,
    keychain: &dyn Keychain,
    options: PopulateOptions,
) -> Result<Vec<String>> {
    let mut rng = StdRng::from_entropy();
    populate_with_rng(client, keychain, options, &mut rng).await
}

#[instrument(skip_all, fields(count = options.count, image_tag = %options.image_tag))]
pub async fn populate_with_rng<R: Rng + ?Sized>(
    client: &Client,
    keychain: &dyn Keychain,
    options: PopulateOptions,
    rng: &mut R,
) -> Result<Vec<String>> {
    let config = Config::load(options.count, &options.image_tag, keychain).await?;

    ensure_namespace_exists(client, NAMESPACE).await?;
    let secret = create_registry_secret(client, NAMESPACE, &config).await?;
    let service_account = create_service_account(client, NAMESPACE, &secret.name_any()).await?;

    let builder = CustomClusterBuilder::new(
        BUILDER_NAME,
        CustomClusterBuilderSpec {
            tag: config.tag(BUILDER_TAG),
            stack: STACK_NAME.to_string(),
            store: STORE_NAME.to_string(),
            order: options.order,
            service_account_ref: ObjectReference {
                namespace: Some(
                    service_account
                        .namespace()
                        .unwrap_or_else(|| NAMESPACE.to_string()),
                ),
                name: Some(service_account.name_any()),
                ..Default::default()
            },
        },
    );
    save_builder(client, builder).await?;

    let template = ImageTemplate {
        namespace: NAMESPACE.to_string(),
        repository: config.repository.clone(),
        service_account: service_account.name_any(),
        cache_size: parse_quantity(&options.cache_size)?,
    };

    let created = create_images(client, &template, config.count, options.pause, rng).await?;
    info!("Created {} images in namespace {}", created.len(), NAMESPACE);
    Ok(created)
}
