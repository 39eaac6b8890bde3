// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Demo image creation

use crate::constants::images::MAX_NAME_COLLISIONS;
use crate::constants::{BUILDER_KIND, BUILDER_NAME};
use crate::error::{is_already_exists, PopulateError, Result};
use crate::names;
use crate::types::{Image, ImageSpec, ImageTaggingStrategy, SourceConfig};
use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::{api::PostParams, Api, Client, ResourceExt};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// A sample application images are built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSource {
    /// Tag suffix identifying the language of the sample
    pub label: &'static str,
    pub url: &'static str,
    pub revision: &'static str,
    pub sub_path: Option<&'static str>,
}

pub const SAMPLE_SOURCES: [SampleSource; 4] = [
    SampleSource {
        label: "java",
        url: "https://github.com/matthewmcnew/sample-java-app",
        revision: "dbba68cee6473b5df51a1a43806d920d2ed4e4ee",
        sub_path: None,
    },
    SampleSource {
        label: "node",
        url: "https://github.com/matthewmcnew/build-samples",
        revision: "a94df327e098fe924b06547a1adf9c3cda5684c9",
        sub_path: None,
    },
    SampleSource {
        label: "go",
        url: "https://github.com/cloudfoundry/go-mod-cnb",
        revision: "master",
        sub_path: Some("integration/testdata/vendored"),
    },
    SampleSource {
        label: "dotnet",
        url: "https://github.com/cloudfoundry/dotnet-core-runtime-cnb",
        revision: "master",
        sub_path: Some("integration/testdata/simple_app"),
    },
];

impl SampleSource {
    pub fn source_config(&self) -> SourceConfig {
        let source = SourceConfig::git(self.url, self.revision);
        match self.sub_path {
            Some(sub_path) => source.with_sub_path(sub_path),
            None => source,
        }
    }
}

/// Pick one of the sample sources uniformly at random
pub fn random_source<R: Rng + ?Sized>(rng: &mut R) -> &'static SampleSource {
    &SAMPLE_SOURCES[rng.gen_range(0..SAMPLE_SOURCES.len())]
}

/// Settings shared by every image of a run
#[derive(Debug, Clone)]
pub struct ImageTemplate {
    pub namespace: String,
    /// Repository the per-sample tags are appended to
    pub repository: String,
    pub service_account: String,
    pub cache_size: Quantity,
}

impl ImageTemplate {
    pub fn image(&self, name: &str, sample: &SampleSource) -> Image {
        let mut image = Image::new(
            name,
            ImageSpec {
                tag: format!("{}:{}", self.repository, sample.label),
                builder: ObjectReference {
                    name: Some(BUILDER_NAME.to_string()),
                    kind: Some(BUILDER_KIND.to_string()),
                    ..Default::default()
                },
                service_account: Some(self.service_account.clone()),
                source: sample.source_config(),
                cache_size: Some(self.cache_size.clone()),
                failed_build_history_limit: None,
                success_build_history_limit: None,
                image_tagging_strategy: ImageTaggingStrategy::None,
            },
        );
        image.metadata.namespace = Some(self.namespace.clone());
        image
    }
}

/// Create `count` images with random names and sources.
/// Name collisions are retried and do not count towards `count`.
#[instrument(skip(client, template, rng), fields(namespace = %template.namespace))]
pub async fn create_images<R: Rng + ?Sized>(
    client: &Client,
    template: &ImageTemplate,
    count: u32,
    pause: Duration,
    rng: &mut R,
) -> Result<Vec<String>> {
    let images: Api<Image> = Api::namespaced(client.clone(), &template.namespace);
    let mut created = Vec::new();
    let mut collisions = 0;

    while created.len() < count as usize {
        let sample = random_source(rng);
        let name = names::generate(rng);

        match images
            .create(&PostParams::default(), &template.image(&name, sample))
            .await
        {
            Ok(image) => {
                collisions = 0;
                info!("Created image {}", image.name_any());
                created.push(image.name_any());
                sleep(pause).await;
            }
            Err(e) if is_already_exists(&e) => {
                collisions += 1;
                if collisions >= MAX_NAME_COLLISIONS {
                    return Err(PopulateError::NameCollisions(collisions));
                }
                debug!("Image name {} is taken, retrying with a new name", name);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(created)
}
