// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kpack_populate::constants::images::PAUSE_SECS;
use kpack_populate::kubernetes::{create_client, wait_for_kpack_crds};
use kpack_populate::populate::{populate, PopulateOptions};
use kpack_populate::registry::{DockerConfigKeychain, ImageReference, Keychain, StaticKeychain};
use kpack_populate::types::{default_order, load_order};

/// Seed a cluster with a kpack builder and demo images.
#[derive(Parser)]
#[command(name = "kpack-populate")]
#[command(about = "Create demo kpack images from sample applications")]
#[command(version)]
struct Cli {
    /// Number of images to create
    #[arg(short, long, env = "POPULATE_COUNT", default_value_t = 5)]
    count: u32,

    /// Repository the builder and images are pushed to, e.g. gcr.io/project/app
    #[arg(short = 't', long, env = "POPULATE_IMAGE_TAG")]
    image_tag: String,

    /// Build cache size of each image
    #[arg(long, env = "POPULATE_CACHE_SIZE", default_value = "500Mi")]
    cache_size: String,

    /// Buildpack order file (YAML or JSON); the built-in order is used when omitted
    #[arg(short, long, env = "POPULATE_ORDER")]
    order: Option<PathBuf>,

    /// Seconds to wait after each created image
    #[arg(long, default_value_t = PAUSE_SECS)]
    pause_secs: u64,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    context: Option<String>,

    /// Registry username, used instead of the docker credential store
    #[arg(long, env = "REGISTRY_USERNAME", requires = "registry_password")]
    registry_username: Option<String>,

    /// Registry password
    #[arg(
        long,
        env = "REGISTRY_PASSWORD",
        hide_env_values = true,
        requires = "registry_username"
    )]
    registry_password: Option<String>,

    /// Do not wait for the kpack CRDs before creating resources
    #[arg(long)]
    skip_crd_check: bool,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("count", &self.count)
            .field("image_tag", &self.image_tag)
            .field("cache_size", &self.cache_size)
            .field("order", &self.order)
            .field("pause_secs", &self.pause_secs)
            .field("context", &self.context)
            .field("registry_username", &self.registry_username)
            .field(
                "registry_password",
                &self.registry_password.as_ref().map(|_| "<redacted>"),
            )
            .field("skip_crd_check", &self.skip_crd_check)
            .finish()
    }
}

impl Cli {
    fn keychain(&self) -> Result<Box<dyn Keychain>> {
        match (&self.registry_username, &self.registry_password) {
            (Some(username), Some(password)) => {
                let reference = ImageReference::parse(&self.image_tag)?;
                Ok(Box::new(StaticKeychain::new(
                    reference.registry(),
                    username,
                    password,
                )))
            }
            _ => Ok(Box::new(DockerConfigKeychain::from_env())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let order = match &cli.order {
        Some(path) => load_order(path)?,
        None => default_order(),
    };
    info!("Using an order of {} buildpack groups", order.len());

    let keychain = cli.keychain()?;

    let client = create_client(cli.context.as_deref())
        .await
        .context("building kubeconfig")?;
    info!("Connected to Kubernetes cluster");

    if !cli.skip_crd_check {
        wait_for_kpack_crds(&client).await?;
    }

    let options = PopulateOptions {
        pause: Duration::from_secs(cli.pause_secs),
        ..PopulateOptions::new(cli.count, order, &cli.image_tag, &cli.cache_size)
    };

    let created = populate(&client, keychain.as_ref(), options).await?;
    info!("Done, created images: {}", created.join(", "));
    Ok(())
}
