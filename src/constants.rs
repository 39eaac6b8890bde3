// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Namespace the demo scaffolding and images are created in
pub const NAMESPACE: &str = "build-service-visualization";

/// Name of the shared CustomClusterBuilder
pub const BUILDER_NAME: &str = "build-service-visualization-builder";

/// Kind used when images reference the builder
pub const BUILDER_KIND: &str = "CustomClusterBuilder";

/// Stack and store the builder is assembled from
pub const STACK_NAME: &str = "default";
pub const STORE_NAME: &str = "default";

/// Kubernetes annotation keys
pub mod annotations {
    /// Registry the basic-auth secret is valid for
    pub const DOCKER_REGISTRY: &str = "build.pivotal.io/docker";
    /// Previous builder spec, serialized as JSON
    pub const OLD_SPEC: &str = "buildservice.visualization/old-spec";
}

/// Prefixes for server-generated object names
pub mod generate_names {
    pub const SECRET: &str = "pbdemo-dockersecret-";
    pub const SERVICE_ACCOUNT: &str = "pbdemo-serviceaccount-";
}

/// Registry defaults
pub mod registry {
    /// Registry used when a reference has no registry component
    pub const DEFAULT_REGISTRY: &str = "index.docker.io";
    /// Alias users type for the default registry
    pub const DOCKER_HUB_ALIAS: &str = "docker.io";
    /// Auth endpoint recorded for the default registry
    pub const DEFAULT_REGISTRY_AUTH_URL: &str = "https://index.docker.io/v1/";
    pub const DEFAULT_TAG: &str = "latest";
}

/// Image creation pacing
pub mod images {
    /// Pause after each created image
    pub const PAUSE_SECS: u64 = 3;
    /// Consecutive name collisions tolerated before giving up
    pub const MAX_NAME_COLLISIONS: usize = 25;
    /// Tag suffix used for the builder image
    pub const BUILDER_TAG: &str = "builder";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRDs
    pub const POLL_INTERVAL_SECS: u64 = 2;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 16;
    pub const MAX_ATTEMPTS: u32 = 5;
}
