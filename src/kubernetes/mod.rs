// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, CRD discovery and demo scaffolding.

pub mod client;
pub mod crd;
pub mod namespaces;
pub mod service_accounts;

pub use client::create_client;
pub use crd::wait_for_kpack_crds;
pub use namespaces::ensure_namespace_exists;
pub use service_accounts::{create_registry_secret, create_service_account};
