// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Image reference parsing and registry credential resolution.

pub mod keychain;
pub mod reference;

pub use keychain::{Credentials, DockerConfig, DockerConfigKeychain, Keychain, StaticKeychain};
pub use reference::{Identifier, ImageReference};
