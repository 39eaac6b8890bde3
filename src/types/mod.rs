// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! kpack custom resources used by the populator.

pub mod builder;
pub mod image;
pub mod order;

pub use builder::{CustomClusterBuilder, CustomClusterBuilderSpec};
pub use image::{Git, Image, ImageSpec, ImageTaggingStrategy, SourceConfig};
pub use order::{default_order, load_order, parse_order, BuildpackRef, Order, OrderEntry};
