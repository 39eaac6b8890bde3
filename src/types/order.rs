// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Buildpack order of a builder

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered list of buildpack groups, tried in turn during detection
pub type Order = Vec<OrderEntry>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct OrderEntry {
    pub group: Vec<BuildpackRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct BuildpackRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl BuildpackRef {
    pub fn required(id: &str) -> Self {
        Self {
            id: id.to_string(),
            version: None,
            optional: false,
        }
    }

    pub fn optional(id: &str) -> Self {
        Self {
            optional: true,
            ..Self::required(id)
        }
    }
}

/// Load an order from a YAML (or JSON) file
pub fn load_order(path: &Path) -> anyhow::Result<Order> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading order file {}", path.display()))?;
    parse_order(&contents).with_context(|| format!("parsing order file {}", path.display()))
}

/// Accepts either a bare list of groups or a document with an `order` key
pub fn parse_order(contents: &str) -> Result<Order, serde_yaml::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OrderDocument {
        Bare(Order),
        Wrapped { order: Order },
    }

    Ok(match serde_yaml::from_str(contents)? {
        OrderDocument::Bare(order) => order,
        OrderDocument::Wrapped { order } => order,
    })
}

/// Groups able to build the bundled sample applications
pub fn default_order() -> Order {
    let group = |ids: &[&str], optional: &[&str]| OrderEntry {
        group: ids
            .iter()
            .map(|id| BuildpackRef::required(id))
            .chain(optional.iter().map(|id| BuildpackRef::optional(id)))
            .collect(),
    };

    vec![
        group(
            &["org.cloudfoundry.openjdk", "org.cloudfoundry.jvmapplication"],
            &["org.cloudfoundry.buildsystem", "org.cloudfoundry.springboot"],
        ),
        group(&["org.cloudfoundry.node-engine"], &["org.cloudfoundry.npm", "org.cloudfoundry.yarn"]),
        group(&["org.cloudfoundry.go-compiler", "org.cloudfoundry.go-mod"], &[]),
        group(
            &["org.cloudfoundry.dotnet-core-runtime"],
            &["org.cloudfoundry.dotnet-core-conf"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_order() {
        let yaml = r#"
- group:
  - id: org.cloudfoundry.node-engine
    version: 0.0.1
  - id: org.cloudfoundry.npm
    optional: true
"#;
        let order = parse_order(yaml).unwrap();

        assert_eq!(order.len(), 1);
        assert_eq!(order[0].group[0].version.as_deref(), Some("0.0.1"));
        assert!(!order[0].group[0].optional);
        assert!(order[0].group[1].optional);
    }

    #[test]
    fn test_parse_wrapped_order() {
        let yaml = r#"
order:
- group:
  - id: org.cloudfoundry.go-compiler
- group:
  - id: org.cloudfoundry.openjdk
"#;
        let order = parse_order(yaml).unwrap();

        assert_eq!(order.len(), 2);
        assert_eq!(order[1].group[0], BuildpackRef::required("org.cloudfoundry.openjdk"));
    }

    #[test]
    fn test_parse_order_rejects_garbage() {
        assert!(parse_order("order: 12").is_err());
    }

    #[test]
    fn test_serialize_omits_defaults() {
        let json = serde_json::to_value(BuildpackRef::required("a.b")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "a.b"}));

        let json = serde_json::to_value(BuildpackRef::optional("a.b")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "a.b", "optional": true}));
    }

    #[test]
    fn test_default_order_has_group_per_sample() {
        let order = default_order();
        assert_eq!(order.len(), 4);
        assert!(order.iter().all(|entry| entry.group.iter().any(|bp| !bp.optional)));
    }
}
