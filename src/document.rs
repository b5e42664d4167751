//! In-memory OpenAPI document model.
//!
//! The model is deliberately open: every object carries a flattened `extra`
//! map so fields the pipeline does not touch survive a load → normalize →
//! emit round trip unchanged. Key order is preserved end to end because
//! `serde_json` is built with `preserve_order`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP method keys recognized inside a path item. Everything else on a path
/// item (`parameters`, `servers`, `description`, ...) is not an operation.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A loaded OpenAPI/Swagger document.
///
/// Owned exclusively by one pipeline run: constructed by the parser, mutated
/// in place by the server normalizer, then handed read-only to the reporter
/// or serializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// OpenAPI 3.x version marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    /// Swagger 2.0 version marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    /// Ordered server list; index 0 is the primary candidate for the
    /// induction and root-override steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,
    /// Path items keyed by route template, in document encounter order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// Everything else (security, webhooks, extensions, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A declared base URL the API can be reached at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Server {
            url: url.into(),
            extra: Map::new(),
        }
    }
}

/// The document's `info` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Named schemas in insertion order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed view over a single path × method operation object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Iterates every path × method operation in document encounter order.
    ///
    /// Path-item keys that are not HTTP methods are skipped, as are method
    /// entries that do not hold an object.
    pub fn operations(&self) -> Vec<(String, String, Operation)> {
        let mut out = Vec::new();
        let Some(paths) = &self.paths else {
            return out;
        };
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                continue;
            };
            for (method, value) in item {
                if !HTTP_METHODS.contains(&method.as_str()) {
                    continue;
                }
                if let Ok(op) = serde_json::from_value::<Operation>(value.clone()) {
                    out.push((path.clone(), method.clone(), op));
                }
            }
        }
        out
    }
}
