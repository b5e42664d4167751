//! Read-only text projections over a resolved document.
//!
//! Each projection returns the lines to print rather than printing them, so
//! the console wiring stays in `cli` and the projections stay testable.

use crate::document::{Document, Operation};
use std::collections::HashSet;

/// Info block summary: title, version, description, contact and external
/// docs. Absent fields are omitted entirely.
pub fn info_lines(document: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(info) = &document.info {
        if let Some(title) = &info.title {
            lines.push(format!("title: {title}"));
        }
        if let Some(version) = &info.version {
            lines.push(format!("version: {version}"));
        }
        if let Some(description) = &info.description {
            lines.push(format!("description: {description}"));
        }
        if let Some(contact) = &info.contact {
            match (&contact.name, &contact.email) {
                (Some(name), Some(email)) => lines.push(format!("contact: {name} <{email}>")),
                (Some(name), None) => lines.push(format!("contact: {name}")),
                (None, Some(email)) => lines.push(format!("contact: {email}")),
                (None, None) => {}
            }
            if let Some(url) = &contact.url {
                lines.push(format!("website: {url}"));
            }
        }
    }
    if let Some(url) = document.external_docs.as_ref().and_then(|d| d.url.as_ref()) {
        lines.push(format!("docs: {url}"));
    }
    lines
}

/// Tag-grouped operation listing.
///
/// Tag order is first the document's declared tag list, then ad-hoc tags in
/// the order first seen while scanning operations. Routes within a tag keep
/// document encounter order. Untagged operations land under `default`.
pub fn operation_lines(document: &Document) -> Vec<String> {
    // Seeded with declared tags so tags without operations still group.
    let mut groups: Vec<(String, Vec<String>)> = document
        .tags
        .iter()
        .flatten()
        .map(|tag| (tag.name.clone(), Vec::new()))
        .collect();

    for (path, method, op) in document.operations() {
        let mut route = format!("{} {}", method.to_uppercase(), path);
        if let Some(text) = op.summary.as_deref().or(op.description.as_deref()) {
            route = format!("{route} - {text}");
        }
        if let Some(id) = &op.operation_id {
            route = format!("{route} ({id})");
        }
        let tags = match &op.tags {
            Some(tags) if !tags.is_empty() => tags.clone(),
            _ => vec!["default".to_string()],
        };
        for tag in tags {
            match groups.iter_mut().find(|(name, _)| *name == tag) {
                Some((_, routes)) => routes.push(route.clone()),
                None => groups.push((tag, vec![route.clone()])),
            }
        }
    }

    let mut lines = vec!["Operations:".to_string()];
    for (_, routes) in &groups {
        for route in routes {
            lines.push(format!("- {route}"));
        }
    }
    lines
}

/// Named schema listing, only when the document declares any.
pub fn schema_lines(document: &Document) -> Vec<String> {
    let Some(schemas) = document
        .components
        .as_ref()
        .and_then(|c| c.schemas.as_ref())
    else {
        return Vec::new();
    };
    if schemas.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("Schemas ({}):", schemas.len())];
    for name in schemas.keys() {
        lines.push(format!("- {name}"));
    }
    lines
}

/// Flattens every path × method operation, deduplicated by operation id with
/// the first occurrence winning. Operations without an id are keyed by
/// method and path so they never shadow each other.
pub fn collect_operations(document: &Document) -> Vec<Operation> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (path, method, op) in document.operations() {
        let key = op
            .operation_id
            .clone()
            .unwrap_or_else(|| format!("{} {}", method.to_uppercase(), path));
        if seen.insert(key) {
            out.push(op);
        }
    }
    out
}
