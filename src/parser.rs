//! Obtains a [`Document`] from a definition source in one of four parse
//! modes.
//!
//! The actual parsing engine sits behind the narrow [`ParserBackend`]
//! capability trait so the normalization and reporting logic is decoupled
//! from any specific OpenAPI implementation. [`SpecEngine`] is the shipped
//! backend: it loads local files and remote URLs (with optional request
//! headers applied to every fetch), normalizes JSON/YAML syntax, and
//! resolves `$ref` pointers for the bundle and dereference modes.

use crate::document::Document;
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Parsing capability applied to a definition source.
///
/// Exactly one mode is active per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Load and normalize syntax only; `$ref`s are left unresolved
    Parse,
    /// Inline references that point outside the root document, keep
    /// intra-document references as local pointers
    Bundle,
    /// Resolve every reference, including intra-document ones
    Dereference,
    /// Dereference, then run schema conformance checks
    Validate,
}

impl ParseMode {
    /// Derives the mode from the mutually-exclusive boolean flags.
    ///
    /// Checks are applied in order, so when more than one flag is set the
    /// last applicable one wins: Validate > Dereference > Bundle > Parse.
    pub fn from_flags(bundle: bool, dereference: bool, validate: bool) -> Self {
        let mut mode = ParseMode::Parse;
        if bundle {
            mode = ParseMode::Bundle;
        }
        if dereference {
            mode = ParseMode::Dereference;
        }
        if validate {
            mode = ParseMode::Validate;
        }
        mode
    }
}

/// Options handed to the parsing backend.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Request headers attached to every outbound fetch, for the root
    /// document and for every externally referenced sub-document alike.
    pub headers: HeaderMap,
}

/// Narrow capability interface over an OpenAPI parsing engine.
pub trait ParserBackend {
    fn parse(&self, source: &str, opts: &ParserOptions) -> Result<Document>;
    fn bundle(&self, source: &str, opts: &ParserOptions) -> Result<Document>;
    fn dereference(&self, source: &str, opts: &ParserOptions) -> Result<Document>;
    fn validate(&self, source: &str, opts: &ParserOptions) -> Result<Document>;
}

/// Obtains a document from `source` by dispatching one mode to the backend.
pub fn parse_definition<B: ParserBackend>(
    backend: &B,
    source: &str,
    mode: ParseMode,
    opts: &ParserOptions,
) -> Result<Document> {
    debug!("Parsing {} in {:?} mode", source, mode);
    match mode {
        ParseMode::Parse => backend.parse(source, opts),
        ParseMode::Bundle => backend.bundle(source, opts),
        ParseMode::Dereference => backend.dereference(source, opts),
        ParseMode::Validate => backend.validate(source, opts),
    }
}

/// Whether a definition reference points at a remote location.
///
/// Classified by prefix inspection: fully-qualified (`http...`) or
/// protocol-relative (`//host/...`).
pub fn is_remote_reference(reference: &str) -> bool {
    reference.starts_with("http") || reference.starts_with("//")
}

/// The shipped [`ParserBackend`].
#[derive(Debug, Default)]
pub struct SpecEngine;

impl SpecEngine {
    fn load_document(
        &self,
        source: &str,
        opts: &ParserOptions,
        resolve: Option<bool>,
    ) -> Result<Document> {
        let mut resolver = Resolver::new(source, opts)?;
        let mut root = resolver.load(source)?;
        if let Some(resolve_internal) = resolve {
            // Pointer lookups run against a pre-resolution snapshot.
            let snapshot = root.clone();
            let mut stack = Vec::new();
            resolver.resolve_node(&mut root, source, &snapshot, resolve_internal, &mut stack)?;
        }
        serde_json::from_value(root).map_err(|e| Error::Syntax {
            reference: source.to_string(),
            message: e.to_string(),
        })
    }
}

impl ParserBackend for SpecEngine {
    fn parse(&self, source: &str, opts: &ParserOptions) -> Result<Document> {
        self.load_document(source, opts, None)
    }

    fn bundle(&self, source: &str, opts: &ParserOptions) -> Result<Document> {
        self.load_document(source, opts, Some(false))
    }

    fn dereference(&self, source: &str, opts: &ParserOptions) -> Result<Document> {
        self.load_document(source, opts, Some(true))
    }

    fn validate(&self, source: &str, opts: &ParserOptions) -> Result<Document> {
        let document = self.load_document(source, opts, Some(true))?;
        check_conformance(&document)?;
        Ok(document)
    }
}

/// Structural conformance checks applied in validate mode.
fn check_conformance(document: &Document) -> Result<()> {
    let mut missing = Vec::new();
    if document.openapi.is_none() && document.swagger.is_none() {
        missing.push("an `openapi` or `swagger` version field");
    }
    let info = document.info.as_ref();
    if info.and_then(|i| i.title.as_ref()).is_none() {
        missing.push("`info.title`");
    }
    if info.and_then(|i| i.version.as_ref()).is_none() {
        missing.push("`info.version`");
    }
    if document.paths.is_none() {
        missing.push("a `paths` object");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "document is missing {}",
            missing.join(", ")
        )))
    }
}

/// Fetches, caches and resolves documents for one parse run.
struct Resolver {
    client: Client,
    /// Loaded documents keyed by absolute location
    cache: HashMap<String, Value>,
}

impl Resolver {
    fn new(source: &str, opts: &ParserOptions) -> Result<Self> {
        let client = Client::builder()
            .default_headers(opts.headers.clone())
            .build()
            .map_err(|e| Error::Resolution {
                reference: source.to_string(),
                message: e.to_string(),
            })?;
        Ok(Resolver {
            client,
            cache: HashMap::new(),
        })
    }

    /// Loads a document (from cache, disk or network) and parses its syntax.
    fn load(&mut self, location: &str) -> Result<Value> {
        if let Some(cached) = self.cache.get(location) {
            return Ok(cached.clone());
        }
        let body = self.fetch(location)?;
        let value = parse_text(location, &body)?;
        self.cache.insert(location.to_string(), value.clone());
        Ok(value)
    }

    fn fetch(&self, location: &str) -> Result<String> {
        let resolution_error = |message: String| Error::Resolution {
            reference: location.to_string(),
            message,
        };
        if is_remote_reference(location) {
            // Protocol-relative references are fetched over https.
            let url = if let Some(rest) = location.strip_prefix("//") {
                format!("https://{rest}")
            } else {
                location.to_string()
            };
            debug!("Fetching {}", url);
            let response = self
                .client
                .get(&url)
                .send()
                .map_err(|e| resolution_error(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(resolution_error(format!("HTTP {status}")));
            }
            response.text().map_err(|e| resolution_error(e.to_string()))
        } else {
            debug!("Reading {}", location);
            fs::read_to_string(location).map_err(|e| resolution_error(e.to_string()))
        }
    }

    /// Replaces `$ref` nodes in place.
    ///
    /// External references are always inlined; their subtrees are resolved
    /// fully (including refs local to the referenced document) so the inlined
    /// copy stays self-contained. Intra-document pointers are resolved only
    /// when `resolve_internal` is set. The `stack` of in-flight reference
    /// keys is the cycle guard: a reference already on the stack is left as a
    /// pointer instead of expanding forever.
    fn resolve_node(
        &mut self,
        node: &mut Value,
        location: &str,
        root: &Value,
        resolve_internal: bool,
        stack: &mut Vec<String>,
    ) -> Result<()> {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    let reference = reference.clone();

                    if let Some(fragment) = reference.strip_prefix('#') {
                        if !resolve_internal {
                            return Ok(());
                        }
                        let key = format!("{location}#{fragment}");
                        if stack.contains(&key) {
                            return Ok(());
                        }
                        let target =
                            root.pointer(fragment).ok_or_else(|| Error::Resolution {
                                reference: reference.clone(),
                                message: format!("unresolved pointer in {location}"),
                            })?;
                        let mut resolved = target.clone();
                        stack.push(key);
                        self.resolve_node(&mut resolved, location, root, resolve_internal, stack)?;
                        stack.pop();
                        *node = resolved;
                        return Ok(());
                    }

                    let (target_ref, fragment) = match reference.split_once('#') {
                        Some((l, f)) => (l, f),
                        None => (reference.as_str(), ""),
                    };
                    let target_location = join_location(location, target_ref);
                    let key = format!("{target_location}#{fragment}");
                    if stack.contains(&key) {
                        return Ok(());
                    }
                    let target_root = self.load(&target_location)?;
                    let target = if fragment.is_empty() {
                        target_root.clone()
                    } else {
                        target_root
                            .pointer(fragment)
                            .cloned()
                            .ok_or_else(|| Error::Resolution {
                                reference: reference.clone(),
                                message: format!("unresolved pointer in {target_location}"),
                            })?
                    };
                    let mut resolved = target;
                    stack.push(key);
                    self.resolve_node(&mut resolved, &target_location, &target_root, true, stack)?;
                    stack.pop();
                    *node = resolved;
                    return Ok(());
                }

                for value in map.values_mut() {
                    self.resolve_node(value, location, root, resolve_internal, stack)?;
                }
            }
            Value::Array(items) => {
                for value in items.iter_mut() {
                    self.resolve_node(value, location, root, resolve_internal, stack)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Parses a JSON or YAML body into a `Value`, keyed off the leading brace.
fn parse_text(reference: &str, body: &str) -> Result<Value> {
    let syntax_error = |message: String| Error::Syntax {
        reference: reference.to_string(),
        message,
    };
    if body.trim_start().starts_with('{') {
        serde_json::from_str(body).map_err(|e| syntax_error(e.to_string()))
    } else {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(body).map_err(|e| syntax_error(e.to_string()))?;
        serde_json::to_value(yaml).map_err(|e| syntax_error(e.to_string()))
    }
}

/// Resolves a reference target location against the document it appears in.
fn join_location(base: &str, reference: &str) -> String {
    if reference.is_empty() || is_remote_reference(reference) {
        return reference.to_string();
    }
    if is_remote_reference(base) {
        let absolute = if let Some(rest) = base.strip_prefix("//") {
            format!("https://{rest}")
        } else {
            base.to_string()
        };
        if let Ok(joined) = Url::parse(&absolute).and_then(|url| url.join(reference)) {
            return joined.to_string();
        }
        return reference.to_string();
    }
    let parent = Path::new(base).parent().unwrap_or_else(|| Path::new("."));
    parent.join(reference).to_string_lossy().into_owned()
}
