//! Post-processes the `servers` array of a loaded document.
//!
//! Three ordered steps, each independently optional and composing on top of
//! the previous one: append caller-supplied servers, induce a server from a
//! remotely fetched source, and override the API root path of every entry.

use crate::document::{Document, Server};
use crate::parser::is_remote_reference;
use log::debug;
use reqwest::Url;

/// Options for the server normalization steps.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Extra server URLs appended after the declared entries, in caller
    /// order, without de-duplication.
    pub extra_servers: Vec<String>,
    /// Synthesize a server entry from the location the definition itself was
    /// fetched from. Only applies to remote sources.
    pub induce_servers: bool,
    /// Force the path component of every server URL to this value.
    pub root: Option<String>,
}

/// Mutates `document.servers` in place according to `opts`.
///
/// `source` is the definition reference the document was loaded from; it
/// only matters for the induction step.
pub fn normalize_servers(document: &mut Document, source: &str, opts: &NormalizeOptions) {
    append_servers(document, &opts.extra_servers);
    if opts.induce_servers {
        induce_server(document, source);
    }
    if let Some(root) = &opts.root {
        override_root(document, root);
    }
}

/// Appends each extra URL as a new server entry, creating the array if the
/// document had none. Existing entries come first.
fn append_servers(document: &mut Document, extra: &[String]) {
    if extra.is_empty() {
        return;
    }
    debug!("Appending {} server(s)", extra.len());
    let servers = document.servers.get_or_insert_with(Vec::new);
    servers.extend(extra.iter().map(Server::new));
}

/// Synthesizes a first server entry from a remote source location.
///
/// Reads and mutates only index 0. A missing first entry becomes
/// `{scheme}//{host}`; a first entry holding a bare path gets that origin
/// prefixed; an already absolute or protocol-relative entry is left alone.
fn induce_server(document: &mut Document, source: &str) {
    if !is_remote_reference(source) {
        return;
    }
    let Some(origin) = source_origin(source) else {
        return;
    };
    let servers = document.servers.get_or_insert_with(Vec::new);
    if servers.is_empty() {
        debug!("Inducing server {} from the definition location", origin);
        servers.push(Server::new(origin));
        return;
    }
    let first = &mut servers[0];
    if !is_remote_reference(&first.url) {
        first.url = format!("{}{}", origin, first.url);
    }
}

/// Rewrites the path of every server entry to `root`.
///
/// The root always gets a leading slash. Entries that parse as absolute URLs
/// keep their scheme and host and take the root as their entire path;
/// anything else is replaced wholesale with the root. A document without a
/// `servers` array ends up with a single-entry one.
fn override_root(document: &mut Document, root: &str) {
    let root = if root.starts_with('/') {
        root.to_string()
    } else {
        format!("/{root}")
    };
    match &mut document.servers {
        Some(servers) => {
            for server in servers.iter_mut() {
                server.url = match server_origin(&server.url) {
                    Some(origin) => format!("{origin}{root}"),
                    None => root.clone(),
                };
            }
        }
        None => document.servers = Some(vec![Server::new(root)]),
    }
}

/// `{scheme}//{host}` of the definition source. Protocol-relative sources
/// keep their protocol-relative form.
fn source_origin(source: &str) -> Option<String> {
    if let Some(rest) = source.strip_prefix("//") {
        let url = Url::parse(&format!("http://{rest}")).ok()?;
        return Some(format!("//{}", authority(&url)?));
    }
    let url = Url::parse(source).ok()?;
    Some(format!("{}://{}", url.scheme(), authority(&url)?))
}

/// `{scheme}//{host}` of a server entry URL, or `None` when the entry is not
/// a well-formed absolute URL.
fn server_origin(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    Some(format!("{}://{}", url.scheme(), authority(&url)?))
}

/// Host with the explicit port, if any.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
