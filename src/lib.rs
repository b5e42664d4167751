//! Load, normalize and report on OpenAPI/Swagger API definitions.
//!
//! The crate is a small pipeline over a single in-flight document:
//!
//! 1. [`locator`] - resolves where the definition lives: explicit argument,
//!    the `OPENAPI_DEFINITION` environment variable, or a `.openapiconfig`
//!    file found by walking upward from the working directory
//! 2. [`parser`] - obtains a [`document::Document`] in one of four parse
//!    modes (parse, bundle, dereference, validate), optionally sending
//!    custom headers on remote fetches
//! 3. [`normalizer`] - rewrites the document's `servers` array (append,
//!    induce from the source location, root override)
//! 4. [`reporter`] - read-only text projections (info, operations, schemas)
//! 5. [`serializer`] - JSON/YAML output
//!
//! # Example
//!
//! ```no_run
//! use openapi_console::normalizer::{normalize_servers, NormalizeOptions};
//! use openapi_console::parser::{ParserBackend, ParserOptions, SpecEngine};
//! use openapi_console::serializer::serialize_yaml;
//!
//! let source = "https://petstore3.swagger.io/api/v3/openapi.json";
//! let mut document = SpecEngine.parse(source, &ParserOptions::default()).unwrap();
//! normalize_servers(
//!     &mut document,
//!     source,
//!     &NormalizeOptions {
//!         induce_servers: true,
//!         ..Default::default()
//!     },
//! );
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod document;
pub mod error;
pub mod locator;
pub mod normalizer;
pub mod parser;
pub mod reporter;
pub mod serializer;
