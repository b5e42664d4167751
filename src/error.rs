use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the definition pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the definition pipeline.
///
/// All variants propagate unhandled to the invocation boundary; there is no
/// retry logic anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// No definition reference could be resolved from any channel.
    #[error(
        "no definition found: pass a path or URL, set OPENAPI_DEFINITION, \
         or add a .openapiconfig file"
    )]
    DefinitionNotFound,

    /// A resolved source could not be fetched or read.
    #[error("unable to resolve {reference}: {message}")]
    Resolution { reference: String, message: String },

    /// The fetched content is not valid JSON or YAML.
    #[error("syntax error in {reference}: {message}")]
    Syntax { reference: String, message: String },

    /// The document failed schema conformance checks in validate mode.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A config file was found but could not be used.
    #[error("invalid config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}
