use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::PathBuf;

use crate::document::Document;
use crate::error::Error;
use crate::locator;
use crate::normalizer::{self, NormalizeOptions};
use crate::parser::{parse_definition, ParseMode, ParserOptions, SpecEngine};
use crate::reporter;
use crate::serializer;

/// OpenAPI Console - load, normalize and report on OpenAPI/Swagger definitions
#[derive(Parser, Debug)]
#[command(name = "openapi-console")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a definition and print it as JSON or YAML
    Read {
        #[command(flatten)]
        definition: DefinitionArgs,

        /// Output format
        #[arg(
            short = 'f',
            long = "format",
            value_enum,
            default_value = "yaml",
            conflicts_with_all = ["json", "yaml"]
        )]
        format: OutputFormat,

        /// Format as json (short for -f json)
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Format as yaml (short for -f yaml)
        #[arg(long)]
        yaml: bool,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print a summary of a definition: info, operations and schemas
    Info {
        #[command(flatten)]
        definition: DefinitionArgs,
    },
}

/// Arguments shared by every subcommand that loads a definition.
#[derive(Args, Debug)]
pub struct DefinitionArgs {
    /// Definition file path or URL (CURRENT = use ambient resolution)
    #[arg(value_name = "DEFINITION")]
    pub definition: Option<String>,

    /// Resolve $ref pointers
    #[arg(short = 'D', long)]
    pub dereference: bool,

    /// Resolve remote $ref pointers
    #[arg(short = 'B', long)]
    pub bundle: bool,

    /// Validate against the OpenAPI schema
    #[arg(short = 'V', long)]
    pub validate: bool,

    /// Add request headers when calling remote urls
    #[arg(short = 'H', long = "header", value_name = "Name: value")]
    pub header: Vec<String>,

    /// Override servers definition
    #[arg(short = 'S', long = "server", value_name = "http://localhost:9000")]
    pub server: Vec<String>,

    /// Override API root path
    #[arg(short = 'R', long = "root", value_name = "/")]
    pub root: Option<String>,

    /// Induce a server entry from the location of a remote definition
    #[arg(long = "induce-servers")]
    pub induce_servers: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    #[value(alias = "yml")]
    Yaml,
    /// JSON format
    Json,
}

/// Run the selected subcommand
pub fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Read {
            definition,
            format,
            json,
            yaml,
            output,
        } => {
            let document = load_document(&definition)?;

            let format = if json {
                OutputFormat::Json
            } else if yaml {
                OutputFormat::Yaml
            } else {
                format
            };
            let content = match format {
                OutputFormat::Yaml => serializer::serialize_yaml(&document)?,
                OutputFormat::Json => serializer::serialize_json(&document)?,
            };

            match output {
                Some(path) => {
                    serializer::write_to_file(&content, &path)?;
                    info!("Wrote document to {}", path.display());
                }
                None => println!("{content}"),
            }
        }

        Command::Info { definition } => {
            let document = load_document(&definition)?;
            for line in reporter::info_lines(&document) {
                println!("{line}");
            }
            for line in reporter::operation_lines(&document) {
                println!("{line}");
            }
            for line in reporter::schema_lines(&document) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Resolves, parses and normalizes a definition into a document.
///
/// This is the whole pipeline: locator → parser → server normalizer. Any
/// failure aborts the invocation; no partially normalized document escapes.
fn load_document(args: &DefinitionArgs) -> Result<Document> {
    let source =
        locator::resolve_definition(args.definition.as_deref())?.ok_or(Error::DefinitionNotFound)?;
    info!("Loading definition from {}", source);

    let mode = ParseMode::from_flags(args.bundle, args.dereference, args.validate);
    debug!("Parse mode: {:?}", mode);

    let opts = ParserOptions {
        headers: parse_header_flags(&args.header)?,
    };
    let mut document = parse_definition(&SpecEngine, &source, mode, &opts)?;

    normalizer::normalize_servers(
        &mut document,
        &source,
        &NormalizeOptions {
            extra_servers: args.server.clone(),
            induce_servers: args.induce_servers,
            root: args.root.clone(),
        },
    );

    Ok(document)
}

/// Parses repeated `Name: value` header flags into a header map.
pub fn parse_header_flags(flags: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for flag in flags {
        let (name, value) = flag
            .split_once(':')
            .with_context(|| format!("Invalid header (expected `Name: value`): {flag}"))?;
        let name: HeaderName = name
            .trim()
            .parse()
            .with_context(|| format!("Invalid header name: {name}"))?;
        let value: HeaderValue = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid header value in: {flag}"))?;
        headers.append(name, value);
    }
    Ok(headers)
}
