//! CLI for schema2ts.

use anyhow::Result;
use clap::Parser;
use schema2ts_core::config::{self, Schema2tsConfig};
use schema2ts_core::error::EXIT_FAILURE;
use schema2ts_core::fetch::FetchOutcome;
use schema2ts_core::url_model::validate_schema_url;
use schema2ts_core::{Pipeline, PipelineError, PipelineRequest};
use std::path::PathBuf;

/// Process exit status for an error returned by [`Cli::run`].
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<PipelineError>()
        .map_or(EXIT_FAILURE, PipelineError::exit_code)
}

/// Download a JSON Schema (once) and generate TypeScript declarations from it.
///
/// Omitted arguments fall back to `~/.config/schema2ts/config.toml`, whose
/// defaults target the Melvor Idle game data schema.
#[derive(Debug, Parser)]
#[command(name = "schema2ts", version)]
#[command(about = "Create TypeScript declarations from a downloaded JSON Schema", long_about = None)]
pub struct Cli {
    /// URL of schema to create TypeScript declarations from.
    #[arg(value_name = "SCHEMA_URL")]
    pub schema_url: Option<String>,

    /// Output filename for the downloaded schema. Skips the download if it already exists.
    #[arg(value_name = "SCHEMA_FILENAME")]
    pub schema_filename: Option<PathBuf>,

    /// Output filename for the generated TypeScript declaration file.
    #[arg(value_name = "DECLARATION_FILENAME")]
    pub declaration_filename: Option<PathBuf>,
}

impl Cli {
    /// Positional arguments win; anything omitted comes from `cfg`.
    pub fn to_request(&self, cfg: &Schema2tsConfig) -> PipelineRequest {
        PipelineRequest {
            url: self
                .schema_url
                .clone()
                .unwrap_or_else(|| cfg.schema_url.clone()),
            schema_path: self
                .schema_filename
                .clone()
                .unwrap_or_else(|| cfg.schema_path.clone()),
            declaration_path: self
                .declaration_filename
                .clone()
                .unwrap_or_else(|| cfg.declaration_path.clone()),
        }
    }

    fn all_positionals_given(&self) -> bool {
        self.schema_url.is_some() && self.schema_filename.is_some() && self.declaration_filename.is_some()
    }

    /// With every positional given, only `[fetch]`/`[compile]` are read from
    /// the config, which is then neither created nor required to parse.
    fn load_config(&self) -> Result<Schema2tsConfig> {
        if !self.all_positionals_given() {
            return config::load_or_init();
        }
        match config::load_existing() {
            Ok(cfg) => Ok(cfg.unwrap_or_default()),
            Err(e) => {
                tracing::warn!("ignoring unreadable config, using defaults: {:#}", e);
                Ok(Schema2tsConfig::default())
            }
        }
    }

    pub async fn run(self) -> Result<()> {
        // Before any config or file I/O, so a bad URL always exits 255.
        if let Some(url) = &self.schema_url {
            validate_schema_url(url)?;
        }
        let cfg = self.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let req = self.to_request(&cfg);
        println!(
            "Running with url: {}, schema_filename: {}, declaration_filename: {}",
            req.url,
            req.schema_path.display(),
            req.declaration_path.display()
        );
        tracing::info!(
            "running with url={} schema_filename={} declaration_filename={}",
            req.url,
            req.schema_path.display(),
            req.declaration_path.display()
        );

        let report = Pipeline::from_config(&cfg).run(&req).await?;

        match report.fetch {
            FetchOutcome::CacheHit => println!(
                "File {} already exists. Skipped download.",
                req.schema_path.display()
            ),
            FetchOutcome::Downloaded { bytes } => println!(
                "Downloaded {} bytes to {}",
                bytes,
                req.schema_path.display()
            ),
        }
        if let Some(digest) = &report.schema_sha256 {
            println!("{}  {}", digest, req.schema_path.display());
        }
        println!(
            "Finished creating types: {} ({} bytes)",
            req.declaration_path.display(),
            report.declaration_bytes
        );
        Ok(())
    }
}
