//! Download-then-compile pipeline.
//!
//! Stages run strictly in order and each one either completes or returns a
//! `PipelineError`: validate URL, fetch (or reuse) the schema, compile it,
//! write the declaration file. Nothing is retried.

use crate::checksum;
use crate::compiler::{CompileError, SchemaCompiler, TsCompiler};
use crate::config::Schema2tsConfig;
use crate::error::PipelineError;
use crate::fetch::{CurlTransport, FetchOutcome, Fetcher};
use crate::paths;
use crate::url_model::validate_schema_url;
use std::path::PathBuf;
use std::sync::Arc;

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub url: String,
    pub schema_path: PathBuf,
    pub declaration_path: PathBuf,
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub fetch: FetchOutcome,
    /// SHA-256 of the schema the declarations were generated from, when readable.
    pub schema_sha256: Option<String>,
    pub declaration_bytes: usize,
}

pub struct Pipeline {
    fetcher: Fetcher,
    compiler: Arc<dyn SchemaCompiler>,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, compiler: Arc<dyn SchemaCompiler>) -> Self {
        Self { fetcher, compiler }
    }

    /// libcurl transport and the bundled TypeScript compiler, both configured from `cfg`.
    pub fn from_config(cfg: &Schema2tsConfig) -> Self {
        let transport = Arc::new(CurlTransport::new(cfg.fetch.clone()));
        let compiler = Arc::new(TsCompiler::new(cfg.compile.clone()));
        Self::new(Fetcher::new(transport), compiler)
    }

    pub async fn run(&self, req: &PipelineRequest) -> Result<PipelineReport, PipelineError> {
        let url = validate_schema_url(&req.url)?;

        tracing::info!("downloading schema from url {}", url);
        let fetch = self.fetcher.fetch(&url, &req.schema_path).await?;

        let compiler = Arc::clone(&self.compiler);
        let schema_path = req.schema_path.clone();
        let declarations = tokio::task::spawn_blocking(move || compiler.compile_from_file(&schema_path))
            .await
            .unwrap_or_else(|e| Err(CompileError::Aborted(e.to_string())))
            .map_err(|source| PipelineError::Compilation {
                schema_path: req.schema_path.clone(),
                source,
            })?;

        tracing::info!(
            "creating typescript declaration from downloaded schema {}",
            req.schema_path.display()
        );
        let write_err = |source| PipelineError::Write {
            path: req.declaration_path.clone(),
            source,
        };
        paths::ensure_parent_dir(&req.declaration_path).map_err(write_err)?;
        tokio::fs::write(&req.declaration_path, declarations.as_bytes())
            .await
            .map_err(write_err)?;
        tracing::info!("finished creating types at {}", req.declaration_path.display());

        let schema_sha256 = match checksum::schema_digest(&req.schema_path) {
            Ok(digest) => {
                tracing::debug!("schema {} sha256={}", req.schema_path.display(), digest);
                Some(digest)
            }
            Err(e) => {
                tracing::warn!("could not fingerprint schema: {:#}", e);
                None
            }
        };

        Ok(PipelineReport {
            fetch,
            schema_sha256,
            declaration_bytes: declarations.len(),
        })
    }
}
