//! Schema download with a path-existence cache.
//!
//! A destination that already exists is authoritative: no request is made and
//! its content is not checked. Otherwise the body of a single GET is streamed
//! into `<destination>.part`, synced, and renamed onto the destination, so an
//! interrupted run never leaves a truncated file at the cached path.

mod http;
mod error;

pub use http::CurlTransport;
pub use error::FetchError;

use crate::error::PipelineError;
use crate::paths;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Suffix of the file a download is written to before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// `schema/x.json` → `schema/x.json.part`.
pub fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Network seam: performs one GET of `url`, writing the body into `sink`.
/// Returns the number of body bytes written.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, FetchError>;
}

/// What `Fetcher::fetch` did to satisfy the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Destination existed; no network I/O was performed.
    CacheHit,
    /// Body was downloaded, synced and renamed onto the destination.
    Downloaded { bytes: u64 },
}

#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Ensures `destination` holds the resource at `url`, downloading it only
    /// when the path does not exist yet.
    pub async fn fetch(&self, url: &Url, destination: &Path) -> Result<FetchOutcome, PipelineError> {
        if destination.exists() {
            tracing::info!(
                "file {} already exists, skipping download",
                destination.display()
            );
            return Ok(FetchOutcome::CacheHit);
        }

        let stream_err = |source| PipelineError::StreamCreation {
            path: destination.to_path_buf(),
            source,
        };
        paths::ensure_parent_dir(destination).map_err(stream_err)?;
        // Truncates a leftover from an interrupted run.
        let part = temp_path(destination);
        let file = fs::File::create(&part).map_err(stream_err)?;

        tracing::info!("downloading {} to {}", url, part.display());
        let transport = Arc::clone(&self.transport);
        let request_url = url.clone();
        let (part_path, final_path) = (part.clone(), destination.to_path_buf());
        let transfer = tokio::task::spawn_blocking(move || -> Result<u64, FetchError> {
            let mut writer = BufWriter::new(file);
            let bytes = transport.get(&request_url, &mut writer)?;
            let file = writer
                .into_inner()
                .map_err(|e| FetchError::Write(e.into_error()))?;
            file.sync_all().map_err(FetchError::Write)?;
            drop(file);
            fs::rename(&part_path, &final_path).map_err(FetchError::Write)?;
            Ok(bytes)
        })
        .await
        .unwrap_or_else(|e| Err(FetchError::Aborted(e.to_string())));

        match transfer {
            Ok(bytes) => {
                tracing::info!("finished downloading {} ({} bytes)", destination.display(), bytes);
                Ok(FetchOutcome::Downloaded { bytes })
            }
            Err(source) => {
                if let Err(e) = fs::remove_file(&part) {
                    tracing::warn!("could not remove partial download {}: {}", part.display(), e);
                }
                Err(PipelineError::Network {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}
