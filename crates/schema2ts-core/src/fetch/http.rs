//! libcurl-backed transport: one plain GET, body streamed to the sink.

use super::{FetchError, Transport};
use crate::config::FetchConfig;
use std::io::Write;
use std::time::Duration;
use url::Url;

/// Bytes/second under which a transfer counts as stalled.
const LOW_SPEED_LIMIT: u32 = 1024;

#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    config: FetchConfig,
}

impl CurlTransport {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &Url) -> Result<(), curl::Error> {
        let cfg = &self.config;
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(cfg.follow_redirects)?;
        if cfg.follow_redirects {
            easy.max_redirections(cfg.max_redirections)?;
        }
        if let Some(ua) = &cfg.user_agent {
            easy.useragent(ua)?;
        }
        easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;
        easy.low_speed_limit(LOW_SPEED_LIMIT)?;
        easy.low_speed_time(Duration::from_secs(cfg.low_speed_time_secs))?;
        easy.timeout(Duration::from_secs(cfg.timeout_secs))?;
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)?;

        let mut written = 0u64;
        let mut write_error = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("schema download write failed: {}", e);
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        // A short write makes curl report its own error; the I/O cause is more useful.
        if let Some(e) = write_error {
            return Err(FetchError::Write(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        tracing::debug!("GET {} returned HTTP {} ({} bytes)", url, code, written);
        Ok(written)
    }
}
