//! Schema URL validation.
//!
//! Only absolute `http` and `https` URLs are accepted; anything else is
//! rejected before the pipeline touches the filesystem.

use crate::error::PipelineError;
use url::Url;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Parses `raw` and checks that its scheme is `http` or `https`.
pub fn validate_schema_url(raw: &str) -> Result<Url, PipelineError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| PipelineError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(PipelineError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_schema_url("https://melvoridle.com/assets/schema/gameData.json").is_ok());
        assert!(validate_schema_url("http://127.0.0.1:8080/schema.json").is_ok());
        assert!(validate_schema_url("HTTPS://example.com/x.json").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        for raw in ["ftp://example.com/x.json", "file:///tmp/x.json", "data:text/plain,hi"] {
            match validate_schema_url(raw) {
                Err(PipelineError::InvalidUrl { url, reason }) => {
                    assert_eq!(url, raw);
                    assert!(reason.contains("unsupported scheme"), "{}", reason);
                }
                other => panic!("expected InvalidUrl for {}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn rejects_unparseable() {
        assert!(matches!(
            validate_schema_url("schema/gameData.json"),
            Err(PipelineError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_schema_url(""),
            Err(PipelineError::InvalidUrl { .. })
        ));
    }
}
