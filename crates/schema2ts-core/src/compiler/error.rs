use std::path::PathBuf;

/// Reasons the compiler rejects a schema document.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot read schema {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("unresolved $ref '{0}'")]
    UnresolvedRef(String),

    #[error("compiler task aborted: {0}")]
    Aborted(String),
}
