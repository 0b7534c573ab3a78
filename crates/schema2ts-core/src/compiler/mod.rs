//! JSON Schema → TypeScript declaration compiler.
//!
//! The pipeline only depends on [`SchemaCompiler`]; [`TsCompiler`] is the
//! implementation shipped with the crate.

mod emit;
mod error;
pub mod schema;

pub use emit::Emitter;
pub use error::CompileError;
pub use schema::Schema;

use crate::config::CompileConfig;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Converts a schema file into declaration text.
pub trait SchemaCompiler: Send + Sync {
    fn compile_from_file(&self, path: &Path) -> Result<String, CompileError>;
}

#[derive(Debug, Clone, Default)]
pub struct TsCompiler {
    options: CompileConfig,
}

impl TsCompiler {
    pub fn new(options: CompileConfig) -> Self {
        Self { options }
    }

    /// Compiles schema JSON text. `default_name` names the root type when the
    /// schema has no `title`.
    pub fn compile_str(&self, text: &str, default_name: &str) -> Result<String, CompileError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(CompileError::InvalidSchema(
                "root of a schema document must be a JSON object".to_string(),
            ));
        }
        let schema = Schema::deserialize(&value)?;
        Emitter::new(&value, &schema, &self.options, default_name).emit()
    }
}

impl SchemaCompiler for TsCompiler {
    fn compile_from_file(&self, path: &Path) -> Result<String, CompileError> {
        let text = fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Schema");
        self.compile_str(&text, stem)
    }
}
