//! Stub transport and compiler with call counters for unit tests.

use crate::compiler::{CompileError, SchemaCompiler};
use crate::fetch::{FetchError, Transport};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Serves a fixed body, optionally followed by an HTTP failure.
pub struct StubTransport {
    body: Vec<u8>,
    fail_with_status: Option<u32>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn serving(body: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_vec(),
            fail_with_status: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Writes `body` (like an error page) and then reports HTTP `status`.
    pub fn failing(body: &[u8], status: u32) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_vec(),
            fail_with_status: Some(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for StubTransport {
    fn get(&self, _url: &Url, sink: &mut dyn Write) -> Result<u64, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sink.write_all(&self.body).map_err(FetchError::Write)?;
        match self.fail_with_status {
            Some(code) => Err(FetchError::Http(code)),
            None => Ok(self.body.len() as u64),
        }
    }
}

/// Echoes the schema length as a declaration, or always rejects.
pub struct StubCompiler {
    reject: bool,
    calls: AtomicUsize,
}

impl StubCompiler {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            reject: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SchemaCompiler for StubCompiler {
    fn compile_from_file(&self, path: &Path) -> Result<String, CompileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(CompileError::InvalidSchema("rejected by stub".to_string()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(format!("export type Stub = {:?};\n", text.len()))
    }
}
