pub mod config;
pub mod logging;

pub mod checksum;
pub mod compiler;
pub mod error;
pub mod fetch;
pub mod paths;
pub mod pipeline;
pub mod url_model;

#[cfg(test)]
mod test_support;

pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineReport, PipelineRequest};
