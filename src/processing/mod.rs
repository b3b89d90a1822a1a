//! Document processing pipeline: chunking plus chunk-and-reduce summarization.

pub(crate) mod chunking;
mod service;

pub use service::{SummarizeApi, SummarizeService};
