#![deny(missing_docs)]

//! Core library for the lexsum summarization gateway.
//!
//! lexsum accepts a PDF upload over HTTP, extracts its text, partitions the
//! text into bounded chunks, summarizes each chunk through an external
//! completion model, and reduces the chunk summaries into one plain-language
//! summary of the document.

/// HTTP routing and the upload handler.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Gateway counters for observability.
pub mod metrics;
/// Chunking and the reduction pipeline.
pub mod processing;
/// Per-client sliding-window rate limiting.
pub mod ratelimit;
/// Completion-model client and summarization prompts.
pub mod summarization;
