#![deny(missing_docs)]

//! Core library for the PDF document assistant.

/// HTTP routing and REST handlers.
pub mod api;
/// Summarize and question-answering operations.
pub mod assistant;
/// Environment-driven configuration management.
pub mod config;
/// Per-upload cache of extracted text.
pub mod documents;
/// PDF text extraction.
pub mod extraction;
/// Chat-completion client and prompts.
pub mod inference;
/// Structured logging and tracing setup.
pub mod logging;
/// Extraction and inference counters.
pub mod metrics;
/// Service wiring shared by the HTTP server and the CLI.
pub mod service;
