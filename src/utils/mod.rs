//! Utility functions for code generation, URL processing and storage glue.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Destination URL scheme completion
//! - [`db_error`] - Database error classification
//! - [`timestamps`] - Naive/UTC timestamp conversion

pub mod code_generator;
pub mod db_error;
pub mod timestamps;
pub mod url_normalizer;
