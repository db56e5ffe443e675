//! Core utilities for the llm-inference services.
//!
//! This crate provides the `Result` alias shared by every layer and the
//! tolerant JSON extractor used to recover structured data from free-text
//! model replies.

pub mod error;
pub mod extract;

pub use error::Result;
pub use extract::{ReplySplit, decode_fragment, decode_tolerant, split_reply};
