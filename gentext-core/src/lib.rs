//! Word-level suffix index text generation library.
//!
//! This crate implements the "suffix array as a Markov model" technique:
//! - Whitespace tokenization into a separator-joined text buffer
//! - A word-suffix array sorted on the first `k` words only
//! - Duplicate spans grouping suffixes that share a `k`-word prefix
//! - A random walk over the index, driven by a caller-supplied RNG
//!
//! Construction is done once; the resulting generator is read-only and can
//! be shared between threads as long as each call brings its own RNG.

/// Text buffer, suffix index, tie samplers and the high-level generator.
pub mod model;

/// I/O utilities (corpus loading, path helpers).
pub mod io;

mod error;

pub use error::{Error, Result};
