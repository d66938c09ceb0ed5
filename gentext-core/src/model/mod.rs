//! Top-level module for the suffix index text generator.
//!
//! This module provides, leaf-first:
//! - The separator-joined word buffer (`TextBuffer`)
//! - The `order`-bounded word-suffix array (`SuffixIndex`)
//! - Uniform tie sampling strategies (`TieSampler`, `Sampling`)
//! - Per-call configuration (`GenerationInput`)
//! - The high-level generation interface (`TextGenerator`)

/// High-level interface: builds the index and walks it.
pub mod generator;

/// Per-call generation parameters (budget, start seed, sampling).
pub mod generation_input;

/// Uniform selection among suffixes tied on a phrase.
pub mod sampler;

/// Word-suffix array sorted on the first `order` words, with duplicate
/// spans and phrase lookup.
pub mod suffix_index;

/// Words joined by a single separator, with their start offsets.
pub mod text_buffer;
