use std::io;

use thiserror::Error;

/// Errors raised while building or walking a suffix index.
///
/// A phrase missing from the corpus, or running out of text after a match,
/// is not an error: generation simply stops early.
#[derive(Debug, Error)]
pub enum Error {
	/// The Markov order must be at least one word.
	#[error("invalid order {0}: must be >= 1")]
	InvalidOrder(usize),

	/// The index holds no words, so there is nothing to start from.
	#[error("index is empty: no word to start generation from")]
	EmptyIndex,

	/// A sampled suffix points to an offset that is not a word start.
	#[error("corrupt index: position {position} is not a word start")]
	CorruptIndex { position: usize },

	#[error("I/O error: {source}")]
	Io {
		#[from]
		source: io::Error,
	},
}

pub type Result<T> = std::result::Result<T, Error>;
