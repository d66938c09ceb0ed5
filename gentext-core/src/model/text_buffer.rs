/// Character appended after every word of the buffer.
pub const SEPARATOR: char = ' ';

/// All corpus words joined into one string, each followed by `SEPARATOR`.
///
/// `positions[i]` is the byte offset where word `i` starts; it is also one
/// past the separator that ends word `i - 1`.
///
/// # Invariants
/// - No word contains whitespace
/// - `positions` is strictly increasing
/// - The buffer is never mutated after construction
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
	source: String,
	positions: Vec<usize>,
}

impl TextBuffer {
	/// Builds the buffer from a word sequence.
	///
	/// Items containing whitespace are split further, and empty items are
	/// skipped, so the separator never appears inside a word.
	pub fn new<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut source = String::new();
		let mut positions = Vec::new();

		for item in words {
			for word in item.as_ref().split_whitespace() {
				positions.push(source.len());
				source.push_str(word);
				source.push(SEPARATOR);
			}
		}

		Self { source, positions }
	}

	/// Number of words.
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// The raw buffer, trailing separator included.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Word start offsets, in text order.
	pub fn positions(&self) -> &[usize] {
		&self.positions
	}

	/// The suffix of the buffer starting at byte offset `position`.
	pub fn suffix(&self, position: usize) -> &str {
		&self.source[position..]
	}

	/// Returns word `index` without its separator.
	pub fn word(&self, index: usize) -> Option<&str> {
		let start = *self.positions.get(index)?;
		Some(&self.source[start..self.word_end(index)])
	}

	/// Maps a word start offset back to its word index.
	///
	/// Returns `None` when `position` is not the start of a word.
	pub fn word_index(&self, position: usize) -> Option<usize> {
		self.positions.binary_search(&position).ok()
	}

	/// The slice covering `count` words from `first`, with the separator
	/// after the last one.
	///
	/// # Panics
	/// Panics if `first + count` exceeds the word count.
	pub(crate) fn window(&self, first: usize, count: usize) -> &str {
		assert!(first + count <= self.len(), "window past end of buffer");
		let start = self.positions.get(first).copied().unwrap_or(self.source.len());
		let end = self.positions.get(first + count).copied().unwrap_or(self.source.len());
		&self.source[start..end]
	}

	/// Byte offset of the separator ending word `index`.
	fn word_end(&self, index: usize) -> usize {
		self.positions
			.get(index + 1)
			.copied()
			.unwrap_or(self.source.len())
			- SEPARATOR.len_utf8()
	}
}
