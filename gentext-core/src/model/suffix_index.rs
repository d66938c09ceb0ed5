use std::borrow::Cow;
use std::cmp::Ordering;
use std::iter;

use log::debug;

use super::text_buffer::{SEPARATOR, TextBuffer};
use crate::{Error, Result};

/// Compares two suffixes on their first `words` words, ignoring case.
///
/// Characters are compared after lower-casing. Each separator passed
/// decrements a counter starting at `words`; once it reaches zero the
/// suffixes are equal whatever follows. When one side runs out first it
/// sorts first. `words == 0` compares the whole strings.
///
/// This is a truncated order: distinct suffixes sharing their first
/// `words` words are tied.
pub fn compare_words(a: &str, b: &str, words: usize) -> Ordering {
	let mut remaining = words;
	let mut left = a.chars();
	let mut right = b.chars();

	loop {
		match (left.next(), right.next()) {
			(Some(x), Some(y)) => {
				let result = x.to_lowercase().cmp(y.to_lowercase());
				if result != Ordering::Equal {
					return result;
				}
				if remaining > 0 && x == SEPARATOR {
					remaining -= 1;
					if remaining == 0 {
						return Ordering::Equal;
					}
				}
			}
			(None, None) => return Ordering::Equal,
			(None, Some(_)) => return Ordering::Less,
			(Some(_), None) => return Ordering::Greater,
		}
	}
}

/// A lookup key: whole words, each followed by the separator.
///
/// Seed phrases are owned and normalized; phrases produced during
/// generation borrow a window of the text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase<'a> {
	text: Cow<'a, str>,
	words: usize,
}

impl<'a> Phrase<'a> {
	/// Normalizes a caller-supplied phrase.
	///
	/// Whitespace runs collapse to a single separator; leading and trailing
	/// whitespace is dropped. Case is preserved, matching ignores it.
	pub fn parse(text: &str) -> Phrase<'static> {
		let mut normalized = String::with_capacity(text.len() + 1);
		let mut words = 0;
		for word in text.split_whitespace() {
			normalized.push_str(word);
			normalized.push(SEPARATOR);
			words += 1;
		}
		Phrase { text: Cow::Owned(normalized), words }
	}

	/// Borrows `count` consecutive words of the buffer, starting at `first`.
	pub(crate) fn window(buffer: &'a TextBuffer, first: usize, count: usize) -> Self {
		Phrase { text: Cow::Borrowed(buffer.window(first, count)), words: count }
	}

	/// Number of words in the phrase.
	pub fn words(&self) -> usize {
		self.words
	}

	pub fn is_empty(&self) -> bool {
		self.words == 0
	}

	/// The phrase without its trailing separator.
	pub fn as_str(&self) -> &str {
		self.text.strip_suffix(SEPARATOR).unwrap_or(&*self.text)
	}

	/// The lookup key, trailing separator included.
	pub(crate) fn key(&self) -> &str {
		&self.text
	}
}

/// Word-level suffix array of a `TextBuffer`, sorted on the first `order`
/// words of each suffix.
///
/// # Invariants
/// - `order >= 1`
/// - `suffixes` is a permutation of the buffer's word positions
/// - `compare_words(suffix(i), suffix(i + 1), order) != Greater`
/// - `duplicates[i]` counts the entries from `i` (inclusive) tied with
///   suffix `i` on `order` words; the last entry is `1`
#[derive(Debug, Clone)]
pub struct SuffixIndex {
	buffer: TextBuffer,
	order: usize,
	suffixes: Vec<usize>,
	duplicates: Vec<usize>,
}

impl SuffixIndex {
	/// Sorts the buffer's word suffixes and computes the duplicate spans.
	///
	/// # Errors
	/// Returns `Error::InvalidOrder` if `order < 1`.
	pub fn new(buffer: TextBuffer, order: usize) -> Result<Self> {
		if order < 1 {
			return Err(Error::InvalidOrder(order));
		}

		let source = buffer.source();
		let mut suffixes = buffer.positions().to_vec();
		// Stable: tied suffixes keep their text order.
		suffixes.sort_by(|&a, &b| compare_words(&source[a..], &source[b..], order));
		let duplicates = Self::compute_duplicates(source, &suffixes, order);

		let index = Self { buffer, order, suffixes, duplicates };
		debug!(
			"indexed {} words at order {} into {} classes",
			index.len(),
			order,
			index.classes().count()
		);
		Ok(index)
	}

	/// Single backward pass over the sorted view.
	fn compute_duplicates(source: &str, suffixes: &[usize], order: usize) -> Vec<usize> {
		let mut duplicates = vec![1; suffixes.len()];
		for i in (0..suffixes.len().saturating_sub(1)).rev() {
			let current = &source[suffixes[i]..];
			let next = &source[suffixes[i + 1]..];
			if compare_words(current, next, order) == Ordering::Equal {
				duplicates[i] = duplicates[i + 1] + 1;
			}
		}
		duplicates
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of suffixes (one per word).
	pub fn len(&self) -> usize {
		self.suffixes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.suffixes.is_empty()
	}

	pub fn buffer(&self) -> &TextBuffer {
		&self.buffer
	}

	/// Text position of the `i`-th sorted suffix.
	pub fn position(&self, i: usize) -> usize {
		self.suffixes[i]
	}

	/// The `i`-th sorted suffix.
	pub fn suffix(&self, i: usize) -> &str {
		self.buffer.suffix(self.suffixes[i])
	}

	/// Number of entries from `i` sharing suffix `i`'s first `order` words.
	pub fn duplicates(&self, i: usize) -> usize {
		self.duplicates[i]
	}

	/// Iterates the equivalence classes as `(start, span)` pairs, in order.
	pub fn classes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		let first = (!self.is_empty()).then_some(0);
		iter::successors(first, |&i| {
			let next = i + self.duplicates[i];
			(next < self.len()).then_some(next)
		})
		.map(|i| (i, self.duplicates[i]))
	}

	/// Checks the sorted view against the truncated order.
	pub fn is_sorted(&self) -> bool {
		self.suffixes.windows(2).all(|pair| {
			let a = self.buffer.suffix(pair[0]);
			let b = self.buffer.suffix(pair[1]);
			compare_words(a, b, self.order) != Ordering::Greater
		})
	}

	/// Words of `phrase` that the sorted view can be searched on.
	pub(crate) fn search_words(&self, phrase: &Phrase<'_>) -> usize {
		phrase.words().min(self.order)
	}

	/// First sorted entry not less than `phrase` on its first
	/// `min(phrase words, order)` words.
	///
	/// The result is an insertion point: the entry there may not match.
	pub fn lower_bound(&self, phrase: &Phrase<'_>) -> usize {
		let words = self.search_words(phrase);
		self.suffixes.partition_point(|&position| {
			compare_words(self.buffer.suffix(position), phrase.key(), words) == Ordering::Less
		})
	}

	/// Whether sorted suffix `i` starts with the first `words` words of
	/// `phrase`.
	pub(crate) fn agrees(&self, i: usize, phrase: &Phrase<'_>, words: usize) -> bool {
		compare_words(self.suffix(i), phrase.key(), words) == Ordering::Equal
	}

	/// Whether sorted suffix `i` starts with the whole `phrase`.
	pub fn matches(&self, i: usize, phrase: &Phrase<'_>) -> bool {
		!phrase.is_empty() && self.agrees(i, phrase, phrase.words())
	}

	/// The contiguous run of sorted entries agreeing with `phrase` on its
	/// searchable words, as a half-open range.
	///
	/// For a phrase of `order` words this is one duplicate span. Shorter
	/// phrases cover several consecutive spans. Longer phrases get the span
	/// of their first `order` words, whose members still need filtering.
	pub fn candidates(&self, phrase: &Phrase<'_>) -> Option<(usize, usize)> {
		if phrase.is_empty() {
			return None;
		}

		let words = self.search_words(phrase);
		let start = self.lower_bound(phrase);
		if start >= self.len() || !self.agrees(start, phrase, words) {
			return None;
		}

		let mut end = start + self.duplicates[start];
		if words < self.order {
			while end < self.len() && self.agrees(end, phrase, words) {
				end += self.duplicates[end];
			}
		}
		Some((start, end))
	}
}
