use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Deserialize;

use super::suffix_index::{Phrase, SuffixIndex};

/// Picks one sorted suffix uniformly among those matching a phrase.
///
/// Implementations return the position of the pick in the sorted view, or
/// `None` when no suffix starts with the phrase.
pub trait TieSampler {
	fn sample<R: Rng + ?Sized>(&self, index: &SuffixIndex, phrase: &Phrase<'_>, rng: &mut R) -> Option<usize>;
}

/// Reads the tied class straight from the duplicate span table.
///
/// O(log n) to locate the class, then one draw. Phrases longer than the
/// index order are filtered inside their span.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanSampler;

impl TieSampler for SpanSampler {
	fn sample<R: Rng + ?Sized>(&self, index: &SuffixIndex, phrase: &Phrase<'_>, rng: &mut R) -> Option<usize> {
		let (start, end) = index.candidates(phrase)?;

		if phrase.words() <= index.order() {
			return Some(rng.random_range(start..end));
		}

		let total = (start..end).filter(|&i| index.matches(i, phrase)).count();
		if total == 0 {
			return None;
		}
		let pick = rng.random_range(0..total);
		(start..end).filter(|&i| index.matches(i, phrase)).nth(pick)
	}
}

/// Single forward pass from the insertion point, keeping the `i`-th match
/// with probability `1 / (i + 1)`.
///
/// Needs no span table, but costs one draw per matching suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservoirSampler;

impl TieSampler for ReservoirSampler {
	fn sample<R: Rng + ?Sized>(&self, index: &SuffixIndex, phrase: &Phrase<'_>, rng: &mut R) -> Option<usize> {
		if phrase.is_empty() {
			return None;
		}

		let words = index.search_words(phrase);
		let mut chosen = None;
		let mut seen = 0;

		let mut i = index.lower_bound(phrase);
		while i < index.len() && index.agrees(i, phrase, words) {
			if index.matches(i, phrase) {
				seen += 1;
				if rng.random_range(0..seen) == 0 {
					chosen = Some(i);
				}
			}
			i += 1;
		}
		chosen
	}
}

/// Tie sampling strategy selected per generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sampling {
	#[default]
	Span,
	Reservoir,
}

impl Sampling {
	pub fn sample<R: Rng + ?Sized>(&self, index: &SuffixIndex, phrase: &Phrase<'_>, rng: &mut R) -> Option<usize> {
		match self {
			Sampling::Span => SpanSampler.sample(index, phrase, rng),
			Sampling::Reservoir => ReservoirSampler.sample(index, phrase, rng),
		}
	}
}

impl FromStr for Sampling {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"span" => Ok(Sampling::Span),
			"reservoir" => Ok(Sampling::Reservoir),
			other => Err(format!("unknown sampling strategy '{}', expected 'span' or 'reservoir'", other)),
		}
	}
}

impl fmt::Display for Sampling {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Sampling::Span => write!(f, "span"),
			Sampling::Reservoir => write!(f, "reservoir"),
		}
	}
}
