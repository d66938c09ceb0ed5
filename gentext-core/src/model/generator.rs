use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, trace};
use rand::Rng;

use crate::io;
use crate::model::generation_input::{GenerationInput, StartSeed};
use crate::model::sampler::Sampling;
use crate::model::suffix_index::{Phrase, SuffixIndex};
use crate::model::text_buffer::{SEPARATOR, TextBuffer};
use crate::{Error, Result};

/// Order used by the binaries when none is given.
pub const DEFAULT_ORDER: usize = 2;

/// Text generator walking a word-level suffix index.
///
/// # Responsibilities
/// - Tokenize and index a training text once
/// - Pick start phrases (random word or caller-supplied)
/// - Walk the index: find the phrase's tied suffixes, sample one, emit the
///   word that follows it, and repeat on the last `order` words
///
/// The generator is immutable after construction. Calls only read it, so it
/// can be shared between threads; every call takes its own RNG.
#[derive(Debug, Clone)]
pub struct TextGenerator {
	index: SuffixIndex,
}

impl TextGenerator {
	/// Loads the training text from `reader` and indexes it.
	///
	/// The reader is consumed to its end; closing it is up to the caller.
	///
	/// # Errors
	/// - `Error::InvalidOrder` if `order < 1` (checked before reading)
	/// - `Error::Io` if reading fails
	pub fn create<R: Read>(reader: R, order: usize) -> Result<Self> {
		if order < 1 {
			return Err(Error::InvalidOrder(order));
		}
		Self::from_words(io::read_words(reader)?, order)
	}

	/// Loads and indexes a text file.
	pub fn from_file<P: AsRef<Path>>(path: P, order: usize) -> Result<Self> {
		let path = path.as_ref();
		debug!("loading {}", path.display());
		Self::create(BufReader::new(File::open(path)?), order)
	}

	/// Indexes an already tokenized word sequence.
	pub fn from_words<I, S>(words: I, order: usize) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let index = SuffixIndex::new(TextBuffer::new(words), order)?;
		Ok(Self { index })
	}

	pub fn order(&self) -> usize {
		self.index.order()
	}

	/// Number of words in the training text.
	pub fn word_count(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	pub fn index(&self) -> &SuffixIndex {
		&self.index
	}

	/// Creates a `GenerationInput` with a random start and span sampling.
	pub fn make_generation_input(&self, max_words: usize) -> GenerationInput {
		GenerationInput::new(max_words)
	}

	/// Generates up to `max_words` words after a randomly chosen start word.
	///
	/// The result starts with that word.
	///
	/// # Errors
	/// `Error::EmptyIndex` if the training text had no words.
	pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, max_words: usize) -> Result<String> {
		let phrase = self.random_phrase(rng)?;
		self.walk(rng, max_words, phrase, Sampling::default())
	}

	/// Generates up to `max_words` words continuing `phrase`.
	///
	/// The result starts with the normalized phrase. A phrase absent from
	/// the corpus yields the phrase alone.
	///
	/// # Errors
	/// `Error::EmptyIndex` if the training text had no words.
	pub fn generate_from<R: Rng + ?Sized>(&self, rng: &mut R, max_words: usize, phrase: &str) -> Result<String> {
		self.walk(rng, max_words, Phrase::parse(phrase), Sampling::default())
	}

	/// Generates according to a `GenerationInput`.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R, input: &GenerationInput) -> Result<String> {
		let phrase = match &input.start_seed {
			StartSeed::Random => self.random_phrase(rng)?,
			StartSeed::Custom(s) => Phrase::parse(s),
		};
		self.walk(rng, input.max_words, phrase, input.sampling)
	}

	/// One uniformly chosen corpus word.
	fn random_phrase<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Phrase<'_>> {
		if self.is_empty() {
			return Err(Error::EmptyIndex);
		}
		let word = rng.random_range(0..self.word_count());
		Ok(Phrase::window(self.index.buffer(), word, 1))
	}

	/// Runs the Markov walk from `phrase` for at most `max_words` steps.
	///
	/// Each step samples a suffix starting with the current phrase, emits the
	/// word right after the phrase in that suffix, and moves the phrase to the
	/// last `order` words ending with the emitted one. The walk stops early
	/// when no suffix matches or the text ends after the match.
	fn walk<'a, R: Rng + ?Sized>(
		&'a self,
		rng: &mut R,
		max_words: usize,
		mut phrase: Phrase<'a>,
		sampling: Sampling,
	) -> Result<String> {
		if self.is_empty() {
			return Err(Error::EmptyIndex);
		}

		let buffer = self.index.buffer();
		let mut output = phrase.as_str().to_owned();

		for _ in 0..max_words {
			let Some(i) = sampling.sample(&self.index, &phrase, rng) else {
				trace!("no suffix starts with '{}'", phrase.as_str());
				break;
			};

			let position = self.index.position(i);
			let matched = buffer.word_index(position).ok_or(Error::CorruptIndex { position })?;
			let next = matched + phrase.words();
			let Some(word) = buffer.word(next) else {
				trace!("text ends after '{}'", phrase.as_str());
				break;
			};

			output.push(SEPARATOR);
			output.push_str(word);

			let len = (phrase.words() + 1).min(self.order());
			phrase = Phrase::window(buffer, next + 1 - len, len);
		}

		Ok(output)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const CORPUS: &str = "the cat sat on the mat the cat ran";

	fn generator(order: usize) -> TextGenerator {
		TextGenerator::create(CORPUS.as_bytes(), order).unwrap()
	}

	#[test]
	fn create_rejects_zero_order() {
		let result = TextGenerator::create(CORPUS.as_bytes(), 0);
		assert!(matches!(result, Err(Error::InvalidOrder(0))));
	}

	#[test]
	fn empty_text_fails_on_generate() {
		let generator = TextGenerator::create("  \n".as_bytes(), 2).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert!(matches!(generator.generate(&mut rng, 5), Err(Error::EmptyIndex)));
		assert!(matches!(generator.generate_from(&mut rng, 5, "the"), Err(Error::EmptyIndex)));
	}

	#[test]
	fn zero_budget_returns_normalized_phrase() {
		let generator = generator(1);
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_from(&mut rng, 0, "  The   cat ").unwrap(), "The cat");
	}

	#[test]
	fn unmatched_phrase_returns_phrase_only() {
		let generator = generator(1);
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_from(&mut rng, 10, "zebra giraffe").unwrap(), "zebra giraffe");
	}

	#[test]
	fn blank_phrase_returns_empty() {
		let generator = generator(1);
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_from(&mut rng, 10, " ").unwrap(), "");
	}

	#[test]
	fn order_one_follows_the() {
		let generator = generator(1);
		let mut rng = StdRng::seed_from_u64(42);
		for _ in 0..100 {
			let output = generator.generate_from(&mut rng, 1, "the").unwrap();
			assert!(output == "the cat" || output == "the mat", "{}", output);
		}
	}

	#[test]
	fn order_two_follows_bigram() {
		let generator = generator(2);
		let mut rng = StdRng::seed_from_u64(42);
		for _ in 0..100 {
			let output = generator.generate_from(&mut rng, 1, "the cat").unwrap();
			assert!(output == "the cat sat" || output == "the cat ran", "{}", output);
		}
	}

	#[test]
	fn order_two_one_word_seed_emits_follower() {
		let generator = generator(2);
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..100 {
			let output = generator.generate_from(&mut rng, 1, "on").unwrap();
			assert_eq!(output, "on the");
		}
	}

	#[test]
	fn seed_case_is_kept_and_matching_ignores_it() {
		let generator = generator(2);
		let mut rng = StdRng::seed_from_u64(9);
		let output = generator.generate_from(&mut rng, 1, "THE CAT").unwrap();
		assert!(output == "THE CAT sat" || output == "THE CAT ran", "{}", output);
	}

	#[test]
	fn stops_at_end_of_text() {
		let generator = generator(1);
		let mut rng = StdRng::seed_from_u64(0);
		// "ran" is the last word: nothing follows it.
		assert_eq!(generator.generate_from(&mut rng, 5, "ran").unwrap(), "ran");
	}

	#[test]
	fn deterministic_chain_walks_whole_text() {
		let generator = TextGenerator::create("one two three four five".as_bytes(), 2).unwrap();
		let mut rng = StdRng::seed_from_u64(5);
		assert_eq!(generator.generate_from(&mut rng, 10, "one two").unwrap(), "one two three four five");
	}

	#[test]
	fn random_start_is_a_corpus_word() {
		let generator = generator(2);
		let words: Vec<&str> = CORPUS.split(' ').collect();
		let mut rng = StdRng::seed_from_u64(17);
		for _ in 0..50 {
			let output = generator.generate(&mut rng, 0).unwrap();
			assert!(words.contains(&output.as_str()), "{}", output);
		}
	}

	#[test]
	fn budget_bounds_output() {
		let generator = TextGenerator::create("one two three four five".as_bytes(), 1).unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(generator.generate_from(&mut rng, 2, "one").unwrap(), "one two three");
	}

	#[test]
	fn predict_with_reservoir() {
		let generator = generator(2);
		let mut rng = StdRng::seed_from_u64(4);
		let mut input = generator.make_generation_input(1);
		input.set_seed("the cat");
		input.sampling = Sampling::Reservoir;
		let output = generator.predict(&mut rng, &input).unwrap();
		assert!(output == "the cat sat" || output == "the cat ran", "{}", output);
	}

	#[test]
	fn same_seed_same_output() {
		let generator = generator(1);
		let first = generator.generate(&mut StdRng::seed_from_u64(77), 20).unwrap();
		let second = generator.generate(&mut StdRng::seed_from_u64(77), 20).unwrap();
		assert_eq!(first, second);
	}
}
