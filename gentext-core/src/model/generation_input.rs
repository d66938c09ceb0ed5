use super::sampler::Sampling;

/// Strategy used to select the phrase a generation starts from.
///
/// # Variants
/// - `Random`: start from one uniformly chosen corpus word.
/// - `Custom(String)`: start from the provided phrase (normalized before
///   lookup).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartSeed {
	#[default]
	Random,
	Custom(String),
}

/// Parameters of a single generation call.
///
/// Built with `TextGenerator::make_generation_input` and adjusted field by
/// field before being passed to `TextGenerator::predict`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationInput {
	/// Maximum number of words appended after the start phrase.
	pub max_words: usize,

	/// Where the walk starts.
	pub start_seed: StartSeed,

	/// How ties between matching suffixes are broken.
	pub sampling: Sampling,
}

impl GenerationInput {
	pub(crate) fn new(max_words: usize) -> Self {
		Self { max_words, ..Self::default() }
	}

	/// Anchors the generation to `phrase`. Blank phrases fall back to a
	/// random start.
	pub fn set_seed(&mut self, phrase: &str) {
		self.start_seed = if phrase.trim().is_empty() {
			StartSeed::Random
		} else {
			StartSeed::Custom(phrase.to_owned())
		};
	}
}
