//! End-to-end generation through the public API.

use std::collections::HashSet;
use std::fs;

use gentext_core::Error;
use gentext_core::io::{get_filename, list_files};
use gentext_core::model::generation_input::StartSeed;
use gentext_core::model::generator::TextGenerator;
use gentext_core::model::sampler::Sampling;
use rand::SeedableRng;
use rand::rngs::StdRng;

const CORPUS: &str = "the cat sat on the mat the cat ran";

#[test]
fn order_one_after_the() {
	let generator = TextGenerator::create(CORPUS.as_bytes(), 1).unwrap();
	let mut rng = StdRng::seed_from_u64(2024);

	let mut seen = HashSet::new();
	for _ in 0..300 {
		let output = generator.generate_from(&mut rng, 1, "the").unwrap();
		let next = output.strip_prefix("the ").unwrap().to_owned();
		assert!(next == "cat" || next == "mat", "{}", next);
		seen.insert(next);
	}
	assert_eq!(seen.len(), 2);
}

#[test]
fn order_two_after_the_cat() {
	let generator = TextGenerator::create(CORPUS.as_bytes(), 2).unwrap();

	for sampling in [Sampling::Span, Sampling::Reservoir] {
		let mut rng = StdRng::seed_from_u64(99);
		let mut input = generator.make_generation_input(1);
		input.set_seed("the cat");
		input.sampling = sampling;

		let mut seen = HashSet::new();
		for _ in 0..300 {
			seen.insert(generator.predict(&mut rng, &input).unwrap());
		}
		let expected: HashSet<String> = ["the cat sat", "the cat ran"].iter().map(|s| s.to_string()).collect();
		assert_eq!(seen, expected, "{}", sampling);
	}
}

#[test]
fn unmatched_phrase_is_returned_alone() {
	let generator = TextGenerator::create(CORPUS.as_bytes(), 1).unwrap();
	let mut rng = StdRng::seed_from_u64(0);
	assert_eq!(generator.generate_from(&mut rng, 25, "zebra  giraffe").unwrap(), "zebra giraffe");
}

#[test]
fn next_word_frequencies_follow_corpus() {
	// "x" is followed by "a" three times and by "b" once.
	let generator = TextGenerator::create("x a x a x a x b".as_bytes(), 1).unwrap();
	let mut rng = StdRng::seed_from_u64(8);
	let trials = 4000;
	let a = (0..trials)
		.filter(|_| generator.generate_from(&mut rng, 1, "x").unwrap() == "x a")
		.count();
	assert!((2700..=3300).contains(&a), "picked 'a' {} times", a);
}

#[test]
fn random_start_generation_walks_corpus() {
	let generator = TextGenerator::create(CORPUS.as_bytes(), 2).unwrap();
	let mut rng = StdRng::seed_from_u64(12);
	let mut input = generator.make_generation_input(30);
	input.start_seed = StartSeed::Random;
	let output = generator.predict(&mut rng, &input).unwrap();
	assert!(!output.is_empty());
	assert!(output.split(' ').count() <= 31);
}

#[test]
fn invalid_order_is_rejected() {
	assert!(matches!(TextGenerator::create(CORPUS.as_bytes(), 0), Err(Error::InvalidOrder(0))));
	assert!(matches!(TextGenerator::from_words(["a"], 0), Err(Error::InvalidOrder(0))));
}

#[test]
fn empty_corpus_cannot_generate() {
	let generator = TextGenerator::from_words(Vec::<String>::new(), 2).unwrap();
	assert!(generator.is_empty());
	let mut rng = StdRng::seed_from_u64(0);
	assert!(matches!(generator.generate(&mut rng, 3), Err(Error::EmptyIndex)));
}

#[test]
fn load_from_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("cats.txt");
	fs::write(&path, "the cat sat\non the mat\n\tthe cat ran\n").unwrap();
	fs::write(dir.path().join("notes.md"), "ignored").unwrap();

	let generator = TextGenerator::from_file(&path, 2).unwrap();
	assert_eq!(generator.word_count(), 9);
	assert_eq!(generator.order(), 2);

	assert_eq!(list_files(dir.path(), "txt").unwrap(), vec!["cats.txt"]);
	assert_eq!(get_filename(&path).unwrap(), "cats");
}

#[test]
fn missing_file_is_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let result = TextGenerator::from_file(dir.path().join("missing.txt"), 2);
	assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn generator_is_shareable_across_threads() {
	let generator = TextGenerator::create(CORPUS.as_bytes(), 1).unwrap();
	std::thread::scope(|scope| {
		for seed in 0..4 {
			let generator = &generator;
			scope.spawn(move || {
				let mut rng = StdRng::seed_from_u64(seed);
				generator.generate(&mut rng, 10).unwrap()
			});
		}
	});
}
