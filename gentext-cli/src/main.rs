use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{info, warn};
use rand::Rng;

use gentext_core::model::generator::{DEFAULT_ORDER, TextGenerator};
use gentext_core::model::sampler::Sampling;

/// Reads a training text, then continues every line typed on stdin.
///
/// A non-empty line is used as the seed phrase; an empty line starts from a
/// random word.
#[derive(Parser, Debug)]
#[command(name = "gentext", version, about)]
struct Args {
    /// Training text file
    path: PathBuf,

    /// Number of words of context (Markov order)
    #[arg(short, long, default_value_t = DEFAULT_ORDER)]
    order: usize,

    /// Minimum number of generated words per line
    #[arg(long, default_value_t = 10)]
    min_words: usize,

    /// Maximum number of generated words per line (exclusive)
    #[arg(long, default_value_t = 30)]
    max_words: usize,

    /// Tie sampling strategy: span or reservoir
    #[arg(short, long, default_value_t = Sampling::Span)]
    sampling: Sampling,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.min_words >= args.max_words {
        return Err(format!("--min-words ({}) must be below --max-words ({})", args.min_words, args.max_words).into());
    }

    info!("Loading {}", args.path.display());
    let start = Instant::now();
    let generator = TextGenerator::from_file(&args.path, args.order)?;
    info!(
        "Indexed {} words at order {} in {} ms",
        generator.word_count(),
        generator.order(),
        start.elapsed().as_millis()
    );
    if generator.is_empty() {
        warn!("{} contains no words, only seeded lines will be echoed", args.path.display());
    }

    let mut rng = rand::rng();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Each line of stdin becomes a generation request until EOF
    for line in io::stdin().lock().lines() {
        let line = line?;

        let mut input = generator.make_generation_input(rng.random_range(args.min_words..args.max_words));
        input.set_seed(&line);
        input.sampling = args.sampling;

        match generator.predict(&mut rng, &input) {
            Ok(text) => writeln!(out, "{}", text)?,
            Err(e) => {
                warn!("{}", e);
                writeln!(out, "{}", line.trim())?;
            }
        }
        out.flush()?;
    }

    Ok(())
}
