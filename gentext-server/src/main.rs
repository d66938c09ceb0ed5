use std::path::Path;
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};

use serde::Deserialize;
use gentext_core::io::list_files;
use gentext_core::model::generation_input::StartSeed;
use gentext_core::model::generator::{DEFAULT_ORDER, TextGenerator};
use gentext_core::model::sampler::Sampling;

const DATA_DIR: &str = "./data";
const CORPUS_EXTENSION: &str = "txt";

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max: Option<usize>,
	sampling: Option<Sampling>,
	seed: Option<String> // none (random start) or custom(str)
}

#[derive(Deserialize)]
struct CorpusQuery {
	name: Option<String>,
	order: Option<usize>
}

/// The loaded generator and the corpus it was built from.
struct SharedData {
	name: Option<String>,
	generator: Option<TextGenerator>
}

impl GenerateParams {
	/// Determines the starting seed strategy for generation.
	fn start_seed(&self) -> Result<StartSeed, String> {
		match &self.seed {
			None => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase() == "none" => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase().starts_with("custom:") => {
				let value = &s["custom:".len()..];
				if value.trim().is_empty() {
					Err("Custom seed cannot be empty".into())
				} else {
					Ok(StartSeed::Custom(value.to_owned()))
				}
			}
			Some(_) => Err("Seed must start with 'custom:' or be 'none'".into()),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates text from the loaded corpus based on query parameters.
/// Returns the generated text as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let start_seed = match query.start_seed() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let generator = match &shared_data.generator {
		Some(g) => g,
		None => return HttpResponse::Conflict().body("No corpus loaded"),
	};

	let mut input = generator.make_generation_input(query.max.unwrap_or(20));
	input.start_seed = start_seed;
	input.sampling = query.sampling.unwrap_or_default();

	match generator.predict(&mut rand::rng(), &input) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files(DATA_DIR, CORPUS_EXTENSION) {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[get("/v1/loaded_corpus")]
async fn get_loaded_corpus(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	match (&shared_data.name, &shared_data.generator) {
		(Some(name), Some(generator)) => HttpResponse::Ok().body(format!("{} (order {}, {} words)", name, generator.order(), generator.word_count())),
		_ => HttpResponse::Ok().body("")
	}
}

#[put("/v1/load_corpus")]
async fn put_corpus(data: web::Data<RwLock<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	if name.contains(['/', '\\']) || name.starts_with('.') {
		return HttpResponse::BadRequest().body("Invalid corpus name");
	}
	let order = query.order.unwrap_or(DEFAULT_ORDER);

	// Build outside the lock, generation keeps running on the old corpus meanwhile
	let corpus_path = Path::new(DATA_DIR).join(format!("{}.{}", name, CORPUS_EXTENSION));
	let generator = match TextGenerator::from_file(&corpus_path, order) {
		Ok(g) => g,
		Err(e) => {
			warn!("failed to load {}: {}", corpus_path.display(), e);
			return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}"))
		}
	};
	info!("loaded {} ({} words, order {})", name, generator.word_count(), order);

	let mut shared_data = match data.write() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	shared_data.name = Some(name.to_owned());
	shared_data.generator = Some(generator);

	HttpResponse::Ok().body("Corpus loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with no corpus; one is loaded through `PUT /v1/load_corpus`.
/// The generator sits behind a `RwLock` so generation requests only take a
/// read lock and run concurrently, each with its own thread-local RNG.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Corpora are `.txt` files in `./data`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let shared_data = SharedData {
		name: None,
		generator: None,
	};
	let shared_generator = web::Data::new(RwLock::new(shared_data));

	info!("listening on 127.0.0.1:5000");
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_generator.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(put_corpus)
			.service(get_loaded_corpus)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
