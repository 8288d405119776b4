use clap::Parser;
use peermatch_api::RestApi;
use peermatch_core::generate_population;
use peermatch_match::{AutoencoderConfig, MatchEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// A peer-matching engine for collaborative learning
#[derive(Parser, Debug)]
#[command(name = "peermatch")]
#[command(about = "Match children to compatible learning peers", long_about = None)]
struct Args {
    /// Size of the synthetic population to fit on
    #[arg(long, default_value_t = 300)]
    population_size: usize,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Autoencoder latent width
    #[arg(long, default_value_t = 32)]
    latent_dim: usize,

    /// Autoencoder training epochs
    #[arg(long, default_value_t = 50)]
    epochs: usize,

    /// Seed for population sampling and weight init (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting peermatch v{}", env!("CARGO_PKG_VERSION"));
    info!("Population size: {}", args.population_size);
    info!("HTTP API port: {}", args.http_port);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let population = generate_population(args.population_size, &mut rng);
    info!("Population generated");

    let config = AutoencoderConfig {
        latent_dim: args.latent_dim,
        epochs: args.epochs,
        seed: args.seed,
        ..AutoencoderConfig::default()
    };
    let mut engine = MatchEngine::new(config);
    let history = engine.fit(population)?;
    info!(
        final_loss = history.final_loss().unwrap_or(f32::NAN),
        "Engine fitted"
    );

    let engine = Arc::new(engine);
    info!("HTTP API: http://localhost:{}/", args.http_port);

    let sys = actix_web::rt::System::new();
    sys.block_on(RestApi::start(engine, args.http_port))?;

    info!("Shutting down...");
    Ok(())
}
