use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pricewatch::config::Config;
use pricewatch::report;
use pricewatch::seed;
use pricewatch::sim::SeriesParams;
use pricewatch::store;

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.level);

    let mut conn = store::open(&config.store.path)?;
    store::init_schema(&conn)?;

    let mut rng = match config.generator.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let params = SeriesParams {
        days: config.generator.days,
        volatility: config.generator.volatility,
        ..SeriesParams::default()
    };

    tracing::info!(
        path = %config.store.path.display(),
        days = params.days,
        "seeding price history"
    );
    let outcome = seed::populate(&mut conn, &params, chrono::Utc::now(), &mut rng)?;

    println!(
        "seeded {} new products, {} price observations, {} alerts",
        outcome.products, outcome.observations, outcome.alerts
    );
    println!();
    let stats = store::stats(&conn)?;
    print!("{}", report::render_stats(&stats));
    println!();
    println!("store ready at {}", config.store.path.display());
    Ok(())
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.parse().unwrap_or_else(|_| "info".parse().unwrap())),
        )
        .with_writer(std::io::stderr)
        .init();
}
