use anyhow::Result;

use pricewatch::config::Config;
use pricewatch::error::AppError;
use pricewatch::report;
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

    let conn = store::open(&config.store.path)?;
    store::init_schema(&conn)?;

    match report::product_trend(&conn, &config.report.trend_sku) {
        Ok(trend) => print!("{}", report::render_trend(&trend)),
        // Missing product is reported, not fatal; the deals table still runs.
        Err(AppError::ProductNotFound(sku)) => println!("product {} not found", sku),
        Err(e) => return Err(e.into()),
    }
    println!();

    let deals = report::best_deals(&conn, config.report.top_deals)?;
    print!("{}", report::render_deals(&deals));
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
