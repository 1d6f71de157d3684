use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;

use crate::error::AppError;
use crate::model::alert::detect_price_drops;
use crate::model::observation::{discount_percent, PriceObservation};
use crate::model::product::ProductSeed;
use crate::sim::{generate_series, SeriesParams};
use crate::store;

pub const COMPETITORS: [&str; 5] = ["Amazon", "Walmart", "Best Buy", "Target", "Costco"];

/// Each competitor prices off its own synthetic base, somewhere below MSRP.
pub const COMPETITOR_BASE_MIN: f64 = 0.85;
pub const COMPETITOR_BASE_MAX: f64 = 0.95;

const OUT_OF_STOCK_PROBABILITY: f64 = 0.05;

/// The monitored catalog. SKUs are the upsert key, so re-seeding an
/// existing store leaves these rows untouched.
pub fn product_catalog() -> Vec<ProductSeed> {
    vec![
        ProductSeed {
            sku: "MBA-M3-256",
            name: "MacBook Air M3 256GB",
            category: "Laptops",
            brand: "Apple",
            msrp: 1099.0,
        },
        ProductSeed {
            sku: "MBA-M3-512",
            name: "MacBook Air M3 512GB",
            category: "Laptops",
            brand: "Apple",
            msrp: 1299.0,
        },
        ProductSeed {
            sku: "MBP-M3-PRO",
            name: "MacBook Pro 14\" M3 Pro",
            category: "Laptops",
            brand: "Apple",
            msrp: 1999.0,
        },
        ProductSeed {
            sku: "IPAD-PRO-11",
            name: "iPad Pro 11\" M4",
            category: "Tablets",
            brand: "Apple",
            msrp: 999.0,
        },
        ProductSeed {
            sku: "AIRPODS-PRO",
            name: "AirPods Pro 2nd Gen",
            category: "Audio",
            brand: "Apple",
            msrp: 249.0,
        },
        ProductSeed {
            sku: "PS5-SLIM",
            name: "PlayStation 5 Slim",
            category: "Gaming",
            brand: "Sony",
            msrp: 499.0,
        },
        ProductSeed {
            sku: "XBOX-X",
            name: "Xbox Series X",
            category: "Gaming",
            brand: "Microsoft",
            msrp: 499.0,
        },
        ProductSeed {
            sku: "SWITCH-OLED",
            name: "Nintendo Switch OLED",
            category: "Gaming",
            brand: "Nintendo",
            msrp: 349.0,
        },
    ]
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SeedOutcome {
    /// Newly inserted products (existing SKUs are skipped).
    pub products: usize,
    pub observations: usize,
    pub alerts: usize,
}

/// Seed the full history: for every product x competitor pair, draw a
/// competitor base price, generate a daily series ending at `end`, store
/// one observation per day and an alert per detected drop. All writes
/// happen in a single transaction.
pub fn populate(
    conn: &mut Connection,
    params: &SeriesParams,
    end: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<SeedOutcome, AppError> {
    let mut outcome = SeedOutcome {
        products: store::upsert_products(conn, &product_catalog())?,
        ..SeedOutcome::default()
    };
    let products = store::load_products(conn)?;

    let tx = conn.transaction()?;
    for product in &products {
        for competitor in COMPETITORS {
            let competitor_base =
                product.msrp * rng.random_range(COMPETITOR_BASE_MIN..=COMPETITOR_BASE_MAX);
            let series = generate_series(params, competitor_base, end, rng);

            for point in &series {
                let in_stock = rng.random::<f64>() > OUT_OF_STOCK_PROBABILITY;
                store::insert_observation(
                    &tx,
                    &PriceObservation {
                        product_id: product.id,
                        competitor: competitor.to_string(),
                        price: point.price,
                        original_price: product.msrp,
                        discount_percent: discount_percent(product.msrp, point.price),
                        in_stock,
                        url: None,
                        scraped_at: point.at,
                    },
                )?;
                outcome.observations += 1;
            }

            for event in detect_price_drops(&series) {
                store::insert_alert(&tx, product.id, competitor, &event)?;
                outcome.alerts += 1;
            }
        }
        tracing::debug!(sku = %product.sku, "seeded price history");
    }
    tx.commit()?;

    Ok(outcome)
}
