use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::AppError;
use crate::model::alert::{PriceAlert, PriceDrop, ALERT_TYPE_PRICE_DROP};
use crate::model::observation::PriceObservation;
use crate::model::product::{Product, ProductSeed};

/// Open (creating if needed) the store at `path` in WAL mode.
pub fn open(path: &Path) -> Result<Connection, AppError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(conn)
}

/// In-memory store with the same schema hooks, for tests.
pub fn open_in_memory() -> Result<Connection, AppError> {
    Ok(Connection::open_in_memory()?)
}

/// Create tables and indexes. A no-op when the schema already exists.
pub fn init_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sku TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            category TEXT,
            brand TEXT,
            msrp REAL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS price_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            competitor TEXT NOT NULL,
            price REAL NOT NULL,
            original_price REAL,
            discount_percent REAL,
            in_stock BOOLEAN DEFAULT 1,
            url TEXT,
            scraped_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (product_id) REFERENCES products(id)
        );

        CREATE TABLE IF NOT EXISTS price_alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            competitor TEXT,
            alert_type TEXT NOT NULL,
            old_price REAL,
            new_price REAL,
            change_percent REAL,
            message TEXT,
            acknowledged BOOLEAN DEFAULT 0,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (product_id) REFERENCES products(id)
        );

        CREATE INDEX IF NOT EXISTS idx_price_history_product
            ON price_history(product_id, scraped_at DESC);
        CREATE INDEX IF NOT EXISTS idx_price_history_competitor
            ON price_history(competitor);
        CREATE INDEX IF NOT EXISTS idx_price_history_date
            ON price_history(scraped_at);
        CREATE INDEX IF NOT EXISTS idx_alerts_product
            ON price_alerts(product_id, created_at DESC);
        "#,
    )?;
    Ok(())
}

/// Insert products, ignoring SKUs that already exist. Returns the number
/// of newly inserted rows, so re-seeding an existing store reports zero.
pub fn upsert_products(conn: &Connection, seeds: &[ProductSeed]) -> Result<usize, AppError> {
    let mut stmt = conn.prepare(
        r#"
        INSERT OR IGNORE INTO products (sku, name, category, brand, msrp)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )?;
    let mut inserted = 0;
    for p in seeds {
        inserted += stmt.execute(params![p.sku, p.name, p.category, p.brand, p.msrp])?;
    }
    Ok(inserted)
}

pub fn load_products(conn: &Connection) -> Result<Vec<Product>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, sku, name, category, brand, msrp FROM products ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Product {
            id: row.get(0)?,
            sku: row.get(1)?,
            name: row.get(2)?,
            category: row.get(3)?,
            brand: row.get(4)?,
            msrp: row.get(5)?,
        })
    })?;

    let mut products = Vec::new();
    for row in rows {
        products.push(row?);
    }
    Ok(products)
}

pub fn find_product_by_sku(conn: &Connection, sku: &str) -> Result<Option<Product>, AppError> {
    let product = conn
        .query_row(
            "SELECT id, sku, name, category, brand, msrp FROM products WHERE sku = ?1",
            [sku],
            |row| {
                Ok(Product {
                    id: row.get(0)?,
                    sku: row.get(1)?,
                    name: row.get(2)?,
                    category: row.get(3)?,
                    brand: row.get(4)?,
                    msrp: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(product)
}

pub fn insert_observation(conn: &Connection, obs: &PriceObservation) -> Result<(), AppError> {
    conn.execute(
        r#"
        INSERT INTO price_history
            (product_id, competitor, price, original_price, discount_percent, in_stock, url, scraped_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            obs.product_id,
            obs.competitor,
            obs.price,
            obs.original_price,
            obs.discount_percent,
            obs.in_stock,
            obs.url,
            obs.scraped_at,
        ],
    )?;
    Ok(())
}

pub fn insert_alert(
    conn: &Connection,
    product_id: i64,
    competitor: &str,
    event: &PriceDrop,
) -> Result<(), AppError> {
    conn.execute(
        r#"
        INSERT INTO price_alerts
            (product_id, competitor, alert_type, old_price, new_price, change_percent, message, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            product_id,
            competitor,
            ALERT_TYPE_PRICE_DROP,
            event.old_price,
            event.new_price,
            event.change_percent,
            event.message,
            event.at,
        ],
    )?;
    Ok(())
}

pub fn load_alerts(conn: &Connection, product_id: i64) -> Result<Vec<PriceAlert>, AppError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, product_id, competitor, alert_type, old_price, new_price,
               change_percent, message, acknowledged, created_at
        FROM price_alerts
        WHERE product_id = ?1
        ORDER BY created_at ASC, id ASC
        "#,
    )?;
    let rows = stmt.query_map([product_id], |row| {
        Ok(PriceAlert {
            id: row.get(0)?,
            product_id: row.get(1)?,
            competitor: row.get(2)?,
            alert_type: row.get(3)?,
            old_price: row.get(4)?,
            new_price: row.get(5)?,
            change_percent: row.get(6)?,
            message: row.get(7)?,
            acknowledged: row.get(8)?,
            created_at: row.get(9)?,
        })
    })?;

    let mut alerts = Vec::new();
    for row in rows {
        alerts.push(row?);
    }
    Ok(alerts)
}

/// Mark one alert as seen. The only mutation the store permits after
/// insert. Returns false when no such alert exists.
pub fn acknowledge_alert(conn: &Connection, alert_id: i64) -> Result<bool, AppError> {
    let changed = conn.execute(
        "UPDATE price_alerts SET acknowledged = 1 WHERE id = ?1",
        [alert_id],
    )?;
    Ok(changed > 0)
}

/// Latest observation per competitor for one product.
#[derive(Debug, Clone)]
pub struct CompetitorPrice {
    pub competitor: String,
    pub price: f64,
    pub discount_percent: f64,
    pub in_stock: bool,
}

/// Per-competitor argmax on scraped_at, ordered ascending by price so the
/// first row is the best current offer. Exactly one row per competitor
/// present for the product.
pub fn latest_prices(conn: &Connection, product_id: i64) -> Result<Vec<CompetitorPrice>, AppError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT ph.competitor, ph.price, ph.discount_percent, ph.in_stock
        FROM price_history ph
        WHERE ph.product_id = ?1
          AND ph.scraped_at = (
              SELECT MAX(scraped_at) FROM price_history
              WHERE product_id = ?1 AND competitor = ph.competitor)
        ORDER BY ph.price ASC
        "#,
    )?;
    let rows = stmt.query_map([product_id], |row| {
        Ok(CompetitorPrice {
            competitor: row.get(0)?,
            price: row.get(1)?,
            discount_percent: row.get(2)?,
            in_stock: row.get(3)?,
        })
    })?;

    let mut prices = Vec::new();
    for row in rows {
        prices.push(row?);
    }
    Ok(prices)
}

#[derive(Debug, Clone)]
pub struct Deal {
    pub product_name: String,
    pub competitor: String,
    pub price: f64,
    pub discount_percent: f64,
}

/// Latest observation per product x competitor across all products, ranked
/// by discount descending. Ties keep insertion order (id ascending).
pub fn top_discounts(conn: &Connection, limit: usize) -> Result<Vec<Deal>, AppError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT p.name, ph.competitor, ph.price, ph.discount_percent
        FROM products p
        JOIN price_history ph ON p.id = ph.product_id
        WHERE ph.scraped_at = (
            SELECT MAX(scraped_at) FROM price_history
            WHERE product_id = p.id AND competitor = ph.competitor)
        ORDER BY ph.discount_percent DESC, ph.id ASC
        LIMIT ?1
        "#,
    )?;
    let rows = stmt.query_map([limit as i64], |row| {
        Ok(Deal {
            product_name: row.get(0)?,
            competitor: row.get(1)?,
            price: row.get(2)?,
            discount_percent: row.get(3)?,
        })
    })?;

    let mut deals = Vec::new();
    for row in rows {
        deals.push(row?);
    }
    Ok(deals)
}

#[derive(Debug, Clone)]
pub struct StoreStats {
    pub products: i64,
    pub observations: i64,
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub competitors: Vec<String>,
    pub unacknowledged_alerts: i64,
}

pub fn stats(conn: &Connection) -> Result<StoreStats, AppError> {
    let products = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    let observations =
        conn.query_row("SELECT COUNT(*) FROM price_history", [], |row| row.get(0))?;

    let date_range = conn.query_row(
        "SELECT MIN(scraped_at), MAX(scraped_at) FROM price_history",
        [],
        |row| {
            let min: Option<DateTime<Utc>> = row.get(0)?;
            let max: Option<DateTime<Utc>> = row.get(1)?;
            Ok(min.zip(max))
        },
    )?;

    let mut stmt =
        conn.prepare("SELECT DISTINCT competitor FROM price_history ORDER BY competitor ASC")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    let mut competitors = Vec::new();
    for row in rows {
        competitors.push(row?);
    }

    let unacknowledged_alerts = conn.query_row(
        "SELECT COUNT(*) FROM price_alerts WHERE acknowledged = 0",
        [],
        |row| row.get(0),
    )?;

    Ok(StoreStats {
        products,
        observations,
        date_range,
        competitors,
        unacknowledged_alerts,
    })
}
