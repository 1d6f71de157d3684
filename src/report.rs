use std::fmt::Write;

use rusqlite::Connection;

use crate::error::AppError;
use crate::model::product::Product;
use crate::store::{self, CompetitorPrice, Deal, StoreStats};

const RULE_WIDTH: usize = 70;

/// Trend summary for one product.
#[derive(Debug)]
pub struct TrendReport {
    pub product: Product,
    /// Latest observation per competitor, sorted ascending by price by the
    /// store query. The renderer marks the first row as the best offer and
    /// depends on that ordering; it never re-sorts.
    pub current: Vec<CompetitorPrice>,
}

pub fn product_trend(conn: &Connection, sku: &str) -> Result<TrendReport, AppError> {
    let product = store::find_product_by_sku(conn, sku)?
        .ok_or_else(|| AppError::ProductNotFound(sku.to_string()))?;
    let current = store::latest_prices(conn, product.id)?;
    Ok(TrendReport { product, current })
}

pub fn best_deals(conn: &Connection, limit: usize) -> Result<Vec<Deal>, AppError> {
    store::top_discounts(conn, limit)
}

pub fn render_trend(report: &TrendReport) -> String {
    let mut out = String::new();
    let p = &report.product;
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "price trend: {}", p.name);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "brand: {} | category: {} | MSRP: ${:.2}",
        p.brand, p.category, p.msrp
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "current prices");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for (i, row) in report.current.iter().enumerate() {
        let stock = if row.in_stock { "in stock" } else { "out of stock" };
        let badge = if i == 0 { "  BEST" } else { "" };
        let _ = writeln!(
            out,
            "  {:<12} ${:>8.2}  ({:>5.1}% off)  {:<12}{}",
            row.competitor, row.price, row.discount_percent, stock, badge
        );
    }
    if report.current.is_empty() {
        let _ = writeln!(out, "  (no price history)");
    }
    out
}

pub fn render_deals(deals: &[Deal]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "best deals across all products");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for deal in deals {
        let name: String = deal.product_name.chars().take(35).collect();
        let _ = writeln!(
            out,
            "  {:<35} {:<12} ${:>8.2}  ({:.1}% off)",
            name, deal.competitor, deal.price, deal.discount_percent
        );
    }
    if deals.is_empty() {
        let _ = writeln!(out, "  (no deals found)");
    }
    out
}

pub fn render_stats(stats: &StoreStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "store statistics");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(out, "  products tracked:      {}", stats.products);
    let _ = writeln!(out, "  price observations:    {}", stats.observations);
    if let Some((min, max)) = &stats.date_range {
        let _ = writeln!(
            out,
            "  date range:            {} to {}",
            min.format("%Y-%m-%d"),
            max.format("%Y-%m-%d")
        );
    }
    let _ = writeln!(out, "  competitors:           {}", stats.competitors.join(", "));
    let _ = writeln!(out, "  unacknowledged alerts: {}", stats.unacknowledged_alerts);
    out
}
