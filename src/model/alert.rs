use chrono::{DateTime, Utc};

use crate::model::observation::{round1, PricePoint};

pub const ALERT_TYPE_PRICE_DROP: &str = "PRICE_DROP";

/// A drop alert fires when the day-over-day change falls below this
/// percentage. The boundary itself does not fire.
pub const DROP_THRESHOLD_PCT: f64 = -5.0;

/// Derived fact about a significant price drop. Alerts are never retracted;
/// only the acknowledged flag may change after insertion.
#[derive(Debug, Clone)]
pub struct PriceAlert {
    pub id: i64,
    pub product_id: i64,
    pub competitor: String,
    pub alert_type: String,
    pub old_price: f64,
    pub new_price: f64,
    pub change_percent: f64,
    pub message: String,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

/// A detected drop between two chronologically consecutive points,
/// not yet tied to a product or competitor.
#[derive(Debug, Clone)]
pub struct PriceDrop {
    pub at: DateTime<Utc>,
    pub old_price: f64,
    pub new_price: f64,
    /// Signed percent change, rounded to one decimal.
    pub change_percent: f64,
    pub message: String,
}

/// Walk consecutive pairs of a time-ordered series and collect every drop
/// steeper than [`DROP_THRESHOLD_PCT`]. The series itself is untouched.
pub fn detect_price_drops(points: &[PricePoint]) -> Vec<PriceDrop> {
    let mut drops = Vec::new();
    for pair in points.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if prev.price <= 0.0 {
            continue;
        }
        let change_pct = (cur.price - prev.price) / prev.price * 100.0;
        if change_pct < DROP_THRESHOLD_PCT {
            let rounded = round1(change_pct);
            drops.push(PriceDrop {
                at: cur.at,
                old_price: prev.price,
                new_price: cur.price,
                change_percent: rounded,
                message: format!(
                    "Price dropped {:.1}% from ${:.2} to ${:.2}",
                    rounded.abs(),
                    prev.price,
                    cur.price
                ),
            });
        }
    }
    drops
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                at: start + Duration::days(i as i64),
                price,
            })
            .collect()
    }

    #[test]
    fn drop_below_threshold_emits() {
        let drops = detect_price_drops(&series(&[100.0, 94.9]));
        assert_eq!(drops.len(), 1);
        assert!((drops[0].old_price - 100.0).abs() < f64::EPSILON);
        assert!((drops[0].new_price - 94.9).abs() < f64::EPSILON);
        assert!((drops[0].change_percent + 5.1).abs() < 1e-9);
    }

    #[test]
    fn exact_threshold_does_not_emit() {
        // -5.0% exactly stays below the bar.
        assert!(detect_price_drops(&series(&[100.0, 95.0])).is_empty());
    }

    #[test]
    fn small_moves_and_raises_do_not_emit() {
        assert!(detect_price_drops(&series(&[100.0, 96.0])).is_empty());
        assert!(detect_price_drops(&series(&[100.0, 104.0])).is_empty());
    }

    #[test]
    fn first_point_has_no_predecessor() {
        assert!(detect_price_drops(&series(&[50.0])).is_empty());
        assert!(detect_price_drops(&[]).is_empty());
    }

    #[test]
    fn consecutive_pairs_only() {
        // 100 -> 97 -> 91 drops 9% overall but only the second step
        // (-6.18%) crosses the per-day threshold.
        let drops = detect_price_drops(&series(&[100.0, 97.0, 91.0]));
        assert_eq!(drops.len(), 1);
        assert!((drops[0].old_price - 97.0).abs() < f64::EPSILON);
        assert!((drops[0].change_percent + 6.2).abs() < 1e-9);
    }

    #[test]
    fn message_carries_both_prices() {
        let drops = detect_price_drops(&series(&[249.0, 199.0]));
        assert_eq!(drops.len(), 1);
        assert_eq!(
            drops[0].message,
            "Price dropped 20.1% from $249.00 to $199.00"
        );
    }
}
