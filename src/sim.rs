use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::model::observation::{round2, PricePoint};

/// Prices never fall below this fraction of the base price (30% off).
pub const PRICE_FLOOR_RATIO: f64 = 0.70;

/// The walk starts above the base price to simulate an inflated
/// pre-sale starting point.
pub const START_FACTOR_MIN: f64 = 1.05;
pub const START_FACTOR_MAX: f64 = 1.15;

/// Knobs for the synthetic daily price walk.
#[derive(Debug, Clone)]
pub struct SeriesParams {
    /// Horizon in days; one point per day.
    pub days: u32,
    /// Standard deviation of the Gaussian daily percentage change.
    pub volatility: f64,
    /// Daily drift outside the sale window.
    pub drift_far: f64,
    /// Daily drift inside the final `sale_window_days` days.
    pub drift_near: f64,
    pub sale_window_days: u32,
    /// Chance per day of an extra flash-sale drop.
    pub spike_probability: f64,
    pub spike_min: f64,
    pub spike_max: f64,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            days: 30,
            volatility: 0.02,
            drift_far: -0.001,
            drift_near: -0.002,
            sale_window_days: 14,
            spike_probability: 0.10,
            spike_min: 0.02,
            spike_max: 0.05,
        }
    }
}

/// Generate a daily price series for one (product, competitor) pair:
/// ordered oldest first, one point per day, ending the day before `end`.
/// Recorded prices are rounded to cents; the running price is not.
/// Deterministic given the same params and rng state.
pub fn generate_series(
    params: &SeriesParams,
    base_price: f64,
    end: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Vec<PricePoint> {
    assert!(params.days > 0, "series horizon must be > 0");
    let noise = Normal::new(0.0, params.volatility).expect("volatility must be finite and >= 0");
    let floor = base_price * PRICE_FLOOR_RATIO;

    let mut price = base_price * rng.random_range(START_FACTOR_MIN..=START_FACTOR_MAX);
    let mut points = Vec::with_capacity(params.days as usize);

    for day in (1..=params.days).rev() {
        let mut daily_change = noise.sample(rng);
        let drift = if day < params.sale_window_days {
            params.drift_near
        } else {
            params.drift_far
        };
        // Occasional bigger drop (flash sale).
        if rng.random::<f64>() < params.spike_probability {
            daily_change -= rng.random_range(params.spike_min..=params.spike_max);
        }

        price *= 1.0 + daily_change + drift;
        price = price.max(floor);

        points.push(PricePoint {
            at: end - Duration::days(day as i64),
            price: round2(price),
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap()
    }

    fn quiet_params(days: u32) -> SeriesParams {
        SeriesParams {
            days,
            volatility: 0.0,
            drift_far: 0.0,
            drift_near: 0.0,
            spike_probability: 0.0,
            ..SeriesParams::default()
        }
    }

    #[test]
    fn one_point_per_day_oldest_first() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = generate_series(&SeriesParams::default(), 1000.0, end(), &mut rng);
        assert_eq!(points.len(), 30);
        assert_eq!(points[0].at, end() - Duration::days(30));
        assert_eq!(points[29].at, end() - Duration::days(1));
        for pair in points.windows(2) {
            assert!(pair[0].at < pair[1].at);
        }
    }

    #[test]
    fn degenerate_params_give_constant_series() {
        let mut rng = StdRng::seed_from_u64(99);
        let points = generate_series(&quiet_params(5), 1000.0, end(), &mut rng);
        assert_eq!(points.len(), 5);
        let first = points[0].price;
        // Start factor is the only draw that matters: 1000 * uniform(1.05, 1.15).
        assert!((1050.0..=1150.0).contains(&first));
        for p in &points {
            assert!((p.price - first).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn recorded_prices_have_cent_precision() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = generate_series(&SeriesParams::default(), 499.0, end(), &mut rng);
        for p in &points {
            let cents = p.price * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6, "price {} not rounded", p.price);
        }
    }

    #[test]
    fn floor_holds_under_heavy_drops() {
        let params = SeriesParams {
            days: 60,
            volatility: 0.05,
            drift_far: -0.2,
            drift_near: -0.3,
            spike_probability: 1.0,
            ..SeriesParams::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let base = 500.0;
        let points = generate_series(&params, base, end(), &mut rng);
        // Recorded values round to cents, so allow half a cent under the floor.
        let floor = base * PRICE_FLOOR_RATIO;
        for p in &points {
            assert!(p.price >= floor - 0.005, "price {} below floor {}", p.price, floor);
        }
        // A walk this heavy must actually reach the floor.
        assert!(points.iter().any(|p| (p.price - round2(floor)).abs() < 0.005));
    }

    #[test]
    fn same_seed_reproduces_the_series() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let left = generate_series(&SeriesParams::default(), 1299.0, end(), &mut a);
        let right = generate_series(&SeriesParams::default(), 1299.0, end(), &mut b);
        assert_eq!(left, right);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        let left = generate_series(&SeriesParams::default(), 1299.0, end(), &mut a);
        let right = generate_series(&SeriesParams::default(), 1299.0, end(), &mut b);
        assert_ne!(left, right);
    }

    #[test]
    #[should_panic(expected = "series horizon must be > 0")]
    fn zero_horizon_panics() {
        let mut rng = StdRng::seed_from_u64(0);
        let _ = generate_series(&quiet_params(0), 100.0, end(), &mut rng);
    }
}
