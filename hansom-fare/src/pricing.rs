use serde::{Deserialize, Serialize};

use crate::{FareError, FareResult};

/// Pricing configuration for fare quotes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat fare covering the first `included_miles` of a trip
    pub base_fare: f64,

    /// Miles covered by the base fare
    pub included_miles: f64,

    /// Per-mile rate beyond the included distance
    pub extra_per_mile: f64,

    /// Multiplier for trips starting inside the night window
    pub night_multiplier: f64,

    /// Floor applied after every other adjustment
    pub minimum_fare: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_fare: 65.0,
            included_miles: 15.0,
            extra_per_mile: 2.0,
            night_multiplier: 1.25,
            minimum_fare: 65.0,
        }
    }
}

/// Partial pricing update; only the supplied fields are merged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingUpdate {
    pub base_fare: Option<f64>,
    pub included_miles: Option<f64>,
    pub extra_per_mile: Option<f64>,
    pub night_multiplier: Option<f64>,
    pub minimum_fare: Option<f64>,
}

impl PricingUpdate {
    /// Validate every supplied field. One bad field rejects the whole
    /// update, so callers check this before merging anything.
    pub fn validate(&self) -> FareResult<()> {
        fn positive(field: &'static str, value: Option<f64>) -> FareResult<()> {
            match value {
                Some(v) if !v.is_finite() || v <= 0.0 => Err(FareError::InvalidConfig(field)),
                _ => Ok(()),
            }
        }

        positive("base_fare", self.base_fare)?;
        positive("included_miles", self.included_miles)?;
        positive("extra_per_mile", self.extra_per_mile)?;
        positive("night_multiplier", self.night_multiplier)?;
        positive("minimum_fare", self.minimum_fare)?;

        // A night multiplier under 1 would discount night trips
        if matches!(self.night_multiplier, Some(m) if m < 1.0) {
            return Err(FareError::InvalidConfig("night_multiplier"));
        }

        Ok(())
    }

    /// Merge the supplied fields over `config`
    pub fn apply_to(&self, config: &mut PricingConfig) {
        if let Some(v) = self.base_fare {
            config.base_fare = v;
        }
        if let Some(v) = self.included_miles {
            config.included_miles = v;
        }
        if let Some(v) = self.extra_per_mile {
            config.extra_per_mile = v;
        }
        if let Some(v) = self.night_multiplier {
            config.night_multiplier = v;
        }
        if let Some(v) = self.minimum_fare {
            config.minimum_fare = v;
        }
    }
}

/// Itemized result of a fare computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareBreakdown {
    /// Total trip distance, rounded to 2 decimal places
    pub distance_miles: f64,
    pub included_miles: f64,
    pub extra_miles: f64,
    pub extra_cost: f64,
    pub base_fare: f64,
    pub night_rate_applied: bool,
    /// Multiplier actually applied (1.0 when the night rate is off)
    pub multiplier: f64,
    /// Final price, rounded to 2 decimal places
    pub total: f64,
}

/// Price a trip of `distance_miles` against `config`.
///
/// The night multiplier is applied to the subtotal before the
/// `minimum_fare` floor, so a night trip under the included distance
/// still pays more than the floor when the multiplier raises it past
/// the minimum.
pub fn compute_fare(
    distance_miles: f64,
    night_rate: bool,
    config: &PricingConfig,
) -> FareResult<FareBreakdown> {
    if !distance_miles.is_finite() || distance_miles < 0.0 {
        return Err(FareError::NegativeDistance(distance_miles));
    }

    let extra_miles = (distance_miles - config.included_miles).max(0.0);
    let extra_cost = extra_miles * config.extra_per_mile;
    let mut subtotal = config.base_fare + extra_cost;

    let multiplier = if night_rate { config.night_multiplier } else { 1.0 };
    subtotal *= multiplier;

    let total = subtotal.max(config.minimum_fare);

    Ok(FareBreakdown {
        distance_miles: round2(distance_miles),
        included_miles: config.included_miles,
        extra_miles: round2(extra_miles),
        extra_cost: round2(extra_cost),
        base_fare: config.base_fare,
        night_rate_applied: night_rate,
        multiplier,
        total: round2(total),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_fare_over_included_distance() {
        let config = PricingConfig::default();

        let fare = compute_fare(20.0, false, &config).unwrap();

        assert_eq!(fare.extra_miles, 5.0);
        assert_eq!(fare.extra_cost, 10.0);
        assert_eq!(fare.total, 75.0);
        assert!(!fare.night_rate_applied);
        assert_eq!(fare.multiplier, 1.0);
    }

    #[test]
    fn test_night_fare_over_included_distance() {
        let config = PricingConfig::default();

        let fare = compute_fare(20.0, true, &config).unwrap();

        assert_eq!(fare.total, 93.75);
        assert!(fare.night_rate_applied);
        assert_eq!(fare.multiplier, 1.25);
    }

    #[test]
    fn test_multiplier_applies_before_minimum_fare_floor() {
        let config = PricingConfig::default();

        // 5 miles is under the included distance, so the subtotal sits
        // exactly at the 65 base. Night lifts it to 81.25 before the
        // floor comparison, not after.
        let day = compute_fare(5.0, false, &config).unwrap();
        assert_eq!(day.total, 65.0);

        let night = compute_fare(5.0, true, &config).unwrap();
        assert_eq!(night.total, 81.25);
    }

    #[test]
    fn test_total_never_drops_below_minimum_fare() {
        let config = PricingConfig {
            base_fare: 10.0,
            included_miles: 15.0,
            extra_per_mile: 2.0,
            night_multiplier: 1.25,
            minimum_fare: 40.0,
        };

        for distance in [0.0, 1.0, 5.0, 14.9, 15.0, 20.0, 60.0] {
            let fare = compute_fare(distance, false, &config).unwrap();
            assert!(fare.total >= config.minimum_fare, "total {} under floor", fare.total);
        }
    }

    #[test]
    fn test_total_increases_with_distance_past_included() {
        let config = PricingConfig::default();

        let mut previous = compute_fare(15.0, false, &config).unwrap().total;
        for distance in [16.0, 18.5, 25.0, 40.0, 100.0] {
            let total = compute_fare(distance, false, &config).unwrap().total;
            assert!(total > previous, "total {} not above {}", total, previous);
            previous = total;
        }
    }

    #[test]
    fn test_night_rate_raises_total_above_day_rate() {
        let config = PricingConfig::default();

        let day = compute_fare(30.0, false, &config).unwrap();
        let night = compute_fare(30.0, true, &config).unwrap();

        assert!(night.total > day.total);
    }

    #[test]
    fn test_negative_distance_rejected() {
        let config = PricingConfig::default();

        let result = compute_fare(-1.0, false, &config);

        assert!(matches!(result, Err(FareError::NegativeDistance(_))));
    }

    #[test]
    fn test_distance_and_total_round_to_cents() {
        let config = PricingConfig::default();

        let fare = compute_fare(17.333, false, &config).unwrap();

        assert_eq!(fare.distance_miles, 17.33);
        assert_eq!(fare.extra_miles, 2.33);
        // 2.333 * 2 = 4.666 -> 4.67
        assert_eq!(fare.extra_cost, 4.67);
        assert_eq!(fare.total, 69.67);
    }

    #[test]
    fn test_update_validation_rejects_non_positive_fields() {
        let update = PricingUpdate {
            extra_per_mile: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(update.validate(), Err(FareError::InvalidConfig("extra_per_mile"))));

        let update = PricingUpdate {
            night_multiplier: Some(0.9),
            ..Default::default()
        };
        assert!(matches!(update.validate(), Err(FareError::InvalidConfig("night_multiplier"))));

        let update = PricingUpdate {
            base_fare: Some(70.0),
            minimum_fare: Some(70.0),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_breakdown_wire_shape() {
        let config = PricingConfig::default();
        let fare = compute_fare(20.0, true, &config).unwrap();

        let json = serde_json::to_value(&fare).unwrap();

        assert_eq!(json["distance_miles"], 20.0);
        assert_eq!(json["night_rate_applied"], true);
        assert_eq!(json["total"], 93.75);
    }
}
