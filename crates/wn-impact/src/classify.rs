//! Service-tier classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ImpactError, ImpactResult};

/// Post-intervention service quality of a node, ordered by severity
/// (`Dead` is worst). `Unknown` sorts after the numeric tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceTier {
    Dead,
    VeryLow,
    Low,
    Ok,
    /// No pressure available for the node (absent from a run, or NaN).
    Unknown,
}

impl ServiceTier {
    /// Every tier, severity order. Matches the legend layout.
    pub const ALL: [ServiceTier; 5] = [
        ServiceTier::Dead,
        ServiceTier::VeryLow,
        ServiceTier::Low,
        ServiceTier::Ok,
        ServiceTier::Unknown,
    ];

    /// Canonical label used in tables, the CSV status column and on the
    /// wire.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceTier::Dead => "DEAD",
            ServiceTier::VeryLow => "VERY_LOW",
            ServiceTier::Low => "LOW",
            ServiceTier::Ok => "OK",
            ServiceTier::Unknown => "UNKNOWN",
        }
    }

    /// Fixed legend color for categorical map layers.
    pub fn legend_color(self) -> &'static str {
        match self {
            ServiceTier::Dead => "red",
            ServiceTier::VeryLow => "orange",
            ServiceTier::Low => "yellow",
            ServiceTier::Ok => "green",
            ServiceTier::Unknown => "gray",
        }
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification thresholds in bar, supplied per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum pressure considered full service.
    pub ok_min_bar: f64,
    /// Upper bound of the very-low band.
    pub very_low_max_bar: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ok_min_bar: 3.0,
            very_low_max_bar: 1.0,
        }
    }
}

impl Thresholds {
    /// Reject configurations that would make the tier ladder degenerate.
    pub fn validate(&self) -> ImpactResult<()> {
        if !self.ok_min_bar.is_finite() || !self.very_low_max_bar.is_finite() {
            return Err(ImpactError::InvalidThresholds {
                what: "thresholds must be finite".to_string(),
            });
        }
        if self.very_low_max_bar > self.ok_min_bar {
            return Err(ImpactError::InvalidThresholds {
                what: format!(
                    "very_low_max_bar ({}) exceeds ok_min_bar ({})",
                    self.very_low_max_bar, self.ok_min_bar
                ),
            });
        }
        Ok(())
    }
}

/// Ordered decision ladder, first match wins. Missing values and NaN are
/// reported as [`ServiceTier::Unknown`] rather than being defaulted to a
/// number.
pub fn classify(pressure_bar: Option<f64>, thresholds: &Thresholds) -> ServiceTier {
    let p = match pressure_bar {
        Some(p) if !p.is_nan() => p,
        _ => return ServiceTier::Unknown,
    };
    if p <= 0.0 {
        ServiceTier::Dead
    } else if p < thresholds.very_low_max_bar {
        ServiceTier::VeryLow
    } else if p < thresholds.ok_min_bar {
        ServiceTier::Low
    } else {
        ServiceTier::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn ladder_cases() {
        assert_eq!(classify(None, &t()), ServiceTier::Unknown);
        assert_eq!(classify(Some(f64::NAN), &t()), ServiceTier::Unknown);
        assert_eq!(classify(Some(-0.5), &t()), ServiceTier::Dead);
        assert_eq!(classify(Some(0.0), &t()), ServiceTier::Dead);
        assert_eq!(classify(Some(0.49), &t()), ServiceTier::VeryLow);
        assert_eq!(classify(Some(2.94), &t()), ServiceTier::Low);
        assert_eq!(classify(Some(4.41), &t()), ServiceTier::Ok);
    }

    #[test]
    fn boundaries_belong_to_the_less_severe_tier() {
        // Strict `<` comparisons: the boundary value sits above the band.
        assert_eq!(classify(Some(1.0), &t()), ServiceTier::Low);
        assert_eq!(classify(Some(3.0), &t()), ServiceTier::Ok);
    }

    #[test]
    fn severity_order() {
        assert!(ServiceTier::Dead < ServiceTier::VeryLow);
        assert!(ServiceTier::VeryLow < ServiceTier::Low);
        assert!(ServiceTier::Low < ServiceTier::Ok);
    }

    #[test]
    fn out_of_order_thresholds_are_rejected() {
        let bad = Thresholds {
            ok_min_bar: 1.0,
            very_low_max_bar: 3.0,
        };
        assert!(bad.validate().is_err());
        assert!(t().validate().is_ok());
        // A single cut point is degenerate but legal.
        let flat = Thresholds {
            ok_min_bar: 2.0,
            very_low_max_bar: 2.0,
        };
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn non_finite_thresholds_are_rejected() {
        let bad = Thresholds {
            ok_min_bar: f64::NAN,
            very_low_max_bar: 1.0,
        };
        assert!(bad.validate().is_err());
    }

    proptest! {
        #[test]
        fn every_pressure_lands_in_exactly_one_tier(p in -100.0f64..100.0) {
            let tier = classify(Some(p), &t());
            let expected = if p <= 0.0 {
                ServiceTier::Dead
            } else if p < 1.0 {
                ServiceTier::VeryLow
            } else if p < 3.0 {
                ServiceTier::Low
            } else {
                ServiceTier::Ok
            };
            prop_assert_eq!(tier, expected);
        }

        #[test]
        fn classification_is_monotonic(a in -100.0f64..100.0, b in -100.0f64..100.0) {
            prop_assume!(a <= b);
            // Higher pressure never yields a more severe tier.
            prop_assert!(classify(Some(a), &t()) <= classify(Some(b), &t()));
        }
    }
}
