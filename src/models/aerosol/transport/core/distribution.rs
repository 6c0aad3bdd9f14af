//! Initial particle size distribution.
//!
//! The ambient aerosol is log-normal in aerodynamic diameter. It is sampled
//! on a log-spaced grid spanning four geometric standard deviations on each
//! side of the median, and a few discrete representative sizes are appended.

use std::f64::consts::PI;

use tracing::{debug, instrument};
use uom::si::{
    f64::{Length, Ratio},
    length::micrometer,
    ratio::ratio,
};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::{
    ParticleTable, TransportError,
    table::{DistributionKind, ParticleRecord},
};

/// Number of geometric standard deviations covered on each side of the AMAD.
const SPAN_GSDS: i32 = 4;

/// Configuration of the particle table built by [`build_distribution`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionConfig {
    /// Activity median aerodynamic diameter.
    pub amad: Length,

    /// Geometric standard deviation; must exceed 1.
    pub gsd: Ratio,

    /// Number of continuous bins.
    pub bins: usize,

    /// Representative sizes appended as discrete records.
    pub discrete_sizes: Vec<Length>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            amad: Length::new::<micrometer>(5.0),
            gsd: Ratio::new::<ratio>(2.5),
            bins: 1000,
            discrete_sizes: [1.0, 5.0, 10.0]
                .into_iter()
                .map(Length::new::<micrometer>)
                .collect(),
        }
    }
}

/// A log-normal size distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    median: Constrained<Length, StrictlyPositive>,
    ln_gsd: f64,
}

impl LogNormal {
    /// Creates a log-normal distribution with the given median diameter and
    /// geometric standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidParameter`] if the median is not
    /// strictly positive or the GSD is not a finite value above 1.
    pub fn new(median: Length, gsd: Ratio) -> Result<Self, TransportError> {
        let median = StrictlyPositive::new(median).map_err(TransportError::constraint("amad"))?;
        let gsd = gsd.get::<ratio>();
        if !(gsd.is_finite() && gsd > 1.0) {
            return Err(TransportError::invalid(
                "gsd",
                format!("{gsd} must be finite and greater than 1"),
            ));
        }
        Ok(Self {
            median,
            ln_gsd: gsd.ln(),
        })
    }

    #[must_use]
    pub fn median(&self) -> Length {
        self.median.into_inner()
    }

    #[must_use]
    pub fn gsd(&self) -> f64 {
        self.ln_gsd.exp()
    }

    /// Probability density with respect to `ln(d)`.
    #[must_use]
    pub fn density_ln(&self, diameter: Length) -> f64 {
        let z = (diameter / self.median()).get::<ratio>().ln() / self.ln_gsd;
        (-0.5 * z * z).exp() / ((2.0 * PI).sqrt() * self.ln_gsd)
    }

    /// Probability density with respect to `d`, per micrometer.
    #[must_use]
    pub fn density(&self, diameter: Length) -> f64 {
        self.density_ln(diameter) / diameter.get::<micrometer>()
    }

    /// `bins` diameters evenly spaced in `ln(d)` across the configured span.
    fn grid(&self, bins: usize) -> Vec<Length> {
        let median = self.median();
        if bins == 1 {
            return vec![median];
        }
        let half_width = f64::from(SPAN_GSDS) * self.ln_gsd;
        #[allow(clippy::cast_precision_loss)]
        let step = 2.0 * half_width / (bins - 1) as f64;
        (0..bins)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let offset = -half_width + step * i as f64;
                median * offset.exp()
            })
            .collect()
    }
}

/// Builds the initial particle table.
///
/// Continuous records carry probabilities that sum to 1; discrete records
/// follow them.
///
/// # Errors
///
/// Returns [`TransportError::InvalidParameter`] if the AMAD is not strictly
/// positive, the GSD is not above 1, `bins` is zero, or a discrete size is not
/// strictly positive.
#[instrument(level = "debug", skip_all, fields(bins = config.bins))]
pub fn build_distribution(config: &DistributionConfig) -> Result<ParticleTable, TransportError> {
    let law = LogNormal::new(config.amad, config.gsd)?;
    if config.bins == 0 {
        return Err(TransportError::invalid("bins", "at least one bin is required"));
    }

    let diameters = law.grid(config.bins);
    let densities: Vec<f64> = diameters.iter().map(|&d| law.density_ln(d)).collect();
    let total: f64 = densities.iter().sum();

    let mut records: Vec<ParticleRecord> = diameters
        .into_iter()
        .zip(densities)
        .map(|(diameter, density)| {
            ParticleRecord::new(
                diameter,
                DistributionKind::Continuous {
                    probability: density / total,
                },
            )
        })
        .collect();

    let discrete = ParticleTable::discrete(&config.discrete_sizes)?;
    records.extend(discrete.records().iter().cloned());

    debug!(
        continuous = config.bins,
        discrete = config.discrete_sizes.len(),
        "built particle size distribution"
    );

    Ok(ParticleTable::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn um(value: f64) -> Length {
        Length::new::<micrometer>(value)
    }

    #[test]
    fn default_distribution() {
        let table = build_distribution(&DistributionConfig::default()).unwrap();

        assert_eq!(table.len(), 1003);
        assert_eq!(table.continuous().count(), 1000);
        assert_eq!(table.discrete_records().count(), 3);

        let total: f64 = table
            .continuous()
            .filter_map(|r| r.kind().probability())
            .sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);

        for (record, expected) in table.discrete_records().zip([1.0, 5.0, 10.0]) {
            assert_relative_eq!(record.diameter().get::<micrometer>(), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn grid_spans_four_gsds() {
        let table = build_distribution(&DistributionConfig::default()).unwrap();
        let diameters: Vec<f64> = table
            .continuous()
            .map(|r| r.diameter().get::<micrometer>())
            .collect();

        assert_relative_eq!(diameters[0], 5.0 / 2.5_f64.powi(4), max_relative = 1e-9);
        assert_relative_eq!(diameters[999], 5.0 * 2.5_f64.powi(4), max_relative = 1e-9);
        assert!(diameters.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn probability_peaks_at_the_median() {
        let config = DistributionConfig {
            bins: 101,
            ..DistributionConfig::default()
        };
        let table = build_distribution(&config).unwrap();
        let (peak, _) = table
            .continuous()
            .enumerate()
            .map(|(i, r)| (i, r.kind().probability().unwrap()))
            .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        assert_eq!(peak, 50);
        assert_relative_eq!(
            table.records()[50].diameter().get::<micrometer>(),
            5.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn single_bin_sits_at_the_median() {
        let config = DistributionConfig {
            bins: 1,
            discrete_sizes: vec![],
            ..DistributionConfig::default()
        };
        let table = build_distribution(&config).unwrap();
        let record = &table.records()[0];
        assert_relative_eq!(record.diameter().get::<micrometer>(), 5.0, max_relative = 1e-12);
        assert_eq!(record.kind().probability(), Some(1.0));
    }

    #[test]
    fn density_forms_agree() {
        let law = LogNormal::new(um(5.0), Ratio::new::<ratio>(2.5)).unwrap();
        assert_relative_eq!(law.gsd(), 2.5, max_relative = 1e-12);
        assert_relative_eq!(
            law.density(um(2.0)),
            law.density_ln(um(2.0)) / 2.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            law.density_ln(um(5.0)),
            1.0 / ((2.0 * PI).sqrt() * 2.5_f64.ln()),
            max_relative = 1e-12
        );
    }

    #[test]
    fn rejects_invalid_configuration() {
        let cases = [
            (
                DistributionConfig {
                    amad: um(0.0),
                    ..DistributionConfig::default()
                },
                "amad",
            ),
            (
                DistributionConfig {
                    gsd: Ratio::new::<ratio>(1.0),
                    ..DistributionConfig::default()
                },
                "gsd",
            ),
            (
                DistributionConfig {
                    bins: 0,
                    ..DistributionConfig::default()
                },
                "bins",
            ),
            (
                DistributionConfig {
                    discrete_sizes: vec![um(1.0), um(-2.0)],
                    ..DistributionConfig::default()
                },
                "discrete_sizes",
            ),
        ];

        for (config, expected) in cases {
            match build_distribution(&config) {
                Err(TransportError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }
}
