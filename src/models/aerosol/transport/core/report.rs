//! Aggregate results of a transported particle table.

mod cut_diameter;

pub use cut_diameter::{CutDiameterConfig, CutDiameterError, CutPoint, cut_diameter};

use uom::si::{
    f64::{Length, Pressure, Ratio, ThermodynamicTemperature, VolumeRate},
    length::micrometer,
    ratio::ratio,
};

use crate::support::constraint::StrictlyPositive;

use super::{Efficiency, FlowRegime, ParticleTable, SystemParameters, TransportError};

/// Relative tolerance used to match a requested discrete diameter.
const DIAMETER_MATCH_TOL: f64 = 1e-9;

/// Which particles a summary describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleClass {
    /// One discrete representative size.
    Discrete(Length),

    /// The whole continuous distribution, mass weighted.
    Continuous,
}

/// Run context attached to every summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportContext {
    pub tube_diameter: Length,
    pub flow_rate: VolumeRate,
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub reynolds: Ratio,
    pub regime: FlowRegime,

    /// Number of elements applied to the table.
    pub elements: usize,
}

impl ReportContext {
    fn new(table: &ParticleTable, system: &SystemParameters) -> Self {
        Self {
            tube_diameter: system.tube_diameter(),
            flow_rate: system.flow_rate(),
            temperature: system.temperature(),
            pressure: system.pressure(),
            reynolds: system.reynolds(),
            regime: system.regime(),
            elements: table.elements().len(),
        }
    }
}

/// Total sampling-line efficiency for one particle class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencySummary {
    pub class: ParticleClass,
    pub efficiency: Efficiency,
    pub context: ReportContext,
}

/// Total efficiency of the line for a particle class.
///
/// For a discrete size this is the record's final cumulative efficiency. For
/// the continuous distribution it is the mass-weighted efficiency,
/// `1 − total_frac_lost`.
///
/// # Errors
///
/// Returns [`TransportError::InvalidParameter`] if the discrete size is not in
/// the table, or [`TransportError::UnsupportedOperation`] if the continuous
/// class is requested from a table without continuous records.
pub fn total_efficiency(
    table: &ParticleTable,
    system: &SystemParameters,
    class: ParticleClass,
) -> Result<EfficiencySummary, TransportError> {
    let efficiency = match class {
        ParticleClass::Discrete(diameter) => table
            .discrete_records()
            .find(|r| same_diameter(r.diameter(), diameter))
            .map(|record| record.final_efficiency())
            .ok_or_else(|| {
                TransportError::invalid(
                    "particle_class",
                    format!(
                        "no discrete record at {} µm",
                        diameter.get::<micrometer>()
                    ),
                )
            })?,
        ParticleClass::Continuous => {
            let breakdown = mass_loss_breakdown(table)?;
            Efficiency::saturating(1.0 - breakdown.total_frac_lost).map_err(|err| {
                TransportError::domain("mass-weighted efficiency", err.to_string())
            })?
        }
    };

    Ok(EfficiencySummary {
        class,
        efficiency,
        context: ReportContext::new(table, system),
    })
}

/// One summary per discrete record, in table order.
#[must_use]
pub fn discrete_summaries(
    table: &ParticleTable,
    system: &SystemParameters,
) -> Vec<EfficiencySummary> {
    let context = ReportContext::new(table, system);
    table
        .discrete_records()
        .map(|record| EfficiencySummary {
            class: ParticleClass::Discrete(record.diameter()),
            efficiency: record.final_efficiency(),
            context,
        })
        .collect()
}

fn same_diameter(a: Length, b: Length) -> bool {
    let (a, b) = (a.get::<micrometer>(), b.get::<micrometer>());
    (a - b).abs() <= DIAMETER_MATCH_TOL * a.abs().max(b.abs())
}

/// Mass bookkeeping for one continuous bin.
///
/// Mass weights are `p·d³` with `d` in micrometers; only their ratios are
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassLossBin {
    pub diameter: Length,

    /// Ambient mass weight, `p·d³`.
    pub ambient: f64,

    /// Mass weight reaching the end of the line.
    pub sampled: f64,

    /// Fraction of this bin's mass lost in the line.
    pub fraction_lost: f64,

    /// Mass lost from this bin as a fraction of the total ambient mass.
    pub loss_of_total: f64,
}

/// Mass-weighted loss statistics of the continuous distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct MassLossBreakdown {
    pub bins: Vec<MassLossBin>,
    pub total_ambient: f64,
    pub total_sampled: f64,

    /// Fraction of ambient mass lost in the line.
    pub total_frac_lost: f64,
}

/// Computes per-bin and total mass losses of the continuous distribution.
///
/// # Errors
///
/// Returns [`TransportError::UnsupportedOperation`] if the table has no
/// continuous records.
pub fn mass_loss_breakdown(table: &ParticleTable) -> Result<MassLossBreakdown, TransportError> {
    let weighted: Vec<(Length, f64, Efficiency)> = table
        .continuous()
        .filter_map(|record| {
            let probability = record.kind().probability()?;
            let d = record.diameter().get::<micrometer>();
            Some((record.diameter(), probability * d.powi(3), record.final_efficiency()))
        })
        .collect();

    if weighted.is_empty() {
        return Err(TransportError::UnsupportedOperation(
            "mass loss breakdown needs continuous distribution records".to_owned(),
        ));
    }

    let total_ambient: f64 = weighted.iter().map(|(_, ambient, _)| ambient).sum();
    let total_ambient = StrictlyPositive::new(total_ambient)
        .map_err(|err| {
            TransportError::UnsupportedOperation(format!(
                "continuous distribution carries no mass: {err}"
            ))
        })?
        .into_inner();

    let bins: Vec<MassLossBin> = weighted
        .into_iter()
        .map(|(diameter, ambient, efficiency)| {
            let fraction_lost = efficiency.loss();
            MassLossBin {
                diameter,
                ambient,
                sampled: ambient * efficiency.get::<ratio>(),
                fraction_lost,
                loss_of_total: ambient * fraction_lost / total_ambient,
            }
        })
        .collect();

    let total_sampled: f64 = bins.iter().map(|b| b.sampled).sum();
    let total_frac_lost: f64 = bins.iter().map(|b| b.loss_of_total).sum();

    Ok(MassLossBreakdown {
        bins,
        total_ambient,
        total_sampled,
        total_frac_lost,
    })
}
