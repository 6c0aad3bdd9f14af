//! Particle transport through a sampling line.
//!
//! A run proceeds strictly forward:
//!
//! 1. [`build_distribution`] creates the particle table.
//! 2. [`SystemParameters::compute`] derives the particle-independent flow.
//! 3. [`ParticleTable::with_particle_parameters`] adds per-size parameters.
//! 4. One `apply_*` call per element, in transport order.
//! 5. [`total_efficiency`] and [`mass_loss_breakdown`] summarize the result.

mod distribution;
mod efficiency;
mod element;
mod error;
mod flow;
mod particle;
mod report;
mod table;

#[cfg(test)]
mod test_support;

pub use distribution::{DistributionConfig, LogNormal, build_distribution};
pub use efficiency::{
    BendConditions, BendMethod, BendRelation, Efficiency, McFarland, Pui, TubeMechanisms, Zhang,
    bend_efficiency, probe_efficiency, tube_efficiency, tube_mechanisms,
};
pub use element::{BendGeometry, Element, ElementKind, ElementRow, Orientation, TubeGeometry};
pub use error::TransportError;
pub use flow::{FlowConditions, FlowRegime, SystemParameters};
pub use particle::{ParticleProperties, compute_particle_parameters};
pub use report::{
    CutDiameterConfig, CutDiameterError, CutPoint, EfficiencySummary, MassLossBin,
    MassLossBreakdown, ParticleClass, ReportContext, cut_diameter, discrete_summaries,
    mass_loss_breakdown, total_efficiency,
};
pub use table::{DistributionKind, ParticleRecord, ParticleTable};
