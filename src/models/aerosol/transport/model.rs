//! [`twine_core::Model`] adapter for a complete sampling line.

use tracing::{info, instrument};
use twine_core::Model;
use uom::si::ratio::ratio;

use super::core::{
    BendMethod, DistributionConfig, Element, ElementRow, FlowConditions, ParticleClass,
    ParticleTable, SystemParameters, TransportError, build_distribution, total_efficiency,
};

/// A particle distribution and the ordered elements it passes through.
///
/// Calling the model with [`FlowConditions`] builds the distribution, derives
/// flow and particle parameters, and applies every element in order. The
/// output table carries per-element and cumulative efficiencies for every
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingLine {
    pub distribution: DistributionConfig,
    pub elements: Vec<Element>,
}

impl SamplingLine {
    #[must_use]
    pub fn new(distribution: DistributionConfig, elements: Vec<Element>) -> Self {
        Self {
            distribution,
            elements,
        }
    }

    /// Builds a line from element table rows, using `method` for every bend.
    ///
    /// Rows may appear in any order but must carry the indices `1..=n`
    /// exactly once each.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::OrderingPrecondition`] if the indices have
    /// gaps or duplicates, or [`TransportError::InvalidParameter`] if a row
    /// cannot be converted.
    pub fn from_rows(
        distribution: DistributionConfig,
        rows: &[ElementRow],
        method: BendMethod,
    ) -> Result<Self, TransportError> {
        let mut sorted: Vec<&ElementRow> = rows.iter().collect();
        sorted.sort_by_key(|row| row.index);

        let elements = sorted
            .iter()
            .enumerate()
            .map(|(position, row)| {
                let expected = position + 1;
                if row.index != expected {
                    return Err(TransportError::ordering(format!(
                        "element rows must be numbered 1..={}, found {} where {expected} was expected",
                        rows.len(),
                        row.index
                    )));
                }
                row.to_element(method)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(distribution, elements))
    }
}

impl Model for SamplingLine {
    type Input = FlowConditions;
    type Output = ParticleTable;
    type Error = TransportError;

    #[instrument(level = "info", skip_all, fields(elements = self.elements.len()))]
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let system = SystemParameters::compute(*input)?;
        let mut table = build_distribution(&self.distribution)?.with_particle_parameters(&system)?;

        for (i, element) in self.elements.iter().enumerate() {
            table.apply(&system, i + 1, element)?;
        }

        if table.continuous().next().is_some() {
            let summary = total_efficiency(&table, &system, ParticleClass::Continuous)?;
            info!(
                mass_efficiency = summary.efficiency.get::<ratio>(),
                reynolds = system.reynolds().get::<ratio>(),
                "sampling line evaluated"
            );
        }

        Ok(table)
    }
}
