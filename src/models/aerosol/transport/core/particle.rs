//! Per-size particle parameters.

use tracing::instrument;
use uom::si::f64::{DiffusionCoefficient, Length, Ratio, Time, Velocity};

use crate::support::mechanics::{
    diffusion_coefficient, relaxation_time, settling_velocity, slip_correction, unit_density,
};

use super::{ParticleTable, SystemParameters, TransportError};

/// Physical parameters of one unit-density particle size in a given flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleProperties {
    slip_correction: Ratio,
    settling_velocity: Velocity,
    reynolds: Ratio,
    relaxation_time: Time,
    stokes: Ratio,
    diffusion_coefficient: DiffusionCoefficient,
}

impl ParticleProperties {
    /// Computes the parameters of a particle with the given aerodynamic
    /// diameter.
    ///
    /// The diameter must be strictly positive; table constructors guarantee
    /// this for every record.
    #[must_use]
    pub fn compute(diameter: Length, system: &SystemParameters) -> Self {
        let slip = slip_correction(diameter, system.mean_free_path());
        let vts = settling_velocity(diameter, slip, unit_density(), system.viscosity());
        let tau = relaxation_time(vts);

        Self {
            slip_correction: slip,
            settling_velocity: vts,
            reynolds: system.air_density() * vts * diameter / system.viscosity(),
            relaxation_time: tau,
            stokes: tau * system.velocity() / system.tube_diameter(),
            diffusion_coefficient: diffusion_coefficient(
                diameter,
                slip,
                system.temperature(),
                system.viscosity(),
            ),
        }
    }

    /// Cunningham slip correction factor.
    #[must_use]
    pub fn slip_correction(&self) -> Ratio {
        self.slip_correction
    }

    /// Terminal settling velocity.
    #[must_use]
    pub fn settling_velocity(&self) -> Velocity {
        self.settling_velocity
    }

    /// Particle Reynolds number at the settling velocity.
    #[must_use]
    pub fn reynolds(&self) -> Ratio {
        self.reynolds
    }

    #[must_use]
    pub fn relaxation_time(&self) -> Time {
        self.relaxation_time
    }

    /// Stokes number based on the tube diameter and mean velocity.
    #[must_use]
    pub fn stokes(&self) -> Ratio {
        self.stokes
    }

    /// Brownian diffusion coefficient.
    #[must_use]
    pub fn diffusion_coefficient(&self) -> DiffusionCoefficient {
        self.diffusion_coefficient
    }
}

/// Returns a copy of `table` with particle parameters on every record.
///
/// # Errors
///
/// Returns [`TransportError::OrderingPrecondition`] if any element has already
/// been applied to the table.
pub fn compute_particle_parameters(
    table: &ParticleTable,
    system: &SystemParameters,
) -> Result<ParticleTable, TransportError> {
    table.clone().with_particle_parameters(system)
}

impl ParticleTable {
    /// Computes particle parameters for every record.
    ///
    /// Recomputing with the same system parameters yields identical values.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::OrderingPrecondition`] if any element has
    /// already been applied.
    #[instrument(level = "debug", skip_all, fields(records = self.len()))]
    pub fn with_particle_parameters(
        mut self,
        system: &SystemParameters,
    ) -> Result<Self, TransportError> {
        if !self.elements().is_empty() {
            return Err(TransportError::ordering(format!(
                "particle parameters must precede every element, but {} already applied",
                self.elements().len()
            )));
        }

        let properties = self
            .records()
            .iter()
            .map(|record| ParticleProperties::compute(record.diameter(), system))
            .collect();
        self.set_properties(properties);
        Ok(self)
    }
}
