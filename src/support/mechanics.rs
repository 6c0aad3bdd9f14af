//! Single-particle mechanics in a gas.
//!
//! Closed-form relations for a spherical particle moving through air:
//! slip correction, terminal settling velocity, relaxation time and
//! Brownian diffusivity.

use std::f64::consts::PI;

use uom::si::{
    dynamic_viscosity::pascal_second,
    diffusion_coefficient::square_meter_per_second,
    f64::{
        DiffusionCoefficient, DynamicViscosity, Length, MassDensity, Ratio,
        ThermodynamicTemperature, Time, Velocity,
    },
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::standard_gravity;

/// Boltzmann constant, J/K.
const BOLTZMANN: f64 = 1.380_649e-23;

/// Density of a unit-density (water-equivalent) sphere.
///
/// Aerodynamic diameters are defined against this density.
#[must_use]
pub fn unit_density() -> MassDensity {
    MassDensity::new::<kilogram_per_cubic_meter>(1000.0)
}

/// Cunningham slip correction factor.
///
/// `Cc = 1 + (λ/d)·(2.34 + 1.05·exp(−0.39·d/λ))`
#[must_use]
pub fn slip_correction(diameter: Length, mean_free_path: Length) -> Ratio {
    let knudsen = (mean_free_path / diameter).get::<ratio>();
    let cc = 1.0 + knudsen * (2.34 + 1.05 * (-0.39 / knudsen).exp());
    Ratio::new::<ratio>(cc)
}

/// Terminal settling velocity in the Stokes regime, slip corrected.
///
/// `Vts = ρp·d²·g·Cc / (18·μ)`
#[must_use]
pub fn settling_velocity(
    diameter: Length,
    slip_correction: Ratio,
    particle_density: MassDensity,
    viscosity: DynamicViscosity,
) -> Velocity {
    particle_density * diameter * diameter * standard_gravity() * slip_correction
        / (viscosity * 18.0)
}

/// Particle relaxation time, `τ = Vts / g`.
#[must_use]
pub fn relaxation_time(settling_velocity: Velocity) -> Time {
    settling_velocity / standard_gravity()
}

/// Brownian diffusion coefficient (Stokes–Einstein with slip).
///
/// `D = k·T·Cc / (3·π·μ·d)`
#[must_use]
pub fn diffusion_coefficient(
    diameter: Length,
    slip_correction: Ratio,
    temperature: ThermodynamicTemperature,
    viscosity: DynamicViscosity,
) -> DiffusionCoefficient {
    let d = BOLTZMANN * temperature.get::<kelvin>() * slip_correction.get::<ratio>()
        / (3.0 * PI * viscosity.get::<pascal_second>() * diameter.get::<meter>());
    DiffusionCoefficient::new::<square_meter_per_second>(d)
}
