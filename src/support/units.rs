//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical units (length, flow rate, pressure,
//! viscosity, diffusivity, ...). This module adds the quantities and constants
//! that aerosol mechanics needs but [`uom`] doesn't name directly.

mod quantities;

pub use quantities::SpecificGasConstant;

use uom::si::{acceleration::meter_per_second_squared, f64::Acceleration};

/// Standard acceleration of gravity, 9.80665 m/s².
#[must_use]
pub fn standard_gravity() -> Acceleration {
    Acceleration::new::<meter_per_second_squared>(9.806_65)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        acceleration::foot_per_second_squared,
        diffusion_coefficient::{square_meter_per_second, stokes},
        f64::DiffusionCoefficient,
    };

    #[test]
    fn gravity_in_imperial_units() {
        assert_relative_eq!(
            standard_gravity().get::<foot_per_second_squared>(),
            32.174,
            epsilon = 1e-3
        );
    }

    #[test]
    fn diffusion_coefficient_in_stokes() {
        let d = DiffusionCoefficient::new::<square_meter_per_second>(2.7e-11);
        assert_relative_eq!(d.get::<stokes>(), 2.7e-7, max_relative = 1e-12);
    }
}
