//! Properties of dry air as a carrier gas.
//!
//! Density follows the ideal gas equation of state `p = ρ·R·T`.
//! Viscosity follows Sutherland's law, and the molecular mean free path is
//! scaled from its value at 20 °C and one standard atmosphere.

use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{DynamicViscosity, Length, MassDensity, Pressure, ThermodynamicTemperature},
    length::micrometer,
    pressure::kilopascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::SpecificGasConstant;

/// Sutherland reference viscosity at [`SUTHERLAND_T_REF`], Pa·s.
const SUTHERLAND_MU_REF: f64 = 1.716e-5;

/// Sutherland reference temperature, K.
const SUTHERLAND_T_REF: f64 = 273.15;

/// Sutherland constant for air, K.
const SUTHERLAND_S: f64 = 110.4;

/// Mean free path at 20 °C and 101.325 kPa, µm.
const MEAN_FREE_PATH_REF: f64 = 0.0664;
const MEAN_FREE_PATH_T_REF: f64 = 293.15;
const MEAN_FREE_PATH_P_REF: f64 = 101.325;

/// Canonical identifier for dry air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Air;

impl Air {
    /// Specific gas constant of dry air.
    #[must_use]
    pub fn gas_constant() -> SpecificGasConstant {
        SpecificGasConstant::new::<joule_per_kilogram_kelvin>(287.053)
    }

    /// Density from the ideal gas equation of state.
    #[must_use]
    pub fn density(temperature: ThermodynamicTemperature, pressure: Pressure) -> MassDensity {
        pressure / (Self::gas_constant() * temperature)
    }

    /// Dynamic viscosity from Sutherland's law.
    #[must_use]
    pub fn dynamic_viscosity(temperature: ThermodynamicTemperature) -> DynamicViscosity {
        let t = temperature.get::<kelvin>();
        let mu = SUTHERLAND_MU_REF
            * (t / SUTHERLAND_T_REF).powf(1.5)
            * (SUTHERLAND_T_REF + SUTHERLAND_S)
            / (t + SUTHERLAND_S);
        DynamicViscosity::new::<pascal_second>(mu)
    }

    /// Mean free path of air molecules.
    #[must_use]
    pub fn mean_free_path(temperature: ThermodynamicTemperature, pressure: Pressure) -> Length {
        let t = temperature.get::<kelvin>();
        let p = pressure.get::<kilopascal>();
        let lambda = MEAN_FREE_PATH_REF
            * (MEAN_FREE_PATH_P_REF / p)
            * (t / MEAN_FREE_PATH_T_REF)
            * (1.0 + SUTHERLAND_S / MEAN_FREE_PATH_T_REF)
            / (1.0 + SUTHERLAND_S / t);
        Length::new::<micrometer>(lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{mass_density::kilogram_per_cubic_meter, thermodynamic_temperature::degree_celsius};

    fn atmosphere() -> Pressure {
        Pressure::new::<kilopascal>(101.325)
    }

    #[test]
    fn density_at_room_conditions() {
        let t = ThermodynamicTemperature::new::<degree_celsius>(25.0);
        let rho = Air::density(t, atmosphere());
        assert_relative_eq!(
            rho.get::<kilogram_per_cubic_meter>(),
            1.1839,
            max_relative = 1e-3
        );
    }

    #[test]
    fn viscosity_matches_sutherland_reference() {
        let t = ThermodynamicTemperature::new::<kelvin>(SUTHERLAND_T_REF);
        assert_relative_eq!(
            Air::dynamic_viscosity(t).get::<pascal_second>(),
            SUTHERLAND_MU_REF,
            max_relative = 1e-12
        );

        let warm = ThermodynamicTemperature::new::<degree_celsius>(25.0);
        assert_relative_eq!(
            Air::dynamic_viscosity(warm).get::<pascal_second>(),
            1.837e-5,
            max_relative = 2e-3
        );
    }

    #[test]
    fn mean_free_path_scales_inversely_with_pressure() {
        let t = ThermodynamicTemperature::new::<kelvin>(MEAN_FREE_PATH_T_REF);
        let reference = Air::mean_free_path(t, atmosphere());
        assert_relative_eq!(
            reference.get::<micrometer>(),
            MEAN_FREE_PATH_REF,
            max_relative = 1e-12
        );

        let thin = Air::mean_free_path(t, Pressure::new::<kilopascal>(50.6625));
        assert_relative_eq!(
            thin.get::<micrometer>(),
            2.0 * MEAN_FREE_PATH_REF,
            max_relative = 1e-12
        );
    }
}
