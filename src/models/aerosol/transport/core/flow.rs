//! Particle-independent flow quantities for a sampling run.

use std::f64::consts::PI;

use tracing::debug;
use uom::si::{
    f64::{
        Area, DynamicViscosity, Length, MassDensity, Pressure, Ratio, ThermodynamicTemperature,
        Velocity, VolumeRate,
    },
    length::centimeter,
    pressure::kilopascal,
    ratio::ratio,
    thermodynamic_temperature::{degree_celsius, kelvin},
    volume_rate::liter_per_minute,
};

use crate::support::{air::Air, constraint::StrictlyPositive};

use super::TransportError;

/// Tube Reynolds number below which flow is treated as laminar.
const LAMINAR_LIMIT: f64 = 2000.0;

/// Flow regime in the sampling tube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Turbulent,
}

impl FlowRegime {
    /// Classifies a tube Reynolds number.
    #[must_use]
    pub fn from_reynolds(reynolds: f64) -> Self {
        if reynolds < LAMINAR_LIMIT {
            Self::Laminar
        } else {
            Self::Turbulent
        }
    }
}

/// Environment and flow configuration of a sampling line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowConditions {
    /// Inner diameter of the sampling tube.
    pub tube_diameter: Length,

    /// Volumetric sampling flow rate.
    pub flow_rate: VolumeRate,

    /// Temperature of the sampled air.
    pub temperature: ThermodynamicTemperature,

    /// Absolute pressure of the sampled air.
    pub pressure: Pressure,
}

impl FlowConditions {
    /// Creates flow conditions from the units used in element tables:
    /// centimeters, liters per minute, degrees Celsius, and kilopascals.
    #[must_use]
    pub fn from_table_units(
        tube_diameter_cm: f64,
        flow_lpm: f64,
        temperature_c: f64,
        pressure_kpa: f64,
    ) -> Self {
        Self {
            tube_diameter: Length::new::<centimeter>(tube_diameter_cm),
            flow_rate: VolumeRate::new::<liter_per_minute>(flow_lpm),
            temperature: ThermodynamicTemperature::new::<degree_celsius>(temperature_c),
            pressure: Pressure::new::<kilopascal>(pressure_kpa),
        }
    }
}

impl Default for FlowConditions {
    /// A 2.21 cm tube sampling 56.6 L/min at 25 °C and one standard atmosphere.
    fn default() -> Self {
        Self::from_table_units(2.21, 56.6, 25.0, 101.325)
    }
}

/// Derived air and flow properties shared by every model in a run.
///
/// Construct with [`SystemParameters::compute`]; the value is immutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemParameters {
    conditions: FlowConditions,
    viscosity: DynamicViscosity,
    air_density: MassDensity,
    mean_free_path: Length,
    velocity: Velocity,
    reynolds: Ratio,
}

impl SystemParameters {
    /// Derives air viscosity, density, mean free path, mean tube velocity,
    /// and tube Reynolds number.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidParameter`] if the tube diameter,
    /// flow rate, pressure, or absolute temperature is not strictly positive.
    pub fn compute(conditions: FlowConditions) -> Result<Self, TransportError> {
        let diameter = StrictlyPositive::new(conditions.tube_diameter)
            .map_err(TransportError::constraint("tube_diameter"))?
            .into_inner();
        let flow_rate = StrictlyPositive::new(conditions.flow_rate)
            .map_err(TransportError::constraint("flow_rate"))?
            .into_inner();
        let pressure = StrictlyPositive::new(conditions.pressure)
            .map_err(TransportError::constraint("pressure"))?
            .into_inner();
        StrictlyPositive::new(conditions.temperature.get::<kelvin>())
            .map_err(TransportError::constraint("temperature"))?;

        let viscosity = Air::dynamic_viscosity(conditions.temperature);
        let air_density = Air::density(conditions.temperature, pressure);
        let mean_free_path = Air::mean_free_path(conditions.temperature, pressure);

        let area: Area = diameter * diameter * (PI / 4.0);
        let velocity: Velocity = flow_rate / area;
        let reynolds: Ratio = air_density * velocity * diameter / viscosity;

        debug!(
            reynolds = reynolds.get::<ratio>(),
            regime = ?FlowRegime::from_reynolds(reynolds.get::<ratio>()),
            "derived sampling flow parameters"
        );

        Ok(Self {
            conditions,
            viscosity,
            air_density,
            mean_free_path,
            velocity,
            reynolds,
        })
    }

    /// The conditions these parameters were derived from.
    #[must_use]
    pub fn conditions(&self) -> &FlowConditions {
        &self.conditions
    }

    #[must_use]
    pub fn tube_diameter(&self) -> Length {
        self.conditions.tube_diameter
    }

    #[must_use]
    pub fn flow_rate(&self) -> VolumeRate {
        self.conditions.flow_rate
    }

    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.conditions.temperature
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        self.conditions.pressure
    }

    /// Dynamic viscosity of the carrier air.
    #[must_use]
    pub fn viscosity(&self) -> DynamicViscosity {
        self.viscosity
    }

    /// Density of the carrier air.
    #[must_use]
    pub fn air_density(&self) -> MassDensity {
        self.air_density
    }

    /// Mean free path of air molecules.
    #[must_use]
    pub fn mean_free_path(&self) -> Length {
        self.mean_free_path
    }

    /// Mean flow velocity in the tube.
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Tube Reynolds number.
    #[must_use]
    pub fn reynolds(&self) -> Ratio {
        self.reynolds
    }

    /// Flow regime implied by the tube Reynolds number.
    #[must_use]
    pub fn regime(&self) -> FlowRegime {
        FlowRegime::from_reynolds(self.reynolds.get::<ratio>())
    }
}
