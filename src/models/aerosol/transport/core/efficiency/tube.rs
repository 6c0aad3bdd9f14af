//! Straight tube deposition.
//!
//! Three independent loss mechanisms are combined multiplicatively:
//! gravitational settling, diffusion to the wall, and turbulent inertial
//! deposition. The laminar or turbulent branch of each correlation follows
//! the tube Reynolds number.

use std::f64::consts::PI;

use uom::si::{
    angle::radian, diffusion_coefficient::square_meter_per_second,
    dynamic_viscosity::pascal_second, length::meter, mass_density::kilogram_per_cubic_meter,
    ratio::ratio, velocity::meter_per_second, volume_rate::cubic_meter_per_second,
};

use crate::models::aerosol::transport::core::{
    FlowRegime, ParticleProperties, SystemParameters, TransportError, TubeGeometry,
};

use super::{Efficiency, clamped};

/// Upper bound of the dimensionless deposition velocity (Liu–Agarwal).
const MAX_DEPOSITION_VELOCITY: f64 = 0.1;

/// Retained fractions for each tube loss mechanism.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeMechanisms {
    pub settling: Efficiency,
    pub diffusion: Efficiency,
    pub inertial: Efficiency,
}

impl TubeMechanisms {
    /// Combined tube efficiency.
    #[must_use]
    pub fn total(&self) -> Efficiency {
        self.settling.then(self.diffusion).then(self.inertial)
    }
}

/// Efficiency of a straight tube.
///
/// # Errors
///
/// Returns [`TransportError::ModelDomain`] if any mechanism evaluates to a
/// non-finite value.
pub fn tube_efficiency(
    props: &ParticleProperties,
    system: &SystemParameters,
    geometry: &TubeGeometry,
) -> Result<Efficiency, TransportError> {
    Ok(tube_mechanisms(props, system, geometry)?.total())
}

/// Retained fraction of each loss mechanism in a straight tube.
///
/// # Errors
///
/// Returns [`TransportError::ModelDomain`] if any mechanism evaluates to a
/// non-finite value.
pub fn tube_mechanisms(
    props: &ParticleProperties,
    system: &SystemParameters,
    geometry: &TubeGeometry,
) -> Result<TubeMechanisms, TransportError> {
    let tube = Tube::new(system, geometry);
    let regime = system.regime();

    Ok(TubeMechanisms {
        settling: clamped("tube settling", tube.settling(props, regime))?,
        diffusion: clamped("tube diffusion", tube.diffusion(props, system, regime))?,
        inertial: clamped("tube inertial", tube.inertial(props, regime))?,
    })
}

/// Tube geometry and flow in SI scalars.
struct Tube {
    length: f64,
    diameter: f64,
    velocity: f64,
    flow_rate: f64,
    reynolds: f64,
    cos_angle: f64,
}

impl Tube {
    fn new(system: &SystemParameters, geometry: &TubeGeometry) -> Self {
        Self {
            length: geometry.length().get::<meter>(),
            diameter: system.tube_diameter().get::<meter>(),
            velocity: system.velocity().get::<meter_per_second>(),
            flow_rate: system.flow_rate().get::<cubic_meter_per_second>(),
            reynolds: system.reynolds().get::<ratio>(),
            // Vertical tubes lose nothing to settling.
            cos_angle: geometry.angle_to_horizontal().get::<radian>().cos().max(0.0),
        }
    }

    /// Exponential penetration for a wall deposition velocity.
    fn penetration(&self, deposition_velocity: f64) -> f64 {
        (-4.0 * deposition_velocity * self.length / (self.diameter * self.velocity)).exp()
    }

    /// Gravitational settling: Heyder–Gebhart (laminar) or Schwendiman
    /// (turbulent).
    fn settling(&self, props: &ParticleProperties, regime: FlowRegime) -> f64 {
        let vts = props.settling_velocity().get::<meter_per_second>();
        match regime {
            FlowRegime::Laminar => {
                let kappa =
                    0.75 * (self.length / self.diameter) * (vts / self.velocity) * self.cos_angle;
                if kappa >= 1.0 {
                    return 0.0;
                }
                let k13 = kappa.cbrt();
                let root = (1.0 - k13 * k13).sqrt();
                1.0 - (2.0 / PI) * (2.0 * kappa * root - k13 * root + k13.asin())
            }
            FlowRegime::Turbulent => self.penetration(vts * self.cos_angle / PI),
        }
    }

    /// Diffusion: Gormley–Kennedy (laminar) or a Schmidt-number mass transfer
    /// correlation (turbulent).
    fn diffusion(
        &self,
        props: &ParticleProperties,
        system: &SystemParameters,
        regime: FlowRegime,
    ) -> f64 {
        let diffusivity = props
            .diffusion_coefficient()
            .get::<square_meter_per_second>();
        match regime {
            FlowRegime::Laminar => {
                let mu = diffusivity * self.length / self.flow_rate;
                if mu < 0.009 {
                    1.0 - 5.50 * mu.powf(2.0 / 3.0) + 3.77 * mu
                } else {
                    0.819 * (-11.5 * mu).exp() + 0.0975 * (-70.1 * mu).exp()
                }
            }
            FlowRegime::Turbulent => {
                let schmidt = system.viscosity().get::<pascal_second>()
                    / (system.air_density().get::<kilogram_per_cubic_meter>() * diffusivity);
                let v_diff =
                    0.04 * self.velocity / (self.reynolds.powf(0.25) * schmidt.powf(2.0 / 3.0));
                self.penetration(v_diff)
            }
        }
    }

    /// Turbulent inertial deposition after Liu and Agarwal.
    fn inertial(&self, props: &ParticleProperties, regime: FlowRegime) -> f64 {
        if regime == FlowRegime::Laminar {
            return 1.0;
        }
        let tau_plus = 0.0395 * props.stokes().get::<ratio>() * self.reynolds.powf(0.75);
        let v_plus = (6e-4 * tau_plus * tau_plus).min(MAX_DEPOSITION_VELOCITY);
        let v_t = v_plus * self.velocity / (5.03 * self.reynolds.powf(0.125));
        self.penetration(v_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Length, length::micrometer};

    use crate::models::aerosol::transport::core::{
        FlowConditions,
        test_support::{reference_system, reference_tube, tube_at, vertical_tube},
    };

    fn mechanisms(um: f64, system: &SystemParameters, tube: &TubeGeometry) -> TubeMechanisms {
        let props = ParticleProperties::compute(Length::new::<micrometer>(um), system);
        tube_mechanisms(&props, system, tube).unwrap()
    }

    fn laminar_system() -> SystemParameters {
        SystemParameters::compute(FlowConditions::from_table_units(2.21, 5.0, 25.0, 101.325))
            .unwrap()
    }

    #[test]
    fn vertical_tube_settles_less_than_horizontal() {
        let system = reference_system();
        let horizontal = mechanisms(5.0, &system, &reference_tube());
        let vertical = mechanisms(5.0, &system, &vertical_tube());

        assert!(vertical.settling.loss() < horizontal.settling.loss());
        assert_relative_eq!(vertical.settling.get::<ratio>(), 1.0, epsilon = 1e-12);
        assert!(vertical.total() > horizontal.total());

        // Settling is the only orientation-dependent mechanism.
        assert_eq!(vertical.diffusion, horizontal.diffusion);
        assert_eq!(vertical.inertial, horizontal.inertial);
    }

    #[test]
    fn settling_loss_grows_with_inclination_toward_horizontal() {
        let system = reference_system();
        let losses: Vec<f64> = [90.0, 60.0, 30.0, 0.0]
            .into_iter()
            .map(|deg| mechanisms(10.0, &system, &tube_at(deg)).settling.loss())
            .collect();
        assert!(losses.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn turbulent_settling_matches_closed_form() {
        let system = reference_system();
        let props = ParticleProperties::compute(Length::new::<micrometer>(5.0), &system);
        let m = tube_mechanisms(&props, &system, &reference_tube()).unwrap();

        let vts = props.settling_velocity().get::<meter_per_second>();
        let d = system.tube_diameter().get::<meter>();
        let u = system.velocity().get::<meter_per_second>();
        let expected = (-4.0 * 1.1176 * vts / (PI * d * u)).exp();

        assert_relative_eq!(m.settling.get::<ratio>(), expected, max_relative = 1e-12);
    }

    #[test]
    fn laminar_branch_has_no_inertial_loss() {
        let system = laminar_system();
        let m = mechanisms(10.0, &system, &reference_tube());
        assert_eq!(m.inertial, Efficiency::one());
        assert!(m.settling.loss() > 0.0);
    }

    #[test]
    fn laminar_settling_saturates_to_zero() {
        let system = laminar_system();
        let long = TubeGeometry::from_table_units(5000.0, 0.0).unwrap();
        let m = mechanisms(50.0, &system, &long);
        assert_eq!(m.settling, Efficiency::zero());
    }

    #[test]
    fn diffusion_dominates_for_ultrafine_particles() {
        let system = laminar_system();
        let fine = mechanisms(0.01, &system, &reference_tube());
        let coarse = mechanisms(1.0, &system, &reference_tube());
        assert!(fine.diffusion < coarse.diffusion);
        assert!(fine.diffusion.loss() > fine.settling.loss());
    }

    #[test]
    fn inertial_loss_grows_with_size_in_turbulent_flow() {
        let system = reference_system();
        let small = mechanisms(2.0, &system, &vertical_tube());
        let large = mechanisms(20.0, &system, &vertical_tube());
        assert!(large.inertial < small.inertial);
    }
}
