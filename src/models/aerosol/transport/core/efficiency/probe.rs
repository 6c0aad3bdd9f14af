//! Still-air sampling probe.
//!
//! Calm-air aspiration after Grinshpun et al., with the sampling velocity
//! equal to the characteristic free-stream velocity. Gravity adds particles
//! to an upward-facing inlet and removes them from a downward-facing one;
//! a horizontal inlet sees inertial losses only.

use uom::si::ratio::ratio;

use crate::models::aerosol::transport::core::{
    Orientation, ParticleProperties, SystemParameters, TransportError,
};

use super::{Efficiency, clamped};

const MODEL: &str = "probe";

/// Inlet efficiency of a thin-walled probe sampling from still air.
///
/// With `r = Vts / U`:
///
/// - up: `r + exp(−4·Stk^(1+√r) / (1 + 2·Stk))`
/// - down: `exp(−4·Stk^(1+√r) / (1 + 2·Stk)) − r`
/// - horizontal: `exp(−4·Stk / (1 + 2·Stk))`
///
/// The result is clamped to [0, 1]. A particle that settles at least as fast
/// as the sampling velocity saturates: an upward inlet collects all of it and
/// a downward inlet none. The horizontal form does not depend on `r`.
///
/// # Errors
///
/// Returns [`TransportError::ModelDomain`] if a term is non-finite.
pub fn probe_efficiency(
    props: &ParticleProperties,
    system: &SystemParameters,
    orientation: Orientation,
) -> Result<Efficiency, TransportError> {
    let r = (props.settling_velocity() / system.velocity()).get::<ratio>();
    if !r.is_finite() {
        return Err(TransportError::domain(
            MODEL,
            format!("settling to sampling velocity ratio {r} is not finite"),
        ));
    }

    let stk = props.stokes().get::<ratio>();
    let aspiration = |exponent: f64| (-4.0 * stk.powf(exponent) / (1.0 + 2.0 * stk)).exp();

    let raw = match orientation {
        Orientation::Horizontal => aspiration(1.0),
        Orientation::Up if r >= 1.0 => 1.0,
        Orientation::Down if r >= 1.0 => 0.0,
        Orientation::Up => r + aspiration(1.0 + r.sqrt()),
        Orientation::Down => aspiration(1.0 + r.sqrt()) - r,
    };

    clamped(MODEL, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Length, length::micrometer};

    use crate::models::aerosol::transport::core::{
        FlowConditions, test_support::reference_system,
    };

    fn props(um: f64, system: &SystemParameters) -> ParticleProperties {
        ParticleProperties::compute(Length::new::<micrometer>(um), system)
    }

    fn eff(um: f64, orientation: Orientation) -> f64 {
        let system = reference_system();
        probe_efficiency(&props(um, &system), &system, orientation)
            .unwrap()
            .get::<ratio>()
    }

    #[test]
    fn fine_particles_follow_the_flow() {
        for orientation in [Orientation::Up, Orientation::Down, Orientation::Horizontal] {
            assert_relative_eq!(eff(0.5, orientation), 1.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn gravity_favors_upward_inlets() {
        let system = reference_system();
        let p = props(20.0, &system);
        let r = (p.settling_velocity() / system.velocity()).get::<ratio>();

        let up = eff(20.0, Orientation::Up);
        let down = eff(20.0, Orientation::Down);
        assert!(up > eff(20.0, Orientation::Horizontal));
        assert_relative_eq!(up - down, 2.0 * r, max_relative = 1e-9);
    }

    #[test]
    fn horizontal_losses_grow_with_size() {
        let sizes = [1.0, 5.0, 10.0, 30.0, 60.0];
        let effs: Vec<f64> = sizes
            .iter()
            .map(|&d| eff(d, Orientation::Horizontal))
            .collect();
        assert!(effs.windows(2).all(|w| w[0] >= w[1]));
        assert!(effs.iter().all(|e| (0.0..=1.0).contains(e)));
    }

    #[test]
    fn settling_faster_than_sampling_saturates() {
        let slow = FlowConditions::from_table_units(2.21, 5.0, 25.0, 101.325);
        let system = SystemParameters::compute(slow).unwrap();
        let p = props(100.0, &system);
        assert!((p.settling_velocity() / system.velocity()).get::<ratio>() > 1.0);

        let at = |orientation| {
            probe_efficiency(&p, &system, orientation)
                .unwrap()
                .get::<ratio>()
        };
        assert_eq!(at(Orientation::Up), 1.0);
        assert_eq!(at(Orientation::Down), 0.0);

        let stk = p.stokes().get::<ratio>();
        assert_relative_eq!(
            at(Orientation::Horizontal),
            (-4.0 * stk / (1.0 + 2.0 * stk)).exp(),
            max_relative = 1e-12
        );
    }
}
