//! Inertial deposition in bends.
//!
//! Every correlation sees the same [`BendConditions`] and differs only in the
//! closed-form expression it evaluates. [`BendMethod`] selects one at run time.

use std::{f64::consts::PI, fmt, str::FromStr};

use uom::si::{angle::radian, f64::Angle, ratio::ratio};

use crate::{
    models::aerosol::transport::core::{
        BendGeometry, FlowRegime, ParticleProperties, SystemParameters, TransportError,
    },
    support::constraint::NonNegative,
};

use super::{Efficiency, clamped};

/// Smallest curvature ratio a physical bend can have.
///
/// A bend whose radius is no larger than the tube radius folds onto itself.
const MIN_CURVATURE_RATIO: f64 = 0.5;

/// Inputs shared by every bend correlation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendConditions {
    /// Particle Stokes number based on the tube diameter.
    pub stokes: f64,

    /// Bend radius divided by tube diameter.
    pub curvature_ratio: f64,

    /// Turning angle of the bend.
    pub angle: Angle,

    /// Flow regime in the tube, which selects between laminar and turbulent fits.
    pub regime: FlowRegime,
}

impl BendConditions {
    /// Gathers the conditions for one particle passing one bend.
    #[must_use]
    pub fn new(
        props: &ParticleProperties,
        system: &SystemParameters,
        geometry: &BendGeometry,
    ) -> Self {
        Self {
            stokes: props.stokes().get::<ratio>(),
            curvature_ratio: geometry
                .curvature_ratio(system.tube_diameter())
                .get::<ratio>(),
            angle: geometry.angle(),
            regime: system.regime(),
        }
    }
}

/// Trait for computing bend penetration from [`BendConditions`].
pub trait BendRelation {
    /// Calculate the fraction of particles that pass the bend.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ModelDomain`] if the conditions lie outside
    /// the correlation's domain.
    fn efficiency(&self, conditions: &BendConditions) -> Result<Efficiency, TransportError>;
}

/// Efficiency of a bend for one particle.
///
/// # Errors
///
/// Propagates the relation's [`TransportError::ModelDomain`].
pub fn bend_efficiency(
    props: &ParticleProperties,
    system: &SystemParameters,
    relation: &impl BendRelation,
    geometry: &BendGeometry,
) -> Result<Efficiency, TransportError> {
    relation.efficiency(&BendConditions::new(props, system, geometry))
}

/// Checks the shared domain and evaluates `fn_raw(stk, r0, phi)`, with the
/// bend angle `phi` in radians.
#[inline]
fn efficiency_via(
    model: &'static str,
    conditions: &BendConditions,
    fn_raw: impl Fn(f64, f64, f64) -> f64,
) -> Result<Efficiency, TransportError> {
    let BendConditions {
        stokes,
        curvature_ratio,
        angle,
        ..
    } = *conditions;

    if curvature_ratio.is_nan() || curvature_ratio <= MIN_CURVATURE_RATIO {
        return Err(TransportError::domain(
            model,
            format!("curvature ratio {curvature_ratio:.4} must exceed {MIN_CURVATURE_RATIO}"),
        ));
    }
    NonNegative::new(stokes).map_err(|err| {
        TransportError::domain(model, format!("Stokes number {stokes}: {err}"))
    })?;

    clamped(model, fn_raw(stokes, curvature_ratio, angle.get::<radian>()))
}

/// Curvature-corrected exponential decay after Zhang et al.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zhang;

impl BendRelation for Zhang {
    fn efficiency(&self, conditions: &BendConditions) -> Result<Efficiency, TransportError> {
        efficiency_via("Zhang bend", conditions, |stk, r0, phi| {
            (-phi * stk * (1.0 + 2.0 / (3.0 * r0))).exp()
        })
    }
}

/// Empirical fit of McFarland et al. for tubes with curvature ratios of
/// roughly 2 to 10.
#[derive(Debug, Clone, Copy, Default)]
pub struct McFarland;

impl BendRelation for McFarland {
    fn efficiency(&self, conditions: &BendConditions) -> Result<Efficiency, TransportError> {
        efficiency_via("McFarland bend", conditions, |stk, r0, phi| {
            let a = -0.9526 - 0.05686 * r0;
            let b = (0.297 + 0.0174 * r0) / (1.0 - 0.07 * r0 + 0.0171 * r0 * r0);
            let x = phi * stk;
            ((4.61 + a * x) / (1.0 + b * x)).exp() / 100.0
        })
    }
}

/// Pui et al., with separate laminar and turbulent fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pui;

impl BendRelation for Pui {
    fn efficiency(&self, conditions: &BendConditions) -> Result<Efficiency, TransportError> {
        let regime = conditions.regime;
        efficiency_via("Pui bend", conditions, |stk, _r0, phi| match regime {
            FlowRegime::Laminar => {
                let s = stk / 0.171;
                (1.0 + s.powf(0.452 * s + 2.242)).powf(-2.0 * phi / PI)
            }
            FlowRegime::Turbulent => (-2.823 * stk * phi).exp(),
        })
    }
}

/// Selects the bend correlation used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BendMethod {
    Zhang,
    McFarland,
    Pui,
}

impl BendMethod {
    pub const ALL: [Self; 3] = [Self::Zhang, Self::McFarland, Self::Pui];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Zhang => "Zhang",
            Self::McFarland => "McFarland",
            Self::Pui => "Pui",
        }
    }
}

impl BendRelation for BendMethod {
    fn efficiency(&self, conditions: &BendConditions) -> Result<Efficiency, TransportError> {
        match self {
            Self::Zhang => Zhang.efficiency(conditions),
            Self::McFarland => McFarland.efficiency(conditions),
            Self::Pui => Pui.efficiency(conditions),
        }
    }
}

impl fmt::Display for BendMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BendMethod {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TransportError::UnknownMethod(s.to_owned()))
    }
}
