//! Element efficiency models and their application to a particle table.
//!
//! Each model is a pure function of a record's [`ParticleProperties`], the
//! run's [`SystemParameters`], and the element geometry. The `apply_*`
//! methods evaluate a model for every record and append the resulting column
//! only if all records succeed.

mod bend;
mod probe;
mod tube;

pub use bend::{BendConditions, BendMethod, BendRelation, McFarland, Pui, Zhang, bend_efficiency};
pub use probe::probe_efficiency;
pub use tube::{TubeMechanisms, tube_efficiency, tube_mechanisms};

use std::ops::Deref;

use tracing::{debug, instrument};
use uom::si::{f64::Ratio, ratio::ratio};

use crate::support::constraint::{Constrained, ConstraintError, ConstraintResult, UnitInterval};

use super::{
    BendGeometry, Element, Orientation, ParticleProperties, ParticleTable, SystemParameters,
    TransportError, TubeGeometry,
};

/// Fraction of particles that pass through an element (or a series of them).
///
/// The efficiency must be in the interval [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Efficiency(Constrained<Ratio, UnitInterval>);

impl Efficiency {
    /// Create an [`Efficiency`] from a scalar value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value lies outside the interval [0, 1].
    pub fn new(value: f64) -> ConstraintResult<Self> {
        Self::from_quantity(Ratio::new::<ratio>(value))
    }

    /// Create an [`Efficiency`] from a ratio quantity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the quantity lies outside the interval [0, 1].
    pub fn from_quantity(quantity: Ratio) -> ConstraintResult<Self> {
        Ok(Self(UnitInterval::new(quantity)?))
    }

    /// Create an [`Efficiency`], saturating finite out-of-range values onto
    /// the nearest endpoint.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value is NaN.
    pub fn saturating(value: f64) -> ConstraintResult<Self> {
        Ok(Self(UnitInterval::saturating(Ratio::new::<ratio>(value))?))
    }

    /// Complete penetration.
    #[must_use]
    pub fn one() -> Self {
        Self(UnitInterval::one())
    }

    /// Complete loss.
    #[must_use]
    pub fn zero() -> Self {
        Self(UnitInterval::zero())
    }

    /// Efficiency of this element followed by `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self::from_quantity(*self * *next)
            .expect("product of unit-interval values stays in the unit interval")
    }

    /// Fraction lost, `1 − efficiency`.
    #[must_use]
    pub fn loss(self) -> f64 {
        1.0 - self.get::<ratio>()
    }
}

impl Deref for Efficiency {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Maps a raw correlation value onto an [`Efficiency`].
///
/// Finite values are clamped to [0, 1]; non-finite values are a domain error.
pub(crate) fn clamped(model: &'static str, raw: f64) -> Result<Efficiency, TransportError> {
    if !raw.is_finite() {
        return Err(TransportError::domain(
            model,
            format!("correlation produced non-finite value {raw}"),
        ));
    }
    Efficiency::saturating(raw).map_err(|err: ConstraintError| {
        TransportError::domain(model, format!("correlation produced {raw}: {err}"))
    })
}

impl ParticleTable {
    /// Applies a sampling probe as the next element.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::OrderingPrecondition`] if particle parameters
    /// are missing, or [`TransportError::ModelDomain`] if the probe model is
    /// out of range for any record.
    #[instrument(level = "debug", skip_all, fields(?orientation))]
    pub fn apply_probe(
        &mut self,
        system: &SystemParameters,
        orientation: Orientation,
    ) -> Result<(), TransportError> {
        let index = self.next_element_index();
        let column = self.evaluate(index, |props| {
            probe_efficiency(props, system, orientation)
        })?;
        self.commit(Element::Probe(orientation), column);
        Ok(())
    }

    /// Applies a straight tube as element `element_index`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::OrderingPrecondition`] if `element_index` is
    /// not the next index or particle parameters are missing.
    #[instrument(level = "debug", skip_all, fields(index = element_index))]
    pub fn apply_tube(
        &mut self,
        system: &SystemParameters,
        geometry: TubeGeometry,
        element_index: usize,
    ) -> Result<(), TransportError> {
        let column = self.evaluate(element_index, |props| {
            tube_efficiency(props, system, &geometry)
        })?;

        let non_stokesian = self
            .records()
            .iter()
            .filter_map(|r| r.properties())
            .filter(|p| p.reynolds().get::<ratio>() > 1.0)
            .count();
        if non_stokesian > 0 {
            debug!(
                non_stokesian,
                "records settle outside the Stokes regime (particle Re > 1)"
            );
        }

        self.commit(Element::Tube(geometry), column);
        Ok(())
    }

    /// Applies a bend as element `element_index`, using the selected
    /// correlation.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::OrderingPrecondition`] if `element_index` is
    /// not the next index or particle parameters are missing, or
    /// [`TransportError::ModelDomain`] if the correlation rejects the bend.
    #[instrument(level = "debug", skip_all, fields(index = element_index, %method))]
    pub fn apply_bend(
        &mut self,
        system: &SystemParameters,
        method: BendMethod,
        geometry: BendGeometry,
        element_index: usize,
    ) -> Result<(), TransportError> {
        let column = self.evaluate(element_index, |props| {
            bend_efficiency(props, system, &method, &geometry)
        })?;
        self.commit(Element::Bend { geometry, method }, column);
        Ok(())
    }

    /// Applies any element as element `element_index`.
    ///
    /// # Errors
    ///
    /// See [`apply_probe`](Self::apply_probe), [`apply_tube`](Self::apply_tube),
    /// and [`apply_bend`](Self::apply_bend).
    pub fn apply(
        &mut self,
        system: &SystemParameters,
        element_index: usize,
        element: &Element,
    ) -> Result<(), TransportError> {
        match *element {
            Element::Probe(orientation) => {
                self.check_next(element_index)?;
                self.apply_probe(system, orientation)
            }
            Element::Tube(geometry) => self.apply_tube(system, geometry, element_index),
            Element::Bend { geometry, method } => {
                self.apply_bend(system, method, geometry, element_index)
            }
        }
    }

    /// Evaluates one model for every record without modifying the table.
    fn evaluate(
        &self,
        element_index: usize,
        model: impl Fn(&ParticleProperties) -> Result<Efficiency, TransportError>,
    ) -> Result<Vec<Efficiency>, TransportError> {
        self.check_next(element_index)?;
        self.records()
            .iter()
            .map(|record| {
                let props = record.properties().ok_or_else(|| {
                    TransportError::ordering(format!(
                        "particle parameters must be computed before element {element_index}"
                    ))
                })?;
                model(props)
            })
            .collect()
    }

    fn commit(&mut self, element: Element, column: Vec<Efficiency>) {
        if let Some((min, max)) = column_range(&column) {
            debug!(
                index = self.next_element_index(),
                kind = %element.kind(),
                min,
                max,
                "appended element efficiency column"
            );
        }
        self.push_column(element, column);
    }
}

/// Smallest and largest efficiency in a column, or `None` if it is empty.
fn column_range(column: &[Efficiency]) -> Option<(f64, f64)> {
    let mut values = column.iter().map(|eff| eff.get::<ratio>());
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), value| {
        (lo.min(value), hi.max(value))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Length, length::micrometer};

    use crate::models::aerosol::transport::core::test_support::{
        reference_bend, reference_system, reference_tube, vertical_tube,
    };

    fn parameterized(sizes: &[f64]) -> ParticleTable {
        let sizes: Vec<_> = sizes.iter().map(|&d| Length::new::<micrometer>(d)).collect();
        ParticleTable::discrete(&sizes)
            .unwrap()
            .with_particle_parameters(&reference_system())
            .unwrap()
    }

    #[test]
    fn efficiency_product_and_loss() {
        let a = Efficiency::new(0.9).unwrap();
        let b = Efficiency::new(0.5).unwrap();
        assert_relative_eq!(a.then(b).get::<ratio>(), 0.45, max_relative = 1e-12);
        assert_relative_eq!(a.loss(), 0.1, epsilon = 1e-12);
        assert_eq!(Efficiency::one().then(b), b);
        assert!(Efficiency::new(1.2).is_err());
        assert_eq!(Efficiency::saturating(-3.0).unwrap(), Efficiency::zero());
    }

    #[test]
    fn non_finite_correlations_are_domain_errors() {
        assert!(matches!(
            clamped("test", f64::NAN),
            Err(TransportError::ModelDomain { model: "test", .. })
        ));
        assert_eq!(clamped("test", 1.004).unwrap(), Efficiency::one());
    }

    #[test]
    fn requires_particle_parameters() {
        let mut table = ParticleTable::discrete(&[Length::new::<micrometer>(5.0)]).unwrap();
        let err = table
            .apply_probe(&reference_system(), Orientation::Horizontal)
            .unwrap_err();
        assert!(matches!(err, TransportError::OrderingPrecondition { .. }));
        assert!(table.elements().is_empty());
    }

    #[test]
    fn rejects_out_of_order_index() {
        let system = reference_system();
        let mut table = parameterized(&[5.0]);

        let err = table.apply_tube(&system, reference_tube(), 2).unwrap_err();
        assert!(matches!(err, TransportError::OrderingPrecondition { .. }));

        table.apply_tube(&system, reference_tube(), 1).unwrap();
        let err = table.apply_tube(&system, reference_tube(), 1).unwrap_err();
        assert!(matches!(err, TransportError::OrderingPrecondition { .. }));
        assert_eq!(table.elements().len(), 1);
    }

    #[test]
    fn cumulative_efficiency_is_monotone_and_bounded() {
        let system = reference_system();
        let mut table = parameterized(&[0.05, 0.5, 1.0, 5.0, 10.0, 20.0, 50.0]);

        table.apply_probe(&system, Orientation::Horizontal).unwrap();
        table.apply_tube(&system, reference_tube(), 2).unwrap();
        table
            .apply_bend(&system, BendMethod::McFarland, reference_bend(), 3)
            .unwrap();
        table.apply_tube(&system, vertical_tube(), 4).unwrap();

        for record in table.records() {
            let mut previous = 1.0;
            for (eff, cum) in record
                .efficiencies()
                .iter()
                .zip(record.cumulative_efficiencies())
            {
                let (eff, cum) = (eff.get::<ratio>(), cum.get::<ratio>());
                assert!((0.0..=1.0).contains(&eff));
                assert!((0.0..=1.0).contains(&cum));
                assert!(cum <= previous);
                previous = cum;
            }
        }
    }

    #[test]
    fn generic_apply_matches_specific_methods() {
        let system = reference_system();
        let elements = [
            Element::Probe(Orientation::Down),
            Element::Tube(reference_tube()),
            Element::Bend {
                geometry: reference_bend(),
                method: BendMethod::Pui,
            },
        ];

        let mut generic = parameterized(&[1.0, 10.0]);
        for (i, element) in elements.iter().enumerate() {
            generic.apply(&system, i + 1, element).unwrap();
        }

        let mut specific = parameterized(&[1.0, 10.0]);
        specific.apply_probe(&system, Orientation::Down).unwrap();
        specific.apply_tube(&system, reference_tube(), 2).unwrap();
        specific
            .apply_bend(&system, BendMethod::Pui, reference_bend(), 3)
            .unwrap();

        assert_eq!(generic, specific);
        assert_eq!(generic.elements(), &elements);
    }

    #[test]
    fn column_range_of_empty_and_filled_columns() {
        assert_eq!(column_range(&[]), None);

        let column = [0.7, 0.2, 0.9].map(|v| Efficiency::new(v).unwrap());
        assert_eq!(column_range(&column), Some((0.2, 0.9)));
    }

    #[test]
    fn elements_apply_to_an_empty_table() {
        let system = reference_system();
        let mut table = parameterized(&[]);
        table.apply_probe(&system, Orientation::Up).unwrap();
        table.apply_tube(&system, reference_tube(), 2).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.elements().len(), 2);
    }

    #[test]
    fn generic_apply_checks_probe_index() {
        let mut table = parameterized(&[1.0]);
        let err = table
            .apply(&reference_system(), 3, &Element::Probe(Orientation::Up))
            .unwrap_err();
        assert!(matches!(err, TransportError::OrderingPrecondition { .. }));
    }
}
