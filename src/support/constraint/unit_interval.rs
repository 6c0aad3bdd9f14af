use std::{cmp::Ordering, marker::PhantomData};

use uom::si::{f64::Ratio, ratio::ratio};

use super::{Constrained, Constraint, ConstraintError};

/// Supplies 0 and 1 for types used in the closed unit interval [0, 1].
///
/// Implementations should ensure that `zero() ≤ one()` under the type's
/// `PartialOrd` so the interval is well-formed.
pub trait UnitBounds: PartialOrd {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for Ratio {
    fn zero() -> Self {
        Ratio::new::<ratio>(0.0)
    }
    fn one() -> Self {
        Ratio::new::<ratio>(1.0)
    }
}

/// Marker type enforcing that a value lies in the closed unit interval: `0 ≤ x ≤ 1`.
///
/// Transport efficiencies and penetration fractions carry this constraint.
///
/// # Examples
///
/// ```
/// use twine_aerosol::support::constraint::UnitInterval;
/// use uom::si::{f64::Ratio, ratio::{percent, ratio}};
///
/// let eff = UnitInterval::new(Ratio::new::<ratio>(0.5)).unwrap();
/// assert_eq!(eff.as_ref().get::<percent>(), 50.0);
///
/// // Correlations that overshoot are saturated onto the interval.
/// let clamped = UnitInterval::saturating(Ratio::new::<ratio>(1.005)).unwrap();
/// assert_eq!(clamped.into_inner().get::<ratio>(), 1.0);
///
/// assert!(UnitInterval::new(-0.0001).is_err());
/// assert!(UnitInterval::new(1.0001).is_err());
/// assert!(UnitInterval::saturating(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<T, UnitInterval>` if 0 ≤ value ≤ 1.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: UnitBounds>(value: T) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        Constrained::<T, UnitInterval>::new(value)
    }

    /// Constructs `Constrained<T, UnitInterval>`, saturating out-of-range values
    /// onto the nearest endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::NotANumber`] if the value cannot be ordered.
    pub fn saturating<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        match <Self as Constraint<T>>::check(&value) {
            Err(ConstraintError::BelowMinimum) => Ok(Self::zero()),
            Err(ConstraintError::AboveMaximum) => Ok(Self::one()),
            Err(err) => Err(err),
            Ok(()) => Ok(Constrained {
                value,
                _marker: PhantomData,
            }),
        }
    }

    /// Returns the lower bound (zero) as a constrained value.
    #[must_use]
    pub fn zero<T: UnitBounds>() -> Constrained<T, UnitInterval> {
        Constrained::<T, UnitInterval> {
            value: T::zero(),
            _marker: PhantomData,
        }
    }

    /// Returns the upper bound (one) as a constrained value.
    #[must_use]
    pub fn one<T: UnitBounds>() -> Constrained<T, UnitInterval> {
        Constrained::<T, UnitInterval> {
            value: T::one(),
            _marker: PhantomData,
        }
    }
}

impl<T: UnitBounds> Constraint<T> for UnitInterval {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}
