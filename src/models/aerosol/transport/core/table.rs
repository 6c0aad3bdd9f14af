//! Append-only particle table.
//!
//! Each [`ParticleRecord`] owns its per-element efficiency columns privately.
//! The only way to add data is [`ParticleTable::push_column`], which appends
//! one efficiency for every record at once, so earlier columns can never be
//! rewritten.

use uom::si::f64::Length;

use crate::support::constraint::StrictlyPositive;

use super::{Efficiency, Element, ParticleProperties, TransportError};

/// How a record's diameter was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionKind {
    /// A bin of the log-normal size distribution, carrying its normalized
    /// probability.
    Continuous { probability: f64 },

    /// A single representative size with no probability weight.
    Discrete,
}

impl DistributionKind {
    /// Returns the bin probability, if this is a continuous record.
    #[must_use]
    pub fn probability(&self) -> Option<f64> {
        match self {
            Self::Continuous { probability } => Some(*probability),
            Self::Discrete => None,
        }
    }

    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous { .. })
    }
}

/// One modeled particle size.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRecord {
    diameter: Length,
    kind: DistributionKind,
    properties: Option<ParticleProperties>,
    efficiencies: Vec<Efficiency>,
    cumulative: Vec<Efficiency>,
}

impl ParticleRecord {
    pub(super) fn new(diameter: Length, kind: DistributionKind) -> Self {
        Self {
            diameter,
            kind,
            properties: None,
            efficiencies: Vec::new(),
            cumulative: Vec::new(),
        }
    }

    /// Aerodynamic diameter.
    #[must_use]
    pub fn diameter(&self) -> Length {
        self.diameter
    }

    #[must_use]
    pub fn kind(&self) -> DistributionKind {
        self.kind
    }

    /// Derived physical parameters, once computed.
    #[must_use]
    pub fn properties(&self) -> Option<&ParticleProperties> {
        self.properties.as_ref()
    }

    /// Efficiency of the element with the given 1-based index.
    #[must_use]
    pub fn efficiency(&self, element_index: usize) -> Option<Efficiency> {
        element_index
            .checked_sub(1)
            .and_then(|i| self.efficiencies.get(i).copied())
    }

    /// Cumulative efficiency through the element with the given 1-based index.
    #[must_use]
    pub fn cumulative_efficiency(&self, element_index: usize) -> Option<Efficiency> {
        element_index
            .checked_sub(1)
            .and_then(|i| self.cumulative.get(i).copied())
    }

    /// Per-element efficiencies in transport order.
    #[must_use]
    pub fn efficiencies(&self) -> &[Efficiency] {
        &self.efficiencies
    }

    /// Cumulative efficiencies in transport order.
    #[must_use]
    pub fn cumulative_efficiencies(&self) -> &[Efficiency] {
        &self.cumulative
    }

    /// Cumulative efficiency through every processed element.
    ///
    /// A record that has not passed through any element is fully retained.
    #[must_use]
    pub fn final_efficiency(&self) -> Efficiency {
        self.cumulative.last().copied().unwrap_or_else(Efficiency::one)
    }
}

/// The particle records of a run plus the elements already applied to them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleTable {
    records: Vec<ParticleRecord>,
    elements: Vec<Element>,
}

impl ParticleTable {
    pub(super) fn from_records(records: Vec<ParticleRecord>) -> Self {
        Self {
            records,
            elements: Vec::new(),
        }
    }

    /// Creates a table of discrete representative sizes only.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidParameter`] if a size is not strictly
    /// positive.
    pub fn discrete(sizes: &[Length]) -> Result<Self, TransportError> {
        let records = sizes
            .iter()
            .map(|&size| {
                StrictlyPositive::new(size)
                    .map(|d| ParticleRecord::new(d.into_inner(), DistributionKind::Discrete))
                    .map_err(TransportError::constraint("discrete_sizes"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(records))
    }

    #[must_use]
    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records belonging to the continuous size distribution.
    pub fn continuous(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.records.iter().filter(|r| r.kind.is_continuous())
    }

    /// Discrete representative-size records.
    pub fn discrete_records(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.records.iter().filter(|r| !r.kind.is_continuous())
    }

    /// Elements applied so far; position `i` holds element index `i + 1`.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Index the next element must carry.
    #[must_use]
    pub fn next_element_index(&self) -> usize {
        self.elements.len() + 1
    }

    /// Checks that `index` is the next element in transport order.
    pub(super) fn check_next(&self, index: usize) -> Result<(), TransportError> {
        let expected = self.next_element_index();
        if index == expected {
            Ok(())
        } else {
            Err(TransportError::ordering(format!(
                "element {index} applied but element {expected} is next"
            )))
        }
    }

    /// Replaces derived properties on every record.
    ///
    /// Callers guarantee `properties.len() == self.len()` and that no element
    /// column exists yet.
    pub(super) fn set_properties(&mut self, properties: Vec<ParticleProperties>) {
        debug_assert_eq!(properties.len(), self.records.len());
        debug_assert!(self.elements.is_empty());
        for (record, props) in self.records.iter_mut().zip(properties) {
            record.properties = Some(props);
        }
    }

    /// Appends one element's efficiency column and the updated cumulative column.
    ///
    /// Callers guarantee `column.len() == self.len()`.
    pub(super) fn push_column(&mut self, element: Element, column: Vec<Efficiency>) {
        debug_assert_eq!(column.len(), self.records.len());
        for (record, efficiency) in self.records.iter_mut().zip(column) {
            let cumulative = record.final_efficiency().then(efficiency);
            record.efficiencies.push(efficiency);
            record.cumulative.push(cumulative);
        }
        self.elements.push(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{length::micrometer, ratio::ratio};

    use crate::models::aerosol::transport::core::Orientation;

    fn sizes() -> Vec<Length> {
        [1.0, 5.0, 10.0]
            .into_iter()
            .map(Length::new::<micrometer>)
            .collect()
    }

    #[test]
    fn discrete_table_has_no_columns() {
        let table = ParticleTable::discrete(&sizes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.continuous().count(), 0);
        assert_eq!(table.next_element_index(), 1);

        let record = &table.records()[0];
        assert!(record.properties().is_none());
        assert!(record.efficiency(1).is_none());
        assert!(record.efficiency(0).is_none());
        assert_eq!(record.final_efficiency(), Efficiency::one());
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let err = ParticleTable::discrete(&[Length::new::<micrometer>(0.0)]).unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidParameter {
                name: "discrete_sizes",
                ..
            }
        ));
    }

    #[test]
    fn columns_accumulate_multiplicatively() {
        let mut table = ParticleTable::discrete(&sizes()).unwrap();
        let probe = Element::Probe(Orientation::Up);

        let half = Efficiency::new(0.5).unwrap();
        let most = Efficiency::new(0.8).unwrap();
        table.push_column(probe, vec![half; 3]);
        table.push_column(probe, vec![most; 3]);

        let record = &table.records()[1];
        assert_eq!(record.efficiencies(), &[half, most]);
        assert_relative_eq!(record.cumulative_efficiency(1).unwrap().get::<ratio>(), 0.5);
        assert_relative_eq!(record.final_efficiency().get::<ratio>(), 0.4, max_relative = 1e-12);
        assert_eq!(table.next_element_index(), 3);
    }

    #[test]
    fn ordering_is_checked() {
        let table = ParticleTable::discrete(&sizes()).unwrap();
        assert!(table.check_next(1).is_ok());
        assert!(matches!(
            table.check_next(2),
            Err(TransportError::OrderingPrecondition { .. })
        ));
    }
}
