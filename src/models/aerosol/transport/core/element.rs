//! Transport elements of a sampling line.

use std::{fmt, str::FromStr};

use uom::si::{
    angle::degree,
    f64::{Angle, Length, Ratio},
    length::centimeter,
};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::{BendMethod, TransportError};

/// Slack for degree round-off when checking angle bounds.
const ANGLE_TOL_DEG: f64 = 1e-9;

/// Direction a sampling probe inlet faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Up,
    Down,
    Horizontal,
}

impl FromStr for Orientation {
    type Err = TransportError;

    /// Parses the single-letter codes `u`, `d`, and `h`, or the full word.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Self::Up),
            "d" | "down" => Ok(Self::Down),
            "h" | "horizontal" => Ok(Self::Horizontal),
            other => Err(TransportError::invalid(
                "orientation",
                format!("expected one of u, d, h; got {other:?}"),
            )),
        }
    }
}

/// A straight tube segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeGeometry {
    length: Constrained<Length, StrictlyPositive>,
    angle_to_horizontal: Angle,
}

impl TubeGeometry {
    /// Creates a tube of the given length and inclination.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidParameter`] if the length is not
    /// strictly positive or the angle lies outside [0°, 90°].
    pub fn new(length: Length, angle_to_horizontal: Angle) -> Result<Self, TransportError> {
        let length =
            StrictlyPositive::new(length).map_err(TransportError::constraint("tube_length"))?;
        let degrees = angle_to_horizontal.get::<degree>();
        if !(-ANGLE_TOL_DEG..=90.0 + ANGLE_TOL_DEG).contains(&degrees) {
            return Err(TransportError::invalid(
                "tube_angle",
                format!("{degrees}° is outside [0°, 90°]"),
            ));
        }
        Ok(Self {
            length,
            angle_to_horizontal,
        })
    }

    /// Creates a tube from a length in centimeters and an angle in degrees.
    ///
    /// # Errors
    ///
    /// See [`TubeGeometry::new`].
    pub fn from_table_units(length_cm: f64, angle_deg: f64) -> Result<Self, TransportError> {
        Self::new(
            Length::new::<centimeter>(length_cm),
            Angle::new::<degree>(angle_deg),
        )
    }

    #[must_use]
    pub fn length(&self) -> Length {
        self.length.into_inner()
    }

    /// Inclination from horizontal; 90° is vertical.
    #[must_use]
    pub fn angle_to_horizontal(&self) -> Angle {
        self.angle_to_horizontal
    }
}

/// A bend in the sampling tube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendGeometry {
    angle: Angle,
    radius: Constrained<Length, StrictlyPositive>,
}

impl BendGeometry {
    /// Creates a bend with the given turning angle and centerline radius.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidParameter`] if the angle lies outside
    /// (0°, 180°] or the radius is not strictly positive.
    pub fn new(angle: Angle, radius: Length) -> Result<Self, TransportError> {
        let degrees = angle.get::<degree>();
        if !(degrees > 0.0 && degrees <= 180.0 + ANGLE_TOL_DEG) {
            return Err(TransportError::invalid(
                "bend_angle",
                format!("{degrees}° is outside (0°, 180°]"),
            ));
        }
        let radius =
            StrictlyPositive::new(radius).map_err(TransportError::constraint("bend_radius"))?;
        Ok(Self { angle, radius })
    }

    /// Creates a bend from an angle in degrees and a radius in centimeters.
    ///
    /// # Errors
    ///
    /// See [`BendGeometry::new`].
    pub fn from_table_units(angle_deg: f64, radius_cm: f64) -> Result<Self, TransportError> {
        Self::new(
            Angle::new::<degree>(angle_deg),
            Length::new::<centimeter>(radius_cm),
        )
    }

    #[must_use]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    #[must_use]
    pub fn radius(&self) -> Length {
        self.radius.into_inner()
    }

    /// Bend radius over tube diameter.
    #[must_use]
    pub fn curvature_ratio(&self, tube_diameter: Length) -> Ratio {
        self.radius() / tube_diameter
    }
}

/// One element of a sampling line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    Probe(Orientation),
    Tube(TubeGeometry),
    Bend {
        geometry: BendGeometry,
        method: BendMethod,
    },
}

impl Element {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Probe(_) => ElementKind::Probe,
            Self::Tube(_) => ElementKind::Tube,
            Self::Bend { .. } => ElementKind::Bend,
        }
    }
}

/// The kind column of an element table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Probe,
    Tube,
    Bend,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Probe => "probe",
            Self::Tube => "tube",
            Self::Bend => "bend",
        })
    }
}

impl FromStr for ElementKind {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "probe" => Ok(Self::Probe),
            "tube" => Ok(Self::Tube),
            "bend" => Ok(Self::Bend),
            other => Err(TransportError::invalid(
                "element_kind",
                format!("expected probe, tube, or bend; got {other:?}"),
            )),
        }
    }
}

/// One row of an element table, in the table's native units.
///
/// Only the columns relevant to `kind` need to be present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRow {
    /// 1-based transport order.
    pub index: usize,
    pub kind: ElementKind,
    pub length_cm: Option<f64>,
    pub angle_to_horizontal_deg: Option<f64>,
    pub orientation: Option<Orientation>,
    pub bend_angle_deg: Option<f64>,
    pub bend_radius_cm: Option<f64>,
}

impl ElementRow {
    #[must_use]
    pub fn probe(index: usize, orientation: Orientation) -> Self {
        Self {
            orientation: Some(orientation),
            ..Self::empty(index, ElementKind::Probe)
        }
    }

    #[must_use]
    pub fn tube(index: usize, length_cm: f64, angle_to_horizontal_deg: f64) -> Self {
        Self {
            length_cm: Some(length_cm),
            angle_to_horizontal_deg: Some(angle_to_horizontal_deg),
            ..Self::empty(index, ElementKind::Tube)
        }
    }

    #[must_use]
    pub fn bend(index: usize, bend_angle_deg: f64, bend_radius_cm: f64) -> Self {
        Self {
            bend_angle_deg: Some(bend_angle_deg),
            bend_radius_cm: Some(bend_radius_cm),
            ..Self::empty(index, ElementKind::Bend)
        }
    }

    fn empty(index: usize, kind: ElementKind) -> Self {
        Self {
            index,
            kind,
            length_cm: None,
            angle_to_horizontal_deg: None,
            orientation: None,
            bend_angle_deg: None,
            bend_radius_cm: None,
        }
    }

    /// Converts the row into an [`Element`], using `method` for bends.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidParameter`] if a column required by
    /// the row's kind is missing or out of range.
    pub fn to_element(&self, method: BendMethod) -> Result<Element, TransportError> {
        match self.kind {
            ElementKind::Probe => Ok(Element::Probe(required(self.orientation, "orientation")?)),
            ElementKind::Tube => Ok(Element::Tube(TubeGeometry::from_table_units(
                required(self.length_cm, "tube_length")?,
                required(self.angle_to_horizontal_deg, "tube_angle")?,
            )?)),
            ElementKind::Bend => Ok(Element::Bend {
                geometry: BendGeometry::from_table_units(
                    required(self.bend_angle_deg, "bend_angle")?,
                    required(self.bend_radius_cm, "bend_radius")?,
                )?,
                method,
            }),
        }
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, TransportError> {
    value.ok_or_else(|| TransportError::invalid(name, "missing"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{length::meter, ratio::ratio};

    fn invalid_name(err: TransportError) -> &'static str {
        match err {
            TransportError::InvalidParameter { name, .. } => name,
            other => panic!("expected invalid parameter, got {other:?}"),
        }
    }

    #[test]
    fn tube_converts_table_units() {
        let tube = TubeGeometry::from_table_units(111.76, 90.0).unwrap();
        assert_relative_eq!(tube.length().get::<meter>(), 1.1176, max_relative = 1e-12);
        assert_relative_eq!(tube.angle_to_horizontal().get::<degree>(), 90.0, max_relative = 1e-12);
    }

    #[test]
    fn tube_bounds() {
        assert!(TubeGeometry::from_table_units(10.0, 0.0).is_ok());
        let bad = [(0.0, 0.0, "tube_length"), (10.0, -1.0, "tube_angle"), (10.0, 91.0, "tube_angle")];
        for (length, angle, name) in bad {
            let err = TubeGeometry::from_table_units(length, angle).unwrap_err();
            assert_eq!(invalid_name(err), name);
        }
    }

    #[test]
    fn bend_bounds_and_curvature() {
        let bend = BendGeometry::from_table_units(90.0, 12.7).unwrap();
        let r0 = bend.curvature_ratio(Length::new::<centimeter>(2.21));
        assert_relative_eq!(r0.get::<ratio>(), 12.7 / 2.21, max_relative = 1e-12);

        assert!(BendGeometry::from_table_units(180.0, 1.0).is_ok());
        assert_eq!(
            invalid_name(BendGeometry::from_table_units(0.0, 1.0).unwrap_err()),
            "bend_angle"
        );
        assert_eq!(
            invalid_name(BendGeometry::from_table_units(181.0, 1.0).unwrap_err()),
            "bend_angle"
        );
        assert_eq!(
            invalid_name(BendGeometry::from_table_units(90.0, 0.0).unwrap_err()),
            "bend_radius"
        );
    }

    #[test]
    fn parses_codes() {
        assert_eq!("u".parse::<Orientation>().unwrap(), Orientation::Up);
        assert_eq!("D".parse::<Orientation>().unwrap(), Orientation::Down);
        assert_eq!("h".parse::<Orientation>().unwrap(), Orientation::Horizontal);
        assert_eq!(invalid_name("x".parse::<Orientation>().unwrap_err()), "orientation");

        assert_eq!("Bend".parse::<ElementKind>().unwrap(), ElementKind::Bend);
        assert!("splitter".parse::<ElementKind>().is_err());
    }

    #[test]
    fn rows_become_elements() {
        let method = BendMethod::Zhang;
        let probe = ElementRow::probe(1, Orientation::Up).to_element(method).unwrap();
        assert_eq!(probe, Element::Probe(Orientation::Up));

        let bend = ElementRow::bend(3, 90.0, 12.7).to_element(method).unwrap();
        assert_eq!(bend.kind(), ElementKind::Bend);
        assert!(matches!(bend, Element::Bend { method: BendMethod::Zhang, .. }));

        let missing = ElementRow {
            length_cm: None,
            ..ElementRow::tube(2, 10.0, 0.0)
        };
        assert_eq!(invalid_name(missing.to_element(method).unwrap_err()), "tube_length");
    }
}
