use super::{BendGeometry, FlowConditions, SystemParameters, TubeGeometry};

/// 2.21 cm tube at 56.6 L/min, 25 °C, 101.325 kPa.
pub(super) fn reference_system() -> SystemParameters {
    SystemParameters::compute(FlowConditions::default()).expect("reference flow is valid")
}

/// Horizontal 111.76 cm tube.
pub(super) fn reference_tube() -> TubeGeometry {
    tube_at(0.0)
}

/// Vertical 111.76 cm tube.
pub(super) fn vertical_tube() -> TubeGeometry {
    tube_at(90.0)
}

/// 111.76 cm tube at the given angle to horizontal, in degrees.
pub(super) fn tube_at(angle_deg: f64) -> TubeGeometry {
    TubeGeometry::from_table_units(111.76, angle_deg).expect("tube geometry is valid")
}

/// 90° bend with a 12.7 cm radius.
pub(super) fn reference_bend() -> BendGeometry {
    BendGeometry::from_table_units(90.0, 12.7).expect("bend geometry is valid")
}
