//! Supporting utilities shared by the aerosol models.

pub mod air;
pub mod constraint;
pub mod mechanics;
pub mod units;
