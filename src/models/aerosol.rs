//! Aerosol models.
//!
//! This module contains models for the transport of airborne particles
//! through sampling systems.

pub mod transport;
