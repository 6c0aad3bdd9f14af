//! # Twine Aerosol
//!
//! Aerosol transport models for sampling lines built from a probe, straight
//! tubes, and bends.
//!
//! Given the tubing geometry, flow rate, and ambient conditions, the models
//! estimate which fraction of the ambient aerosol reaches a detector as a
//! function of particle size.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain models, including a [`twine_core::Model`] adapter for a
//!   complete sampling line.
//! - [`support`]: Supporting utilities used by models (numeric constraints,
//!   unit extensions, air properties, single-particle mechanics).
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.

pub mod models;
pub mod support;
