//! Sampling-line transport efficiency.
//!
//! A sampling line is a probe followed by straight tubes and bends. Each
//! element removes a size-dependent fraction of the particles that reach it;
//! the fraction that survives every element is what a detector sees.
//!
//! [`SamplingLine`] implements [`twine_core::Model`] for a complete run. The
//! step-by-step API it delegates to lives in [`core`].

pub mod core;
mod model;

pub use model::SamplingLine;
