//! Cut diameter of a sampling line.
//!
//! The cut diameter is the aerodynamic size at which the line passes a target
//! fraction of particles (50 % by default). It is found by bisection over
//! `log10(d)`, evaluating a single discrete particle through every element.

use std::convert::Infallible;

use thiserror::Error;
use tracing::{debug, instrument};
use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;
use uom::si::{f64::Length, length::micrometer, ratio::ratio};

use crate::{
    models::aerosol::transport::core::{
        Efficiency, Element, ParticleTable, SystemParameters, TransportError,
    },
    support::constraint::StrictlyPositive,
};

/// Solver configuration for the cut diameter search.
#[derive(Debug, Clone, Copy)]
pub struct CutDiameterConfig {
    /// Efficiency at which the line "cuts".
    pub target: Efficiency,

    /// Smallest and largest diameters searched.
    pub bracket: [Length; 2],

    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on `log10(d / 1 µm)`.
    pub log_diameter_tol: f64,

    /// Absolute tolerance on the efficiency residual.
    pub efficiency_tol: f64,
}

impl Default for CutDiameterConfig {
    fn default() -> Self {
        Self {
            target: Efficiency::new(0.5).expect("one half is a valid efficiency"),
            bracket: [
                Length::new::<micrometer>(0.5),
                Length::new::<micrometer>(100.0),
            ],
            max_iters: 100,
            log_diameter_tol: 1e-10,
            efficiency_tol: 1e-10,
        }
    }
}

impl CutDiameterConfig {
    fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.log_diameter_tol,
            x_rel_tol: 0.0,
            residual_tol: self.efficiency_tol,
        }
    }

    /// Search bracket in `log10(d / 1 µm)`.
    fn log_bracket(&self) -> Result<[f64; 2], TransportError> {
        let [lo, hi] = self.bracket.map(|d| {
            StrictlyPositive::new(d)
                .map(|d| d.into_inner().get::<micrometer>().log10())
                .map_err(TransportError::constraint("cut_bracket"))
        });
        Ok([lo?, hi?])
    }
}

/// A particle size and the line efficiency it sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutPoint {
    pub diameter: Length,
    pub efficiency: Efficiency,
}

/// Errors that can occur while searching for the cut diameter.
#[derive(Debug, Error)]
pub enum CutDiameterError {
    /// Evaluating the sampling line failed.
    #[error("transport evaluation failed")]
    Transport(#[from] TransportError),

    /// The bisection solver encountered an error, for example because the
    /// target efficiency is not crossed inside the bracket.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual}")]
    MaxIters {
        /// Best efficiency residual achieved.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}

/// Finds the diameter at which the elements pass the target efficiency.
///
/// # Errors
///
/// Returns [`CutDiameterError`] if the bracket is invalid, an element fails to
/// evaluate, the target is not crossed inside the bracket, or the solver does
/// not converge.
#[instrument(level = "debug", skip_all, fields(elements = elements.len()))]
pub fn cut_diameter(
    system: &SystemParameters,
    elements: &[Element],
    config: &CutDiameterConfig,
) -> Result<CutPoint, CutDiameterError> {
    let bracket = config.log_bracket()?;
    let model = LineModel { system, elements };
    let problem = CutProblem {
        target: config.target.get::<ratio>(),
    };

    let solution = bisection::solve(
        &model,
        &problem,
        bracket,
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // A size the line cannot evaluate is treated as fully lost.
            if event.result().is_err() {
                return Some(bisection::Action::assume_negative());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(CutDiameterError::MaxIters {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    let cut = solution.snapshot.output;
    debug!(
        diameter_um = cut.diameter.get::<micrometer>(),
        iters = solution.iters,
        "found cut diameter"
    );
    Ok(cut)
}

/// Evaluates one particle size through a sequence of elements.
struct LineModel<'a> {
    system: &'a SystemParameters,
    elements: &'a [Element],
}

impl Model for LineModel<'_> {
    type Input = Length;
    type Output = CutPoint;
    type Error = TransportError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let mut table = ParticleTable::discrete(&[*input])?.with_particle_parameters(self.system)?;
        for (i, element) in self.elements.iter().enumerate() {
            table.apply(self.system, i + 1, element)?;
        }
        let efficiency = table
            .records()
            .first()
            .map_or_else(Efficiency::one, |record| record.final_efficiency());
        Ok(CutPoint {
            diameter: *input,
            efficiency,
        })
    }
}

/// Residual `efficiency − target` as a function of `log10(d / 1 µm)`.
struct CutProblem {
    target: f64,
}

impl EquationProblem<1> for CutProblem {
    type Input = Length;
    type Output = CutPoint;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(Length::new::<micrometer>(10_f64.powf(x[0])))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.efficiency.get::<ratio>() - self.target])
    }
}
