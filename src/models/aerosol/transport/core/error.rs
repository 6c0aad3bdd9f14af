use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors raised while building or evaluating a sampling line.
///
/// Every failure is a deterministic function of its inputs; a failed call
/// leaves the particle table untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// A numeric input is outside its physical domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,

        /// What is wrong with it.
        reason: String,
    },

    /// The bend correlation selector is not recognized.
    #[error("unknown bend method: {0:?}")]
    UnknownMethod(String),

    /// A correlation was evaluated outside its valid range, or produced a
    /// non-physical value.
    #[error("{model} correlation out of domain: {context}")]
    ModelDomain {
        /// Correlation that failed.
        model: &'static str,

        /// Description of the offending state.
        context: String,
    },

    /// The requested aggregation is undefined for this particle table.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Elements or particle parameters were supplied out of order.
    #[error("transport order violated: {context}")]
    OrderingPrecondition {
        /// Description of the missing predecessor.
        context: String,
    },
}

impl TransportError {
    /// Creates an invalid parameter error.
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns a closure mapping a constraint violation onto a named parameter.
    pub(crate) fn constraint(name: &'static str) -> impl Fn(ConstraintError) -> Self {
        move |err| Self::invalid(name, err.to_string())
    }

    /// Creates a model domain error.
    pub(crate) fn domain(model: &'static str, context: impl Into<String>) -> Self {
        Self::ModelDomain {
            model,
            context: context.into(),
        }
    }

    /// Creates an ordering precondition error.
    pub(crate) fn ordering(context: impl Into<String>) -> Self {
        Self::OrderingPrecondition {
            context: context.into(),
        }
    }
}
