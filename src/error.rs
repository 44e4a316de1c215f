//! Errors raised while building a model or converting it.
use thiserror::Error;

use crate::variable::VariableKind;

/// A mutation that would break an invariant of a [Model](crate::Model)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Variable names are unique within a model.
    #[error("variable name {0:?} is already used")]
    DuplicateVariable(String),

    /// Constraint names are unique within a model, across linear and quadratic constraints.
    #[error("constraint name {0:?} is already used")]
    DuplicateConstraint(String),

    /// An expression refers to a variable that was not declared in this model.
    #[error("variable v{index} does not belong to model {model:?}, which has {len} variables")]
    ForeignVariable {
        /// Index of the offending variable
        index: usize,
        /// Name of the model
        model: String,
        /// Number of variables in the model
        len: usize,
    },

    /// The lower bound of a variable exceeds its upper bound.
    #[error("variable {name:?} has a lower bound {lower} above its upper bound {upper}")]
    InvalidBounds {
        /// The variable name
        name: String,
        /// The lower bound
        lower: f64,
        /// The upper bound
        upper: f64,
    },
}

/// Errors raised by [QuadraticToLinear](crate::converters::QuadraticToLinear)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinearizationError {
    /// Only binary, integer and continuous variables can be copied to the linearized model.
    #[error("unsupported variable type {kind} for variable {name:?}")]
    UnsupportedVariableType {
        /// The variable name
        name: String,
        /// Its kind
        kind: VariableKind,
    },

    /// A quadratic term has a non-binary factor, under [NonBinaryPolicy::Reject](crate::converters::NonBinaryPolicy::Reject).
    #[error("quadratic term {first:?} * {second:?} has a non-binary factor")]
    NonBinaryQuadraticTerm {
        /// Name of the first factor
        first: String,
        /// Name of the second factor
        second: String,
    },

    /// `interpret` needs the variables of a model converted before.
    #[error("no model has been converted yet")]
    NotConverted,

    /// The solution does not have one value per variable of the linearized model.
    #[error("expected {expected} values, one per variable of the linearized model, got {actual}")]
    SolutionLength {
        /// Number of variables of the linearized model
        expected: usize,
        /// Length of the given solution
        actual: usize,
    },

    /// The linearized model could not be built.
    #[error(transparent)]
    Model(#[from] ModelError),
}
