//! Converters rewrite a [Model] into an equivalent model of a simpler class,
//! and map the solutions of the rewritten model back to the original one.
use crate::model::Model;

pub mod quadratic_to_linear;

pub use quadratic_to_linear::{linearize, NonBinaryPolicy, QuadraticToLinear, DEFAULT_PREFIX};

/// A transformation between two equivalent models
pub trait ModelConverter {
    /// The error that can occur while converting
    type Error;

    /// Build the converted model. The input model is left untouched.
    fn convert(&mut self, model: &Model) -> Result<Model, Self::Error>;

    /// Map a solution of the last converted model, one value per variable in declaration order,
    /// to a solution of the model it was converted from.
    fn interpret(&self, solution: &[f64]) -> Result<Vec<f64>, Self::Error>;
}
