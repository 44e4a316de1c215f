//! Linearize optimization models whose quadratic terms are products of binary variables.
//!
//! Every product `x * y` of two binary variables is replaced by a continuous variable
//! `_and_x_y` in `[0, 1]`, together with three linear constraints that force it to equal
//! the product (McCormick linearization). The result is a model with only linear
//! constraints and a linear objective, with the same feasible region and objective values.
//!
//! ```rust
//! use binlin::converters::{ModelConverter, QuadraticToLinear};
//! use binlin::{ConstraintSense, Model};
//!
//! let mut model = Model::new("pairs");
//! let a = model.binary_var("a")?;
//! let b = model.binary_var("b")?;
//! let c = model.binary_var("c")?;
//! model.maximize(0., a + b + c, -2. * (a * b) + -2. * (b * c))?;
//! model.quadratic_constraint(c, a * b, ConstraintSense::LessOrEqual, 1, "budget")?;
//!
//! let mut converter = QuadraticToLinear::new();
//! let linear = converter.convert(&model)?;
//! assert_eq!(linear.num_vars(), 5);
//! assert!(linear.quadratic_constraints().is_empty());
//! assert!(linear.objective().quadratic().is_empty());
//!
//! // a = 1, b = 0, c = 1, _and_a_b = 0, _and_b_c = 0
//! let solution = converter.interpret(&[1., 0., 1., 0., 0.])?;
//! assert_eq!(solution, vec![1., 0., 1.]);
//! # Ok::<_, binlin::LinearizationError>(())
//! ```

pub use constraint::{ConstraintSense, LinearConstraint, QuadraticConstraint};
pub use display::WithNames;
pub use error::{LinearizationError, ModelError};
pub use expression::LinearExpression;
pub use model::Model;
pub use objective::{Objective, ObjectiveSense};
pub use quadratic_expression::{QuadraticExpression, VariablePair};
pub use solution::Solution;
pub use variable::{variable, FormatWithVars, Variable, VariableDefinition, VariableKind};

pub mod constraint;
pub mod converters;
mod display;
mod error;
mod expression;
mod model;
mod objective;
mod quadratic_expression;
pub mod solution;
pub mod variable;
