use std::fmt::{Display, Formatter};

use crate::expression::{format_terms, LinearExpression};
use crate::quadratic_expression::QuadraticExpression;
use crate::solution::Solution;
use crate::variable::{FormatWithVars, Variable};

/// Whether to search for the variable values that give the highest
/// or the lowest value of the objective function.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum ObjectiveSense {
    /// Search for the lowest value
    Minimize,
    /// Search for the highest value
    Maximize,
}

impl Display for ObjectiveSense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectiveSense::Minimize => "Minimize",
            ObjectiveSense::Maximize => "Maximize",
        })
    }
}

/// `sense constant + linear + quadratic`
#[derive(Clone, PartialEq, Debug)]
pub struct Objective {
    pub(crate) sense: ObjectiveSense,
    pub(crate) constant: f64,
    pub(crate) linear: LinearExpression,
    pub(crate) quadratic: QuadraticExpression,
}

impl Objective {
    /// Create an objective
    pub fn new(
        sense: ObjectiveSense,
        constant: f64,
        linear: LinearExpression,
        quadratic: QuadraticExpression,
    ) -> Self {
        Objective {
            sense,
            constant,
            linear,
            quadratic,
        }
    }

    /// Minimize or maximize
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// The constant term
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// The linear part
    pub fn linear(&self) -> &LinearExpression {
        &self.linear
    }

    /// The quadratic part
    pub fn quadratic(&self) -> &QuadraticExpression {
        &self.quadratic
    }

    /// The objective value for the given variable values
    pub fn eval_with<S: Solution + ?Sized>(&self, values: &S) -> f64 {
        self.constant + self.linear.eval_with(values) + self.quadratic.eval_with(values)
    }
}

/// `minimize 0`
impl Default for Objective {
    fn default() -> Self {
        Objective::new(
            ObjectiveSense::Minimize,
            0.,
            LinearExpression::new(),
            QuadraticExpression::new(),
        )
    }
}

impl FormatWithVars for Objective {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        format_terms(
            f,
            self.constant,
            Some(&self.quadratic),
            Some(&self.linear),
            variable_format,
        )
    }
}
