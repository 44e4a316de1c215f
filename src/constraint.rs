//! Constraints define the (in)equalities that must hold in a solution.
use std::fmt::{Display, Formatter};

use crate::expression::{format_terms, LinearExpression};
use crate::quadratic_expression::QuadraticExpression;
use crate::solution::Solution;
use crate::variable::{FormatWithVars, Variable};

/// How the left hand side of a constraint compares to its right hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSense {
    /// `lhs <= rhs`
    LessOrEqual,
    /// `lhs == rhs`
    Equal,
    /// `lhs >= rhs`
    GreaterOrEqual,
}

impl ConstraintSense {
    /// The comparison operator
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintSense::LessOrEqual => "<=",
            ConstraintSense::Equal => "==",
            ConstraintSense::GreaterOrEqual => ">=",
        }
    }

    /// Whether `lhs <sense> rhs` holds, up to `tolerance`
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ConstraintSense::LessOrEqual => lhs <= rhs + tolerance,
            ConstraintSense::Equal => (lhs - rhs).abs() <= tolerance,
            ConstraintSense::GreaterOrEqual => lhs >= rhs - tolerance,
        }
    }
}

impl Display for ConstraintSense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A named constraint `linear <sense> rhs`
#[derive(Clone, PartialEq, Debug)]
pub struct LinearConstraint {
    pub(crate) name: String,
    pub(crate) linear: LinearExpression,
    pub(crate) sense: ConstraintSense,
    pub(crate) rhs: f64,
}

impl LinearConstraint {
    /// The name of the constraint, unique within its model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The left hand side
    pub fn linear(&self) -> &LinearExpression {
        &self.linear
    }

    /// The comparison
    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    /// The right hand side constant
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Value of the left hand side for the given variable values
    pub fn eval_with<S: Solution + ?Sized>(&self, values: &S) -> f64 {
        self.linear.eval_with(values)
    }

    /// Whether the constraint holds for the given variable values
    pub fn is_satisfied_by<S: Solution + ?Sized>(&self, values: &S, tolerance: f64) -> bool {
        self.sense.holds(self.eval_with(values), self.rhs, tolerance)
    }
}

impl FormatWithVars for LinearConstraint {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        self.linear.format_with(f, variable_format)?;
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

/// A named constraint `quadratic + linear <sense> rhs`
#[derive(Clone, PartialEq, Debug)]
pub struct QuadraticConstraint {
    pub(crate) name: String,
    pub(crate) linear: LinearExpression,
    pub(crate) quadratic: QuadraticExpression,
    pub(crate) sense: ConstraintSense,
    pub(crate) rhs: f64,
}

impl QuadraticConstraint {
    /// The name of the constraint, unique within its model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The linear part of the left hand side
    pub fn linear(&self) -> &LinearExpression {
        &self.linear
    }

    /// The quadratic part of the left hand side
    pub fn quadratic(&self) -> &QuadraticExpression {
        &self.quadratic
    }

    /// The comparison
    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    /// The right hand side constant
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Value of the left hand side for the given variable values
    pub fn eval_with<S: Solution + ?Sized>(&self, values: &S) -> f64 {
        self.quadratic.eval_with(values) + self.linear.eval_with(values)
    }

    /// Whether the constraint holds for the given variable values
    pub fn is_satisfied_by<S: Solution + ?Sized>(&self, values: &S, tolerance: f64) -> bool {
        self.sense.holds(self.eval_with(values), self.rhs, tolerance)
    }
}

impl FormatWithVars for QuadraticConstraint {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        format_terms(
            f,
            0.,
            Some(&self.quadratic),
            Some(&self.linear),
            variable_format,
        )?;
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sense_tolerance() {
        assert!(ConstraintSense::LessOrEqual.holds(1.0 + 1e-9, 1., 1e-6));
        assert!(!ConstraintSense::GreaterOrEqual.holds(0.5, 1., 1e-6));
        assert!(ConstraintSense::Equal.holds(-1., -1., 0.));
    }

    #[test]
    fn evaluate_linear_constraint() {
        let (x, y) = (Variable::at(0), Variable::at(1));
        let constraint = LinearConstraint {
            name: "c0".to_string(),
            linear: x + y * -1,
            sense: ConstraintSense::LessOrEqual,
            rhs: 0.,
        };
        assert!(constraint.is_satisfied_by(&vec![0., 1.], 0.));
        assert!(!constraint.is_satisfied_by(&vec![1., 0.], 0.));
    }
}
