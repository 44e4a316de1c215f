use std::fmt::{Debug, Formatter};
use std::iter::FromIterator;
use std::ops::{Add, AddAssign, Mul};

use fnv::FnvHashMap as HashMap;

use crate::expression::format_terms;
use crate::solution::Solution;
use crate::variable::{FormatWithVars, Variable};

/// Represents an unordered pair of variables in a quadratic term
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct VariablePair {
    /// The variable declared first
    pub var1: Variable,
    /// The variable declared last. Equal to `var1` for a squared term.
    pub var2: Variable,
}

impl VariablePair {
    /// Create a new variable pair, ensuring consistent ordering for commutativity (x*y = y*x)
    pub fn new(var1: Variable, var2: Variable) -> Self {
        if var1.index() <= var2.index() {
            VariablePair { var1, var2 }
        } else {
            VariablePair {
                var1: var2,
                var2: var1,
            }
        }
    }

    /// Whether this pair represents `v * v`
    pub fn is_square(&self) -> bool {
        self.var1 == self.var2
    }
}

/// A quadratic expression without linear or constant components, such as `2xy + z²`.
///
/// Terms whose coefficient is zero are never stored.
#[derive(Clone, PartialEq, Default)]
pub struct QuadraticExpression {
    pub(crate) coefficients: HashMap<VariablePair, f64>,
}

impl QuadraticExpression {
    /// Create a new empty quadratic expression
    pub fn new() -> Self {
        QuadraticExpression {
            coefficients: HashMap::default(),
        }
    }

    /// Add `coefficient * var1 * var2` to this expression
    pub fn add_quadratic_term(&mut self, var1: Variable, var2: Variable, coefficient: f64) {
        let pair = VariablePair::new(var1, var2);
        let entry = self.coefficients.entry(pair).or_default();
        *entry += coefficient;
        if *entry == 0. {
            self.coefficients.remove(&pair);
        }
    }

    /// The coefficient of `var1 * var2`, in either order. `0` if the term does not appear.
    pub fn coefficient(&self, var1: Variable, var2: Variable) -> f64 {
        self.coefficients
            .get(&VariablePair::new(var1, var2))
            .copied()
            .unwrap_or(0.)
    }

    /// Iterate over the terms, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (VariablePair, f64)> + '_ {
        self.coefficients.iter().map(|(&pair, &coeff)| (pair, coeff))
    }

    /// The terms ordered by pair, first by the first variable then by the second
    pub fn sorted_terms(&self) -> Vec<(VariablePair, f64)> {
        let mut terms: Vec<_> = self.iter().collect();
        terms.sort_unstable_by_key(|&(pair, _)| pair);
        terms
    }

    /// The number of nonzero terms
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns true when the expression has no terms
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Evaluate the quadratic expression given variable values
    pub fn eval_with<S: Solution + ?Sized>(&self, values: &S) -> f64 {
        self.iter()
            .map(|(pair, coeff)| coeff * values.value(pair.var1) * values.value(pair.var2))
            .sum()
    }
}

impl FromIterator<(Variable, Variable, f64)> for QuadraticExpression {
    fn from_iter<I: IntoIterator<Item = (Variable, Variable, f64)>>(iter: I) -> Self {
        let mut expr = QuadraticExpression::new();
        for (var1, var2, coeff) in iter {
            expr.add_quadratic_term(var1, var2, coeff);
        }
        expr
    }
}

impl FormatWithVars for QuadraticExpression {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        format_terms(f, 0., Some(self), None, variable_format)
    }
}

impl Debug for QuadraticExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_debug(f)
    }
}

impl Mul<Variable> for Variable {
    type Output = QuadraticExpression;

    fn mul(self, rhs: Variable) -> Self::Output {
        std::iter::once((self, rhs, 1.)).collect()
    }
}

impl Mul<f64> for QuadraticExpression {
    type Output = QuadraticExpression;

    fn mul(mut self, rhs: f64) -> Self::Output {
        if rhs == 0. {
            return QuadraticExpression::new();
        }
        for coeff in self.coefficients.values_mut() {
            *coeff *= rhs;
        }
        self
    }
}

impl Mul<QuadraticExpression> for f64 {
    type Output = QuadraticExpression;

    fn mul(self, rhs: QuadraticExpression) -> Self::Output {
        rhs * self
    }
}

impl AddAssign<QuadraticExpression> for QuadraticExpression {
    fn add_assign(&mut self, rhs: QuadraticExpression) {
        for (pair, coeff) in rhs.coefficients {
            self.add_quadratic_term(pair.var1, pair.var2, coeff);
        }
    }
}

impl Add<QuadraticExpression> for QuadraticExpression {
    type Output = QuadraticExpression;

    fn add(mut self, rhs: QuadraticExpression) -> Self::Output {
        self += rhs;
        self
    }
}
