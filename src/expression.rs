use std::fmt::{Debug, Formatter};
use std::iter::FromIterator;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use fnv::FnvHashMap as HashMap;

use crate::quadratic_expression::QuadraticExpression;
use crate::solution::Solution;
use crate::variable::{FormatWithVars, Variable};

/// A linear expression without a constant component, such as `2x - y`.
///
/// Terms whose coefficient is zero are never stored.
#[derive(Clone, PartialEq, Default)]
pub struct LinearExpression {
    pub(crate) coefficients: HashMap<Variable, f64>,
}

impl LinearExpression {
    /// Create an empty linear expression
    pub fn new() -> Self {
        LinearExpression {
            coefficients: HashMap::default(),
        }
    }

    /// Create an empty linear expression that can hold `capacity` terms without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        LinearExpression {
            coefficients: HashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Add `coefficient * var` to the expression
    ///
    /// ```
    /// # use binlin::{LinearExpression, Model};
    /// let mut model = Model::new("m");
    /// let x = model.continuous_var("x", 0, 10)?;
    /// let mut expr = LinearExpression::new();
    /// expr.add_term(x, 2.);
    /// expr.add_term(x, -2.);
    /// assert!(expr.is_empty());
    /// # Ok::<_, binlin::ModelError>(())
    /// ```
    pub fn add_term(&mut self, var: Variable, coefficient: f64) {
        let entry = self.coefficients.entry(var).or_default();
        *entry += coefficient;
        if *entry == 0. {
            self.coefficients.remove(&var);
        }
    }

    /// The coefficient of a variable, `0` if it does not appear
    pub fn coefficient(&self, var: Variable) -> f64 {
        self.coefficients.get(&var).copied().unwrap_or(0.)
    }

    /// Iterate over the terms, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.coefficients.iter().map(|(&var, &coeff)| (var, coeff))
    }

    /// The terms ordered by variable declaration order
    pub fn sorted_terms(&self) -> Vec<(Variable, f64)> {
        let mut terms: Vec<_> = self.iter().collect();
        terms.sort_unstable_by_key(|&(var, _)| var);
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

    /// Add every term of `other` to this expression
    pub fn merge(&mut self, other: &LinearExpression) {
        for (var, coeff) in other.iter() {
            self.add_term(var, coeff);
        }
    }

    /// Evaluate the expression given variable values
    pub fn eval_with<S: Solution + ?Sized>(&self, values: &S) -> f64 {
        self.iter()
            .map(|(var, coeff)| coeff * values.value(var))
            .sum()
    }
}

impl FromIterator<(Variable, f64)> for LinearExpression {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpression::new();
        for (var, coeff) in iter {
            expr.add_term(var, coeff);
        }
        expr
    }
}

impl From<Variable> for LinearExpression {
    fn from(var: Variable) -> Self {
        std::iter::once((var, 1.)).collect()
    }
}

/// Equal to 1 within a relative tolerance of 1e-9
fn is_unit(magnitude: f64) -> bool {
    (magnitude - 1.).abs() <= 1e-9 * magnitude.max(1.)
}

/// Writes `a + b - 2c` style sums, one term at a time
struct TermWriter {
    first: bool,
}

impl TermWriter {
    fn new() -> Self {
        TermWriter { first: true }
    }

    /// Write one term. The sign of `coeff` becomes the separator, and unit coefficients are elided.
    fn term<FUN>(
        &mut self,
        f: &mut Formatter<'_>,
        coeff: f64,
        write_term: FUN,
    ) -> std::fmt::Result
    where
        FUN: FnOnce(&mut Formatter<'_>) -> std::fmt::Result,
    {
        if self.first {
            if coeff < 0. {
                write!(f, "-")?;
            }
        } else {
            write!(f, " {} ", if coeff < 0. { "-" } else { "+" })?;
        }
        self.first = false;
        let magnitude = coeff.abs();
        if !is_unit(magnitude) {
            write!(f, "{}", magnitude)?;
        }
        write_term(f)
    }

    /// Write a bare number, such as a constant
    fn constant(&mut self, f: &mut Formatter<'_>, value: f64) -> std::fmt::Result {
        if self.first {
            write!(f, "{}", value)?;
        } else {
            write!(f, " {} {}", if value < 0. { "-" } else { "+" }, value.abs())?;
        }
        self.first = false;
        Ok(())
    }

    /// Write `0` when nothing was written
    fn finish(self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

/// Write `constant + quadratic + linear`, skipping the parts that are absent or null
pub(crate) fn format_terms<FUN>(
    f: &mut Formatter<'_>,
    constant: f64,
    quadratic: Option<&QuadraticExpression>,
    linear: Option<&LinearExpression>,
    mut variable_format: FUN,
) -> std::fmt::Result
where
    FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
{
    let mut writer = TermWriter::new();
    if constant.abs() > 1e-10 {
        writer.constant(f, constant)?;
    }
    for (pair, coeff) in quadratic.map(QuadraticExpression::sorted_terms).unwrap_or_default() {
        writer.term(f, coeff, |f| {
            variable_format(f, pair.var1)?;
            if pair.is_square() {
                write!(f, "^2")
            } else {
                write!(f, " * ")?;
                variable_format(f, pair.var2)
            }
        })?;
    }
    for (var, coeff) in linear.map(LinearExpression::sorted_terms).unwrap_or_default() {
        writer.term(f, coeff, |f| variable_format(f, var))?;
    }
    writer.finish(f)
}

impl FormatWithVars for LinearExpression {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        format_terms(f, 0., None, Some(self), variable_format)
    }
}

impl Debug for LinearExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_debug(f)
    }
}

macro_rules! impl_mul_for_num {
    ($($num:ty),*) => {$(
        impl Mul<$num> for Variable {
            type Output = LinearExpression;

            fn mul(self, rhs: $num) -> Self::Output {
                std::iter::once((self, f64::from(rhs))).collect()
            }
        }

        impl Mul<Variable> for $num {
            type Output = LinearExpression;

            fn mul(self, rhs: Variable) -> Self::Output {
                rhs * self
            }
        }
    )*};
}

impl_mul_for_num!(f64, i32);

impl Neg for Variable {
    type Output = LinearExpression;

    fn neg(self) -> Self::Output {
        self * -1.
    }
}

impl<RHS: Into<LinearExpression>> AddAssign<RHS> for LinearExpression {
    fn add_assign(&mut self, rhs: RHS) {
        let rhs = rhs.into();
        self.merge(&rhs);
    }
}

impl<RHS: Into<LinearExpression>> Add<RHS> for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, rhs: RHS) -> Self::Output {
        self += rhs;
        self
    }
}

impl<RHS: Into<LinearExpression>> Add<RHS> for Variable {
    type Output = LinearExpression;

    fn add(self, rhs: RHS) -> Self::Output {
        LinearExpression::from(self) + rhs
    }
}

impl Neg for LinearExpression {
    type Output = LinearExpression;

    fn neg(mut self) -> Self::Output {
        for coeff in self.coefficients.values_mut() {
            *coeff = -*coeff;
        }
        self
    }
}

impl<RHS: Into<LinearExpression>> Sub<RHS> for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: RHS) -> Self::Output {
        self + -rhs.into()
    }
}

impl<RHS: Into<LinearExpression>> Sub<RHS> for Variable {
    type Output = LinearExpression;

    fn sub(self, rhs: RHS) -> Self::Output {
        LinearExpression::from(self) - rhs
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn expression_manipulation() {
        let (a, b) = (Variable::at(0), Variable::at(1));
        let expr = a * 3 + b * 2. + a * -3;
        assert_eq!(expr, 2. * b);
        assert_eq!(expr.len(), 1);
    }

    #[test]
    fn negation_and_subtraction() {
        let (a, b) = (Variable::at(0), Variable::at(1));
        assert_eq!(-a, a * -1);
        assert_eq!(-(a * 2 + b), a * -2 + b * -1);
        assert_eq!(a - b - a, -b);
        assert!((a - a).is_empty());
    }

    #[test]
    fn debug_format_is_ordered() {
        let (a, b) = (Variable::at(0), Variable::at(1));
        assert_eq!(format!("{:?}", b * -1 + a * 2.5), "2.5v0 - v1");
        assert_eq!(format!("{:?}", LinearExpression::new()), "0");
    }

    #[test]
    fn nearly_unit_coefficients_are_elided() {
        let (a, b) = (Variable::at(0), Variable::at(1));
        let expr = a * (1. + 1e-12) + b * -(1. - 1e-12);
        assert_eq!(format!("{:?}", expr), "v0 - v1");
        assert_eq!(format!("{:?}", a * 1.001), "1.001v0");
    }

    #[allow(clippy::float_cmp)]
    #[test]
    fn eval() {
        let (a, b) = (Variable::at(0), Variable::at(1));
        let values: HashMap<_, _> = vec![(a, 100), (b, -1)].into_iter().collect();
        assert_eq!((a + 3 * b).eval_with(&values), 97.);
    }
}
