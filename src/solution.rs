//! Values assigned to the variables of a model.
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::variable::Variable;

/// A problem solution
pub trait Solution {
    /// Get the value of a variable of the problem
    fn value(&self, variable: Variable) -> f64;
}

impl<N: Into<f64> + Clone, H: BuildHasher> Solution for HashMap<Variable, N, H> {
    fn value(&self, variable: Variable) -> f64 {
        self[&variable].clone().into()
    }
}

/// A slice holds one value per variable, in declaration order
impl Solution for [f64] {
    fn value(&self, variable: Variable) -> f64 {
        self[variable.index()]
    }
}

impl Solution for Vec<f64> {
    fn value(&self, variable: Variable) -> f64 {
        self.as_slice().value(variable)
    }
}
