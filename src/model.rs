//! A [Model] holds the variables, the objective and the constraints of an optimization problem.
use fnv::{FnvHashMap as HashMap, FnvHashSet as HashSet};

use crate::constraint::{ConstraintSense, LinearConstraint, QuadraticConstraint};
use crate::error::ModelError;
use crate::expression::LinearExpression;
use crate::objective::{Objective, ObjectiveSense};
use crate::quadratic_expression::QuadraticExpression;
use crate::variable::{variable, Variable, VariableDefinition};

/// An optimization problem with a linear or quadratic objective,
/// linear constraints and quadratic constraints.
///
/// Variables, constraints and their names are validated on insertion.
/// `clone()` makes a deep copy that shares nothing with the original.
///
/// ```
/// use binlin::{ConstraintSense, Model};
///
/// let mut model = Model::new("knapsack");
/// let x = model.binary_var("x")?;
/// let y = model.binary_var("y")?;
/// model.maximize(0., x * 3 + y * 2, 2. * (x * y))?;
/// model.linear_constraint(x + y, ConstraintSense::LessOrEqual, 1, "capacity")?;
/// assert_eq!(model.num_vars(), 2);
/// assert_eq!(model.linear_constraints().len(), 1);
/// # Ok::<_, binlin::ModelError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Model {
    name: String,
    variables: Vec<VariableDefinition>,
    variable_names: HashMap<String, Variable>,
    objective: Objective,
    linear_constraints: Vec<LinearConstraint>,
    quadratic_constraints: Vec<QuadraticConstraint>,
    constraint_names: HashSet<String>,
}

impl Model {
    /// Create an empty model that minimizes 0
    pub fn new<S: Into<String>>(name: S) -> Self {
        Model {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The name of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a variable with the given definition.
    /// A variable defined without a name is named after its position: `x0`, `x1`, ...
    pub fn add_variable(&mut self, definition: VariableDefinition) -> Result<Variable, ModelError> {
        let mut definition = definition;
        let index = self.variables.len();
        if definition.name.is_empty() {
            definition.name = format!("x{}", index);
        }
        if self.variable_names.contains_key(&definition.name) {
            return Err(ModelError::DuplicateVariable(definition.name));
        }
        if definition.lower_bound() > definition.upper_bound() {
            return Err(ModelError::InvalidBounds {
                name: definition.name,
                lower: definition.min,
                upper: definition.max,
            });
        }
        let var = Variable::at(index);
        self.variable_names.insert(definition.name.clone(), var);
        self.variables.push(definition);
        Ok(var)
    }

    /// Add a binary variable
    pub fn binary_var<S: Into<String>>(&mut self, name: S) -> Result<Variable, ModelError> {
        self.add_variable(variable().name(name).binary())
    }

    /// Add an integer variable with the given bounds
    pub fn integer_var<S: Into<String>, L: Into<f64>, U: Into<f64>>(
        &mut self,
        name: S,
        lower_bound: L,
        upper_bound: U,
    ) -> Result<Variable, ModelError> {
        self.add_variable(
            variable()
                .name(name)
                .integer()
                .clamp(lower_bound, upper_bound),
        )
    }

    /// Add a continuous variable with the given bounds
    pub fn continuous_var<S: Into<String>, L: Into<f64>, U: Into<f64>>(
        &mut self,
        name: S,
        lower_bound: L,
        upper_bound: U,
    ) -> Result<Variable, ModelError> {
        self.add_variable(
            variable()
                .name(name)
                .continuous()
                .clamp(lower_bound, upper_bound),
        )
    }

    /// Find a variable by name
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.variable_names.get(name).copied()
    }

    /// The definition of a variable of this model
    pub fn definition(&self, var: Variable) -> Option<&VariableDefinition> {
        self.variables.get(var.index())
    }

    /// Iterates over the couples of variables with their definitions, in declaration order
    pub fn variables(&self) -> impl Iterator<Item = (Variable, &VariableDefinition)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, def)| (Variable::at(i), def))
    }

    /// The number of variables
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// The objective function
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Replace the objective function
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        self.check_linear(&objective.linear)?;
        self.check_quadratic(&objective.quadratic)?;
        self.objective = objective;
        Ok(())
    }

    /// Minimize `constant + linear + quadratic`
    pub fn minimize<L, Q>(
        &mut self,
        constant: f64,
        linear: L,
        quadratic: Q,
    ) -> Result<(), ModelError>
    where
        L: Into<LinearExpression>,
        Q: Into<QuadraticExpression>,
    {
        self.set_objective(Objective::new(
            ObjectiveSense::Minimize,
            constant,
            linear.into(),
            quadratic.into(),
        ))
    }

    /// Maximize `constant + linear + quadratic`
    pub fn maximize<L, Q>(
        &mut self,
        constant: f64,
        linear: L,
        quadratic: Q,
    ) -> Result<(), ModelError>
    where
        L: Into<LinearExpression>,
        Q: Into<QuadraticExpression>,
    {
        self.set_objective(Objective::new(
            ObjectiveSense::Maximize,
            constant,
            linear.into(),
            quadratic.into(),
        ))
    }

    /// Add the constraint `linear <sense> rhs`.
    /// An empty name is replaced by `c<N>`, N being the number of linear constraints so far.
    pub fn linear_constraint<L: Into<LinearExpression>, R: Into<f64>>(
        &mut self,
        linear: L,
        sense: ConstraintSense,
        rhs: R,
        name: &str,
    ) -> Result<(), ModelError> {
        let linear = linear.into();
        self.check_linear(&linear)?;
        let name = self.claim_constraint_name(name, "c", self.linear_constraints.len())?;
        self.linear_constraints.push(LinearConstraint {
            name,
            linear,
            sense,
            rhs: rhs.into(),
        });
        Ok(())
    }

    /// Add the constraint `quadratic + linear <sense> rhs`.
    /// An empty name is replaced by `q<N>`, N being the number of quadratic constraints so far.
    pub fn quadratic_constraint<L, Q, R>(
        &mut self,
        linear: L,
        quadratic: Q,
        sense: ConstraintSense,
        rhs: R,
        name: &str,
    ) -> Result<(), ModelError>
    where
        L: Into<LinearExpression>,
        Q: Into<QuadraticExpression>,
        R: Into<f64>,
    {
        let linear = linear.into();
        let quadratic = quadratic.into();
        self.check_linear(&linear)?;
        self.check_quadratic(&quadratic)?;
        let name = self.claim_constraint_name(name, "q", self.quadratic_constraints.len())?;
        self.quadratic_constraints.push(QuadraticConstraint {
            name,
            linear,
            quadratic,
            sense,
            rhs: rhs.into(),
        });
        Ok(())
    }

    /// The linear constraints, in insertion order
    pub fn linear_constraints(&self) -> &[LinearConstraint] {
        &self.linear_constraints
    }

    /// The quadratic constraints, in insertion order
    pub fn quadratic_constraints(&self) -> &[QuadraticConstraint] {
        &self.quadratic_constraints
    }

    /// Find a linear constraint by name
    pub fn linear_constraint_by_name(&self, name: &str) -> Option<&LinearConstraint> {
        self.linear_constraints.iter().find(|c| c.name == name)
    }

    /// Find a quadratic constraint by name
    pub fn quadratic_constraint_by_name(&self, name: &str) -> Option<&QuadraticConstraint> {
        self.quadratic_constraints.iter().find(|c| c.name == name)
    }

    /// The total number of constraints, linear and quadratic
    pub fn num_constraints(&self) -> usize {
        self.linear_constraints.len() + self.quadratic_constraints.len()
    }

    fn claim_constraint_name(
        &mut self,
        name: &str,
        prefix: &str,
        position: usize,
    ) -> Result<String, ModelError> {
        let name = if name.is_empty() {
            format!("{}{}", prefix, position)
        } else {
            name.to_string()
        };
        if !self.constraint_names.insert(name.clone()) {
            return Err(ModelError::DuplicateConstraint(name));
        }
        Ok(name)
    }

    fn check_variable(&self, var: Variable) -> Result<(), ModelError> {
        if var.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::ForeignVariable {
                index: var.index(),
                model: self.name.clone(),
                len: self.variables.len(),
            })
        }
    }

    fn check_linear(&self, linear: &LinearExpression) -> Result<(), ModelError> {
        linear.iter().try_for_each(|(var, _)| self.check_variable(var))
    }

    fn check_quadratic(&self, quadratic: &QuadraticExpression) -> Result<(), ModelError> {
        quadratic.iter().try_for_each(|(pair, _)| {
            self.check_variable(pair.var1)?;
            self.check_variable(pair.var2)
        })
    }
}
