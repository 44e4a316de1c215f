//! Replace every product of two binary variables by a continuous variable
//! constrained to equal that product (McCormick linearization).
//!
//! For binary `x` and `y`, the term `x * y` becomes `_and_x_y`, with
//!
//! ```text
//! _and_x_y - x <= 0
//! _and_x_y - y <= 0
//! _and_x_y - x - y >= -1
//! 0 <= _and_x_y <= 1
//! ```
use fnv::FnvHashMap as HashMap;
use tracing::{debug, trace};

use crate::constraint::ConstraintSense;
use crate::converters::ModelConverter;
use crate::error::LinearizationError;
use crate::expression::LinearExpression;
use crate::model::Model;
use crate::objective::Objective;
use crate::quadratic_expression::{QuadraticExpression, VariablePair};
use crate::variable::{variable, Variable, VariableKind};

/// Prefix of the names of the variables that stand in for binary products
pub const DEFAULT_PREFIX: &str = "_and";

/// What to do with a quadratic term that has a non-binary factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonBinaryPolicy {
    /// Leave the term out of the linearized model
    Drop,
    /// Fail with [LinearizationError::NonBinaryQuadraticTerm]
    Reject,
}

impl Default for NonBinaryPolicy {
    fn default() -> Self {
        NonBinaryPolicy::Drop
    }
}

/// Converts a model whose quadratic terms are products of binary variables
/// into a model with only linear constraints and a linear objective.
///
/// ```
/// use binlin::converters::{ModelConverter, QuadraticToLinear};
/// use binlin::Model;
///
/// let mut model = Model::new("and");
/// let x = model.binary_var("x")?;
/// let y = model.binary_var("y")?;
/// model.minimize(0., x, 2. * (x * y))?;
///
/// let mut converter = QuadraticToLinear::new();
/// let linear = converter.convert(&model)?;
/// let and = linear.variable("_and_x_y").unwrap();
/// assert_eq!(linear.objective().linear().coefficient(and), 2.);
/// assert_eq!(linear.linear_constraints().len(), 3);
///
/// let original = converter.interpret(&[1., 1., 1.])?;
/// assert_eq!(original, vec![1., 1.]);
/// # Ok::<_, binlin::LinearizationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuadraticToLinear {
    prefix: String,
    non_binary: NonBinaryPolicy,
    last: Option<Converted>,
}

/// What `interpret` needs from the last successful conversion
#[derive(Debug, Clone)]
struct Converted {
    source: Model,
    target_len: usize,
    /// Position in the linearized model of each variable of the source, in source order
    positions: Vec<usize>,
}

impl QuadraticToLinear {
    /// A converter that names surrogates `_and_<x>_<y>` and drops non-binary quadratic terms
    pub fn new() -> Self {
        QuadraticToLinear {
            prefix: DEFAULT_PREFIX.to_string(),
            non_binary: NonBinaryPolicy::default(),
            last: None,
        }
    }

    /// Set the prefix of the surrogate variable names
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Choose how quadratic terms with a non-binary factor are handled
    pub fn with_non_binary_policy(mut self, policy: NonBinaryPolicy) -> Self {
        self.non_binary = policy;
        self
    }

    /// The model given to the last successful call to `convert`
    pub fn source(&self) -> Option<&Model> {
        self.last.as_ref().map(|converted| &converted.source)
    }
}

impl Default for QuadraticToLinear {
    fn default() -> Self {
        QuadraticToLinear::new()
    }
}

impl ModelConverter for QuadraticToLinear {
    type Error = LinearizationError;

    fn convert(&mut self, model: &Model) -> Result<Model, LinearizationError> {
        let source = model.clone();
        debug!(
            model = source.name(),
            variables = source.num_vars(),
            linear_constraints = source.linear_constraints().len(),
            quadratic_constraints = source.quadratic_constraints().len(),
            "linearizing binary products"
        );

        let mut conversion = Conversion::new(&source, &self.prefix, self.non_binary);
        conversion.project_variables()?;
        conversion.discover(source.objective().quadratic())?;
        for constraint in source.quadratic_constraints() {
            conversion.discover(constraint.quadratic())?;
        }
        conversion.emit_envelopes()?;
        conversion.copy_linear_constraints()?;
        conversion.linearize_objective()?;
        conversion.linearize_quadratic_constraints()?;

        let (target, projection) = conversion.finish();
        debug!(
            model = target.name(),
            variables = target.num_vars(),
            surrogates = target.num_vars() - source.num_vars(),
            constraints = target.num_constraints(),
            "linearization complete"
        );
        self.last = Some(Converted {
            target_len: target.num_vars(),
            positions: projection.iter().map(Variable::index).collect(),
            source,
        });
        Ok(target)
    }

    fn interpret(&self, solution: &[f64]) -> Result<Vec<f64>, LinearizationError> {
        let converted = self.last.as_ref().ok_or(LinearizationError::NotConverted)?;
        if solution.len() != converted.target_len {
            return Err(LinearizationError::SolutionLength {
                expected: converted.target_len,
                actual: solution.len(),
            });
        }
        Ok(converted.positions.iter().map(|&i| solution[i]).collect())
    }
}

/// Convert a model with a default [QuadraticToLinear].
/// Use the converter directly to map solutions back.
pub fn linearize(model: &Model) -> Result<Model, LinearizationError> {
    QuadraticToLinear::new().convert(model)
}

/// A surrogate variable and the binary product it stands for
#[derive(Debug)]
struct Surrogate {
    pair: VariablePair,
    variable: Variable,
    name: String,
}

/// The surrogates allocated during one conversion, keyed by pairs of target variables.
/// Iteration follows allocation order.
#[derive(Debug, Default)]
struct SurrogateTable {
    surrogates: Vec<Surrogate>,
    by_pair: HashMap<VariablePair, Variable>,
}

impl SurrogateTable {
    fn get(&self, pair: VariablePair) -> Option<Variable> {
        self.by_pair.get(&pair).copied()
    }

    fn insert(&mut self, surrogate: Surrogate) {
        self.by_pair.insert(surrogate.pair, surrogate.variable);
        self.surrogates.push(surrogate);
    }

    fn iter(&self) -> impl Iterator<Item = &Surrogate> {
        self.surrogates.iter()
    }
}

/// The state of a single call to `convert`
struct Conversion<'a> {
    source: &'a Model,
    target: Model,
    /// The target variable of each source variable, in source order
    projection: Vec<Variable>,
    surrogates: SurrogateTable,
    prefix: &'a str,
    non_binary: NonBinaryPolicy,
}

impl<'a> Conversion<'a> {
    fn new(source: &'a Model, prefix: &'a str, non_binary: NonBinaryPolicy) -> Self {
        Conversion {
            source,
            target: Model::new(source.name()),
            projection: Vec::with_capacity(source.num_vars()),
            surrogates: SurrogateTable::default(),
            prefix,
            non_binary,
        }
    }

    /// Declare every source variable in the target, with the same name, kind and bounds
    fn project_variables(&mut self) -> Result<(), LinearizationError> {
        for (_, def) in self.source.variables() {
            let projected = match def.kind() {
                VariableKind::Binary => variable().binary(),
                VariableKind::Integer => variable().integer(),
                VariableKind::Continuous => variable().continuous(),
                kind => {
                    return Err(LinearizationError::UnsupportedVariableType {
                        name: def.get_name().to_string(),
                        kind,
                    })
                }
            };
            let projected = if def.is_binary() {
                projected
            } else {
                projected.clamp(def.lower_bound(), def.upper_bound())
            };
            let var = self.target.add_variable(projected.name(def.get_name()))?;
            self.projection.push(var);
        }
        Ok(())
    }

    fn project(&self, var: Variable) -> Variable {
        self.projection[var.index()]
    }

    fn project_pair(&self, pair: VariablePair) -> VariablePair {
        VariablePair::new(self.project(pair.var1), self.project(pair.var2))
    }

    fn target_name(&self, var: Variable) -> &str {
        self.target.definition(var).map_or("", |def| def.get_name())
    }

    fn is_binary(&self, var: Variable) -> bool {
        self.target
            .definition(var)
            .map_or(false, |def| def.is_binary())
    }

    /// Allocate a surrogate for every binary product of `quadratic` that does not have one yet
    fn discover(&mut self, quadratic: &QuadraticExpression) -> Result<(), LinearizationError> {
        for (pair, _) in quadratic.sorted_terms() {
            let pair = self.project_pair(pair);
            if !(self.is_binary(pair.var1) && self.is_binary(pair.var2)) {
                let (first, second) = (self.target_name(pair.var1), self.target_name(pair.var2));
                match self.non_binary {
                    NonBinaryPolicy::Drop => {
                        debug!(
                            first = first,
                            second = second,
                            "dropping quadratic term with a non-binary factor"
                        );
                        continue;
                    }
                    NonBinaryPolicy::Reject => {
                        return Err(LinearizationError::NonBinaryQuadraticTerm {
                            first: first.to_string(),
                            second: second.to_string(),
                        })
                    }
                }
            }
            if self.surrogates.get(pair).is_some() {
                continue;
            }
            let name = format!(
                "{}_{}_{}",
                self.prefix,
                self.target_name(pair.var1),
                self.target_name(pair.var2)
            );
            let variable = self.target.continuous_var(name.as_str(), 0, 1)?;
            trace!(surrogate = name.as_str(), "allocated surrogate");
            self.surrogates.insert(Surrogate {
                pair,
                variable,
                name,
            });
        }
        Ok(())
    }

    /// Add the three constraints that force each surrogate to equal its product
    fn emit_envelopes(&mut self) -> Result<(), LinearizationError> {
        let Conversion {
            target, surrogates, ..
        } = self;
        for surrogate in surrogates.iter() {
            let (s, x, y) = (surrogate.variable, surrogate.pair.var1, surrogate.pair.var2);
            let name = &surrogate.name;
            target.linear_constraint(
                s - x,
                ConstraintSense::LessOrEqual,
                0,
                &format!("{}_1", name),
            )?;
            target.linear_constraint(
                s - y,
                ConstraintSense::LessOrEqual,
                0,
                &format!("{}_2", name),
            )?;
            target.linear_constraint(
                s - x - y,
                ConstraintSense::GreaterOrEqual,
                -1,
                &format!("{}_3", name),
            )?;
        }
        Ok(())
    }

    fn copy_linear_constraints(&mut self) -> Result<(), LinearizationError> {
        for constraint in self.source.linear_constraints() {
            let linear = self.linearize(constraint.linear(), &QuadraticExpression::new());
            self.target.linear_constraint(
                linear,
                constraint.sense(),
                constraint.rhs(),
                constraint.name(),
            )?;
        }
        Ok(())
    }

    fn linearize_objective(&mut self) -> Result<(), LinearizationError> {
        let objective = self.source.objective();
        let linear = self.linearize(objective.linear(), objective.quadratic());
        self.target.set_objective(Objective::new(
            objective.sense(),
            objective.constant(),
            linear,
            QuadraticExpression::new(),
        ))?;
        Ok(())
    }

    fn linearize_quadratic_constraints(&mut self) -> Result<(), LinearizationError> {
        for constraint in self.source.quadratic_constraints() {
            let linear = self.linearize(constraint.linear(), constraint.quadratic());
            self.target.linear_constraint(
                linear,
                constraint.sense(),
                constraint.rhs(),
                constraint.name(),
            )?;
        }
        Ok(())
    }

    /// `linear + quadratic` over the target variables,
    /// each binary product replaced by its surrogate. Products without a surrogate are left out.
    fn linearize(
        &self,
        linear: &LinearExpression,
        quadratic: &QuadraticExpression,
    ) -> LinearExpression {
        let mut result = LinearExpression::with_capacity(linear.len() + quadratic.len());
        for (var, coeff) in linear.iter() {
            result.add_term(self.project(var), coeff);
        }
        for (pair, coeff) in quadratic.iter() {
            if let Some(surrogate) = self.surrogates.get(self.project_pair(pair)) {
                result.add_term(surrogate, coeff);
            }
        }
        result
    }

    fn finish(self) -> (Model, Vec<Variable>) {
        (self.target, self.projection)
    }
}
