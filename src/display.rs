//! Human-readable rendering of a [Model].
use std::fmt::{Display, Formatter};

use crate::model::Model;
use crate::variable::{FormatWithVars, Variable, VariableKind};

/// Displays an element with the variable names of a model
pub struct WithNames<'a, T> {
    element: &'a T,
    model: &'a Model,
}

impl<'a, T: FormatWithVars> WithNames<'a, T> {
    /// Pair an element with the model its variables come from
    pub fn new(element: &'a T, model: &'a Model) -> Self {
        WithNames { element, model }
    }
}

impl<T: FormatWithVars> Display for WithNames<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let model = self.model;
        self.element
            .format_with(f, |f, var| write_variable_name(f, model, var))
    }
}

fn write_variable_name(f: &mut Formatter<'_>, model: &Model, var: Variable) -> std::fmt::Result {
    match model.definition(var) {
        Some(def) => f.write_str(def.get_name()),
        None => write!(f, "v{}", var.index()),
    }
}

/// ```
/// use binlin::{ConstraintSense, Model};
///
/// let mut model = Model::new("demo");
/// let x = model.binary_var("x")?;
/// let y = model.integer_var("y", -1, 5)?;
/// model.minimize(0., x * 2, x * y)?;
/// model.linear_constraint(x + y, ConstraintSense::GreaterOrEqual, 1, "cover")?;
/// assert_eq!(
///     model.to_string(),
///     "Problem name: demo\n\
///      \n\
///      Minimize\n  x * y + 2x\n\
///      \n\
///      Subject to\n  cover: x + y >= 1\n\
///      \n\
///      Variables\n  binary:     x\n  integer:    -1 <= y <= 5\n"
/// );
/// # Ok::<_, binlin::ModelError>(())
/// ```
impl Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem name: {}", self.name())?;
        writeln!(f)?;
        writeln!(f, "{}", self.objective().sense())?;
        writeln!(f, "  {}", WithNames::new(self.objective(), self))?;
        writeln!(f)?;

        writeln!(f, "Subject to")?;
        if self.num_constraints() == 0 {
            writeln!(f, "  No constraints")?;
        }
        for constraint in self.linear_constraints() {
            writeln!(f, "  {}: {}", constraint.name(), WithNames::new(constraint, self))?;
        }
        for constraint in self.quadratic_constraints() {
            writeln!(f, "  {}: {}", constraint.name(), WithNames::new(constraint, self))?;
        }
        writeln!(f)?;

        writeln!(f, "Variables")?;
        if self.num_vars() == 0 {
            writeln!(f, "  No variables")?;
        }
        for (_, def) in self.variables() {
            write!(f, "  {:<12}", format!("{}:", def.kind()))?;
            if def.kind() == VariableKind::Binary {
                writeln!(f, "{}", def.get_name())?;
                continue;
            }
            if def.lower_bound() > f64::NEG_INFINITY {
                write!(f, "{} <= ", def.lower_bound())?;
            }
            write!(f, "{}", def.get_name())?;
            if def.upper_bound() < f64::INFINITY {
                write!(f, " <= {}", def.upper_bound())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
