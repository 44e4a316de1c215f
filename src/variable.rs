//! A [Variable] is the base element used to build expressions.
//!
//! Each variable has a [VariableDefinition] that sets its name, its kind and its bounds.
use std::fmt::{Display, Formatter};
use std::ops::{Bound, RangeBounds};

/// A variable in a [Model](crate::Model).
///
/// Variables are created using [Model::add_variable](crate::Model::add_variable)
/// or one of its shortcuts.
///
/// ## Warning
/// `Eq` is implemented on this type, but
/// `v1 == v2` is true only if the two variables have the same position in their model.
/// Two variables from two different models can compare equal.
///
/// ```
/// # use binlin::Model;
/// let mut model = Model::new("vars");
/// let x = model.binary_var("x")?;
/// let y = model.binary_var("y")?;
/// assert_ne!(x, y);
/// assert_eq!(model.variable("x"), Some(x));
/// # Ok::<_, binlin::ModelError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    /// A variable is nothing more than an index into the variables of a Model.
    /// That's why it can be `Copy`.
    /// All the actual information about the variable (name, kind, bounds) is stored in the Model
    index: usize,
}

impl Variable {
    pub(crate) fn at(index: usize) -> Self {
        Self { index }
    }

    /// Position of this variable in the declaration order of its model
    pub fn index(&self) -> usize {
        self.index
    }
}

/// An element that can be displayed if you give a variable display function
pub trait FormatWithVars {
    /// Write the element to the formatter. See [std::fmt::Display]
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result;

    /// Write the elements, naming the variables v0, v1, ... vn
    fn format_debug(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_with(f, |f, var| write!(f, "v{}", var.index()))
    }
}

/// The domain of a variable
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// 0 or 1
    Binary,
    /// Any integer between the bounds
    Integer,
    /// Any real number between the bounds
    Continuous,
    /// Either 0, or a real number between the bounds
    SemiContinuous,
}

impl VariableKind {
    /// Lowercase name of the kind, as used in the text rendering of a model
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Binary => "binary",
            VariableKind::Integer => "integer",
            VariableKind::Continuous => "continuous",
            VariableKind::SemiContinuous => "semi-continuous",
        }
    }
}

impl Display for VariableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defines the properties of a variable, such as its name, kind and bounds.
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinition {
    pub(crate) name: String,
    pub(crate) kind: VariableKind,
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl VariableDefinition {
    /// Creates an anonymous unbounded continuous variable
    pub fn new() -> Self {
        VariableDefinition {
            name: String::new(),
            kind: VariableKind::Continuous,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    /// Name the variable. Anonymous variables get an automatic name when added to a model.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Set the lower and/or higher bounds of the variable
    ///
    /// ## Examples
    /// ```
    /// # use binlin::variable;
    /// assert_eq!(
    ///     variable().bounds(1..2),
    ///     variable().min(1).max(2)
    /// );
    ///
    /// assert_eq!(
    ///     variable().bounds(1..),
    ///     variable().min(1)
    /// );
    ///
    /// # assert_eq!(variable().bounds::<f64, _>(..), variable());
    /// ```
    pub fn bounds<N: Into<f64> + Copy, B: RangeBounds<N>>(self, bounds: B) -> Self {
        self.min(match bounds.start_bound() {
            Bound::Included(&x) => x.into(),
            Bound::Excluded(&x) => x.into(),
            Bound::Unbounded => f64::NEG_INFINITY,
        })
        .max(match bounds.end_bound() {
            Bound::Included(&x) => x.into(),
            Bound::Excluded(&x) => x.into(),
            Bound::Unbounded => f64::INFINITY,
        })
    }

    /// Set the lower bound of the variable
    pub fn min<N: Into<f64>>(mut self, min: N) -> Self {
        self.min = min.into();
        self
    }

    /// Set the higher bound of the variable
    pub fn max<N: Into<f64>>(mut self, max: N) -> Self {
        self.max = max.into();
        self
    }

    /// Set both the lower and higher bounds of the variable
    pub fn clamp<N1: Into<f64>, N2: Into<f64>>(self, min: N1, max: N2) -> Self {
        self.min(min).max(max)
    }

    /// Make the variable binary. Its bounds become `[0, 1]`.
    pub fn binary(mut self) -> Self {
        self.kind = VariableKind::Binary;
        self.clamp(0, 1)
    }

    /// Restrict the variable to integer values
    pub fn integer(mut self) -> Self {
        self.kind = VariableKind::Integer;
        self
    }

    /// Allow any real value between the bounds. This is the default.
    pub fn continuous(mut self) -> Self {
        self.kind = VariableKind::Continuous;
        self
    }

    /// The variable is either 0 or between its bounds
    pub fn semi_continuous(mut self) -> Self {
        self.kind = VariableKind::SemiContinuous;
        self
    }

    /// The name of the variable
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// The kind of the variable
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// The lower bound. `0` for binary variables.
    pub fn lower_bound(&self) -> f64 {
        match self.kind {
            VariableKind::Binary => 0.,
            _ => self.min,
        }
    }

    /// The higher bound. `1` for binary variables.
    pub fn upper_bound(&self) -> f64 {
        match self.kind {
            VariableKind::Binary => 1.,
            _ => self.max,
        }
    }

    /// Whether this is a binary variable
    pub fn is_binary(&self) -> bool {
        self.kind == VariableKind::Binary
    }
}

/// Creates an anonymous unbounded continuous variable
impl Default for VariableDefinition {
    fn default() -> Self {
        VariableDefinition::new()
    }
}

/// Returns an anonymous unbounded continuous variable definition
pub fn variable() -> VariableDefinition {
    VariableDefinition::default()
}
