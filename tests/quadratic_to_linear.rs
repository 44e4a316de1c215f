use binlin::converters::{linearize, ModelConverter, NonBinaryPolicy, QuadraticToLinear};
use binlin::{
    variable, ConstraintSense, LinearExpression, LinearizationError, Model, ObjectiveSense,
    QuadraticExpression, VariableKind,
};
use float_eq::assert_float_eq;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Binary a, b, c, an integer n and a continuous z.
/// `a*b` appears in the objective and in two quadratic constraints.
fn shared_product_model() -> Model {
    let mut model = Model::new("shared");
    let a = model.binary_var("a").unwrap();
    let b = model.binary_var("b").unwrap();
    let c = model.binary_var("c").unwrap();
    let n = model.integer_var("n", -2, 7).unwrap();
    let z = model.continuous_var("z", 0.5, 10).unwrap();
    model.minimize(4., a + n * 2, 3. * (a * b)).unwrap();
    model
        .linear_constraint(n + z * -1, ConstraintSense::LessOrEqual, 3, "lin")
        .unwrap();
    model
        .quadratic_constraint(c, a * b, ConstraintSense::LessOrEqual, 1, "q_ab")
        .unwrap();
    model
        .quadratic_constraint(
            LinearExpression::new(),
            -1. * (b * a) + b * c,
            ConstraintSense::GreaterOrEqual,
            -1,
            "q_ba",
        )
        .unwrap();
    model
}

#[test]
fn surrogates_are_shared_across_expressions() {
    init_logging();
    let source = shared_product_model();
    let target = linearize(&source).unwrap();

    let and_ab = target.variable("_and_a_b").unwrap();
    let and_bc = target.variable("_and_b_c").unwrap();
    assert_eq!(target.num_vars(), source.num_vars() + 2);

    assert_eq!(target.objective().linear().coefficient(and_ab), 3.);
    let q_ab = target.linear_constraint_by_name("q_ab").unwrap();
    assert_eq!(q_ab.linear().coefficient(and_ab), 1.);
    let q_ba = target.linear_constraint_by_name("q_ba").unwrap();
    assert_eq!(q_ba.linear().coefficient(and_ab), -1.);
    assert_eq!(q_ba.linear().coefficient(and_bc), 1.);
}

#[test]
fn reversed_pair_reuses_the_surrogate() {
    let mut model = Model::new("sym");
    let x = model.binary_var("x").unwrap();
    let y = model.binary_var("y").unwrap();
    model.maximize(0., LinearExpression::new(), x * y).unwrap();
    model
        .quadratic_constraint(x, y * x, ConstraintSense::Equal, 1, "rev")
        .unwrap();
    let target = linearize(&model).unwrap();
    assert_eq!(target.num_vars(), 3);
    assert!(target.variable("_and_x_y").is_some());
    assert!(target.variable("_and_y_x").is_none());

    let and = target.variable("_and_x_y").unwrap();
    assert_eq!(target.objective().sense(), ObjectiveSense::Maximize);
    assert_eq!(target.objective().linear().coefficient(and), 1.);
    let rev = target.linear_constraint_by_name("rev").unwrap();
    assert_eq!(rev.linear().coefficient(and), 1.);
    assert_eq!(rev.linear().coefficient(x), 1.);
}

#[test]
fn envelope_equals_the_product() {
    let source = shared_product_model();
    let target = linearize(&source).unwrap();
    let envelope: Vec<_> = target
        .linear_constraints()
        .iter()
        .filter(|c| c.name().starts_with("_and_a_b_"))
        .collect();
    assert_eq!(envelope.len(), 3);

    let index = |name: &str| target.variable(name).unwrap().index();
    let (a, b, s) = (index("a"), index("b"), index("_and_a_b"));
    for &(x_val, y_val) in &[(0., 0.), (0., 1.), (1., 0.), (1., 1.)] {
        let feasible: Vec<f64> = [0., 1.]
            .iter()
            .copied()
            .filter(|&s_val| {
                let mut values = vec![0.; target.num_vars()];
                values[a] = x_val;
                values[b] = y_val;
                values[s] = s_val;
                envelope.iter().all(|c| c.is_satisfied_by(&values, 1e-9))
            })
            .collect();
        assert_eq!(feasible, vec![x_val * y_val], "x={} y={}", x_val, y_val);
    }
}

#[test]
fn variable_and_constraint_counts() {
    let source = shared_product_model();
    let target = linearize(&source).unwrap();
    let pairs = 2;
    assert_eq!(target.num_vars(), source.num_vars() + pairs);
    assert_eq!(
        target.num_constraints(),
        source.linear_constraints().len() + source.quadratic_constraints().len() + 3 * pairs
    );
}

#[test]
fn no_quadratic_terms_remain() {
    let target = linearize(&shared_product_model()).unwrap();
    assert!(target.objective().quadratic().is_empty());
    assert!(target.quadratic_constraints().is_empty());
}

#[test]
fn variables_are_projected_unchanged() {
    let source = shared_product_model();
    let target = linearize(&source).unwrap();
    for ((source_var, source_def), (target_var, target_def)) in
        source.variables().zip(target.variables())
    {
        assert_eq!(source_var, target_var);
        assert_eq!(source_def.get_name(), target_def.get_name());
        assert_eq!(source_def.kind(), target_def.kind());
        assert_eq!(source_def.lower_bound(), target_def.lower_bound());
        assert_eq!(source_def.upper_bound(), target_def.upper_bound());
    }
    let surrogate = target
        .definition(target.variable("_and_b_c").unwrap())
        .unwrap();
    assert_eq!(surrogate.kind(), VariableKind::Continuous);
    assert_eq!((surrogate.lower_bound(), surrogate.upper_bound()), (0., 1.));
}

#[test]
fn linear_parts_are_kept() {
    let source = shared_product_model();
    let target = linearize(&source).unwrap();
    let lin = target.linear_constraint_by_name("lin").unwrap();
    assert_eq!(lin.sense(), ConstraintSense::LessOrEqual);
    assert_eq!(lin.rhs(), 3.);
    assert_eq!(lin.linear().coefficient(target.variable("n").unwrap()), 1.);
    assert_eq!(lin.linear().coefficient(target.variable("z").unwrap()), -1.);

    let objective = target.objective();
    assert_eq!(objective.sense(), ObjectiveSense::Minimize);
    assert_eq!(objective.constant(), 4.);
    assert_eq!(objective.linear().len(), 3);
    assert_eq!(objective.linear().coefficient(target.variable("n").unwrap()), 2.);
}

#[test]
fn objective_values_match() {
    let source = shared_product_model();
    let mut converter = QuadraticToLinear::new();
    let target = converter.convert(&source).unwrap();
    // a, b, c, n, z, _and_a_b, _and_b_c
    let values = vec![1., 1., 0., 3., 0.5, 1., 0.];
    let original = converter.interpret(&values).unwrap();
    assert_float_eq!(
        source.objective().eval_with(&original),
        target.objective().eval_with(&values),
        abs <= 1e-9
    );
    for constraint in target.linear_constraints() {
        assert!(constraint.is_satisfied_by(&values, 1e-9), "{}", constraint.name());
    }
    for constraint in source.quadratic_constraints() {
        let linearized = target.linear_constraint_by_name(constraint.name()).unwrap();
        assert_float_eq!(
            constraint.eval_with(&original),
            linearized.eval_with(&values),
            abs <= 1e-9
        );
    }
}

#[test]
fn interpret_recovers_the_source_assignment() {
    let source = shared_product_model();
    let mut converter = QuadraticToLinear::new();
    let target = converter.convert(&source).unwrap();
    let assignment = [0., 1., 1., -2., 9.5];
    let mut values = vec![0.; target.num_vars()];
    for (var, def) in source.variables() {
        values[target.variable(def.get_name()).unwrap().index()] = assignment[var.index()];
    }
    assert_eq!(converter.interpret(&values).unwrap(), assignment.to_vec());
}

#[test]
fn interpret_checks_its_input() {
    let mut converter = QuadraticToLinear::new();
    assert_eq!(converter.interpret(&[]), Err(LinearizationError::NotConverted));
    converter.convert(&shared_product_model()).unwrap();
    assert_eq!(
        converter.interpret(&[0.; 5]),
        Err(LinearizationError::SolutionLength {
            expected: 7,
            actual: 5
        })
    );
}

#[test]
fn unsupported_variable_type() {
    let mut model = Model::new("semi");
    let x = model.binary_var("x").unwrap();
    model
        .add_variable(variable().name("s").semi_continuous().clamp(2, 4))
        .unwrap();
    model.minimize(0., x, x * x).unwrap();
    let mut converter = QuadraticToLinear::new();
    assert_eq!(
        converter.convert(&model).unwrap_err(),
        LinearizationError::UnsupportedVariableType {
            name: "s".to_string(),
            kind: VariableKind::SemiContinuous,
        }
    );
    assert!(converter.source().is_none());
}

#[test]
fn single_product_example() {
    let mut model = Model::new("example");
    let x = model.binary_var("x").unwrap();
    let y = model.binary_var("y").unwrap();
    model.minimize(0., x, 2. * (x * y)).unwrap();

    let target = linearize(&model).unwrap();
    assert_eq!(
        target.to_string(),
        "Problem name: example\n\
         \n\
         Minimize\n  x + 2_and_x_y\n\
         \n\
         Subject to\n  \
         _and_x_y_1: -x + _and_x_y <= 0\n  \
         _and_x_y_2: -y + _and_x_y <= 0\n  \
         _and_x_y_3: -x - y + _and_x_y >= -1\n\
         \n\
         Variables\n  \
         binary:     x\n  \
         binary:     y\n  \
         continuous: 0 <= _and_x_y <= 1\n"
    );
}

/// A product with a non-binary factor has no surrogate and is left out of the linearized model.
#[test]
fn non_binary_products_are_dropped() {
    let mut model = Model::new("mixed");
    let x = model.binary_var("x").unwrap();
    let n = model.integer_var("n", 0, 5).unwrap();
    model.maximize(1., x, 5. * (x * n)).unwrap();
    model
        .quadratic_constraint(n, x * n, ConstraintSense::LessOrEqual, 4, "mixed")
        .unwrap();

    let target = linearize(&model).unwrap();
    assert_eq!(target.num_vars(), 2);
    assert_eq!(target.num_constraints(), 1);
    assert_eq!(target.objective().linear().len(), 1);
    let mixed = target.linear_constraint_by_name("mixed").unwrap();
    assert_eq!(mixed.linear().len(), 1);
    assert_eq!(mixed.linear().coefficient(target.variable("n").unwrap()), 1.);
}

#[test]
fn non_binary_products_can_be_rejected() {
    let mut model = Model::new("mixed");
    let x = model.binary_var("x").unwrap();
    let z = model.continuous_var("z", 0, 1).unwrap();
    model
        .minimize(0., LinearExpression::new(), z * x)
        .unwrap();
    let mut converter = QuadraticToLinear::new().with_non_binary_policy(NonBinaryPolicy::Reject);
    assert_eq!(
        converter.convert(&model).unwrap_err(),
        LinearizationError::NonBinaryQuadraticTerm {
            first: "x".to_string(),
            second: "z".to_string(),
        }
    );
}

#[test]
fn source_is_not_mutated_and_state_is_replaced() {
    let source = shared_product_model();
    let before = source.clone();
    let mut converter = QuadraticToLinear::new();
    converter.convert(&source).unwrap();
    assert_eq!(source.to_string(), before.to_string());

    let mut small = Model::new("small");
    let p = small.binary_var("p").unwrap();
    small
        .minimize(0., LinearExpression::new(), QuadraticExpression::new())
        .unwrap();
    small.linear_constraint(p, ConstraintSense::Equal, 1, "").unwrap();
    let target = converter.convert(&small).unwrap();
    assert_eq!(target.num_vars(), 1);
    assert_eq!(target.linear_constraints()[0].name(), "c0");
    assert_eq!(converter.source().map(Model::name), Some("small"));
    assert_eq!(converter.interpret(&[1.]).unwrap(), vec![1.]);
}

#[test]
fn conversion_is_deterministic() {
    let source = shared_product_model();
    let first = linearize(&source).unwrap().to_string();
    for _ in 0..5 {
        assert_eq!(linearize(&source).unwrap().to_string(), first);
    }
}
