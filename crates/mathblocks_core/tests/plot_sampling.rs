use mathblocks_core::plot::EngineResult;
use mathblocks_core::{
    generate_points, is_valid_function, trace_segments, CompiledExpression, EngineError,
    ExpressionEngine, GraphSettings, Point,
};

/// Stand-in evaluator knowing a handful of fixed expressions.
struct FakeEngine;

struct Compiled(fn(f64) -> EngineResult<f64>);

impl CompiledExpression for Compiled {
    fn evaluate(&self, x: f64) -> EngineResult<f64> {
        (self.0)(x)
    }
}

impl ExpressionEngine for FakeEngine {
    fn compile(&self, expression: &str) -> EngineResult<Box<dyn CompiledExpression>> {
        let eval: fn(f64) -> EngineResult<f64> = match expression {
            "x" => |x| Ok(x),
            "(x)^(2)" => |x| Ok(x * x),
            "((1) / (x))" => |x| Ok(1.0 / x),
            "sqrt(x)" => |x| {
                if x < 0.0 {
                    Err(EngineError::Evaluate("complex result".to_string()))
                } else {
                    Ok(x.sqrt())
                }
            },
            "3" => |_| Ok(3.0),
            other => return Err(EngineError::Compile(format!("unexpected `{other}`"))),
        };
        Ok(Box::new(Compiled(eval)))
    }
}

#[test]
fn generate_points_samples_steps_plus_one() {
    let points = generate_points(&FakeEngine, "y = x", -1.0, 1.0, 4);
    let xs: Vec<f64> = points.iter().map(|point| point.x).collect();
    assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    assert!(points.iter().all(|point| point.x == point.y));
}

#[test]
fn compile_failure_yields_no_points() {
    assert!(generate_points(&FakeEngine, "(x +", -1.0, 1.0, 10).is_empty());
    assert!(trace_segments(&FakeEngine, "(x +", &GraphSettings::default(), 10).is_empty());
}

#[test]
fn failed_and_non_finite_samples_are_omitted() {
    let roots = generate_points(&FakeEngine, "sqrt(x)", -2.0, 2.0, 4);
    assert_eq!(roots.len(), 3);
    assert_eq!(roots[0], Point { x: 0.0, y: 0.0 });

    let reciprocal = generate_points(&FakeEngine, "((1) / (x))", -1.0, 1.0, 2);
    let xs: Vec<f64> = reciprocal.iter().map(|point| point.x).collect();
    assert_eq!(xs, vec![-1.0, 1.0]);
}

#[test]
fn zero_steps_is_treated_as_one() {
    let points = generate_points(&FakeEngine, "3", 0.0, 2.0, 0);
    assert_eq!(
        points,
        vec![Point { x: 0.0, y: 3.0 }, Point { x: 2.0, y: 3.0 }]
    );
}

#[test]
fn segments_break_outside_visible_range_and_at_gaps() {
    let settings = GraphSettings {
        x_min: -4.0,
        x_max: 4.0,
        y_min: -10.0,
        y_max: 5.0,
    };
    // x^2 at -4..4 step 1: 16 9 4 1 0 1 4 9 16; only |x| <= 2 is visible.
    let segments = trace_segments(&FakeEngine, "(x)^(2)", &settings, 8);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].len(), 5);
    assert_eq!(segments[0][0], Point { x: -2.0, y: 4.0 });

    // 1/x breaks at the pole.
    let settings = GraphSettings {
        x_min: -2.0,
        x_max: 2.0,
        ..GraphSettings::default()
    };
    let segments = trace_segments(&FakeEngine, "((1) / (x))", &settings, 4);
    assert_eq!(segments.len(), 2);
    assert!(segments.iter().all(|segment| segment.len() == 2));
}

#[test]
fn valid_function_requires_compiling_and_free_variable() {
    assert!(is_valid_function(&FakeEngine, "y = (x)^(2)", "x"));
    assert!(!is_valid_function(&FakeEngine, "3", "x"));
    assert!(!is_valid_function(&FakeEngine, "(x +", "x"));
    assert!(!is_valid_function(&FakeEngine, "  ", "x"));
}
