//! Fixed-step sampling of a compiled expression.

use crate::plot::{strip_assignment_prefix, ExpressionEngine, GraphSettings};
use log::debug;
use serde::{Deserialize, Serialize};

/// One finite sample of the plotted function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Samples `steps + 1` evenly spaced points over `[x_min, x_max]`.
///
/// A compile failure yields no points. Samples that fail to evaluate or are
/// not finite are omitted. `steps == 0` is treated as one step.
pub fn generate_points(
    engine: &dyn ExpressionEngine,
    expression: &str,
    x_min: f64,
    x_max: f64,
    steps: usize,
) -> Vec<Point> {
    let mut points = Vec::new();
    sample(engine, expression, x_min, x_max, steps, |sampled| {
        if let Some(point) = sampled {
            points.push(point);
        }
    });
    points
}

/// Samples the curve into drawable polyline segments.
///
/// A sample that fails, is not finite, or falls outside
/// `[y_min, y_max]` ends the current segment.
pub fn trace_segments(
    engine: &dyn ExpressionEngine,
    expression: &str,
    settings: &GraphSettings,
    steps: usize,
) -> Vec<Vec<Point>> {
    let mut segments = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    sample(
        engine,
        expression,
        settings.x_min,
        settings.x_max,
        steps,
        |sampled| match sampled.filter(|point| settings.contains_y(point.y)) {
            Some(point) => current.push(point),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        },
    );
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn sample(
    engine: &dyn ExpressionEngine,
    expression: &str,
    x_min: f64,
    x_max: f64,
    steps: usize,
    mut visit: impl FnMut(Option<Point>),
) {
    let cleaned = strip_assignment_prefix(expression);
    let compiled = match engine.compile(cleaned) {
        Ok(compiled) => compiled,
        Err(err) => {
            debug!(
                "event=plot_compile module=plot status=error expr_len={} error={}",
                cleaned.len(),
                err
            );
            return;
        }
    };

    let steps = steps.max(1);
    let step_size = (x_max - x_min) / steps as f64;
    let mut skipped = 0_usize;
    for i in 0..=steps {
        let x = x_min + i as f64 * step_size;
        let sampled = compiled
            .evaluate(x)
            .ok()
            .filter(|y| y.is_finite())
            .map(|y| Point { x, y });
        if sampled.is_none() {
            skipped += 1;
        }
        visit(sampled);
    }
    debug!(
        "event=plot_sample module=plot status=ok steps={} skipped={}",
        steps, skipped
    );
}
