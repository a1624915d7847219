//! Radial geometry
//!
//! The level scale and the depth/height-relative radius formulas. Radii are
//! fractions of the display radius; the zoom controller's animated depth
//! feeds straight into these, which is what re-normalizes the visible
//! subtree to fill the full radius during a transition.

use std::f64::consts::TAU;

use sb_core::partition::Partition;

/// Piecewise-linear scale from discrete level index to radius fraction.
///
/// The stops are hand-tuned; inputs beyond either edge extrapolate linearly
/// along the edge segment, so a level-4 ring lands at 1.0 with the default
/// stops.
#[derive(Debug, Clone)]
pub struct LevelScale {
    stops: Vec<(f64, f64)>,
}

impl Default for LevelScale {
    fn default() -> Self {
        Self {
            stops: vec![(0.0, 0.0), (1.0, 0.2), (2.0, 0.6), (3.0, 0.8)],
        }
    }
}

impl LevelScale {
    pub fn eval(&self, level: f64) -> f64 {
        let stops = &self.stops;
        let segment = match stops.iter().position(|&(stop, _)| level < stop) {
            Some(0) => 0,
            Some(i) => i - 1,
            None => stops.len() - 2,
        };
        let (d0, r0) = stops[segment];
        let (d1, r1) = stops[segment + 1];
        r0 + (level - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Project a partition `x` fraction through the animated domain onto
/// `[0, TAU]`. Values outside the domain clamp to the edges, which is what
/// collapses exiting arcs to zero width and grows entering arcs from the
/// boundary during a zoom.
pub fn project_angle(domain: (f64, f64), x: f64) -> f64 {
    let (d0, d1) = domain;
    if d1 <= d0 {
        return 0.0;
    }
    ((x - d0) / (d1 - d0) * TAU).clamp(0.0, TAU)
}

/// Outer radius fraction for an arena node.
pub fn outer_radius(
    partition: &Partition,
    idx: usize,
    current_depth: f64,
    scale: &LevelScale,
) -> f64 {
    let node = partition.get(idx);
    if node.depth == 0 {
        return scale.eval(1.0);
    }
    let levels_to_cover = partition.max_height() as f64 - node.height as f64;
    let real_depth = node.depth as f64 - current_depth;
    if real_depth < 1.0 {
        scale.eval((levels_to_cover + 1.0) * real_depth + 1.0)
    } else {
        scale.eval(levels_to_cover + 2.0)
    }
}

/// Inner radius fraction. Children of a translucent overlay render all the
/// way in to the first ring while the overlay itself is still the top ring.
pub fn inner_radius(
    partition: &Partition,
    idx: usize,
    current_depth: f64,
    scale: &LevelScale,
) -> f64 {
    let node = partition.get(idx);
    if let Some(parent) = node.parent {
        if current_depth < 2.0 && partition.get(parent).overlay {
            return scale.eval(1.0);
        }
    }
    let real_depth = node.depth as f64 - current_depth;
    if real_depth < 2.0 {
        return scale.eval(real_depth.max(1.0));
    }
    match node.parent {
        Some(parent) => outer_radius(partition, parent, current_depth, scale),
        None => scale.eval(1.0),
    }
}

/// Format with thousands separators: `1234567` -> `"1,234,567"`.
pub fn format_number(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
