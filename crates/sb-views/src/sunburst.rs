//! Zoomable sunburst view
//!
//! Renders the partitioned hierarchy as concentric arc rings with
//! click-to-zoom, hover tooltips and a breadcrumb row. All geometry is
//! evaluated from the zoom controller's animated domain every frame, so
//! entering and exiting arcs collapse to the circle boundary purely through
//! angle clamping.

use arrow::record_batch::RecordBatch;
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use sb_core::partition::Partition;
use sb_core::zoom::ZoomController;
use sb_data::normalize_batch;

use crate::colors::ColorResolver;
use crate::geometry::{self, format_number, LevelScale};
use crate::ViewerContext;

/// Sunburst configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunburstConfig {
    pub show_labels: bool,
    /// Minimum projected arc length in px before a label is drawn.
    pub label_min_arc: f32,
    pub show_tooltip: bool,
    pub arc_opacity: f32,
    pub overlay_opacity: f32,
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            show_labels: true,
            label_min_arc: 100.0,
            show_tooltip: true,
            arc_opacity: 0.9,
            overlay_opacity: 0.1,
        }
    }
}

/// Zoomable sunburst view over the shared data source.
pub struct SunburstView {
    title: String,
    pub config: SunburstConfig,

    // Rebuilt on orientation or source change
    orientation: usize,
    normalized: Option<RecordBatch>,
    partition: Option<Partition>,
    fills: Vec<Color32>,
    load_error: Option<String>,

    // Interaction state
    zoom: ZoomController,
    hovered: Option<usize>,

    levels: LevelScale,
}

impl SunburstView {
    pub fn new(title: String) -> Self {
        Self {
            title,
            config: SunburstConfig::default(),
            orientation: 0,
            normalized: None,
            partition: None,
            fills: Vec::new(),
            load_error: None,
            zoom: ZoomController::new(),
            hovered: None,
            levels: LevelScale::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn orientation(&self) -> usize {
        self.orientation
    }

    /// Switch the grouping-field order. The aggregation tree is rebuilt in
    /// full and the zoom stack resets to the new root.
    pub fn set_orientation(&mut self, ctx: &ViewerContext, index: usize) {
        if index == self.orientation && self.partition.is_some() {
            return;
        }
        self.orientation = index;
        self.rebuild(ctx);
    }

    /// Forget cached data, e.g. after the data source changed.
    pub fn clear_data(&mut self) {
        self.normalized = None;
        self.partition = None;
        self.fills.clear();
        self.load_error = None;
        self.hovered = None;
        self.zoom.reset();
    }

    fn ensure_data(&mut self, ctx: &ViewerContext) {
        if self.normalized.is_some() || self.load_error.is_some() {
            return;
        }

        let guard = ctx.data_source.read();
        let Some(source) = guard.as_ref() else {
            return;
        };

        match ctx.runtime_handle.block_on(source.query_all()) {
            Ok(batch) => match normalize_batch(&batch, &ctx.config.measure_column) {
                Ok(normalized) => {
                    info!(
                        rows = normalized.num_rows(),
                        source = source.source_name(),
                        "sunburst data loaded"
                    );
                    drop(guard);
                    self.normalized = Some(normalized);
                    self.rebuild(ctx);
                }
                Err(err) => {
                    error!(%err, "failed to normalize records");
                    self.load_error = Some(err.to_string());
                }
            },
            Err(err) => {
                error!(%err, "failed to load records");
                self.load_error = Some(err.to_string());
            }
        }
    }

    fn rebuild(&mut self, ctx: &ViewerContext) {
        let Some(batch) = &self.normalized else {
            return;
        };
        let Some(orientation) = ctx.config.orientations.get(self.orientation) else {
            self.load_error = Some(format!("orientation {} is not configured", self.orientation));
            return;
        };

        match sb_core::aggregate(batch, &orientation.group_by, &ctx.config.measure_column) {
            Ok(children) => {
                let root = orientation.compose(children);
                let partition = Partition::build(&root);
                let resolver = ColorResolver::from_config(&ctx.config);
                self.fills = resolver.assign(&partition);
                self.partition = Some(partition);
                self.load_error = None;
                self.hovered = None;
                self.zoom.reset();
            }
            Err(err) => {
                error!(%err, "aggregation failed");
                self.load_error = Some(err.to_string());
            }
        }
    }

    pub fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        self.ensure_data(ctx);

        if let Some(message) = &self.load_error {
            ui.colored_label(Color32::RED, format!("Error loading data: {message}"));
            return;
        }
        if self.partition.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label("Load a CSV file or start demo data to begin.");
            });
            return;
        }

        // Held modifier stretches the transition for inspection.
        let slow = ui.input(|i| i.modifiers.shift);

        if let Some(partition) = &self.partition {
            breadcrumb_row(ui, partition, &mut self.zoom, slow);
        }

        let dt = ui.input(|i| i.stable_dt);
        let animating = self.zoom.advance(dt);

        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, Sense::click());
        let center = rect.center();
        let radius = rect.width().min(rect.height()) / 3.0;

        let mut hovered = None;
        if let (Some(partition), Some(pos)) = (&self.partition, response.hover_pos()) {
            hovered = hit_test(
                partition,
                &self.levels,
                self.zoom.domain(),
                self.zoom.current_depth(),
                center,
                radius,
                pos,
            );
        }
        self.hovered = hovered;

        if response.clicked() {
            if let Some(partition) = &self.partition {
                let disc = radius * self.levels.eval(1.0) as f32;
                if let Some(pos) = response.interact_pointer_pos() {
                    if pos.distance(center) < disc {
                        self.zoom.zoom_out(partition, slow);
                    } else if let Some(idx) = self.hovered {
                        self.zoom.zoom_in(partition, idx, slow);
                    }
                }
            }
        }

        self.draw(ui, rect, center, radius, animating);

        if let (Some(partition), Some(idx)) = (&self.partition, self.hovered) {
            if self.zoom.can_zoom_in(partition, idx) {
                response.clone().on_hover_cursor(CursorIcon::PointingHand);
            }
            if self.config.show_tooltip {
                let node = partition.get(idx);
                let name = node.name.clone();
                let description = node.description.clone();
                let value = node.value;
                response.clone().on_hover_ui_at_pointer(|ui| {
                    ui.strong(name);
                    if !description.is_empty() {
                        ui.label(description);
                    }
                    ui.label(format!("({})", format_number(value)));
                });
            }
        }

        if animating {
            ui.ctx().request_repaint();
        }
    }

    fn draw(&self, ui: &mut Ui, rect: Rect, center: Pos2, radius: f32, animating: bool) {
        let Some(partition) = &self.partition else {
            return;
        };
        let painter = ui.painter_at(rect);
        let domain = self.zoom.domain();
        let depth = self.zoom.current_depth();

        // Center disc doubles as the zoom-out target; arcs paint over it.
        painter.circle_filled(
            center,
            radius * self.levels.eval(1.0) as f32,
            Color32::from_gray(28),
        );

        // Overlay nodes go last so they wash over their own children.
        let order = (1..partition.len()).sorted_by_key(|&idx| partition.get(idx).overlay);
        for idx in order {
            let node = partition.get(idx);
            let start = geometry::project_angle(domain, node.x);
            let end = geometry::project_angle(domain, node.x_end());
            if end - start < 1e-4 {
                continue;
            }
            let inner = radius * geometry::inner_radius(partition, idx, depth, &self.levels) as f32;
            let outer = radius * geometry::outer_radius(partition, idx, depth, &self.levels) as f32;
            if outer - inner < 0.5 {
                continue;
            }

            let opacity = if node.overlay {
                self.config.overlay_opacity
            } else if self.hovered == Some(idx) {
                1.0
            } else {
                self.config.arc_opacity
            };
            let fill = self
                .fills
                .get(idx)
                .copied()
                .unwrap_or(Color32::GRAY)
                .gamma_multiply(opacity);

            draw_arc(&painter, center, inner, outer, start, end, fill);
        }

        // Labels settle in only between transitions, on the innermost ring.
        if self.config.show_labels && !animating {
            self.draw_labels(&painter, partition, center, radius);
        }
    }

    fn draw_labels(
        &self,
        painter: &egui::Painter,
        partition: &Partition,
        center: Pos2,
        radius: f32,
    ) {
        let domain = self.zoom.domain();
        let depth = self.zoom.current_depth();
        let ring = depth.round() as usize + 1;

        for idx in 1..partition.len() {
            let node = partition.get(idx);
            if node.depth != ring || !partition.is_within(idx, self.zoom.root()) {
                continue;
            }
            let start = geometry::project_angle(domain, node.x);
            let end = geometry::project_angle(domain, node.x_end());
            let inner = radius * geometry::inner_radius(partition, idx, depth, &self.levels) as f32;
            let outer = radius * geometry::outer_radius(partition, idx, depth, &self.levels) as f32;
            let mid_radius = (inner + outer) / 2.0;

            let arc_length = (end - start) as f32 * mid_radius;
            if arc_length < self.config.label_min_arc {
                continue;
            }

            let mid_angle = (start + end) / 2.0;
            let pos = center + angle_dir(mid_angle) * mid_radius;
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                &node.name,
                FontId::proportional(12.0),
                Color32::from_gray(235),
            );
        }
    }

    /// Save configuration
    pub fn save_config(&self) -> Value {
        json!({
            "orientation": self.orientation,
            "show_labels": self.config.show_labels,
            "show_tooltip": self.config.show_tooltip,
            "label_min_arc": self.config.label_min_arc,
        })
    }

    /// Load configuration
    pub fn load_config(&mut self, value: Value) {
        if let Some(orientation) = value.get("orientation").and_then(Value::as_u64) {
            self.orientation = orientation as usize;
        }
        if let Some(show_labels) = value.get("show_labels").and_then(Value::as_bool) {
            self.config.show_labels = show_labels;
        }
        if let Some(show_tooltip) = value.get("show_tooltip").and_then(Value::as_bool) {
            self.config.show_tooltip = show_tooltip;
        }
        if let Some(min_arc) = value.get("label_min_arc").and_then(Value::as_f64) {
            self.config.label_min_arc = min_arc as f32;
        }
    }
}

/// The chain of zoomed-into ancestors; clicking a crumb jumps back to it.
fn breadcrumb_row(ui: &mut Ui, partition: &Partition, zoom: &mut ZoomController, slow: bool) {
    if zoom.trail().is_empty() {
        return;
    }
    let crumbs: Vec<(usize, String)> = zoom
        .trail()
        .iter()
        .enumerate()
        .map(|(pos, &idx)| (pos, partition.get(idx).name.clone()))
        .collect();

    let mut jump_to = None;
    ui.horizontal(|ui| {
        if ui.link("All").clicked() {
            jump_to = Some(None);
        }
        for (pos, name) in &crumbs {
            ui.label("/");
            if ui.link(name).clicked() {
                jump_to = Some(Some(*pos));
            }
        }
    });

    match jump_to {
        Some(Some(pos)) => {
            zoom.zoom_to_trail(partition, pos, slow);
        }
        Some(None) => {
            // All the way back out.
            while !zoom.trail().is_empty() && zoom.zoom_out(partition, slow) {}
        }
        None => {}
    }
}

/// Direction of an angle measured clockwise from 12 o'clock.
fn angle_dir(angle: f64) -> Vec2 {
    Vec2::new(angle.sin() as f32, -angle.cos() as f32)
}

/// Find the arena node under the pointer, preferring overlay nodes since
/// they are drawn on top.
fn hit_test(
    partition: &Partition,
    levels: &LevelScale,
    domain: (f64, f64),
    current_depth: f64,
    center: Pos2,
    radius: f32,
    pos: Pos2,
) -> Option<usize> {
    let offset = pos - center;
    let distance = offset.length();
    let mut angle = (offset.x as f64).atan2(-offset.y as f64);
    if angle < 0.0 {
        angle += std::f64::consts::TAU;
    }

    let mut hit = None;
    let order = (1..partition.len()).sorted_by_key(|&idx| partition.get(idx).overlay);
    for idx in order {
        let node = partition.get(idx);
        let start = geometry::project_angle(domain, node.x);
        let end = geometry::project_angle(domain, node.x_end());
        if end - start < 1e-4 || angle < start || angle > end {
            continue;
        }
        let inner = radius * geometry::inner_radius(partition, idx, current_depth, levels) as f32;
        let outer = radius * geometry::outer_radius(partition, idx, current_depth, levels) as f32;
        if outer - inner < 0.5 || distance < inner || distance > outer {
            continue;
        }
        hit = Some(idx);
    }
    hit
}

fn draw_arc(
    painter: &egui::Painter,
    center: Pos2,
    inner: f32,
    outer: f32,
    start: f64,
    end: f64,
    fill: Color32,
) {
    let span = end - start;
    let segments = (span.to_degrees().ceil() as usize).clamp(8, 720);

    for i in 0..segments {
        let a0 = start + span * i as f64 / segments as f64;
        let a1 = start + span * (i + 1) as f64 / segments as f64;
        let d0 = angle_dir(a0);
        let d1 = angle_dir(a1);
        let quad = vec![
            center + d0 * inner,
            center + d0 * outer,
            center + d1 * outer,
            center + d1 * inner,
        ];
        painter.add(Shape::convex_polygon(
            quad,
            fill,
            Stroke::new(1.0, Color32::from_gray(20)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::hierarchy::HierarchyNode;

    fn test_partition() -> Partition {
        Partition::build(&HierarchyNode::branch(
            "root",
            "",
            vec![
                HierarchyNode::leaf("a", "", 60.0),
                HierarchyNode::leaf("b", "", 40.0),
            ],
        ))
    }

    #[test]
    fn hit_test_finds_the_ring_under_the_pointer() {
        let partition = test_partition();
        let levels = LevelScale::default();
        let center = Pos2::new(0.0, 0.0);
        let radius = 100.0;

        // "a" spans the first 60% of the circle; probe the middle of its
        // ring (single-ring tree: radii [0.2, 0.8] of the radius).
        let angle = 0.3 * std::f64::consts::TAU;
        let probe = center + angle_dir(angle) * 60.0;
        let hit = hit_test(&partition, &levels, (0.0, 1.0), 0.0, center, radius, probe).unwrap();
        assert_eq!(partition.get(hit).name, "a");

        // The center disc is not an arc.
        assert!(hit_test(&partition, &levels, (0.0, 1.0), 0.0, center, radius, center).is_none());

        // Outside the outer radius there is nothing.
        let far = center + angle_dir(angle) * 150.0;
        assert!(hit_test(&partition, &levels, (0.0, 1.0), 0.0, center, radius, far).is_none());
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut view = SunburstView::new("test".to_string());
        view.config.show_labels = false;
        view.config.label_min_arc = 42.0;
        let saved = view.save_config();

        let mut other = SunburstView::new("other".to_string());
        other.load_config(saved);
        assert!(!other.config.show_labels);
        assert_eq!(other.config.label_min_arc, 42.0);
    }

    #[test]
    fn angle_dir_points_clockwise_from_top() {
        let up = angle_dir(0.0);
        assert!((up.x - 0.0).abs() < 1e-6 && (up.y + 1.0).abs() < 1e-6);
        let right = angle_dir(std::f64::consts::TAU / 4.0);
        assert!((right.x - 1.0).abs() < 1e-6 && (right.y - 0.0).abs() < 1e-6);
    }
}
