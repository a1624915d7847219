//! Orientation tab bar

use egui::Ui;
use tracing::debug;

/// Draw the orientation tabs. Returns the newly selected index when the
/// user switches tabs.
pub fn orientation_tabs(ui: &mut Ui, labels: &[String], selected: usize) -> Option<usize> {
    let mut switched = None;
    ui.horizontal(|ui| {
        for (idx, label) in labels.iter().enumerate() {
            if ui.selectable_label(idx == selected, label).clicked() && idx != selected {
                debug!(tab = %label, "orientation switched");
                switched = Some(idx);
            }
        }
    });
    switched
}
