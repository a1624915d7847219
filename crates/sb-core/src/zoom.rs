//! Zoom state and transition tweening
//!
//! The controller tracks which arena node is the displayed root and animates
//! the angular domain plus the depth offset between zoom levels. Geometry is
//! always evaluated from the single animated state here, so starting a new
//! zoom while one is in flight supersedes the old transition outright and a
//! stale tween can never land.

use crate::partition::Partition;

/// Transition time in seconds.
const ZOOM_DURATION: f32 = 0.75;

/// Multiplier applied when the inspection modifier is held on click.
const SLOW_MOTION_FACTOR: f32 = 10.0;

/// An in-flight interpolation between two zoom states.
#[derive(Debug, Clone)]
struct Transition {
    from_domain: (f64, f64),
    to_domain: (f64, f64),
    from_depth: f64,
    to_depth: f64,
    elapsed: f32,
    duration: f32,
}

/// Zoom state machine over a partition arena.
#[derive(Debug, Clone)]
pub struct ZoomController {
    root: usize,
    trail: Vec<usize>,
    domain: (f64, f64),
    depth: f64,
    transition: Option<Transition>,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomController {
    pub fn new() -> Self {
        Self {
            root: 0,
            trail: Vec::new(),
            domain: (0.0, 1.0),
            depth: 0.0,
            transition: None,
        }
    }

    /// Back to the tree root, no animation. Used on orientation change,
    /// where the whole arena is rebuilt.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Arena index of the displayed root.
    pub fn root(&self) -> usize {
        self.root
    }

    /// The chain of zoomed-into nodes, oldest first.
    pub fn trail(&self) -> &[usize] {
        &self.trail
    }

    /// Animated angular domain, in the partition's `x` fraction units.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Animated depth offset: rings collapsed past due to prior zooms.
    pub fn current_depth(&self) -> f64 {
        self.depth
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// A node is a valid zoom-in target when it has children and sits on or
    /// inside the innermost visible ring.
    pub fn can_zoom_in(&self, partition: &Partition, idx: usize) -> bool {
        let node = partition.get(idx);
        !node.children.is_empty() && (node.depth as f64) <= self.depth + 1.0
    }

    pub fn zoom_in(&mut self, partition: &Partition, idx: usize, slow: bool) -> bool {
        if !self.can_zoom_in(partition, idx) {
            return false;
        }
        self.trail.push(idx);
        self.begin(partition, idx, slow);
        true
    }

    pub fn zoom_out(&mut self, partition: &Partition, slow: bool) -> bool {
        let Some(parent) = partition.parent(self.root) else {
            return false;
        };
        self.trail.pop();
        self.begin(partition, parent, slow);
        true
    }

    /// Jump back to an entry on the trail (breadcrumb click). `trail_pos`
    /// indexes into `trail()`; everything after it is discarded.
    pub fn zoom_to_trail(&mut self, partition: &Partition, trail_pos: usize, slow: bool) -> bool {
        let Some(&target) = self.trail.get(trail_pos) else {
            return false;
        };
        self.trail.truncate(trail_pos + 1);
        self.begin(partition, target, slow);
        true
    }

    fn begin(&mut self, partition: &Partition, target: usize, slow: bool) {
        let node = partition.get(target);
        self.root = target;
        // Replaces any live transition: the new zoom supersedes it.
        self.transition = Some(Transition {
            from_domain: self.domain,
            to_domain: (node.x, node.x_end()),
            from_depth: self.depth,
            to_depth: node.depth as f64,
            elapsed: 0.0,
            duration: if slow {
                ZOOM_DURATION * SLOW_MOTION_FACTOR
            } else {
                ZOOM_DURATION
            },
        });
    }

    /// Advance the tween by `dt` seconds. Returns true while still animating.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(transition) = &mut self.transition else {
            return false;
        };
        transition.elapsed += dt;
        let t = (transition.elapsed / transition.duration).clamp(0.0, 1.0) as f64;
        if t >= 1.0 {
            // Land exactly on the target, free of lerp rounding.
            self.domain = transition.to_domain;
            self.depth = transition.to_depth;
            self.transition = None;
            return false;
        }
        let eased = ease_cubic_in_out(t);
        self.domain = (
            lerp(transition.from_domain.0, transition.to_domain.0, eased),
            lerp(transition.from_domain.1, transition.to_domain.1, eased),
        );
        self.depth = lerp(transition.from_depth, transition.to_depth, eased);
        true
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::HierarchyNode;

    fn partition() -> Partition {
        Partition::build(&HierarchyNode::branch(
            "root",
            "",
            vec![
                HierarchyNode::branch(
                    "a",
                    "",
                    vec![
                        HierarchyNode::branch(
                            "p",
                            "",
                            vec![
                                HierarchyNode::leaf("r", "", 20.0),
                                HierarchyNode::leaf("s", "", 10.0),
                            ],
                        ),
                        HierarchyNode::leaf("q", "", 10.0),
                    ],
                ),
                HierarchyNode::leaf("b", "", 60.0),
            ],
        ))
    }

    fn settle(zoom: &mut ZoomController) {
        while zoom.advance(0.1) {}
    }

    #[test]
    fn zoom_round_trip_restores_geometry() {
        let partition = partition();
        let mut zoom = ZoomController::new();
        let a = partition.find_by_key("a").unwrap();

        assert!(zoom.zoom_in(&partition, a, false));
        settle(&mut zoom);
        let node = partition.get(a);
        assert!((zoom.domain().0 - node.x).abs() < 1e-9);
        assert!((zoom.domain().1 - node.x_end()).abs() < 1e-9);
        assert_eq!(zoom.current_depth(), 1.0);

        assert!(zoom.zoom_out(&partition, false));
        settle(&mut zoom);
        assert_eq!(zoom.root(), 0);
        assert_eq!(zoom.domain(), (0.0, 1.0));
        assert_eq!(zoom.current_depth(), 0.0);
        assert!(zoom.trail().is_empty());
    }

    #[test]
    fn leaf_is_not_a_zoom_target() {
        let partition = partition();
        let mut zoom = ZoomController::new();
        let b = partition.find_by_key("b").unwrap();
        assert!(!zoom.zoom_in(&partition, b, false));
        assert!(zoom.trail().is_empty());
    }

    #[test]
    fn nodes_past_the_visible_ring_are_rejected() {
        let partition = partition();
        let zoom = ZoomController::new();
        // "a.p" has children but sits at depth 2 > current_depth(0) + 1.
        let deep = partition.find_by_key("a.p").unwrap();
        assert!(!zoom.can_zoom_in(&partition, deep));
    }

    #[test]
    fn deeper_ring_unlocks_after_zooming_in() {
        let partition = partition();
        let mut zoom = ZoomController::new();
        let a = partition.find_by_key("a").unwrap();
        let deep = partition.find_by_key("a.p").unwrap();

        zoom.zoom_in(&partition, a, false);
        settle(&mut zoom);
        assert!(zoom.can_zoom_in(&partition, deep));
    }

    #[test]
    fn zoom_out_at_root_is_a_no_op() {
        let partition = partition();
        let mut zoom = ZoomController::new();
        assert!(!zoom.zoom_out(&partition, false));
        assert_eq!(zoom.root(), 0);
    }

    #[test]
    fn new_zoom_supersedes_in_flight_transition() {
        let partition = partition();
        let mut zoom = ZoomController::new();
        let a = partition.find_by_key("a").unwrap();

        zoom.zoom_in(&partition, a, false);
        zoom.advance(0.1);
        assert!(zoom.is_animating());

        // Zoom back out mid-flight: the controller retargets immediately.
        zoom.zoom_out(&partition, false);
        assert_eq!(zoom.root(), 0);
        settle(&mut zoom);
        assert_eq!(zoom.domain(), (0.0, 1.0));
        assert_eq!(zoom.current_depth(), 0.0);
    }

    #[test]
    fn breadcrumb_jump_truncates_trail() {
        let partition = partition();
        let mut zoom = ZoomController::new();
        let a = partition.find_by_key("a").unwrap();

        zoom.zoom_in(&partition, a, false);
        settle(&mut zoom);
        assert_eq!(zoom.trail(), &[a]);

        assert!(zoom.zoom_to_trail(&partition, 0, false));
        settle(&mut zoom);
        assert_eq!(zoom.root(), a);
        assert_eq!(zoom.trail(), &[a]);
    }

    #[test]
    fn slow_motion_stretches_duration() {
        let partition = partition();
        let mut zoom = ZoomController::new();
        let a = partition.find_by_key("a").unwrap();

        zoom.zoom_in(&partition, a, true);
        // After a normal-speed duration the slow transition is still going.
        for _ in 0..8 {
            zoom.advance(0.1);
        }
        assert!(zoom.is_animating());
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
    }
}
