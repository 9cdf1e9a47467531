//! Comparison gizmo: the draggable divider used by the combined layouts.
//!
//! The persisted part lives in [`ComparisonGizmoState`] inside the layout context;
//! [`ComparisonGizmo`] only tracks the transient drag interaction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::context::{Layout, LayoutContext, ViewIndex};
use crate::surface::SurfaceSize;

/// Half thickness of the grabbable band around the split line or circle edge.
pub const HIT_THICKNESS_PX: f32 = 6.0;
/// Grab radius of the centre and rotation handles.
pub const CENTER_HANDLE_PX: f32 = 10.0;
/// Distance from the centre to the rotation handle along the split line.
pub const ROTATE_ARM_PX: f32 = 60.0;
pub const MIN_RADIUS: f32 = 0.02;
pub const MAX_RADIUS: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonGizmoState {
    /// Divider centre, normalized to the composite surface.
    pub center: [f32; 2],
    /// Orientation of the split normal in radians. At 0 the First view is on the left.
    pub angle: f32,
    /// Circle radius as a fraction of the shorter surface side.
    pub radius: f32,
}

impl Default for ComparisonGizmoState {
    fn default() -> Self {
        Self {
            center: [0.5, 0.5],
            angle: 0.0,
            radius: 0.25,
        }
    }
}

impl ComparisonGizmoState {
    fn center_px(&self, size: Vec2) -> Vec2 {
        Vec2::from(self.center) * size
    }

    fn normal(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    fn line_direction(&self) -> Vec2 {
        self.normal().perp()
    }

    fn radius_px(&self, size: Vec2) -> f32 {
        self.radius * size.min_element()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DividerGeometry {
    None,
    Line {
        center: Vec2,
        normal: Vec2,
        rotate_handle: Vec2,
    },
    Circle {
        center: Vec2,
        radius: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoDragKind {
    MoveCenter,
    MoveLine,
    Rotate,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GizmoInteraction {
    Idle,
    Dragging { kind: GizmoDragKind, grab_offset: Vec2 },
}

#[derive(Debug, Clone)]
pub struct ComparisonGizmo {
    interaction: GizmoInteraction,
}

impl Default for ComparisonGizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonGizmo {
    pub fn new() -> Self {
        Self {
            interaction: GizmoInteraction::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, GizmoInteraction::Dragging { .. })
    }

    pub fn drag_kind(&self) -> Option<GizmoDragKind> {
        match self.interaction {
            GizmoInteraction::Dragging { kind, .. } => Some(kind),
            GizmoInteraction::Idle => None,
        }
    }

    /// Resolves a point of the composite surface to the view drawn there.
    /// Points exactly on a boundary belong to [`ViewIndex::First`].
    pub fn view_from_composition(layout: &LayoutContext, size: SurfaceSize, point: Vec2) -> ViewIndex {
        if !point.is_finite() {
            return ViewIndex::First;
        }
        let size = size.clamped().as_vec2();
        let state = &layout.gizmo_state;
        let first = match layout.view_layout {
            Layout::FullFirstView => true,
            Layout::FullSecondView => false,
            Layout::HorizontalSplit => point.x <= size.x * 0.5,
            Layout::VerticalSplit => point.y <= size.y * 0.5,
            Layout::CustomSplit => (point - state.center_px(size)).dot(state.normal()) <= 0.0,
            Layout::CustomCircular => {
                point.distance(state.center_px(size)) <= state.radius_px(size)
            }
        };
        if first {
            ViewIndex::First
        } else {
            ViewIndex::Second
        }
    }

    pub fn divider_geometry(layout: &LayoutContext, size: SurfaceSize) -> DividerGeometry {
        let size = size.clamped().as_vec2();
        let state = &layout.gizmo_state;
        let center = state.center_px(size);
        match layout.view_layout {
            Layout::CustomSplit => DividerGeometry::Line {
                center,
                normal: state.normal(),
                rotate_handle: center + state.line_direction() * ROTATE_ARM_PX,
            },
            Layout::CustomCircular => DividerGeometry::Circle {
                center,
                radius: state.radius_px(size),
            },
            _ => DividerGeometry::None,
        }
    }

    pub fn hit_test(layout: &LayoutContext, size: SurfaceSize, point: Vec2) -> Option<GizmoDragKind> {
        if !point.is_finite() {
            return None;
        }
        match Self::divider_geometry(layout, size) {
            DividerGeometry::None => None,
            DividerGeometry::Line {
                center,
                normal,
                rotate_handle,
            } => {
                if point.distance(center) <= CENTER_HANDLE_PX {
                    Some(GizmoDragKind::MoveCenter)
                } else if point.distance(rotate_handle) <= CENTER_HANDLE_PX {
                    Some(GizmoDragKind::Rotate)
                } else if (point - center).dot(normal).abs() <= HIT_THICKNESS_PX {
                    Some(GizmoDragKind::MoveLine)
                } else {
                    None
                }
            }
            DividerGeometry::Circle { center, radius } => {
                let distance = point.distance(center);
                if distance <= CENTER_HANDLE_PX {
                    Some(GizmoDragKind::MoveCenter)
                } else if (distance - radius).abs() <= HIT_THICKNESS_PX {
                    Some(GizmoDragKind::Resize)
                } else {
                    None
                }
            }
        }
    }

    /// Starts a drag when `point` lands on the divider. Returns whether a drag started.
    pub fn on_pointer_down(&mut self, layout: &LayoutContext, size: SurfaceSize, point: Vec2) -> bool {
        let Some(kind) = Self::hit_test(layout, size, point) else {
            return false;
        };
        let center = layout.gizmo_state.center_px(size.clamped().as_vec2());
        self.interaction = GizmoInteraction::Dragging {
            kind,
            grab_offset: point - center,
        };
        tracing::debug!("gizmo drag started: {:?}", kind);
        true
    }

    /// Updates the persisted divider while dragging. Returns whether the state changed.
    pub fn on_pointer_move(&mut self, layout: &mut LayoutContext, size: SurfaceSize, point: Vec2) -> bool {
        let GizmoInteraction::Dragging { kind, grab_offset } = self.interaction else {
            return false;
        };
        if !point.is_finite() || !layout.is_combined_view() {
            return false;
        }
        let size = size.clamped().as_vec2();
        let state = &mut layout.gizmo_state;
        let before = *state;
        let center = state.center_px(size);
        match kind {
            GizmoDragKind::MoveCenter => {
                state.center = normalized_center(point - grab_offset, size);
            }
            GizmoDragKind::MoveLine => {
                let normal = state.normal();
                let target = point - grab_offset;
                let moved = center + normal * (target - center).dot(normal);
                state.center = normalized_center(moved, size);
            }
            GizmoDragKind::Rotate => {
                let arm = point - center;
                if arm.length_squared() > f32::EPSILON {
                    // line direction is the normal rotated by +90 degrees
                    state.angle = (-arm.x).atan2(arm.y);
                }
            }
            GizmoDragKind::Resize => {
                let shorter = size.min_element().max(1.0);
                state.radius = (point.distance(center) / shorter).clamp(MIN_RADIUS, MAX_RADIUS);
            }
        }
        *state != before
    }

    pub fn on_pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.interaction = GizmoInteraction::Idle;
        was_dragging
    }

    pub fn reset(&self, layout: &mut LayoutContext) {
        layout.gizmo_state = ComparisonGizmoState::default();
    }
}

fn normalized_center(point: Vec2, size: Vec2) -> [f32; 2] {
    (point / size).clamp(Vec2::ZERO, Vec2::ONE).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: SurfaceSize = SurfaceSize {
        width: 800,
        height: 400,
    };

    fn layout(view_layout: Layout) -> LayoutContext {
        LayoutContext {
            view_layout,
            ..LayoutContext::default()
        }
    }

    #[test]
    fn custom_split_maps_quarters_to_sides() {
        let layout = layout(Layout::CustomSplit);
        let left = Vec2::new(200.0, 200.0);
        let right = Vec2::new(600.0, 200.0);
        assert_eq!(ComparisonGizmo::view_from_composition(&layout, SIZE, left), ViewIndex::First);
        assert_eq!(ComparisonGizmo::view_from_composition(&layout, SIZE, right), ViewIndex::Second);
    }

    #[test]
    fn boundaries_resolve_to_first_view() {
        let on_line = Vec2::new(400.0, 123.0);
        for view_layout in [Layout::CustomSplit, Layout::HorizontalSplit] {
            let layout = layout(view_layout);
            for _ in 0..3 {
                assert_eq!(
                    ComparisonGizmo::view_from_composition(&layout, SIZE, on_line),
                    ViewIndex::First
                );
            }
        }
        let vertical = layout(Layout::VerticalSplit);
        assert_eq!(
            ComparisonGizmo::view_from_composition(&vertical, SIZE, Vec2::new(10.0, 200.0)),
            ViewIndex::First
        );
        let circular = layout(Layout::CustomCircular);
        let on_edge = Vec2::new(400.0 + 100.0, 200.0);
        assert_eq!(
            ComparisonGizmo::view_from_composition(&circular, SIZE, on_edge),
            ViewIndex::First
        );
        assert_eq!(
            ComparisonGizmo::view_from_composition(&circular, SIZE, on_edge + Vec2::X),
            ViewIndex::Second
        );
    }

    #[test]
    fn full_layouts_ignore_position() {
        let first = layout(Layout::FullFirstView);
        let second = layout(Layout::FullSecondView);
        for point in [Vec2::ZERO, Vec2::new(799.0, 399.0), Vec2::new(-5.0, 1e6)] {
            assert_eq!(ComparisonGizmo::view_from_composition(&first, SIZE, point), ViewIndex::First);
            assert_eq!(ComparisonGizmo::view_from_composition(&second, SIZE, point), ViewIndex::Second);
        }
    }

    #[test]
    fn non_finite_points_are_total() {
        let layout = layout(Layout::CustomSplit);
        let point = Vec2::new(f32::NAN, 10.0);
        assert_eq!(ComparisonGizmo::view_from_composition(&layout, SIZE, point), ViewIndex::First);
    }

    #[test]
    fn dragging_the_line_moves_the_split() {
        let mut layout = layout(Layout::CustomSplit);
        let mut gizmo = ComparisonGizmo::new();
        assert!(gizmo.on_pointer_down(&layout, SIZE, Vec2::new(402.0, 300.0)));
        assert_eq!(gizmo.drag_kind(), Some(GizmoDragKind::MoveLine));
        assert!(gizmo.on_pointer_move(&mut layout, SIZE, Vec2::new(602.0, 250.0)));
        let center = layout.gizmo_state().center;
        assert!((center[0] - 0.75).abs() < 1e-5);
        assert!((center[1] - 0.5).abs() < 1e-5);
        assert!(gizmo.on_pointer_up());
        assert!(!gizmo.is_dragging());
        assert!(!gizmo.on_pointer_move(&mut layout, SIZE, Vec2::new(100.0, 100.0)));
        assert_eq!(
            ComparisonGizmo::view_from_composition(&layout, SIZE, Vec2::new(500.0, 200.0)),
            ViewIndex::First
        );
    }

    #[test]
    fn pointer_down_away_from_divider_stays_idle() {
        let layout = layout(Layout::CustomSplit);
        let mut gizmo = ComparisonGizmo::new();
        assert!(!gizmo.on_pointer_down(&layout, SIZE, Vec2::new(100.0, 100.0)));
        assert!(!gizmo.is_dragging());
        let simple = LayoutContext::default();
        assert!(!gizmo.on_pointer_down(&simple, SIZE, Vec2::new(400.0, 200.0)));
    }

    #[test]
    fn center_drag_is_clamped_to_surface() {
        let mut layout = layout(Layout::CustomCircular);
        let mut gizmo = ComparisonGizmo::new();
        assert!(gizmo.on_pointer_down(&layout, SIZE, Vec2::new(400.0, 200.0)));
        assert_eq!(gizmo.drag_kind(), Some(GizmoDragKind::MoveCenter));
        gizmo.on_pointer_move(&mut layout, SIZE, Vec2::new(-50.0, 900.0));
        assert_eq!(layout.gizmo_state().center, [0.0, 1.0]);
    }

    #[test]
    fn resizing_the_circle_changes_radius() {
        let mut layout = layout(Layout::CustomCircular);
        let mut gizmo = ComparisonGizmo::new();
        assert!(gizmo.on_pointer_down(&layout, SIZE, Vec2::new(500.0, 200.0)));
        assert_eq!(gizmo.drag_kind(), Some(GizmoDragKind::Resize));
        gizmo.on_pointer_move(&mut layout, SIZE, Vec2::new(400.0, 360.0));
        assert!((layout.gizmo_state().radius - 0.4).abs() < 1e-5);
    }

    #[test]
    fn rotating_the_line_changes_sides() {
        let mut layout = layout(Layout::CustomSplit);
        let mut gizmo = ComparisonGizmo::new();
        let handle = match ComparisonGizmo::divider_geometry(&layout, SIZE) {
            DividerGeometry::Line { rotate_handle, .. } => rotate_handle,
            other => panic!("unexpected geometry {other:?}"),
        };
        assert!(gizmo.on_pointer_down(&layout, SIZE, handle));
        assert_eq!(gizmo.drag_kind(), Some(GizmoDragKind::Rotate));
        // line now horizontal
        gizmo.on_pointer_move(&mut layout, SIZE, Vec2::new(300.0, 200.0));
        let above = Vec2::new(400.0, 100.0);
        let below = Vec2::new(400.0, 300.0);
        assert_ne!(
            ComparisonGizmo::view_from_composition(&layout, SIZE, above),
            ComparisonGizmo::view_from_composition(&layout, SIZE, below)
        );
    }
}
