use eframe::egui;
use glam::Vec2;
use lookdev_app::DisplayerEvent;
use lookdev_core::{ComparisonGizmo, DividerGeometry, SurfaceSize, ViewCompositionIndex};
use render::sync_composite_target;

use super::{LibraryPayload, LookDevApp};

const ORBIT_SPEED: f32 = 0.01;
const DIVIDER_COLOR: egui::Color32 = egui::Color32::from_rgb(240, 200, 80);

impl LookDevApp {
    pub(super) fn show_composite(&mut self, ui: &mut egui::Ui, frame: &eframe::Frame) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let size = SurfaceSize::new(rect.width().round() as u32, rect.height().round() as u32);
        if self.window.size.get() != size {
            self.window.size.set(size);
            self.session.dispatch(DisplayerEvent::Resized(size));
        }

        if !self.session.is_open() {
            let message = self.status.as_deref().unwrap_or("LookDev is closed");
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                message,
                egui::FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }
        if !self.session.is_renderer_configured() {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Waiting for the render pipeline...",
                egui::FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        self.handle_composite_input(&response, rect);

        let Some(render_state) = frame.wgpu_render_state() else {
            return;
        };
        let Some(composite) = self.session.render_frame() else {
            return;
        };
        let texture_id = sync_composite_target(
            &mut self.gpu_target,
            &render_state.device,
            &render_state.queue,
            &mut render_state.renderer.write(),
            composite,
        );
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter()
            .image(texture_id, rect, uv, egui::Color32::WHITE);
        self.paint_divider(ui.painter(), rect, size);
    }

    fn handle_composite_input(&mut self, response: &egui::Response, rect: egui::Rect) {
        let local = |pos: egui::Pos2| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);

        if let Some(payload) = response.dnd_release_payload::<LibraryPayload>() {
            if let Some(pos) = response.interact_pointer_pos().or(response.hover_pos()) {
                self.drop_into_view(
                    payload.object.clone(),
                    payload.environment,
                    ViewCompositionIndex::Composite,
                    local(pos),
                );
            }
        }

        let pointer = response.interact_pointer_pos().map(local);
        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = pointer {
                self.session.dispatch(DisplayerEvent::PointerDown(pos));
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = pointer {
                if self.session.is_gizmo_dragging() {
                    self.session.dispatch(DisplayerEvent::PointerMoved(pos));
                } else {
                    let delta = response.drag_delta();
                    self.session
                        .navigate_camera(pos, Vec2::new(delta.x, delta.y) * ORBIT_SPEED, 1.0);
                }
            }
        }
        if response.drag_stopped() {
            self.session.dispatch(DisplayerEvent::PointerUp);
        }

        if response.hovered() {
            let scroll = response.ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                if let Some(pos) = response.hover_pos().map(local) {
                    self.session
                        .navigate_camera(pos, Vec2::ZERO, (-scroll * 0.002).exp());
                }
            }
        }
    }

    fn paint_divider(&self, painter: &egui::Painter, rect: egui::Rect, size: SurfaceSize) {
        let to_screen = |point: Vec2| rect.min + egui::vec2(point.x, point.y);
        let stroke = egui::Stroke::new(2.0, DIVIDER_COLOR);
        match ComparisonGizmo::divider_geometry(self.session.context().layout(), size) {
            DividerGeometry::None => {}
            DividerGeometry::Line {
                center,
                normal,
                rotate_handle,
            } => {
                let direction = Vec2::new(-normal.y, normal.x);
                let reach = rect.width() + rect.height();
                painter.line_segment(
                    [
                        to_screen(center - direction * reach),
                        to_screen(center + direction * reach),
                    ],
                    stroke,
                );
                painter.line_segment([to_screen(center), to_screen(rotate_handle)], stroke);
                painter.circle_stroke(to_screen(rotate_handle), 6.0, stroke);
                painter.circle_filled(to_screen(center), 5.0, DIVIDER_COLOR);
            }
            DividerGeometry::Circle { center, radius } => {
                painter.circle_stroke(to_screen(center), radius, stroke);
                painter.circle_filled(to_screen(center), 5.0, DIVIDER_COLOR);
            }
        }
    }
}
