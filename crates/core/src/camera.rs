use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Orbit camera parameters for one view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraState {
    pub target: [f32; 3],
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_deg: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            target: [0.0, 0.0, 0.0],
            distance: 3.0,
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.3,
            fov_deg: 45.0,
        }
    }
}

impl CameraState {
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.target) + self.direction() * self.distance.max(0.1)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        let view = Mat4::look_at_rh(self.position(), Vec3::from(self.target), Vec3::Y);
        let projection =
            Mat4::perspective_rh(self.fov_deg.clamp(1.0, 170.0).to_radians(), aspect, 0.01, 1000.0);
        projection * view
    }

    /// Turns the camera around its target. Angles are in radians.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-1.54, 1.54);
    }

    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(0.1, 500.0);
        }
    }

    fn direction(&self) -> Vec3 {
        let pitch = self.pitch.clamp(-1.54, 1.54);
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }
}
