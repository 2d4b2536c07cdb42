//! Camera and viewport state shared with the renderers.
//!
//! These types avoid platform APIs so the web and native front-ends can both
//! build matrices from them and map pointer pixels into the trail plane.

use crate::config::CameraParams;
use crate::constants::{CAMERA_ZFAR, CAMERA_ZNEAR};
use crate::strand::ScreenPoint;
use glam::{Mat4, Vec3};

/// Simple right-handed camera looking down -Z at the trail plane (z = 0).
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(params: &CameraParams, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, params.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: params.fov_y_radians,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Pixel viewport plus the world-space extent it covers on the z = 0 plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub view_width: f32,
    pub view_height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, camera: &CameraParams) -> Self {
        let mut vp = Self {
            width: 1.0,
            height: 1.0,
            view_width: 0.0,
            view_height: 0.0,
        };
        vp.resize(width, height, camera);
        vp
    }

    /// Recompute the world extent. Non-positive sizes are ignored and the
    /// previous extent is kept.
    pub fn resize(&mut self, width: f32, height: f32, camera: &CameraParams) -> bool {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.view_height = 2.0 * camera.distance * (camera.fov_y_radians * 0.5).tan();
        self.view_width = self.view_height * self.aspect();
        true
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn screen_to_world(&self, p: ScreenPoint) -> Vec3 {
        Vec3::new(
            (p.x / self.width - 0.5) * self.view_width,
            -(p.y / self.height - 0.5) * self.view_height,
            0.0,
        )
    }
}
